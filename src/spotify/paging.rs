use std::future::Future;

use serde::de::DeserializeOwned;

use crate::{error::Res, spotify::client::LibraryApi, types::Page};

/// Concatenates the items of `first` and of every page reached through its
/// `next` cursor.
///
/// Pages are appended in the order they are fetched and items keep their
/// position within each page. The walk ends on the first page whose `next`
/// is null; there is no upper bound on the number of pages.
///
/// # Errors
///
/// The first error returned by `fetch_next` aborts the walk.
pub async fn collect_pages<T, F, Fut>(first: Page<T>, mut fetch_next: F) -> Res<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Res<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = first;

    loop {
        items.extend(page.items);
        match page.next {
            Some(next) if !next.is_empty() => {
                tracing::debug!(next = %next, fetched = items.len(), "following page cursor");
                page = fetch_next(next).await?;
            }
            _ => return Ok(items),
        }
    }
}

/// Walks every remaining page of `first` through `api`.
pub async fn walk<A, T>(api: &A, first: Page<T>) -> Res<Vec<T>>
where
    A: LibraryApi,
    T: DeserializeOwned + Send + 'static,
{
    collect_pages(first, |next| async move { api.next_page::<T>(&next).await }).await
}
