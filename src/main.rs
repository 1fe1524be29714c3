use std::{future::Future, path::PathBuf};

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tokio_util::sync::CancellationToken;

use spotdump::{
    Error, Res,
    cli::{self, AuthOptions, ExportOptions},
    config, error, info, logging, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
  args_conflicts_with_subcommands = true // export flags only apply without a subcommand
)]
struct Cli {
    #[clap(flatten)]
    export: ExportArgs,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API and cache the token
    Auth(AuthArgs),

    /// List the playlists an export would contain
    Playlists(AuthArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// Token cache file
    #[clap(long, default_value = config::DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,

    /// Open the authorization URL in the default browser
    #[clap(long)]
    pub open_browser: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[clap(flatten)]
    pub auth: AuthArgs,

    /// Directory the timestamped export folder is created in
    #[clap(long, default_value = config::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Export without asking for confirmation
    #[clap(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

impl From<AuthArgs> for AuthOptions {
    fn from(args: AuthArgs) -> Self {
        AuthOptions {
            cache_path: args.cache_path,
            open_browser: args.open_browser,
        }
    }
}

impl From<ExportArgs> for ExportOptions {
    fn from(args: ExportArgs) -> Self {
        ExportOptions {
            auth: args.auth.into(),
            output_dir: args.output_dir,
            assume_yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let result = match cli.command {
        None => until_cancelled(cli::export(cli.export.into(), cancel.clone()), &cancel).await,
        Some(Command::Auth(opt)) => until_cancelled(cli::auth(opt.into()), &cancel).await,
        Some(Command::Playlists(opt)) => {
            until_cancelled(cli::playlists(opt.into()), &cancel).await
        }
        Some(Command::Completions(opt)) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    let Err(e) = result else {
        return;
    };

    match &e {
        Error::Cancelled => {
            println!();
            info!("Operation cancelled by user. Exiting...");
        }
        Error::MissingConfig(_) => error!("{}", e),
        _ => error!("An error occurred: {}", e),
    }

    // also ends a prompt still blocked on stdin
    std::process::exit(e.exit_code());
}

async fn until_cancelled<F>(task: F, cancel: &CancellationToken) -> Res<()>
where
    F: Future<Output = Res<()>>,
{
    tokio::select! {
        result = task => result,
        _ = cancel.cancelled() => Err(Error::Cancelled),
    }
}
