use clap::{Args, Parser, Subcommand};
use hackdesk::error::AppError;

use crate::server;
use crate::sweep;

#[derive(Parser, Debug)]
#[command(
    name = "Hackdesk",
    about = "Run the hackathon attendance service and its maintenance jobs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Take any pending invitations that are too old and expire them
    ExpireInvitations(ExpireArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed a small demo dataset into the in-memory store
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExpireArgs {
    /// Display the candidates for expiry but do not expire them
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Override the invitation validity window in days
    #[arg(long)]
    pub(crate) max_age_days: Option<i64>,
    /// Seed a small demo dataset into the in-memory store
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::ExpireInvitations(args) => sweep::run(args),
    }
}
