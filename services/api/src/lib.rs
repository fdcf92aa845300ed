mod cli;
mod infra;
mod routes;
mod server;
mod sweep;

use hackdesk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
