mod classify;
mod cli;
mod infra;
mod routes;
mod server;
mod ui;

use bookvpro::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
