mod cli;
mod demo;
mod infra;
mod routes;
mod screening;
mod server;

use postpartum_care::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
