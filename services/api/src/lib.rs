mod cli;
mod infra;
mod routes;
mod server;

use prestabanco::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
