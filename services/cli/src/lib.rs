mod cli;
mod commands;
mod sources;

use scout_analytics::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
