mod cli;
mod pipeline;
mod prompt;
mod reports;

use vacancy_analytics::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
