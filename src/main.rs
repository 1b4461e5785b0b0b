use std::sync::Arc;
use std::time::Duration;

use log::info;

use recipe_finder::config::ServerConfig;
use recipe_finder::dataset::Dataset;
use recipe_finder::error::AppError;
use recipe_finder::nutrition::NutritionFetcher;
use recipe_finder::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::init();

    let config = ServerConfig::load()?;
    let dataset = Dataset::load(&config.dataset_path)?;

    let fetcher = NutritionFetcher::new(
        Duration::from_secs(config.fetch_timeout),
        &config.user_agent,
    );
    let app = server::router(Arc::new(AppState { dataset, fetcher }));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
