use anyhow::Result;
use weatherback::{WeatherBackConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WeatherBackConfig::load()?;
    logging::init(&config.logging)?;

    if config.provider.api_key.is_none() {
        tracing::warn!(
            "No provider API key configured; set OW_KEY or WEATHERBACK_PROVIDER__API_KEY"
        );
    }

    web::run(config).await
}
