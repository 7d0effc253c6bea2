//! Binary crate for the Apple WeatherKit MCP server.
//!
//! Serves the `get_weather_forecast` and `get_weather_summary` tools over
//! stdio. Logs go to stderr; stdout belongs to the transport.

use rmcp::ServiceExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weatherkit_core::{Config, WeatherTools};

mod server;

use server::WeatherServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Apple WeatherKit MCP server");

    let config = Config::load()?;
    let tools = WeatherTools::from_config(&config)?;

    let service = WeatherServer::new(tools).serve(rmcp::transport::stdio()).await?;
    let reason = service.waiting().await?;

    tracing::info!(?reason, "Apple WeatherKit MCP server stopped");
    Ok(())
}
