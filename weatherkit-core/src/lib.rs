//! Core library for the Apple WeatherKit MCP server.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Short-lived ES256 assertion signing for Apple APIs
//! - Apple Maps clients (token exchange, geocoding)
//! - Apple WeatherKit daily-forecast client
//! - French-localized forecast formatting
//! - The two tool operations (`forecast_report`, `summary`)
//!
//! It is used by `weatherkit-mcp`, but can also be reused by other binaries
//! or services.

pub mod auth;
pub mod config;
pub mod error;
pub mod format;
pub mod maps;
pub mod model;
pub mod tools;
pub mod weather;

pub use auth::{ASSERTION_TTL, TokenSigner};
pub use config::Config;
pub use error::{Error, HttpFailure};
pub use model::{ForecastDay, FormattedDay, GeoLocation};
pub use tools::{ForecastProvider, Geocoder, WeatherTools};
