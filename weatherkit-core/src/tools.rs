//! Tool entry points: the linear pipeline behind `get_weather_forecast`
//! and `get_weather_summary`.
//!
//! Every stage failure is converted to a fixed French user-facing string at
//! this boundary; no error ever leaves unformatted.

use async_trait::async_trait;
use chrono_tz::Tz;

use crate::config::Config;
use crate::error::Error;
use crate::format;
use crate::maps::{AppleMapsClient, AppleMapsGeocoder};
use crate::model::{ForecastDay, GeoLocation};
use crate::weather::{AppleWeatherProvider, WeatherKitClient};

pub const MISSING_CERTIFICATES: &str = "Certificats Apple WeatherKit manquants";
pub const LOCATION_NOT_FOUND: &str =
    "Erreur : Impossible d'obtenir les coordonnées pour la ville spécifiée.";
pub const NO_DAILY_FORECAST: &str =
    "Erreur : Aucune prévision quotidienne disponible pour cette localisation.";

/// Resolves a place name to coordinates.
///
/// `Ok(None)` means the provider answered but knows no such place — a
/// normal outcome, not a failure.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, city: &str, country: &str) -> Result<Option<GeoLocation>, Error>;
}

/// Fetches the daily forecast for a resolved location.
///
/// `Ok(vec![])` means the provider had no daily data for the place.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn daily_forecast(&self, location: &GeoLocation) -> Result<Vec<ForecastDay>, Error>;
}

/// The two tool operations, sharing one pipeline:
/// resolve-location → fetch-forecast → format.
pub struct WeatherTools {
    geocoder: Box<dyn Geocoder>,
    provider: Box<dyn ForecastProvider>,
    timezone: Tz,
}

impl WeatherTools {
    pub fn new(geocoder: Box<dyn Geocoder>, provider: Box<dyn ForecastProvider>, timezone: Tz) -> Self {
        Self { geocoder, provider, timezone }
    }

    /// Production wiring against the real Apple endpoints.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timezone = config.tz()?;
        let maps = AppleMapsClient::new()?;
        let weather = WeatherKitClient::new(&config.language, &config.timezone)?;

        Ok(Self::new(
            Box::new(AppleMapsGeocoder::new(config.clone(), maps)),
            Box::new(AppleWeatherProvider::new(config.clone(), weather)),
            timezone,
        ))
    }

    /// Detailed multi-day report, or a localized error string.
    pub async fn forecast_report(&self, city: &str, country: &str) -> String {
        match self.fetch_days(city, country).await {
            Ok(days) => {
                format::render_report(&format::format_days(&days, self.timezone), city, country)
            }
            Err(message) => message,
        }
    }

    /// Today/tomorrow summary, or a localized error string.
    pub async fn summary(&self, city: &str, country: &str) -> String {
        match self.fetch_days(city, country).await {
            Ok(days) => {
                format::render_summary(&format::format_days(&days, self.timezone), city, country)
            }
            Err(message) => message,
        }
    }

    /// The shared pipeline. Linear, no retries: the first failing stage
    /// short-circuits with its user-facing message.
    async fn fetch_days(&self, city: &str, country: &str) -> Result<Vec<ForecastDay>, String> {
        tracing::info!(city, country, "Fetching weather");

        let location = self
            .geocoder
            .resolve(city, country)
            .await
            .map_err(user_message)?;

        let Some(location) = location else {
            tracing::warn!(city, country, "Location not resolved");
            return Err(LOCATION_NOT_FOUND.to_string());
        };

        let days = self
            .provider
            .daily_forecast(&location)
            .await
            .map_err(user_message)?;

        if days.is_empty() {
            tracing::warn!(city, country, "No daily forecast for resolved location");
            return Err(NO_DAILY_FORECAST.to_string());
        }

        Ok(days)
    }
}

/// Convert a stage error into its French user-facing string, logging the
/// details first.
fn user_message(err: Error) -> String {
    tracing::error!(error = ?err, "Weather pipeline stage failed");

    if err.is_key_load() {
        MISSING_CERTIFICATES.to_string()
    } else {
        format!("Erreur lors de la récupération de la météo : {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpFailure;
    use chrono_tz::Europe::Paris;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn paris() -> GeoLocation {
        GeoLocation { latitude: 48.8566, longitude: 2.3522, country_code: "FR".to_string() }
    }

    fn sunny_day() -> ForecastDay {
        ForecastDay {
            forecast_start: "2026-08-25T22:00:00Z".to_string(),
            condition_code: "Clear".to_string(),
            temperature_max: Some(27.4),
            temperature_min: Some(16.8),
            precipitation_amount: 0.0,
            precipitation_chance: 0.05,
            wind_speed_max: 14.2,
        }
    }

    fn status_failure(status: u16) -> HttpFailure {
        HttpFailure::Status { status, body: "boom".to_string() }
    }

    struct StaticGeocoder(Option<GeoLocation>);

    #[async_trait]
    impl Geocoder for StaticGeocoder {
        async fn resolve(&self, _: &str, _: &str) -> Result<Option<GeoLocation>, Error> {
            Ok(self.0.clone())
        }
    }

    struct FailingGeocoder(fn() -> Error);

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn resolve(&self, _: &str, _: &str) -> Result<Option<GeoLocation>, Error> {
            Err((self.0)())
        }
    }

    struct StaticProvider {
        days: Vec<ForecastDay>,
        called: Arc<AtomicBool>,
    }

    impl StaticProvider {
        fn new(days: Vec<ForecastDay>) -> (Self, Arc<AtomicBool>) {
            let called = Arc::new(AtomicBool::new(false));
            (Self { days, called: called.clone() }, called)
        }
    }

    #[async_trait]
    impl ForecastProvider for StaticProvider {
        async fn daily_forecast(&self, _: &GeoLocation) -> Result<Vec<ForecastDay>, Error> {
            self.called.store(true, Ordering::SeqCst);
            Ok(self.days.clone())
        }
    }

    struct FailingProvider(fn() -> Error);

    #[async_trait]
    impl ForecastProvider for FailingProvider {
        async fn daily_forecast(&self, _: &GeoLocation) -> Result<Vec<ForecastDay>, Error> {
            Err((self.0)())
        }
    }

    #[tokio::test]
    async fn successful_pipeline_renders_report() {
        let (provider, _) = StaticProvider::new(vec![sunny_day()]);
        let tools = WeatherTools::new(
            Box::new(StaticGeocoder(Some(paris()))),
            Box::new(provider),
            Paris,
        );

        let report = tools.forecast_report("Paris", "FR").await;

        assert!(report.starts_with("Prévisions météo pour Paris, FR:"));
        assert!(report.contains("Condition: ensoleillé"));
    }

    #[tokio::test]
    async fn successful_pipeline_renders_summary() {
        let mut tomorrow = sunny_day();
        tomorrow.forecast_start = "2026-08-26T22:00:00Z".to_string();
        tomorrow.condition_code = "Rain".to_string();

        let (provider, _) = StaticProvider::new(vec![sunny_day(), tomorrow]);
        let tools = WeatherTools::new(
            Box::new(StaticGeocoder(Some(paris()))),
            Box::new(provider),
            Paris,
        );

        let summary = tools.summary("Paris", "FR").await;

        assert!(summary.starts_with("Météo à Paris:"));
        assert!(summary.contains("Aujourd'hui"));
        assert!(summary.contains("Demain"));
    }

    #[tokio::test]
    async fn unresolved_location_skips_forecast_stage() {
        let (provider, called) = StaticProvider::new(vec![sunny_day()]);
        let tools = WeatherTools::new(
            Box::new(StaticGeocoder(None)),
            Box::new(provider),
            Paris,
        );

        let report = tools.forecast_report("Nulle-Part", "FR").await;

        assert_eq!(report, LOCATION_NOT_FOUND);
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn geocoding_failure_skips_forecast_stage() {
        let (provider, called) = StaticProvider::new(vec![sunny_day()]);
        let tools = WeatherTools::new(
            Box::new(FailingGeocoder(|| Error::Geocoding(status_failure(500)))),
            Box::new(provider),
            Paris,
        );

        let report = tools.forecast_report("Paris", "FR").await;

        assert!(report.starts_with("Erreur lors de la récupération de la météo :"));
        assert!(report.contains("geocoding request failed"));
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn missing_certificates_have_their_own_message() {
        let (provider, _) = StaticProvider::new(vec![sunny_day()]);
        let tools = WeatherTools::new(
            Box::new(FailingGeocoder(|| Error::KeyLoad {
                path: PathBuf::from("certificats/AuthKey_Mapkit.p8"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })),
            Box::new(provider),
            Paris,
        );

        let report = tools.forecast_report("Paris", "FR").await;

        assert_eq!(report, MISSING_CERTIFICATES);
    }

    #[tokio::test]
    async fn empty_forecast_is_distinct_from_fetch_failure() {
        let (provider, _) = StaticProvider::new(vec![]);
        let tools = WeatherTools::new(
            Box::new(StaticGeocoder(Some(paris()))),
            Box::new(provider),
            Paris,
        );

        assert_eq!(tools.forecast_report("Paris", "FR").await, NO_DAILY_FORECAST);
        assert_eq!(tools.summary("Paris", "FR").await, NO_DAILY_FORECAST);
    }

    #[tokio::test]
    async fn forecast_fetch_failure_uses_generic_message() {
        let tools = WeatherTools::new(
            Box::new(StaticGeocoder(Some(paris()))),
            Box::new(FailingProvider(|| Error::ForecastFetch(status_failure(403)))),
            Paris,
        );

        let report = tools.forecast_report("Paris", "FR").await;

        assert!(report.starts_with("Erreur lors de la récupération de la météo :"));
        assert!(report.contains("forecast request failed"));
    }
}
