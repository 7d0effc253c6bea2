//! Apple WeatherKit client: daily forecast retrieval.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::auth::{ASSERTION_TTL, TokenSigner};
use crate::config::Config;
use crate::error::{Error, HttpFailure, truncate_body};
use crate::model::{ForecastDay, GeoLocation};
use crate::tools::ForecastProvider;

pub const WEATHERKIT_API_BASE: &str = "https://weatherkit.apple.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the WeatherKit REST API. The signed assertion is used as the
/// bearer credential directly; WeatherKit has no token-exchange step.
#[derive(Debug, Clone)]
pub struct WeatherKitClient {
    http: Client,
    base_url: String,
    language: String,
    timezone: String,
}

impl WeatherKitClient {
    pub fn new(language: &str, timezone: &str) -> anyhow::Result<Self> {
        Self::with_base_url(WEATHERKIT_API_BASE, language, timezone)
    }

    /// Client against an explicit base URL (tests point this at a mock).
    pub fn with_base_url(base_url: &str, language: &str, timezone: &str) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
            timezone: timezone.to_string(),
        })
    }

    /// Fetch the daily forecast for a coordinate pair.
    ///
    /// Returns `Ok(vec![])` when Apple answers 200 with an empty or absent
    /// `forecastDaily.days` collection, so callers can tell "no forecast
    /// for this place" apart from a failed request.
    pub async fn daily_forecast(
        &self,
        assertion: &str,
        location: &GeoLocation,
    ) -> Result<Vec<ForecastDay>, Error> {
        let url = format!(
            "{}/api/v1/weather/{}/{}/{}",
            self.base_url, self.language, location.latitude, location.longitude
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("countryCode", location.country_code.as_str()),
                ("timezone", self.timezone.as_str()),
                ("dataSets", "forecastDaily"),
            ])
            .bearer_auth(assertion)
            .send()
            .await
            .map_err(|e| Error::ForecastFetch(HttpFailure::Transport(e)))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::ForecastFetch(HttpFailure::Transport(e)))?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %truncate_body(&body),
                latitude = location.latitude,
                longitude = location.longitude,
                "Failed to retrieve weather data"
            );
            return Err(Error::ForecastFetch(HttpFailure::from_status(status, &body)));
        }

        let parsed: WeatherResponse = serde_json::from_str(&body)
            .map_err(|e| Error::ForecastFetch(HttpFailure::Decode(e)))?;

        let days = parsed.forecast_daily.map(|f| f.days).unwrap_or_default();
        tracing::info!(days = days.len(), "Retrieved daily forecast");
        Ok(days)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(rename = "forecastDaily")]
    forecast_daily: Option<ForecastDaily>,
}

#[derive(Debug, Deserialize)]
struct ForecastDaily {
    #[serde(default)]
    days: Vec<ForecastDay>,
}

/// Production forecast provider: mints a WeatherKit assertion per call and
/// fetches the daily data set with it.
pub struct AppleWeatherProvider {
    config: Config,
    client: WeatherKitClient,
}

impl AppleWeatherProvider {
    pub fn new(config: Config, client: WeatherKitClient) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl ForecastProvider for AppleWeatherProvider {
    async fn daily_forecast(&self, location: &GeoLocation) -> Result<Vec<ForecastDay>, Error> {
        let signer = TokenSigner::weather(&self.config)?;
        let assertion = signer.assertion(ASSERTION_TTL)?;
        self.client.daily_forecast(&assertion, location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn paris() -> GeoLocation {
        GeoLocation { latitude: 48.8566, longitude: 2.3522, country_code: "FR".to_string() }
    }

    fn client_for(server: &MockServer) -> WeatherKitClient {
        WeatherKitClient::with_base_url(&server.uri(), "fr", "Europe/Paris")
            .expect("client must build")
    }

    #[tokio::test]
    async fn daily_forecast_parses_days() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/weather/fr/48.8566/2.3522"))
            .and(query_param("countryCode", "FR"))
            .and(query_param("timezone", "Europe/Paris"))
            .and(query_param("dataSets", "forecastDaily"))
            .and(header("Authorization", "Bearer weather-assertion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "forecastDaily": {
                    "days": [
                        {
                            "forecastStart": "2026-08-25T22:00:00Z",
                            "conditionCode": "MostlyClear",
                            "temperatureMax": 27.4,
                            "temperatureMin": 16.8,
                            "precipitationAmount": 0.0,
                            "precipitationChance": 0.05,
                            "windSpeedMax": 14.2
                        },
                        {
                            "forecastStart": "2026-08-26T22:00:00Z",
                            "conditionCode": "Rain",
                            "temperatureMin": 14.1,
                            "precipitationAmount": 6.35,
                            "precipitationChance": 0.82,
                            "windSpeedMax": 31.7
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let days = client.daily_forecast("weather-assertion", &paris()).await.unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].condition_code, "MostlyClear");
        assert_eq!(days[0].temperature_max, Some(27.4));
        // Second day has no max temperature on the wire.
        assert_eq!(days[1].temperature_max, None);
        assert_eq!(days[1].precipitation_chance, 0.82);
    }

    #[tokio::test]
    async fn empty_days_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/weather/fr/48.8566/2.3522"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "forecastDaily": {"days": []}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let days = client.daily_forecast("weather-assertion", &paris()).await.unwrap();

        assert!(days.is_empty());
    }

    #[tokio::test]
    async fn absent_forecast_daily_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/weather/fr/48.8566/2.3522"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let days = client.daily_forecast("weather-assertion", &paris()).await.unwrap();

        assert!(days.is_empty());
    }

    #[tokio::test]
    async fn non_200_is_a_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/weather/fr/48.8566/2.3522"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.daily_forecast("weather-assertion", &paris()).await.unwrap_err();

        match err {
            Error::ForecastFetch(HttpFailure::Status { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("expected ForecastFetch status error, got {other:?}"),
        }
    }
}
