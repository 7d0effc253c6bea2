//! Apple Maps clients: token exchange and place-name geocoding.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::auth::{ASSERTION_TTL, TokenSigner};
use crate::config::Config;
use crate::error::{Error, HttpFailure, truncate_body};
use crate::model::GeoLocation;
use crate::tools::Geocoder;

pub const MAPS_API_BASE: &str = "https://maps-api.apple.com/v1";

/// Response language for geocode results. Fixed, not derived from the
/// configured WeatherKit language.
const GEOCODE_LANG: &str = "fr-FR";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client for the two Apple Maps endpoints this service needs.
#[derive(Debug, Clone)]
pub struct AppleMapsClient {
    http: Client,
    base_url: String,
}

impl AppleMapsClient {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(MAPS_API_BASE)
    }

    /// Client against an explicit base URL (tests point this at a mock).
    pub fn with_base_url(base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Exchange a signed MapKit assertion for a short-lived access token.
    pub async fn request_access_token(&self, assertion: &str) -> Result<String, Error> {
        let url = format!("{}/token", self.base_url);

        let res = self
            .http
            .get(&url)
            .bearer_auth(assertion)
            .send()
            .await
            .map_err(|e| Error::TokenExchange(HttpFailure::Transport(e)))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::TokenExchange(HttpFailure::Transport(e)))?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %truncate_body(&body),
                "Maps token exchange failed"
            );
            return Err(Error::TokenExchange(HttpFailure::from_status(status, &body)));
        }

        let parsed: TokenResponse = serde_json::from_str(&body).unwrap_or_default();
        parsed.access_token.ok_or(Error::AccessTokenMissing)
    }

    /// Resolve a free-text query to a location.
    ///
    /// Returns `Ok(None)` when Apple answers 200 with zero results or with a
    /// result missing coordinate or country code — an expected outcome for
    /// unrecognized place names, distinct from a failed request.
    pub async fn geocode(
        &self,
        access_token: &str,
        query: &str,
    ) -> Result<Option<GeoLocation>, Error> {
        let url = format!("{}/geocode", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("lang", GEOCODE_LANG)])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::Geocoding(HttpFailure::Transport(e)))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::Geocoding(HttpFailure::Transport(e)))?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %truncate_body(&body),
                query,
                "Geocoding failed"
            );
            return Err(Error::Geocoding(HttpFailure::from_status(status, &body)));
        }

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| Error::Geocoding(HttpFailure::Decode(e)))?;

        let Some(first) = parsed.results.into_iter().next() else {
            tracing::warn!(query, "No geocoding results");
            return Ok(None);
        };

        match (first.coordinate, first.country_code) {
            (Some(coordinate), Some(country_code)) => {
                let location = GeoLocation {
                    latitude: coordinate.latitude,
                    longitude: coordinate.longitude,
                    country_code,
                };
                tracing::info!(
                    query,
                    latitude = location.latitude,
                    longitude = location.longitude,
                    country = %location.country_code,
                    "Geocoded"
                );
                Ok(Some(location))
            }
            _ => {
                tracing::warn!(query, "Partial geocoding result, treating as unresolved");
                Ok(None)
            }
        }
    }
}

/// Build the geocode query string; the country hint is omitted when empty.
pub fn geocode_query(city: &str, country: &str) -> String {
    if country.is_empty() { city.to_string() } else { format!("{city},{country}") }
}

#[derive(Debug, Default, Deserialize)]
struct TokenResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    coordinate: Option<Coordinate>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Production geocoder: mints a MapKit assertion, exchanges it for an
/// access token, then queries the geocode endpoint. Nothing is cached;
/// every call runs the full chain.
pub struct AppleMapsGeocoder {
    config: Config,
    client: AppleMapsClient,
}

impl AppleMapsGeocoder {
    pub fn new(config: Config, client: AppleMapsClient) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl Geocoder for AppleMapsGeocoder {
    async fn resolve(&self, city: &str, country: &str) -> Result<Option<GeoLocation>, Error> {
        let signer = TokenSigner::maps(&self.config)?;
        let assertion = signer.assertion(ASSERTION_TTL)?;
        let access_token = self.client.request_access_token(&assertion).await?;
        self.client.geocode(&access_token, &geocode_query(city, country)).await
    }
}
