use serde::{Deserialize, Serialize};

/// A resolved place: everything the forecast call needs.
///
/// Geocoding either produces all three fields or nothing; partial results
/// are treated as unresolved. A coordinate of 0.0 is valid — presence is
/// expressed in types, never by truthiness.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub country_code: String,
}

/// One day of the WeatherKit `forecastDaily` data set, as on the wire.
///
/// Temperatures stay `None` when the provider omits them; the other metrics
/// default to zero, matching how the upstream payload degrades.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// ISO-8601 UTC instant, e.g. `2026-01-15T23:00:00Z`. Kept as a string
    /// so one malformed date degrades to "Non disponible" instead of
    /// failing the whole payload.
    #[serde(default)]
    pub forecast_start: String,

    #[serde(default)]
    pub condition_code: String,

    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,

    /// Millimetres.
    #[serde(default)]
    pub precipitation_amount: f64,

    /// Fraction in [0, 1].
    #[serde(default)]
    pub precipitation_chance: f64,

    /// km/h.
    #[serde(default)]
    pub wind_speed_max: f64,
}

/// A forecast day reduced to render-ready, French-localized values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedDay {
    /// Localized long-form date, or "Non disponible".
    pub date: String,
    /// Translated condition label, or the raw code when untranslated.
    pub condition: String,
    /// Degrees Celsius, rounded; `None` renders as "N/D".
    pub temperature_max: Option<i32>,
    pub temperature_min: Option<i32>,
    /// Millimetres, rounded to one decimal.
    pub precipitation_mm: f64,
    /// Whole percent, `round(chance * 100)`.
    pub precipitation_chance_pct: u8,
    /// km/h, rounded.
    pub wind_speed: i32,
}
