//! French localization of forecast data: condition labels, rounding,
//! long-form dates, and the two text renderers.

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::model::{ForecastDay, FormattedDay};

/// Marker for an absent numeric value.
pub const NOT_AVAILABLE: &str = "N/D";

/// Marker for a date that could not be parsed.
pub const DATE_NOT_AVAILABLE: &str = "Non disponible";

/// WeatherKit condition codes → French labels. Lookup is lower-cased;
/// codes appear both spaced and in their compact API form.
static CONDITION_TRANSLATIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("clear", "ensoleillé"),
            ("mostly clear", "principalement ensoleillé"),
            ("mostlyclear", "principalement ensoleillé"),
            ("partly cloudy", "partiellement nuageux"),
            ("partlycloudy", "partiellement nuageux"),
            ("mostly cloudy", "plutôt nuageux"),
            ("mostlycloudy", "plutôt nuageux"),
            ("cloudy", "nuageux"),
            ("overcast", "couvert"),
            ("rain", "pluvieux"),
            ("light rain", "pluie légère"),
            ("lightrain", "pluie légère"),
            ("drizzle", "bruine"),
            ("heavy rain", "forte pluie"),
            ("heavyrain", "forte pluie"),
            ("snow", "neigeux"),
            ("sleet", "grésil"),
            ("hail", "grêle"),
            ("thunderstorm", "orageux"),
            ("thunderstorms", "orageux"),
            ("fog", "brumeux"),
            ("foggy", "brumeux"),
            ("windy", "venteux"),
            ("breezy", "venteux"),
        ])
    });

const WEEKDAYS_FR: [&str; 7] =
    ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"];

const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

/// Translate a condition code; unknown codes pass through unchanged.
pub fn translate_condition(code: &str) -> String {
    let lower = code.to_lowercase();
    match CONDITION_TRANSLATIONS.get(lower.as_str()) {
        Some(label) => (*label).to_string(),
        None => code.to_string(),
    }
}

/// Render an ISO-8601 UTC instant as a capitalized French long-form date in
/// the given timezone, e.g. `Mercredi 26 août 2026`. Any parse failure
/// renders the not-available marker instead of propagating.
pub fn format_date(iso_instant: &str, tz: Tz) -> String {
    if iso_instant.is_empty() {
        return DATE_NOT_AVAILABLE.to_string();
    }

    match DateTime::parse_from_rfc3339(iso_instant) {
        Ok(instant) => {
            let local = instant.with_timezone(&tz);
            let weekday = WEEKDAYS_FR[local.weekday().num_days_from_monday() as usize];
            let month = MONTHS_FR[local.month0() as usize];
            capitalize(&format!("{weekday} {:02} {month} {}", local.day(), local.year()))
        }
        Err(e) => {
            tracing::error!(date = iso_instant, error = %e, "Unparsable forecast date");
            DATE_NOT_AVAILABLE.to_string()
        }
    }
}

/// Reduce one wire forecast day to render-ready values. Pure: identical
/// input always yields identical output.
pub fn format_day(day: &ForecastDay, tz: Tz) -> FormattedDay {
    FormattedDay {
        date: format_date(&day.forecast_start, tz),
        condition: translate_condition(&day.condition_code),
        temperature_max: day.temperature_max.map(round_i32),
        temperature_min: day.temperature_min.map(round_i32),
        precipitation_mm: (day.precipitation_amount * 10.0).round() / 10.0,
        precipitation_chance_pct: (day.precipitation_chance * 100.0).round().clamp(0.0, 100.0)
            as u8,
        wind_speed: round_i32(day.wind_speed_max),
    }
}

pub fn format_days(days: &[ForecastDay], tz: Tz) -> Vec<FormattedDay> {
    days.iter().map(|day| format_day(day, tz)).collect()
}

/// Full multi-day report: every day with all fields, separated by a dashed
/// line.
pub fn render_report(days: &[FormattedDay], city: &str, country: &str) -> String {
    if days.is_empty() {
        return no_data_message(city, country);
    }

    let mut out = format!("Prévisions météo pour {city}, {country}:\n\n");
    for day in days {
        out.push_str(&format!("Date: {}\n", day.date));
        out.push_str(&format!("Condition: {}\n", day.condition));
        out.push_str(&format!(
            "Température: {}°C - {}°C\n",
            temp(day.temperature_min),
            temp(day.temperature_max)
        ));
        out.push_str(&format!(
            "Précipitations: {:.1} mm (chance: {}%)\n",
            day.precipitation_mm, day.precipitation_chance_pct
        ));
        out.push_str(&format!("Vent max: {} km/h\n", day.wind_speed));
        out.push_str(&"-".repeat(40));
        out.push('\n');
    }

    out.trim_end().to_string()
}

/// Two-day summary: today and, when present, tomorrow; condition and
/// temperature range only.
pub fn render_summary(days: &[FormattedDay], city: &str, country: &str) -> String {
    let Some(today) = days.first() else {
        return no_data_message(city, country);
    };

    let mut out = format!("Météo à {city}:\n\n");
    out.push_str(&format!(
        "Aujourd'hui ({}):\n  {} - {}°C à {}°C\n",
        today.date,
        today.condition,
        temp(today.temperature_min),
        temp(today.temperature_max)
    ));

    if let Some(tomorrow) = days.get(1) {
        out.push_str(&format!(
            "\nDemain ({}):\n  {} - {}°C à {}°C\n",
            tomorrow.date,
            tomorrow.condition,
            temp(tomorrow.temperature_min),
            temp(tomorrow.temperature_max)
        ));
    }

    out.trim_end().to_string()
}

pub fn no_data_message(city: &str, country: &str) -> String {
    format!("Aucune donnée météo disponible pour {city}, {country}")
}

fn temp(value: Option<i32>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn round_i32(value: f64) -> i32 {
    value.round() as i32
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
