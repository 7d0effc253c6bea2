use std::path::PathBuf;

/// Outcome of a single HTTP call that did not succeed: either the server
/// answered with a non-2xx status, or the request never completed.
#[derive(Debug, thiserror::Error)]
pub enum HttpFailure {
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("unparsable 200 body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HttpFailure {
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        HttpFailure::Status { status: status.as_u16(), body: truncate_body(body) }
    }
}

/// Errors raised by the WeatherKit pipeline.
///
/// "Location not found" and "no forecast data" are deliberately NOT here:
/// they are ordinary outcomes (`Ok(None)` / `Ok(vec![])`) that the tool
/// boundary turns into their own user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `.p8` credential file could not be read.
    #[error("failed to read private key {}", path.display())]
    KeyLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key parsed but assertion construction or signing failed.
    #[error("failed to sign developer token")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The Maps token endpoint rejected the assertion.
    #[error("maps token exchange failed ({0})")]
    TokenExchange(#[source] HttpFailure),

    /// The Maps token endpoint answered 200 without an `accessToken` field.
    #[error("maps token endpoint returned 200 without an accessToken field")]
    AccessTokenMissing,

    /// The geocode request itself failed (not "no results").
    #[error("geocoding request failed ({0})")]
    Geocoding(#[source] HttpFailure),

    /// The WeatherKit forecast request failed (not "no days").
    #[error("forecast request failed ({0})")]
    ForecastFetch(#[source] HttpFailure),
}

impl Error {
    /// True when the failure is a missing/unreadable credential file.
    pub fn is_key_load(&self) -> bool {
        matches!(self, Error::KeyLoad { .. })
    }
}

/// Keep response bodies loggable; Apple error payloads can be verbose.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = body.char_indices().take_while(|(i, _)| *i < MAX).count();
        format!("{}...", body.chars().take(cut).collect::<String>())
    } else {
        body.to_string()
    }
}
