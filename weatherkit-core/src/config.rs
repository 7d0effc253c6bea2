use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

const DEFAULT_LANGUAGE: &str = "fr";
const DEFAULT_TIMEZONE: &str = "Europe/Paris";
const DEFAULT_WEATHER_KEY_FILE: &str = "certificats/AuthKey_Weather.p8";
const DEFAULT_MAPS_KEY_FILE: &str = "certificats/AuthKey_Mapkit.p8";

/// Process-wide configuration: Apple Developer identity, credential file
/// paths, and response localization. Read once at startup, never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Apple Developer team id (`iss` claim of every assertion).
    pub team_id: String,

    /// Maps service id (`sub` claim of the weather assertion).
    pub service_id: String,

    /// Key id of the WeatherKit credential.
    pub weather_key_id: String,

    /// Key id of the MapKit credential.
    pub maps_key_id: String,

    #[serde(default = "default_weather_key_file")]
    pub weather_key_file: PathBuf,

    #[serde(default = "default_maps_key_file")]
    pub maps_key_file: PathBuf,

    /// Language segment of the WeatherKit URL.
    #[serde(default = "default_language")]
    pub language: String,

    /// IANA timezone used for the forecast request and date rendering.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_weather_key_file() -> PathBuf {
    PathBuf::from(DEFAULT_WEATHER_KEY_FILE)
}

fn default_maps_key_file() -> PathBuf {
    PathBuf::from(DEFAULT_MAPS_KEY_FILE)
}

impl Config {
    /// Load config from the platform config directory, falling back to
    /// environment variables when no file exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Self::from_env();
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Build config from the environment (`TEAM_ID`, `SERVICE_ID`,
    /// `WEATHER_KEY_ID`, `MAP_KEY_ID`, optional `WEATHER_KEY_FILE` /
    /// `MAP_KEY_FILE`).
    pub fn from_env() -> Result<Self> {
        let cfg = Config {
            team_id: require_env("TEAM_ID")?,
            service_id: require_env("SERVICE_ID")?,
            weather_key_id: require_env("WEATHER_KEY_ID")?,
            maps_key_id: require_env("MAP_KEY_ID")?,
            weather_key_file: env::var("WEATHER_KEY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_weather_key_file()),
            maps_key_file: env::var("MAP_KEY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_maps_key_file()),
            language: env::var("WEATHER_LANGUAGE").unwrap_or_else(|_| default_language()),
            timezone: env::var("WEATHER_TIMEZONE").unwrap_or_else(|_| default_timezone()),
        };

        cfg.validate()?;
        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherkit-mcp", "weatherkit-mcp")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The configured timezone as a strongly-typed `Tz`.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}': {e}", self.timezone))
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("team_id", &self.team_id),
            ("service_id", &self.service_id),
            ("weather_key_id", &self.weather_key_id),
            ("maps_key_id", &self.maps_key_id),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!(
                    "Missing Apple credential field '{name}'.\n\
                     Hint: set it in the config file or export the matching environment variable."
                ));
            }
        }

        self.tz()?;
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| {
        anyhow!(
            "Environment variable {name} is not set.\n\
             Hint: export {name}=... or create a config file first."
        )
    })
}
