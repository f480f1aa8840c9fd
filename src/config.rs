use crate::domain::services::{CountryPolicy, PolicyError};
use crate::domain::value_objects::CountryCode;
use serde::Deserialize;

const ENV_PREFIX: &str = "GEOIPFILTER_";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Database settings
    pub db_file: String,
    pub db_reload_secs: u64,

    // Policy settings
    pub allowed_countries: Vec<CountryCode>,
    pub denied_countries: Vec<CountryCode>,

    // Check server settings
    pub listen_addr: String,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_file: String::new(),
            db_reload_secs: 0,
            allowed_countries: Vec::new(),
            denied_countries: Vec::new(),
            listen_addr: "127.0.0.1:9400".to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Build the country policy, failing when no country is configured.
    pub fn policy(&self) -> Result<CountryPolicy, ConfigError> {
        let policy = CountryPolicy::new(
            self.allowed_countries.iter().cloned(),
            self.denied_countries.iter().cloned(),
        )?;
        Ok(policy)
    }
}

/// Configuration errors, fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("GEOIPFILTER_DB_FILE is required")]
    MissingDbFile,
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Split a comma separated country list, dropping blank entries.
pub fn parse_countries(raw: &str) -> Vec<CountryCode> {
    raw.split(',').filter_map(CountryCode::from_config).collect()
}

fn env(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}")).ok()
}

pub fn load_config() -> Result<Config, ConfigError> {
    let db_file = env("DB_FILE")
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingDbFile)?;

    let db_reload_secs = env("DB_RELOAD_SECS")
        .unwrap_or_else(|| "0".to_string())
        .parse()
        .unwrap_or(0);

    let allowed_countries = env("ALLOWED_COUNTRIES")
        .map(|v| parse_countries(&v))
        .unwrap_or_default();

    let denied_countries = env("DENIED_COUNTRIES")
        .map(|v| parse_countries(&v))
        .unwrap_or_default();

    let listen_addr = env("LISTEN_ADDR").unwrap_or_else(|| "127.0.0.1:9400".to_string());

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        db_file,
        db_reload_secs,
        allowed_countries,
        denied_countries,
        listen_addr,
        debug,
    })
}
