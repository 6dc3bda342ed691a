//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use adminpanel_lib::DEFAULT_BASE_URL;
use simplelog::LevelFilter;

const URL_VAR: &str = "ADMINPANEL_URL";
const LOG_VAR: &str = "ADMINPANEL_LOG";
const LOG_LEVEL_VAR: &str = "ADMINPANEL_LOG_LEVEL";

const DEFAULT_LOG_FILE: &str = "adminpanel-cli.log";

/// Settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Where the log is written.
    pub log_file: PathBuf,
    /// Minimum level written to the log.
    pub log_level: LevelFilter,
}

impl CliConfig {
    /// Load `.env`, then read the environment.
    pub fn from_env() -> Self {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        let log_level = env::var(LOG_LEVEL_VAR)
            .ok()
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Debug);

        Self {
            base_url: env::var(URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            log_file: env::var(LOG_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE)),
            log_level,
        }
    }
}
