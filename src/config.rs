use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_VAR: &str = "API_KEY";

/// Which front end the binary runs
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Interactive weather card on the terminal
    Terminal,
    /// JSON API over HTTP
    Server,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Front end to run
    #[serde(default = "default_mode")]
    pub mode: Mode,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key, read from `API_KEY`
    pub api_key: String,

    /// City looked up on startup and when no city is given
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Preset cities offered for quick selection
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,

    /// Current-weather endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout for the upstream call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// JSON file that keeps past readings
    #[serde(default = "default_history_path")]
    pub history_path: String,

    /// Maximum entries kept in the history file
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Maximum entries kept in the recent-search list
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Use ANSI colors on the terminal card
    #[serde(default = "default_true")]
    pub color: bool,
}

/// Errors raised while assembling configuration
#[derive(Debug, thiserror::Error)]
pub enum AppConfigError {
    #[error("API_KEY is not set; add it to the environment or a .env file")]
    MissingApiKey,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn default_mode() -> Mode {
    Mode::Terminal
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_city() -> String {
    "Karachi".to_string()
}

fn default_cities() -> Vec<String> {
    ["Karachi", "Lahore", "Islamabad", "Delhi", "London", "New York"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_history_path() -> String {
    "weather_history.json".to_string()
}

fn default_history_limit() -> usize {
    50
}

fn default_recent_limit() -> usize {
    5
}

fn default_true() -> bool {
    true
}

/// `SKYCAST_*` variables; nested keys use `__`, `cities` is comma-separated
fn environment() -> Environment {
    Environment::with_prefix("SKYCAST")
        .prefix_separator("_")
        .separator("__")
        .convert_case(Case::Snake)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cities")
}

impl AppConfig {
    pub fn load() -> Result<Self, AppConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self::build(api_key, environment())
    }

    fn build(api_key: Option<String>, env: Environment) -> Result<Self, AppConfigError> {
        let api_key = api_key.ok_or(AppConfigError::MissingApiKey)?;

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("default_city", default_city())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with SKYCAST_)
            .add_source(env)
            .set_override("api_key", api_key.trim().to_string())?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
