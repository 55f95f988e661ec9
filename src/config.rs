use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL for the party store. In-memory store when unset.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL for the search cache. Caching is disabled when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Steam Web API key
    pub steam_key: String,

    /// Steam Web API base URL
    #[serde(default = "default_steam_api_url")]
    pub steam_api_url: String,

    /// RAWG API key
    pub rawg_key: String,

    /// RAWG API base URL
    #[serde(default = "default_rawg_api_url")]
    pub rawg_api_url: String,

    /// Generative Language API key
    pub palm_key: String,

    /// Generative Language API base URL
    #[serde(default = "default_palm_api_url")]
    pub palm_api_url: String,

    /// Text model used for recommendations
    #[serde(default = "default_palm_model")]
    pub palm_model: String,

    /// Upper bound on a single member's library fetch
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_steam_api_url() -> String {
    "https://api.steampowered.com".to_string()
}

fn default_rawg_api_url() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_palm_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_palm_model() -> String {
    "models/text-bison-001".to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
