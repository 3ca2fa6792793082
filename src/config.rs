use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL; the in-memory store is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL; weather readings are not cached when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Ollama base URL used for outfit explanations
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    /// Upper bound on a single explanation call, in seconds
    #[serde(default = "default_explanation_timeout_secs")]
    pub explanation_timeout_secs: u64,

    /// OpenWeatherMap API key; a development reading is served when unset
    #[serde(default)]
    pub openweather_api_key: Option<String>,

    #[serde(default = "default_openweather_url")]
    pub openweather_url: String,

    #[serde(default = "default_openweather_city")]
    pub openweather_city: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_explanation_timeout_secs() -> u64 {
    30
}

fn default_openweather_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_openweather_city() -> String {
    "Sofia".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn explanation_timeout(&self) -> Duration {
        Duration::from_secs(self.explanation_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
