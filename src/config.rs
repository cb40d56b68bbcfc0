use std::env;
use std::time::Duration;

const DEFAULT_CONTEXT_TIMEOUT_MS: u64 = 7000;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Deadline applied to every session operation.
    pub context_timeout: Duration,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://sessions.db?mode=rwc".to_string());

        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "9090".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort("SERVER_PORT"))?;

        let context_timeout_ms: u64 = match lookup("CONTEXT_TIMEOUT_MS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_CONTEXT_TIMEOUT_MS,
        };
        if context_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");

        let service_name =
            lookup("SERVICE_NAME").unwrap_or_else(|| "session-service".to_string());

        let metrics_port = lookup("METRICS_PORT")
            .map(|raw| raw.parse().map_err(|_| ConfigError::InvalidPort("METRICS_PORT")))
            .transpose()?;

        Ok(Config {
            database_url,
            server_host,
            server_port,
            context_timeout: Duration::from_millis(context_timeout_ms),
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number in {0}")]
    InvalidPort(&'static str),

    #[error("Invalid CONTEXT_TIMEOUT_MS value: {0}")]
    InvalidTimeout(String),
}
