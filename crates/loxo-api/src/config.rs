use std::env;
use std::path::PathBuf;

use loxo_core::config::LayeredConfig;
use loxo_core::error::Result;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub config_path: Option<PathBuf>,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("LOXO_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(5000);

        let cors_origin =
            env::var("LOXO_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let config_path = env::var("LOXO_CONFIG").ok().map(PathBuf::from);

        Self { port, cors_origin, config_path }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Analytics configuration: defaults, then the optional TOML file, then environment
    pub fn load_layered(&self) -> Result<LayeredConfig> {
        let mut config = LayeredConfig::with_defaults();
        if let Some(path) = &self.config_path {
            config = config.load_from_file(path)?;
        }
        Ok(config.load_from_env())
    }
}
