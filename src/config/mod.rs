//! Configuration module for the prediction server.
//!
//! Values come from environment variables (optionally seeded from `.env`),
//! organized by concern: model artifacts and the HTTP listener.

mod model_config;
mod server_config;

pub use model_config::{
    DEFAULT_ARIMA_PATH, DEFAULT_MODEL_PATH, DEFAULT_MODEL_VERSION, ModelEnvConfig,
};
pub use server_config::{DEFAULT_HOST, DEFAULT_PORT, ServerEnvConfig};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Models (from ModelEnvConfig)
    pub model_path: PathBuf,
    pub arima_path: PathBuf,
    pub model_version: String,

    // Listener (from ServerEnvConfig)
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self::compose(ModelEnvConfig::default(), ServerEnvConfig::default())
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let model = ModelEnvConfig::from_env();
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        Ok(Self::compose(model, server))
    }

    fn compose(model: ModelEnvConfig, server: ServerEnvConfig) -> Self {
        Self {
            model_path: model.model_path,
            arima_path: model.arima_path,
            model_version: model.model_version,
            host: server.host,
            port: server.port,
        }
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid HOST:PORT configuration {}:{}", self.host, self.port))
    }
}
