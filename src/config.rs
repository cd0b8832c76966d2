//! Server configuration, read once from the environment at start-up.

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DOMAIN: &str = "localhost";
const DEFAULT_API_URL: &str = "https://api.untappd.com/v4";

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Environment variables:
/// - `CLIENT_ID`, `CLIENT_SECRET`: Untappd API credentials (required)
/// - `ROUTE`: path prefix for calendar routes, e.g. `/untappd`
/// - `DOMAIN`: label used in generated calendar documents
/// - `PORT`: listening port
/// - `UNTAPPD_API_URL`: API base URL
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub client_id: String,
    pub client_secret: String,

    #[serde(default)]
    pub route: String,

    #[serde(default = "default_domain")]
    pub domain: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_api_url")]
    pub untappd_api_url: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::default())
    }

    fn from_env(env: Environment) -> Result<Self> {
        let config: ServerConfig = Config::builder()
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration (CLIENT_ID and CLIENT_SECRET are required)")?;

        Ok(config)
    }

    /// Route prefix as `/prefix`, or "" when serving from the root.
    pub fn route_prefix(&self) -> String {
        let trimmed = self.route.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}
