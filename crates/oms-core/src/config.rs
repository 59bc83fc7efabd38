use crate::{Credentials, ExecutionContext};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub vtex: VtexConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VtexConfig {
    pub base_url: String,
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    pub app_token: String,
}

impl VtexConfig {
    pub fn with_env_overrides(&self) -> Self {
        let base_url = env::var("VTEX_BASE_URL").unwrap_or_else(|_| self.base_url.clone());
        let app_key = env::var("VTEX_APP_KEY").unwrap_or_else(|_| self.app_key.clone());
        let app_token = env::var("VTEX_APP_TOKEN").unwrap_or_else(|_| self.app_token.clone());
        Self {
            base_url,
            app_key,
            app_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn with_env_overrides(&self) -> Self {
        let bind_addr = env::var("SERVER_BIND_ADDR").unwrap_or_else(|_| self.bind_addr.clone());
        Self { bind_addr }
    }
}

/// Outbound HTTP settings. Leaving `timeout_secs` unset keeps the
/// transport's own default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_from_env() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| Self::default_config_path());
        let config = Self::load(Path::new(&config_path))?;
        Ok(config.with_env_overrides())
    }

    pub fn default_config_path() -> String {
        "./config.toml".to_string()
    }

    pub fn with_env_overrides(&self) -> Self {
        Self {
            vtex: self.vtex.with_env_overrides(),
            server: self.server.with_env_overrides(),
            http: self.http.clone(),
        }
    }

    /// Default context handed to tools when a request carries no overrides.
    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext::new(
            self.vtex.base_url.clone(),
            Credentials::new(self.vtex.app_key.clone(), self.vtex.app_token.clone()),
        )
    }
}
