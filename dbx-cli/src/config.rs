//! Configuration module
//!
//! Resolves the workspace connection settings and builds the HTTP client.

use anyhow::{Result, bail};
use dbx_client::WorkspaceClient;
use tracing::debug;

/// CLI configuration
#[derive(Clone)]
pub struct Config {
    /// URL of the workspace
    pub host: String,
    /// Bearer token for every request
    pub token: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Build the configuration from flag or environment values
    pub fn from_args(host: Option<String>, token: Option<String>) -> Result<Self> {
        let Some(host) = host else {
            bail!("workspace URL not set; pass --host or set DATABRICKS_HOST");
        };
        let Some(token) = token else {
            bail!("access token not set; pass --token or set DATABRICKS_TOKEN");
        };

        let config = Self { host, token };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            bail!("host cannot be empty");
        }

        if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            bail!("host must start with http:// or https://");
        }

        if self.token.trim().is_empty() {
            bail!("token cannot be empty");
        }

        Ok(())
    }

    /// Client for the configured workspace
    pub fn client(&self) -> WorkspaceClient {
        debug!(host = %self.host, "Connecting to workspace");
        WorkspaceClient::new(&self.host, &self.token)
    }
}
