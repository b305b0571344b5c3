//! dbx HTTP Client
//!
//! A small, type-safe HTTP client for the REST API of a hosted notebook
//! platform: workspace storage, job runs and the model registry.
//!
//! Every request carries the bearer token the client was built with. Each
//! endpoint wrapper returns the decoded response on a 2xx status and a
//! [`ClientError`] otherwise; nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use dbx_client::WorkspaceClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = WorkspaceClient::new("https://adb-123.azuredatabricks.net", "dapi-token");
//!
//!     client.make_directory("/Development/notebooks").await?;
//!     let run = client.run_now(42, Default::default()).await?;
//!
//!     println!("Started run: {}", run.run_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod registry;
pub mod sync;
mod workspace;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jobs::PollOptions;
pub use sync::{SyncPlan, SyncReport};

use dbx_core::dto::workspace::ApiErrorBody;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;

/// HTTP client for the platform REST API
///
/// Methods are organized into logical groups:
/// - Workspace objects (mkdirs, import, delete)
/// - Jobs (run-now, run status, waiting for completion)
/// - Model registry (version search, run metrics, stage transitions)
#[derive(Clone)]
pub struct WorkspaceClient {
    /// Base URL of the workspace (e.g., "https://adb-123.azuredatabricks.net")
    base_url: String,
    /// Personal access token sent as a bearer credential
    token: String,
    /// HTTP client instance
    client: Client,
}

impl fmt::Debug for WorkspaceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl WorkspaceClient {
    /// Create a new workspace client
    ///
    /// # Arguments
    /// * `base_url` - The workspace URL
    /// * `token` - Bearer token used for every request
    ///
    /// # Example
    /// ```
    /// use dbx_client::WorkspaceClient;
    ///
    /// let client = WorkspaceClient::new("https://adb-123.azuredatabricks.net/", "dapi-token");
    /// assert_eq!(client.base_url(), "https://adb-123.azuredatabricks.net");
    /// ```
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(base_url, token, Client::new())
    }

    /// Create a new workspace client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use dbx_client::WorkspaceClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = WorkspaceClient::with_client("https://adb-123.azuredatabricks.net", "t", http_client);
    /// ```
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the workspace
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .post(self.url(endpoint))
            .bearer_auth(&self.token)
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client.get(self.url(endpoint)).bearer_auth(&self.token)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is irrelevant (the workspace
    /// endpoints answer `{}`)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let body: ApiErrorBody = serde_json::from_str(&error_text).unwrap_or_default();
        let message = body.message.unwrap_or(error_text);

        Err(ClientError::api_error(status.as_u16(), body.error_code, message))
    }
}
