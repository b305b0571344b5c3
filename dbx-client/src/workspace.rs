//! Workspace API endpoints

use base64::Engine;
use dbx_core::domain::workspace::NotebookLanguage;
use dbx_core::dto::workspace::{DeleteRequest, ImportRequest, MkdirsRequest};
use tracing::{debug, info};

use crate::WorkspaceClient;
use crate::error::Result;

impl WorkspaceClient {
    // =============================================================================
    // Workspace Objects
    // =============================================================================

    /// Create a directory, including missing parents
    ///
    /// Creating a directory that already exists succeeds without changes.
    ///
    /// # Arguments
    /// * `path` - Absolute workspace path, e.g. `/Development/notebooks`
    pub async fn make_directory(&self, path: &str) -> Result<()> {
        info!(path, "Creating workspace directory");
        let response = self
            .post("api/2.0/workspace/mkdirs")
            .json(&MkdirsRequest {
                path: path.to_string(),
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Import a notebook into the workspace
    ///
    /// # Arguments
    /// * `req` - The import request; `content` must already be base64-encoded
    pub async fn import_notebook(&self, req: &ImportRequest) -> Result<()> {
        info!(path = %req.path, language = %req.language, "Importing notebook");
        let response = self
            .post("api/2.0/workspace/import")
            .json(req)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Encode raw notebook source and import it, overwriting any existing object
    ///
    /// # Arguments
    /// * `path` - Workspace path of the notebook (without extension)
    /// * `source` - Raw file bytes
    /// * `language` - Notebook language
    pub async fn import_source(
        &self,
        path: &str,
        source: &[u8],
        language: NotebookLanguage,
    ) -> Result<()> {
        let content = base64::engine::general_purpose::STANDARD.encode(source);
        self.import_notebook(&ImportRequest::source(path, content, language))
            .await
    }

    /// Delete a notebook or directory
    ///
    /// # Arguments
    /// * `path` - Workspace path of the object
    /// * `recursive` - Also delete the contents of a non-empty directory
    pub async fn delete_object(&self, path: &str, recursive: bool) -> Result<()> {
        info!(path, recursive, "Deleting workspace object");
        let response = self
            .post("api/2.0/workspace/delete")
            .json(&DeleteRequest {
                path: path.to_string(),
                recursive,
            })
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Delete an object, treating a missing object as already deleted
    ///
    /// # Returns
    /// `true` if something was deleted
    pub async fn delete_object_if_exists(&self, path: &str, recursive: bool) -> Result<bool> {
        match self.delete_object(path, recursive).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!(path, "Nothing to delete");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::WorkspaceClient;
    use dbx_core::domain::workspace::NotebookLanguage;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_make_directory() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/workspace/mkdirs"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({ "path": "/Development/notebooks" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        client.make_directory("/Development/notebooks").await.unwrap();
    }

    #[tokio::test]
    async fn test_import_source_encodes_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/workspace/import"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(serde_json::json!({
                "path": "/Development/notebooks/train",
                "content": "cHJpbnQoImhpIik=",
                "language": "PYTHON",
                "format": "SOURCE",
                "overwrite": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        client
            .import_source(
                "/Development/notebooks/train",
                b"print(\"hi\")",
                NotebookLanguage::Python,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_object() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/workspace/delete"))
            .and(body_json(serde_json::json!({
                "path": "/Development",
                "recursive": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        client.delete_object("/Development", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_object_is_tolerated() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/workspace/delete"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error_code": "RESOURCE_DOES_NOT_EXIST",
                "message": "Path (/Development) doesn't exist."
            })))
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");

        assert!(client.delete_object("/Development", true).await.is_err());
        let deleted = client
            .delete_object_if_exists("/Development", true)
            .await
            .unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_delete_permission_error_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/2.0/workspace/delete"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error_code": "PERMISSION_DENIED",
                "message": "no access"
            })))
            .mount(&server)
            .await;

        let client = WorkspaceClient::new(server.uri(), "test-token");
        let err = client
            .delete_object_if_exists("/Shared", true)
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(!err.is_not_found());
    }
}
