//! Workspace DTOs

use serde::{Deserialize, Serialize};

use crate::domain::workspace::{ImportFormat, NotebookLanguage};

/// Body of `workspace/mkdirs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MkdirsRequest {
    pub path: String,
}

/// Body of `workspace/import`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub path: String,
    /// Base64-encoded file content
    pub content: String,
    pub language: NotebookLanguage,
    pub format: ImportFormat,
    pub overwrite: bool,
}

impl ImportRequest {
    /// Source-format import that replaces whatever is at `path`
    pub fn source(path: impl Into<String>, content: String, language: NotebookLanguage) -> Self {
        Self {
            path: path.into(),
            content,
            language,
            format: ImportFormat::Source,
            overwrite: true,
        }
    }
}

/// Body of `workspace/delete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub path: String,
    pub recursive: bool,
}

/// Error body returned by every endpoint on failure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_request_body() {
        let req = ImportRequest::source("/Dev/train", "cHJpbnQoMSk=".into(), NotebookLanguage::Python);
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "path": "/Dev/train",
                "content": "cHJpbnQoMSk=",
                "language": "PYTHON",
                "format": "SOURCE",
                "overwrite": true
            })
        );
    }
}
