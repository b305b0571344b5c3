//! Workspace domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language of a notebook stored in the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotebookLanguage {
    Python,
    Sql,
    Scala,
    R,
}

impl NotebookLanguage {
    /// Infer the notebook language from a local file extension
    ///
    /// Returns `None` for files that are not notebook sources.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" => Some(Self::Python),
            "sql" => Some(Self::Sql),
            "scala" => Some(Self::Scala),
            "r" | "R" => Some(Self::R),
            _ => None,
        }
    }

    /// Wire name used by the import endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "PYTHON",
            Self::Sql => "SQL",
            Self::Scala => "SCALA",
            Self::R => "R",
        }
    }
}

impl fmt::Display for NotebookLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotebookLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PYTHON" => Ok(Self::Python),
            "SQL" => Ok(Self::Sql),
            "SCALA" => Ok(Self::Scala),
            "R" => Ok(Self::R),
            other => Err(format!("unsupported notebook language: {other}")),
        }
    }
}

/// Encoding of the content sent to the import endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImportFormat {
    #[default]
    Source,
    Html,
    Jupyter,
    Dbc,
    Auto,
}

/// Join workspace path segments with single slashes
///
/// Empty segments are dropped and redundant separators collapsed, so joining a
/// target with the relative path of the source root yields the target itself.
/// The result is always absolute.
pub fn join_workspace_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for segment in segments {
        for part in segment.as_ref().split(['/', '\\']) {
            if part.is_empty() {
                continue;
            }
            path.push('/');
            path.push_str(part);
        }
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}
