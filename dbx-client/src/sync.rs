//! One-shot notebook deployment
//!
//! Mirrors a local directory of notebook sources into a workspace folder. The
//! target folder is deleted first and rebuilt from scratch; nothing is
//! compared or synced incrementally.

use std::fs;
use std::path::{Path, PathBuf};

use dbx_core::domain::workspace::{NotebookLanguage, join_workspace_path};
use tracing::{debug, info};

use crate::WorkspaceClient;
use crate::error::{ClientError, Result};

/// A local notebook and where it lands in the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookUpload {
    pub local_path: PathBuf,
    /// Workspace path without the file extension
    pub workspace_path: String,
    pub language: NotebookLanguage,
}

/// Everything a deployment will create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub target: String,
    /// Directories to create, parents before children; the first is `target`
    pub directories: Vec<String>,
    pub notebooks: Vec<NotebookUpload>,
    /// Files that were not recognised as notebooks
    pub skipped: Vec<PathBuf>,
}

/// Counts of what a deployment did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub directories_created: usize,
    pub notebooks_imported: usize,
    pub files_skipped: usize,
}

impl SyncPlan {
    /// Walk `source` and map its tree onto `target`
    ///
    /// # Errors
    /// Fails if `source` is not a readable directory.
    pub fn scan(source: &Path, target: &str) -> Result<Self> {
        if !source.is_dir() {
            return Err(ClientError::InvalidRequest(format!(
                "source {} is not a directory",
                source.display()
            )));
        }

        let target = join_workspace_path([target]);
        let mut plan = Self {
            target: target.clone(),
            directories: vec![target],
            notebooks: Vec::new(),
            skipped: Vec::new(),
        };
        plan.walk(source, &[])?;
        Ok(plan)
    }

    fn walk(&mut self, dir: &Path, relative: &[String]) -> Result<()> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| ClientError::io(dir, e))? {
            let entry = entry.map_err(|e| ClientError::io(dir, e))?;
            entries.push(entry);
        }
        entries.sort_by_key(|e| e.file_name());

        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            let ty = entry.file_type().map_err(|e| ClientError::io(&path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if ty.is_dir() {
                subdirs.push((path, name));
            } else if ty.is_file() {
                self.add_file(path, relative);
            } else if ty.is_symlink() {
                // Follow links to files only
                match fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => self.add_file(path, relative),
                    Ok(_) => {
                        debug!(path = %path.display(), "Skipping linked directory");
                        self.skipped.push(path);
                    }
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Skipping broken link");
                        self.skipped.push(path);
                    }
                }
            } else {
                debug!(path = %path.display(), "Skipping special file");
                self.skipped.push(path);
            }
        }

        for (path, name) in subdirs {
            let mut child = relative.to_vec();
            child.push(name);
            self.directories
                .push(join_workspace_path(std::iter::once(&self.target).chain(&child)));
            self.walk(&path, &child)?;
        }

        Ok(())
    }

    fn add_file(&mut self, path: PathBuf, relative: &[String]) {
        let language = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(NotebookLanguage::from_extension);
        let stem = path.file_stem().and_then(|s| s.to_str());

        match (language, stem) {
            (Some(language), Some(stem)) => {
                let workspace_path = join_workspace_path(
                    std::iter::once(self.target.as_str())
                        .chain(relative.iter().map(String::as_str))
                        .chain(std::iter::once(stem)),
                );
                self.notebooks.push(NotebookUpload {
                    local_path: path,
                    workspace_path,
                    language,
                });
            }
            _ => {
                debug!(path = %path.display(), "Skipping non-notebook file");
                self.skipped.push(path);
            }
        }
    }

    /// Delete the target folder and recreate it from the plan
    ///
    /// Runs strictly in order: delete target, create every directory, then
    /// delete and import each notebook. The first failure aborts.
    pub async fn execute(&self, client: &WorkspaceClient) -> Result<SyncReport> {
        info!(target = %self.target, "Clearing workspace folder");
        client.delete_object_if_exists(&self.target, true).await?;

        for dir in &self.directories {
            client.make_directory(dir).await?;
        }

        for notebook in &self.notebooks {
            let source = tokio::fs::read(&notebook.local_path)
                .await
                .map_err(|e| ClientError::io(&notebook.local_path, e))?;

            client
                .delete_object_if_exists(&notebook.workspace_path, false)
                .await?;
            client
                .import_source(&notebook.workspace_path, &source, notebook.language)
                .await?;
        }

        Ok(SyncReport {
            directories_created: self.directories.len(),
            notebooks_imported: self.notebooks.len(),
            files_skipped: self.skipped.len(),
        })
    }
}
