use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::Resume;

/// Reads the base résumé from a JSON file.
///
/// The file is read on every call so edits to it apply to the next request without
/// a restart. Callers hold the returned value for the whole request and never mutate it.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    path: PathBuf,
}

impl ResumeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Resume, AppError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Storage(format!("Failed to read {}: {e}", self.path.display()))
        })?;

        let resume: Resume = serde_json::from_str(&contents).map_err(|e| {
            AppError::Storage(format!("Failed to parse {}: {e}", self.path.display()))
        })?;

        debug!(
            "Loaded base resume from {} ({} experience, {} project entries)",
            self.path.display(),
            resume.experience.len(),
            resume.projects.len()
        );

        Ok(resume)
    }
}
