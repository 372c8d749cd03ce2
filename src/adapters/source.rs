use crate::domain::model::Dataset;
use crate::domain::ports::DatasetSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Reads a `{ "Particles": [...] }` document from the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSource for JsonFileSource {
    async fn load(&self) -> Result<Dataset> {
        tracing::debug!("Reading dataset file {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        Dataset::from_json_str(&content)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Serves a dataset already held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(Self::new(Dataset::from_json_str(content)?))
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn load(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} entities)", self.dataset.entities.len())
    }
}
