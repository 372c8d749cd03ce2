use crate::domain::model::Dataset;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Supplies the raw dataset. Fetching, retries and timeouts belong to the implementor.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn load(&self) -> Result<Dataset>;

    /// Short label used in log events.
    fn describe(&self) -> String;
}
