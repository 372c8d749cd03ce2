use crate::core::derivation::{derive, DerivationOptions};
use crate::core::index::EntityIndex;
use crate::domain::model::Dataset;
use crate::domain::ports::DatasetSource;
use crate::utils::error::Result;
use rand::Rng;

/// Runs load → derive → index against one dataset source.
pub struct CatalogEngine<S: DatasetSource> {
    source: S,
    options: DerivationOptions,
}

impl<S: DatasetSource> CatalogEngine<S> {
    pub fn new(source: S, options: DerivationOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &DerivationOptions {
        &self.options
    }

    pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<EntityIndex> {
        tracing::info!("Loading dataset from {}", self.source.describe());
        let dataset = self.source.load().await?;
        tracing::info!("Loaded {} entities", dataset.entities.len());

        let index = build_index(dataset, &self.options, rng)?;
        tracing::info!("Indexed {} derived views", index.len());

        Ok(index)
    }
}

/// The synchronous half of the pipeline, for callers that already hold a dataset.
pub fn build_index<R: Rng + ?Sized>(
    dataset: Dataset,
    options: &DerivationOptions,
    rng: &mut R,
) -> Result<EntityIndex> {
    let views = derive(&dataset.entities, options, rng)?;
    EntityIndex::build(dataset.entities, views)
}
