//! Process-lifetime memo of the dataset-wide derivation.
//!
//! # Lifecycle
//! - Empty until the first `get_view`, which runs the whole pipeline.
//! - Every later call returns the same `Arc<EntityIndex>`.
//! - `reset` empties the slot; only tests and explicit reloads call it.
//!
//! # Invariants
//! - The slot mutex is held across load, derive and index, so concurrent
//!   first callers wait for the one in-flight run instead of starting their own.
//! - A failed run leaves the slot empty; errors are not memoized.

use crate::core::derivation::DerivationOptions;
use crate::core::engine::CatalogEngine;
use crate::core::index::EntityIndex;
use crate::domain::ports::DatasetSource;
use crate::utils::error::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct DerivationCache<S: DatasetSource> {
    engine: CatalogEngine<S>,
    jitter_seed: Option<u64>,
    slot: Mutex<Option<Arc<EntityIndex>>>,
    runs: AtomicUsize,
}

impl<S: DatasetSource> DerivationCache<S> {
    pub fn new(source: S, options: DerivationOptions) -> Self {
        Self {
            engine: CatalogEngine::new(source, options),
            jitter_seed: None,
            slot: Mutex::new(None),
            runs: AtomicUsize::new(0),
        }
    }

    /// Fixes the hue jitter sequence; without a seed it is drawn from OS entropy.
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = Some(seed);
        self
    }

    pub async fn get_view(&self) -> Result<Arc<EntityIndex>> {
        let mut slot = self.slot.lock().await;
        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }

        let run = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Deriving particle catalog (run {})", run);

        let mut rng = match self.jitter_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        match self.engine.run(&mut rng).await {
            Ok(index) => {
                let index = Arc::new(index);
                *slot = Some(Arc::clone(&index));
                Ok(index)
            }
            Err(e) => {
                tracing::error!("Particle catalog derivation failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn reset(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            tracing::warn!("Derivation cache reset; next access re-derives");
        }
    }

    /// Pipeline runs started so far, successful or not.
    pub fn derivation_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn engine(&self) -> &CatalogEngine<S> {
        &self.engine
    }
}
