//! Derivation engine for particle catalogue pages.
//!
//! Raw particle records carry each quantity in several units and roundings.
//! This crate picks the variants a page needs, renders them in scientific
//! notation on exact decimals, assigns a charge-driven colour, and serves the
//! result through a memoized, slug- and reference-keyed index.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{JsonFileSource, StaticSource};
pub use config::CatalogConfig;
pub use crate::core::{
    cache::DerivationCache,
    derivation::{derive, DerivationOptions},
    engine::{build_index, CatalogEngine},
    index::{EntityIndex, IndexedEntity},
    scientific::ScientificNumber,
};
pub use domain::model::{
    Dataset, DerivedView, Entity, Quantity, QuantityVariant, RoundingPolicy, StyleDescriptor,
};
pub use domain::ports::DatasetSource;
pub use utils::error::{CatalogError, Result};
