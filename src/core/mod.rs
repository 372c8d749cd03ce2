pub mod cache;
pub mod derivation;
pub mod engine;
pub mod index;
pub mod scientific;
pub mod selector;
pub mod taxonomy;

pub use crate::domain::model::{DerivedView, Entity, Quantity, QuantityVariant};
pub use crate::domain::ports::DatasetSource;
pub use crate::utils::error::Result;
