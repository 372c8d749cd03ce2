pub mod toml_config;

pub use toml_config::{CatalogConfig, DatasetConfig, DerivationConfig, LoggingConfig};
