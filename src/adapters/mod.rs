// Adapters layer: concrete dataset sources. Network fetch stays with the host application.

pub mod source;

pub use source::{JsonFileSource, StaticSource};
