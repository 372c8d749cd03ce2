use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Missing variant for {reference}.{field}: no {unit_class} value with rounding {rounding}")]
    MissingVariant {
        reference: String,
        field: String,
        unit_class: String,
        rounding: String,
    },

    #[error("Ambiguous variant for {reference}.{field}: {count} {unit_class} values with rounding {rounding}")]
    AmbiguousVariant {
        reference: String,
        field: String,
        unit_class: String,
        rounding: String,
        count: usize,
    },

    #[error("Unknown relative charge `{token}` on {reference}")]
    UnknownCharge { reference: String, token: String },

    #[error("Duplicate {kind} `{key}` in dataset")]
    DuplicateKey { kind: KeyKind, key: String },

    #[error("Malformed dataset: {message}")]
    MalformedDataset { message: String },

    #[error("Invalid decimal `{value}`: {reason}")]
    InvalidNumber { value: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} = `{value}`: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Which index key collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Reference,
    UrlSlug,
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::Reference => f.write_str("reference"),
            KeyKind::UrlSlug => f.write_str("url slug"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The dataset contradicts itself or the engine's invariants.
    DataIntegrity,
    Configuration,
    Io,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::MissingVariant { .. }
            | CatalogError::AmbiguousVariant { .. }
            | CatalogError::UnknownCharge { .. }
            | CatalogError::DuplicateKey { .. }
            | CatalogError::MalformedDataset { .. }
            | CatalogError::InvalidNumber { .. } => ErrorCategory::DataIntegrity,
            CatalogError::ConfigError { .. } | CatalogError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            CatalogError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CatalogError::MalformedDataset {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
