use crate::adapters::source::JsonFileSource;
use crate::core::cache::DerivationCache;
use crate::core::derivation::DerivationOptions;
use crate::domain::model::MAX_SIGNIFICANT_FIGURES;
use crate::utils::error::{CatalogError, Result};
use crate::utils::logger;
use crate::utils::validation::{validate_one_of, validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub dataset: DatasetConfig,
    pub derivation: Option<DerivationConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationConfig {
    pub significant_figures: Option<u32>,
    /// Fixed seed for hue jitter; omit for entropy-seeded jitter.
    pub jitter_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl CatalogConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn dataset_path(&self) -> &str {
        &self.dataset.path
    }

    pub fn significant_figures(&self) -> u32 {
        self.derivation
            .as_ref()
            .and_then(|d| d.significant_figures)
            .unwrap_or_else(|| DerivationOptions::default().significant_figures)
    }

    pub fn jitter_seed(&self) -> Option<u64> {
        self.derivation.as_ref().and_then(|d| d.jitter_seed)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn derivation_options(&self) -> DerivationOptions {
        DerivationOptions {
            significant_figures: self.significant_figures(),
        }
    }

    /// Installs the tracing subscriber this configuration asks for.
    pub fn init_logging(&self) -> bool {
        if self.json_logs() {
            logger::init_json_logger(self.log_level())
        } else {
            logger::init_logger(self.log_level())
        }
    }

    /// Validates, then wires a file-backed cache from this configuration.
    pub fn into_cache(self) -> Result<DerivationCache<JsonFileSource>> {
        self.validate()?;
        let cache = DerivationCache::new(
            JsonFileSource::new(&self.dataset.path),
            self.derivation_options(),
        );
        Ok(match self.jitter_seed() {
            Some(seed) => cache.with_jitter_seed(seed),
            None => cache,
        })
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        validate_path("dataset.path", &self.dataset.path)?;
        validate_range(
            "derivation.significant_figures",
            self.significant_figures(),
            1,
            MAX_SIGNIFICANT_FIGURES,
        )?;
        validate_one_of("logging.level", self.log_level(), &LOG_LEVELS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = CatalogConfig::from_toml_str(
            r#"
[dataset]
path = "data/particles.json"
"#,
        )
        .unwrap();

        assert_eq!(config.dataset_path(), "data/particles.json");
        assert_eq!(config.significant_figures(), 3);
        assert_eq!(config.jitter_seed(), None);
        assert_eq!(config.log_level(), "info");
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = CatalogConfig::from_toml_str(
            r#"
[dataset]
path = "/srv/particles.json"

[derivation]
significant_figures = 4
jitter_seed = 1234

[logging]
level = "debug"
json = true
"#,
        )
        .unwrap();

        assert_eq!(config.derivation_options().significant_figures, 4);
        assert_eq!(config.jitter_seed(), Some(1234));
        assert_eq!(config.log_level(), "debug");
        assert!(config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PARTICLE_CATALOG_TEST_DIR", "/tmp/catalog");
        let config = CatalogConfig::from_toml_str(
            r#"
[dataset]
path = "${PARTICLE_CATALOG_TEST_DIR}/particles.json"
"#,
        )
        .unwrap();
        assert_eq!(config.dataset_path(), "/tmp/catalog/particles.json");

        let untouched = CatalogConfig::from_toml_str(
            r#"
[dataset]
path = "${PARTICLE_CATALOG_UNSET_VARIABLE}/particles.json"
"#,
        )
        .unwrap();
        assert_eq!(
            untouched.dataset_path(),
            "${PARTICLE_CATALOG_UNSET_VARIABLE}/particles.json"
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = CatalogConfig::from_toml_str(
            r#"
[dataset]
path = "data.json"

[derivation]
significant_figures = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = CatalogConfig::from_toml_str(
            r#"
[dataset]
path = "data.json"

[logging]
level = "chatty"
"#,
        )
        .unwrap();
        assert!(config.clone().into_cache().is_err());
    }

    #[test]
    fn test_missing_dataset_section_is_config_error() {
        let err = CatalogConfig::from_toml_str("[logging]\nlevel = \"info\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::ConfigError { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[dataset]\npath = \"particles.json\"").unwrap();

        let config = CatalogConfig::from_file(file.path()).unwrap();
        assert_eq!(config.dataset_path(), "particles.json");
    }
}
