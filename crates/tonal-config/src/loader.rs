//! Layered configuration loader.
//!
//! # Design
//! - Layers apply in order: built-in defaults, the JSON file, then the
//!   environment. Later layers replace individual fields, never whole sections.
//! - The environment is injected as key/value pairs so callers and tests
//!   control it explicitly.
//! - Unknown file fields are rejected; unknown `TONAL_*` variables are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tonal_core::ShadeTuning;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::TonalConfig;
use crate::validate::{
    parse_color, parse_log_format, parse_role, parse_timeout_ms, validate_non_empty,
    validate_timeout_ms, validate_tuning,
};

/// Prefix shared by every recognised environment variable.
pub const ENV_PREFIX: &str = "TONAL_";

const ENV_COLLECTION: &str = "TONAL_COLLECTION";
const ENV_STORE_PATH: &str = "TONAL_STORE_PATH";
const ENV_LOOKUP_TIMEOUT_MS: &str = "TONAL_LOOKUP_TIMEOUT_MS";
const ENV_LOG_LEVEL: &str = "TONAL_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "TONAL_LOG_FORMAT";
const ENV_SEED_PREFIX: &str = "TONAL_SEED_";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLayer {
    #[serde(default)]
    seed: BTreeMap<String, String>,
    collection: Option<String>,
    lookup_timeout_ms: Option<u64>,
    #[serde(default)]
    patterns: BTreeMap<String, Vec<String>>,
    tuning: Option<ShadeTuning>,
    store_path: Option<PathBuf>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLogging {
    level: Option<String>,
    format: Option<String>,
}

/// Builds a [`TonalConfig`] from defaults, an optional file, and environment
/// pairs.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    require_file: bool,
    env: Vec<(String, String)>,
}

impl ConfigLoader {
    /// Loader with no file and an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path`; a missing file is an error.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.require_file = true;
        self
    }

    /// Read `path` when it exists and skip it otherwise.
    #[must_use]
    pub fn with_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.require_file = false;
        self
    }

    /// Use `vars` as the environment layer; pairs without the `TONAL_`
    /// prefix are dropped. Later pairs win over earlier ones.
    #[must_use]
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        self
    }

    /// Use the process environment as the environment layer.
    #[must_use]
    pub fn with_process_env(self) -> Self {
        self.with_env(std::env::vars())
    }

    /// Configuration file path, if one was set.
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Apply every layer and return the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it is malformed or has unknown fields, and
    /// [`ConfigError::InvalidField`] when any value fails validation.
    pub fn load(&self) -> ConfigResult<TonalConfig> {
        let mut config = TonalConfig::default();
        if let Some(layer) = self.read_file()? {
            apply_file(&mut config, layer)?;
        }
        self.apply_env(&mut config)?;
        Ok(config)
    }

    fn read_file(&self) -> ConfigResult<Option<FileLayer>> {
        let Some(path) = self.file.as_deref() else {
            return Ok(None);
        };
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound && !self.require_file => {
                debug!(path = %path.display(), "configuration file absent; skipping");
                return Ok(None);
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    operation: "config.read",
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    fn apply_env(&self, config: &mut TonalConfig) -> ConfigResult<()> {
        const SECTION: &str = "env";
        for (key, value) in &self.env {
            match key.as_str() {
                ENV_COLLECTION => config.collection = validate_non_empty(SECTION, key, value)?,
                ENV_STORE_PATH => {
                    config.store_path = Some(PathBuf::from(validate_non_empty(
                        SECTION, key, value,
                    )?));
                }
                ENV_LOOKUP_TIMEOUT_MS => {
                    config.lookup_timeout = parse_timeout_ms(SECTION, key, value)?;
                }
                ENV_LOG_LEVEL => config.logging.level = validate_non_empty(SECTION, key, value)?,
                ENV_LOG_FORMAT => config.logging.format = parse_log_format(SECTION, key, value)?,
                other => {
                    if let Some(role) = other.strip_prefix(ENV_SEED_PREFIX) {
                        let role = parse_role(SECTION, role)?;
                        config.seed.set(role, parse_color(SECTION, key, value)?);
                    }
                }
            }
        }
        Ok(())
    }
}

fn apply_file(config: &mut TonalConfig, layer: FileLayer) -> ConfigResult<()> {
    for (key, value) in &layer.seed {
        let role = parse_role("seed", key)?;
        config.seed.set(role, parse_color("seed", key, value)?);
    }
    if let Some(collection) = layer.collection {
        config.collection = validate_non_empty("file", "collection", &collection)?;
    }
    if let Some(millis) = layer.lookup_timeout_ms {
        config.lookup_timeout = validate_timeout_ms("file", "lookup_timeout_ms", millis)?;
    }
    for (key, patterns) in layer.patterns {
        let role = parse_role("patterns", &key)?;
        if patterns.iter().all(|pattern| pattern.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "patterns",
                &key,
                None,
                "must list at least one pattern",
            ));
        }
        config.patterns = config.patterns.clone().with_role(role, patterns);
    }
    if let Some(tuning) = layer.tuning {
        validate_tuning("tuning", &tuning)?;
        config.tuning = tuning;
    }
    if let Some(path) = layer.store_path {
        config.store_path = Some(path);
    }
    if let Some(logging) = layer.logging {
        if let Some(level) = logging.level {
            config.logging.level = validate_non_empty("logging", "level", &level)?;
        }
        if let Some(format) = logging.format {
            config.logging.format = parse_log_format("logging", "format", &format)?;
        }
    }
    Ok(())
}
