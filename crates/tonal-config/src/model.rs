//! Typed settings consumed by the tonal tools.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tonal_core::{SeedPalette, ShadeTuning};
use tonal_store::SearchPatterns;
use tonal_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};

use crate::defaults;

/// Logging options handed to the telemetry layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingSettings {
    /// Level or filter directive.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::infer(),
        }
    }
}

/// Effective configuration after every layer is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TonalConfig {
    /// Seed palette used for generation and as the import fallback.
    pub seed: SeedPalette,
    /// Variable collection read and written by store commands.
    pub collection: String,
    /// Upper bound for one store search.
    #[serde(serialize_with = "serialize_millis", rename = "lookup_timeout_ms")]
    pub lookup_timeout: Duration,
    /// Role search table for seed import.
    pub patterns: SearchPatterns,
    /// Shade tuning for the scale generator.
    pub tuning: ShadeTuning,
    /// Default variable store document, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    /// Logging options.
    pub logging: LoggingSettings,
}

impl Default for TonalConfig {
    fn default() -> Self {
        Self {
            seed: defaults::SEED,
            collection: defaults::COLLECTION.to_string(),
            lookup_timeout: defaults::LOOKUP_TIMEOUT,
            patterns: SearchPatterns::standard(),
            tuning: ShadeTuning::default(),
            store_path: None,
            logging: LoggingSettings::default(),
        }
    }
}

fn serialize_millis<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonal_core::Role;

    #[test]
    fn defaults_match_reference_palette() {
        let config = TonalConfig::default();
        assert_eq!(config.seed.brand500.to_hex(), "6366F1");
        assert_eq!(config.seed.primary500.to_hex(), "3B82F6");
        assert_eq!(config.seed.secondary500.to_hex(), "EC4899");
        assert_eq!(config.seed.gray500.to_hex(), "6B7280");
        assert_eq!(config.seed.base_white.to_hex(), "FFFFFF");
        assert_eq!(config.seed.base_black.to_hex(), "000000");
        assert_eq!(config.collection, "Colors");
        assert_eq!(config.lookup_timeout, Duration::from_secs(3));
        assert_eq!(config.patterns.patterns_for(Role::Gray500).len(), 2);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn serialized_config_reports_timeout_in_millis() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(TonalConfig::default())?;
        assert_eq!(value["lookup_timeout_ms"], 3000);
        assert_eq!(value["seed"]["brand500"], "6366F1");
        assert!(value.get("store_path").is_none());
        Ok(())
    }
}
