use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tonal_config::{ConfigError, ConfigLoader, TonalConfig};
use tonal_core::Role;
use tonal_telemetry::LogFormat;

fn write_config(dir: &tempfile::TempDir, body: &serde_json::Value) -> anyhow::Result<PathBuf> {
    let path = dir.path().join("tonal.json");
    fs::write(&path, serde_json::to_vec_pretty(body)?)?;
    Ok(path)
}

#[test]
fn file_layer_applies_every_section() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_config(
        &dir,
        &serde_json::json!({
            "seed": {"brand500": "#10B981", "baseWhite": "FAFAFA"},
            "collection": "Design Tokens",
            "lookup_timeout_ms": 750,
            "patterns": {"gray500": ["neutral/500", "slate/500"]},
            "tuning": {"ratio_cap": 0.9},
            "store_path": "tokens/variables.json",
            "logging": {"level": "debug", "format": "pretty"}
        }),
    )?;

    let config = ConfigLoader::new().with_file(&path).load()?;
    assert_eq!(config.seed.brand500.to_hex(), "10B981");
    assert_eq!(config.seed.base_white.to_hex(), "FAFAFA");
    assert_eq!(config.seed.primary500.to_hex(), "3B82F6");
    assert_eq!(config.collection, "Design Tokens");
    assert_eq!(config.lookup_timeout, Duration::from_millis(750));
    assert_eq!(
        config.patterns.patterns_for(Role::Gray500),
        ["neutral/500", "slate/500"]
    );
    assert!((config.tuning.ratio_cap - 0.9).abs() < f64::EPSILON);
    assert!((config.tuning.lightness_factor - 0.85).abs() < f64::EPSILON);
    assert_eq!(
        config.store_path.as_deref(),
        Some(PathBuf::from("tokens/variables.json").as_path())
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    Ok(())
}

#[test]
fn environment_wins_over_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_config(
        &dir,
        &serde_json::json!({"collection": "FromFile", "seed": {"gray500": "71717A"}}),
    )?;

    let config = ConfigLoader::new()
        .with_file(&path)
        .with_env([
            ("TONAL_COLLECTION", "FromEnv"),
            ("TONAL_STORE_PATH", "/tmp/store.json"),
        ])
        .load()?;
    assert_eq!(config.collection, "FromEnv");
    assert_eq!(config.seed.gray500.to_hex(), "71717A");
    assert_eq!(
        config.store_path.as_deref(),
        Some(PathBuf::from("/tmp/store.json").as_path())
    );
    Ok(())
}

#[test]
fn unknown_file_fields_are_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_config(&dir, &serde_json::json!({"colection": "Typo"}))?;
    let err = ConfigLoader::new()
        .with_file(&path)
        .load()
        .expect_err("unknown field");
    assert!(matches!(err, ConfigError::Parse { .. }));

    let nested = write_config(&dir, &serde_json::json!({"tuning": {"ratio": 0.5}}))?;
    let err = ConfigLoader::new()
        .with_file(&nested)
        .load()
        .expect_err("unknown tuning field");
    assert!(matches!(err, ConfigError::Parse { .. }));
    Ok(())
}

#[test]
fn invalid_file_values_are_reported_with_their_field() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_config(&dir, &serde_json::json!({"seed": {"primary500": "#12345"}}))?;
    let err = ConfigLoader::new()
        .with_file(&path)
        .load()
        .expect_err("short hex");
    match err {
        ConfigError::InvalidField {
            section,
            field,
            value,
            reason,
        } => {
            assert_eq!(section, "seed");
            assert_eq!(field, "primary500");
            assert_eq!(value.as_deref(), Some("#12345"));
            assert_eq!(reason, "must be six hex digits");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let zero = write_config(&dir, &serde_json::json!({"lookup_timeout_ms": 0}))?;
    assert!(matches!(
        ConfigLoader::new().with_file(&zero).load(),
        Err(ConfigError::InvalidField { .. })
    ));
    Ok(())
}

#[test]
fn missing_files_depend_on_how_they_were_requested() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let absent = dir.path().join("absent.json");

    let err = ConfigLoader::new()
        .with_file(&absent)
        .load()
        .expect_err("required file");
    assert!(matches!(err, ConfigError::Io { .. }));

    let config = ConfigLoader::new().with_optional_file(&absent).load()?;
    assert_eq!(config, TonalConfig::default());
    Ok(())
}

#[test]
fn malformed_json_is_a_parse_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tonal.json");
    fs::write(&path, "{\"collection\": ")?;
    let err = ConfigLoader::new()
        .with_file(&path)
        .load()
        .expect_err("truncated json");
    assert!(matches!(err, ConfigError::Parse { .. }));
    Ok(())
}
