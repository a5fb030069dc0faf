//! Field parsing and range checks shared by the file and environment layers.

use std::time::Duration;

use tonal_core::{Color, Role, ShadeTuning};
use tonal_telemetry::LogFormat;

use crate::error::{ConfigError, ConfigResult};

/// Parse a six-digit hex color; one leading `#` is accepted.
#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_color(section: &str, field: &str, raw: &str) -> ConfigResult<Color> {
    Color::from_hex_input(raw)
        .map_err(|_| ConfigError::invalid(section, field, Some(raw), "must be six hex digits"))
}

/// Resolve a seed role name; case and underscores are ignored.
#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_role(section: &str, raw: &str) -> ConfigResult<Role> {
    let compact: String = raw.chars().filter(|ch| *ch != '_').collect();
    compact
        .parse::<Role>()
        .map_err(|_| ConfigError::invalid(section, raw, Some(raw), "unknown seed role"))
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_timeout_ms(section: &str, field: &str, raw: &str) -> ConfigResult<Duration> {
    let millis = raw.trim().parse::<u64>().map_err(|_| {
        ConfigError::invalid(section, field, Some(raw), "must be an integer of milliseconds")
    })?;
    validate_timeout_ms(section, field, millis)
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn validate_timeout_ms(
    section: &str,
    field: &str,
    millis: u64,
) -> ConfigResult<Duration> {
    if millis == 0 {
        return Err(ConfigError::invalid(
            section,
            field,
            Some(&millis.to_string()),
            "must be positive",
        ));
    }
    Ok(Duration::from_millis(millis))
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn validate_non_empty(section: &str, field: &str, raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(section, field, Some(raw), "must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn parse_log_format(section: &str, field: &str, raw: &str) -> ConfigResult<LogFormat> {
    raw.parse::<LogFormat>()
        .map_err(|_| ConfigError::invalid(section, field, Some(raw), "must be json or pretty"))
}

/// Reject tuning that would push channels outside the unit range.
#[allow(clippy::redundant_pub_crate)]
pub(crate) fn validate_tuning(section: &str, tuning: &ShadeTuning) -> ConfigResult<()> {
    let unit = |field: &str, value: f64, allow_zero: bool| {
        let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
        if value.is_finite() && lower_ok && value <= 1.0 {
            Ok(())
        } else {
            Err(ConfigError::invalid(
                section,
                field,
                Some(&value.to_string()),
                "must be within the unit interval",
            ))
        }
    };
    unit("ratio_cap", tuning.ratio_cap, false)?;
    unit("lightness_factor", tuning.lightness_factor, true)?;
    unit("boost_threshold", tuning.boost_threshold, true)?;
    unit("desaturation_factor", tuning.desaturation_factor, true)?;
    if !tuning.boost_factor.is_finite() || tuning.boost_factor < 0.0 {
        return Err(ConfigError::invalid(
            section,
            "boost_factor",
            Some(&tuning.boost_factor.to_string()),
            "must be a non-negative number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_accept_an_optional_hash() {
        assert_eq!(
            parse_color("file", "seed.brand500", "#6366f1").map(Color::to_hex).ok(),
            Some("6366F1".to_string())
        );
        assert_eq!(
            parse_color("env", "TONAL_SEED_GRAY500", " 6B7280 ").map(Color::to_hex).ok(),
            Some("6B7280".to_string())
        );
        for bad in ["##6366F1", "#FFF", "GGGGGG", ""] {
            let err = parse_color("file", "seed.brand500", bad).expect_err(bad);
            assert!(matches!(
                err,
                ConfigError::InvalidField { reason: "must be six hex digits", .. }
            ));
        }
    }

    #[test]
    fn roles_ignore_case_and_underscores() {
        assert_eq!(parse_role("env", "BASE_WHITE").ok(), Some(Role::BaseWhite));
        assert_eq!(parse_role("env", "GRAY500").ok(), Some(Role::Gray500));
        assert_eq!(parse_role("file", "brand500").ok(), Some(Role::Brand500));
        assert!(parse_role("file", "accent500").is_err());
    }

    #[test]
    fn timeouts_must_be_positive_integers() {
        assert_eq!(
            parse_timeout_ms("env", "TONAL_LOOKUP_TIMEOUT_MS", "250").ok(),
            Some(Duration::from_millis(250))
        );
        assert!(parse_timeout_ms("env", "TONAL_LOOKUP_TIMEOUT_MS", "0").is_err());
        assert!(parse_timeout_ms("env", "TONAL_LOOKUP_TIMEOUT_MS", "soon").is_err());
    }

    #[test]
    fn tuning_outside_unit_range_is_rejected() {
        assert!(validate_tuning("tuning", &ShadeTuning::default()).is_ok());
        let zero_cap = ShadeTuning {
            ratio_cap: 0.0,
            ..ShadeTuning::default()
        };
        assert!(validate_tuning("tuning", &zero_cap).is_err());
        let overshoot = ShadeTuning {
            lightness_factor: 1.5,
            ..ShadeTuning::default()
        };
        let err = validate_tuning("tuning", &overshoot).expect_err("lightness factor");
        assert!(matches!(
            err,
            ConfigError::InvalidField { ref field, .. } if field == "lightness_factor"
        ));
        let negative_boost = ShadeTuning {
            boost_factor: -0.1,
            ..ShadeTuning::default()
        };
        assert!(validate_tuning("tuning", &negative_boost).is_err());
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert_eq!(
            validate_non_empty("file", "collection", "  Tokens ").ok(),
            Some("Tokens".to_string())
        );
        assert!(validate_non_empty("file", "collection", "   ").is_err());
        assert!(parse_log_format("env", "TONAL_LOG_FORMAT", "yaml").is_err());
    }
}
