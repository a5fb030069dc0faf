//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;
use tonal_config::TonalConfig;
use tonal_core::{ColorScale, Role, SeedPalette, Step};
use tonal_store::{ApplyReport, FallbackReason, SearchPatterns, SeedImport, SeedSource};

use crate::cli::{OutputFormat, ScaleFormat};
use crate::context::{CliResult, format_failure};

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|err| format_failure(&err))
}

pub(crate) fn render_scale(scale: &ColorScale, format: ScaleFormat) -> CliResult<String> {
    match format {
        ScaleFormat::Json => to_json(scale),
        ScaleFormat::Flat => to_json(&scale.to_flat_map()),
        ScaleFormat::Table => {
            let mut out = String::new();
            let _ = write!(out, "{:<10}", "FAMILY");
            for step in Step::ALL {
                let _ = write!(out, " {:>6}", step.value());
            }
            for (family, steps) in scale.families() {
                let _ = write!(out, "\n{:<10}", family.as_str());
                for (_, color) in steps.iter() {
                    let _ = write!(out, " {color:>6}");
                }
            }
            let base = scale.base();
            let _ = write!(out, "\nbase: white {} / black {}", base.white, base.black);
            Ok(out)
        }
    }
}

#[derive(Serialize)]
struct ApplyView<'a> {
    collection: &'a str,
    created: usize,
    updated: usize,
}

pub(crate) fn render_apply_report(
    collection: &str,
    report: &ApplyReport,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&ApplyView {
            collection,
            created: report.created,
            updated: report.updated,
        }),
        OutputFormat::Table => Ok(format!(
            "Applied {} color variables to '{collection}' ({} created, {} updated)",
            report.total(),
            report.created,
            report.updated
        )),
    }
}

#[derive(Serialize)]
struct ImportView<'a> {
    collection: &'a str,
    seed: &'a SeedPalette,
    source: &'a SeedSource,
}

pub(crate) fn render_seed_import(
    collection: &str,
    import: &SeedImport,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&ImportView {
            collection,
            seed: &import.seed,
            source: &import.source,
        }),
        OutputFormat::Table => {
            let matched: &[Role] = match &import.source {
                SeedSource::Imported { matched } => matched,
                SeedSource::Fallback { .. } => &[],
            };
            let mut out = format!("{:<14} {:<7} SOURCE", "ROLE", "COLOR");
            for role in Role::ALL {
                let source = if matched.contains(&role) {
                    "store"
                } else {
                    "default"
                };
                let _ = write!(
                    out,
                    "\n{:<14} {:<7} {source}",
                    role.as_str(),
                    import.seed.get(role).to_hex()
                );
            }
            if let SeedSource::Fallback { reason } = &import.source {
                let _ = write!(
                    out,
                    "\nfallback: {} ('{collection}')",
                    describe_fallback(reason)
                );
            }
            Ok(out)
        }
    }
}

fn describe_fallback(reason: &FallbackReason) -> String {
    match reason {
        FallbackReason::Timeout => "variable store lookup timed out".to_string(),
        FallbackReason::NoMatches => "no matching variables".to_string(),
        FallbackReason::CollectionNotFound => "collection not found".to_string(),
        FallbackReason::StoreFailure(message) => format!("store failure: {message}"),
    }
}

#[derive(Serialize)]
struct DefaultsView<'a> {
    collection: &'a str,
    lookup_timeout_ms: u64,
    seed: &'a SeedPalette,
    patterns: &'a SearchPatterns,
}

pub(crate) fn render_defaults(config: &TonalConfig, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&DefaultsView {
            collection: &config.collection,
            lookup_timeout_ms: u64::try_from(config.lookup_timeout.as_millis())
                .unwrap_or(u64::MAX),
            seed: &config.seed,
            patterns: &config.patterns,
        }),
        OutputFormat::Table => {
            let mut out = format!(
                "collection: {}\nlookup timeout: {} ms\n{:<14} {:<7} PATTERNS",
                config.collection,
                config.lookup_timeout.as_millis(),
                "ROLE",
                "COLOR"
            );
            for role in Role::ALL {
                let _ = write!(
                    out,
                    "\n{:<14} {:<7} {}",
                    role.as_str(),
                    config.seed.get(role).to_hex(),
                    config.patterns.patterns_for(role).join(", ")
                );
            }
            Ok(out)
        }
    }
}
