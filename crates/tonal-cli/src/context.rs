//! Shared context, error types, and argument helpers for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use anyhow::anyhow;
use tonal_config::{ConfigError, TonalConfig};
use tonal_core::{Color, PaletteBuilder, ScaleGenerator};
use tonal_store::{FileStore, ReconcileError, VariableReconciler};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidField {
                section,
                field,
                value,
                reason,
            } => {
                let shown = value.map_or_else(String::new, |value| format!(" '{value}'"));
                Self::validation(format!(
                    "invalid configuration value{shown} for {field} ({section}): {reason}"
                ))
            }
            ConfigError::Io { path, source, .. } => Self::validation(format!(
                "cannot read configuration file {}: {source}",
                path.display()
            )),
            ConfigError::Parse { path, source } => Self::validation(format!(
                "configuration file {} is invalid: {source}",
                path.display()
            )),
        }
    }
}

impl From<ReconcileError> for CliError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::CollectionNotFound { name } => Self::validation(format!(
                "collection '{name}' not found in the variable store \
                 (create it with `tonal init-store`)"
            )),
            other => Self::failure(other),
        }
    }
}

/// Application context passed to command handlers.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) config: TonalConfig,
}

impl AppContext {
    pub(crate) const fn new(config: TonalConfig) -> Self {
        Self { config }
    }

    /// Palette builder using the configured shade tuning.
    pub(crate) const fn palette_builder(&self) -> PaletteBuilder {
        PaletteBuilder::new(ScaleGenerator::new(self.config.tuning))
    }

    /// Store document from the flag, falling back to configuration.
    pub(crate) fn store_path(&self, explicit: Option<PathBuf>) -> CliResult<PathBuf> {
        explicit
            .or_else(|| self.config.store_path.clone())
            .ok_or_else(|| {
                CliError::validation(
                    "variable store path is required (pass --store or set TONAL_STORE_PATH)",
                )
            })
    }

    /// Collection name from the flag, falling back to configuration.
    pub(crate) fn collection(&self, explicit: Option<String>) -> CliResult<String> {
        match explicit {
            Some(name) if name.trim().is_empty() => {
                Err(CliError::validation("collection name must not be empty"))
            }
            Some(name) => Ok(name.trim().to_string()),
            None => Ok(self.config.collection.clone()),
        }
    }

    /// Reconciler over the file store selected by the flags.
    pub(crate) fn reconciler(
        &self,
        store: Option<PathBuf>,
        collection: Option<String>,
    ) -> CliResult<VariableReconciler<FileStore>> {
        let path = self.store_path(store)?;
        let collection = self.collection(collection)?;
        Ok(VariableReconciler::new(FileStore::new(path), collection))
    }
}

/// Parse a color flag; one leading `#` is accepted.
pub(crate) fn parse_color_arg(flag: &str, raw: &str) -> CliResult<Color> {
    Color::from_hex_input(raw).map_err(|_| {
        CliError::validation(format!(
            "--{flag} must be a six-digit hex color such as 3B82F6 (got '{raw}')"
        ))
    })
}

/// Wrap a serialization failure while rendering output.
pub(crate) fn format_failure(err: &serde_json::Error) -> CliError {
    CliError::failure(anyhow!("failed to format JSON: {err}"))
}
