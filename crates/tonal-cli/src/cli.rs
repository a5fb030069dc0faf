//! Argument parsing and command dispatch.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tonal_config::{ConfigLoader, TonalConfig};
use tonal_telemetry::{LogFormat, LoggingConfig, command_span, init_logging};
use tracing::{Instrument, debug};

use crate::commands::{
    handle_apply, handle_defaults, handle_generate, handle_import, handle_init_store,
};
use crate::context::{AppContext, CliError, CliResult};

const DEFAULT_CONFIG_FILE: &str = "tonal.json";

/// Parses CLI arguments, executes the requested command, and prints its
/// output. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<String> {
    // No subscriber exists until the logging settings are known; the config
    // source is reported once one is installed.
    let (config, source) = load_config(&cli)?;
    let logging = LoggingConfig {
        level: &config.logging.level,
        format: config.logging.format,
        ..LoggingConfig::default()
    };
    init_logging(&logging).map_err(CliError::failure)?;
    if let Some(source) = &source {
        source.log();
    }

    let span = command_span(cli.command.label());
    let ctx = AppContext::new(config);
    dispatch(&ctx, cli.command).instrument(span).await
}

/// Configuration file consulted while loading settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    Loaded(PathBuf),
    Absent(PathBuf),
}

impl ConfigSource {
    fn of(path: &Path) -> Self {
        if path.is_file() {
            Self::Loaded(path.to_path_buf())
        } else {
            Self::Absent(path.to_path_buf())
        }
    }

    fn log(&self) {
        match self {
            Self::Loaded(path) => debug!(path = %path.display(), "configuration file loaded"),
            Self::Absent(path) => debug!(
                path = %path.display(),
                "configuration file absent; using defaults and environment"
            ),
        }
    }
}

fn load_config(cli: &Cli) -> CliResult<(TonalConfig, Option<ConfigSource>)> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    }
    .with_process_env();
    let mut config = loader.load()?;
    let source = loader.file().map(ConfigSource::of);
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format.into();
    }
    Ok((config, source))
}

pub(crate) async fn dispatch(ctx: &AppContext, command: Command) -> CliResult<String> {
    debug!(command = command.label(), "dispatching command");
    match command {
        Command::Generate(args) => handle_generate(ctx, &args),
        Command::Apply(args) => handle_apply(ctx, args).await,
        Command::Import(args) => handle_import(ctx, args).await,
        Command::Defaults(args) => handle_defaults(ctx, &args),
        Command::InitStore(args) => handle_init_store(ctx, args).await,
    }
}

#[derive(Parser)]
#[command(
    name = "tonal",
    version,
    about = "Generate ten-step color scales and sync them with a variable store"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "TONAL_CONFIG",
        help = "JSON configuration file (defaults to ./tonal.json when present)"
    )]
    pub(crate) config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level or filter directive")]
    pub(crate) log_level: Option<String>,
    #[arg(long, global = true, value_enum, help = "Log output format")]
    pub(crate) log_format: Option<LogFormatArg>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the palette from the configured seed, optionally overridden.
    Generate(GenerateArgs),
    /// Write a palette into a variable store collection.
    Apply(ApplyArgs),
    /// Recover the seed palette from a variable store collection.
    Import(ImportArgs),
    /// Show the effective seed palette and search patterns.
    Defaults(DefaultsArgs),
    /// Create an empty collection in a variable store.
    InitStore(InitStoreArgs),
}

impl Command {
    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::Generate(_) => "generate",
            Self::Apply(_) => "apply",
            Self::Import(_) => "import",
            Self::Defaults(_) => "defaults",
            Self::InitStore(_) => "init-store",
        }
    }
}

/// Seed overrides shared by commands that generate a palette.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct SeedArgs {
    #[arg(long, help = "White anchor used for tints")]
    pub(crate) base_white: Option<String>,
    #[arg(long, help = "Black anchor")]
    pub(crate) base_black: Option<String>,
    #[arg(long, help = "Brand seed (step 500)")]
    pub(crate) brand: Option<String>,
    #[arg(long, help = "Primary seed (step 500)")]
    pub(crate) primary: Option<String>,
    #[arg(long, help = "Secondary seed (step 500)")]
    pub(crate) secondary: Option<String>,
    #[arg(long, help = "Gray seed (step 500)")]
    pub(crate) gray: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    #[command(flatten)]
    pub(crate) seed: SeedArgs,
    #[arg(long, value_enum, default_value_t = ScaleFormat::Json)]
    pub(crate) format: ScaleFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    #[arg(long, help = "Variable store document")]
    pub(crate) store: Option<PathBuf>,
    #[arg(long, help = "Target collection name")]
    pub(crate) collection: Option<String>,
    #[arg(
        long,
        conflicts_with_all = ["base_white", "base_black", "brand", "primary", "secondary", "gray"],
        help = "Color scale JSON produced by `tonal generate`"
    )]
    pub(crate) input: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) seed: SeedArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    #[arg(long, help = "Variable store document")]
    pub(crate) store: Option<PathBuf>,
    #[arg(long, help = "Collection to search")]
    pub(crate) collection: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct DefaultsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct InitStoreArgs {
    #[arg(long, help = "Variable store document")]
    pub(crate) store: Option<PathBuf>,
    #[arg(long, help = "Collection to create")]
    pub(crate) collection: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Table,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ScaleFormat {
    Json,
    Table,
    Flat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_accepts_seed_overrides_and_format() {
        let cli = Cli::try_parse_from([
            "tonal",
            "--log-level",
            "debug",
            "generate",
            "--brand",
            "#10B981",
            "--format",
            "flat",
        ])
        .expect("valid arguments");
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.seed.brand.as_deref(), Some("#10B981"));
                assert_eq!(args.format, ScaleFormat::Flat);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn apply_rejects_input_with_seed_overrides() {
        let result = Cli::try_parse_from([
            "tonal",
            "apply",
            "--store",
            "variables.json",
            "--input",
            "scale.json",
            "--brand",
            "6366F1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn config_source_reports_the_file_that_was_read() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tonal.json");
        std::fs::write(&path, r#"{"collection": "Tokens"}"#)?;
        let cli = Cli::try_parse_from([
            "tonal",
            "--config",
            path.to_str().unwrap_or_default(),
            "defaults",
        ])?;

        let (config, source) =
            load_config(&cli).map_err(|err| anyhow::anyhow!(err.display_message()))?;
        assert_eq!(config.collection, "Tokens");
        assert_eq!(source, Some(ConfigSource::Loaded(path)));
        assert_eq!(
            ConfigSource::of(&dir.path().join("absent.json")),
            ConfigSource::Absent(dir.path().join("absent.json"))
        );
        Ok(())
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "tonal",
            "init-store",
            "--store",
            "variables.json",
            "--log-format",
            "json",
        ])
        .expect("valid arguments");
        assert_eq!(cli.log_format, Some(LogFormatArg::Json));
        assert_eq!(cli.command.label(), "init-store");
    }
}
