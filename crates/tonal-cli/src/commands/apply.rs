use std::fs;
use std::path::Path;

use tonal_core::ColorScale;
use tracing::info;

use crate::cli::ApplyArgs;
use crate::commands::generate::resolve_seed;
use crate::context::{AppContext, CliError, CliResult};
use crate::output::render_apply_report;

pub(crate) async fn handle_apply(ctx: &AppContext, args: ApplyArgs) -> CliResult<String> {
    let scale = match args.input.as_deref() {
        Some(path) => read_scale(path)?,
        None => ctx
            .palette_builder()
            .build(&resolve_seed(&ctx.config.seed, &args.seed)?),
    };
    let reconciler = ctx.reconciler(args.store, args.collection)?;
    info!(
        store = %reconciler.store().path().display(),
        collection = reconciler.collection_name(),
        "applying color scale"
    );
    let report = reconciler.apply_scale(&scale).await?;
    render_apply_report(reconciler.collection_name(), &report, args.format)
}

fn read_scale(path: &Path) -> CliResult<ColorScale> {
    let payload = fs::read_to_string(path).map_err(|err| {
        CliError::validation(format!("failed to read {}: {err}", path.display()))
    })?;
    serde_json::from_str(&payload).map_err(|err| {
        CliError::validation(format!(
            "{} is not a color scale document: {err}",
            path.display()
        ))
    })
}
