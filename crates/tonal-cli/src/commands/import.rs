use crate::cli::ImportArgs;
use crate::context::{AppContext, CliResult};
use crate::output::render_seed_import;

pub(crate) async fn handle_import(ctx: &AppContext, args: ImportArgs) -> CliResult<String> {
    let reconciler = ctx.reconciler(args.store, args.collection)?;
    let import = reconciler
        .import_seed(
            &ctx.config.patterns,
            &ctx.config.seed,
            ctx.config.lookup_timeout,
        )
        .await;
    render_seed_import(reconciler.collection_name(), &import, args.format)
}
