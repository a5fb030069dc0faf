use crate::cli::DefaultsArgs;
use crate::context::{AppContext, CliResult};
use crate::output::render_defaults;

pub(crate) fn handle_defaults(ctx: &AppContext, args: &DefaultsArgs) -> CliResult<String> {
    render_defaults(&ctx.config, args.format)
}
