use tonal_core::{Role, SeedPalette};
use tracing::info;

use crate::cli::{GenerateArgs, SeedArgs};
use crate::context::{AppContext, CliResult, parse_color_arg};
use crate::output::render_scale;

pub(crate) fn handle_generate(ctx: &AppContext, args: &GenerateArgs) -> CliResult<String> {
    let seed = resolve_seed(&ctx.config.seed, &args.seed)?;
    let scale = ctx.palette_builder().build(&seed);
    info!(
        brand = %seed.brand500,
        primary = %seed.primary500,
        secondary = %seed.secondary500,
        gray = %seed.gray500,
        "palette generated"
    );
    render_scale(&scale, args.format)
}

/// Apply command-line seed overrides on top of the configured palette.
pub(crate) fn resolve_seed(base: &SeedPalette, overrides: &SeedArgs) -> CliResult<SeedPalette> {
    let flags = [
        (Role::BaseWhite, "base-white", overrides.base_white.as_deref()),
        (Role::BaseBlack, "base-black", overrides.base_black.as_deref()),
        (Role::Brand500, "brand", overrides.brand.as_deref()),
        (Role::Primary500, "primary", overrides.primary.as_deref()),
        (Role::Secondary500, "secondary", overrides.secondary.as_deref()),
        (Role::Gray500, "gray", overrides.gray.as_deref()),
    ];
    let mut seed = *base;
    for (role, flag, raw) in flags {
        if let Some(raw) = raw {
            seed.set(role, parse_color_arg(flag, raw)?);
        }
    }
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ScaleFormat;
    use crate::context::CliError;
    use tonal_config::TonalConfig;

    fn ctx() -> AppContext {
        AppContext::new(TonalConfig::default())
    }

    #[test]
    fn overrides_replace_only_named_roles() {
        let base = TonalConfig::default().seed;
        let seed = resolve_seed(
            &base,
            &SeedArgs {
                secondary: Some("#10b981".to_string()),
                ..SeedArgs::default()
            },
        )
        .expect("valid override");
        assert_eq!(seed.secondary500.to_hex(), "10B981");
        assert_eq!(seed.brand500, base.brand500);
        assert_eq!(seed.base_white, base.base_white);
    }

    #[test]
    fn invalid_override_is_a_validation_error() {
        let err = resolve_seed(
            &TonalConfig::default().seed,
            &SeedArgs {
                gray: Some("808080FF".to_string()),
                ..SeedArgs::default()
            },
        )
        .expect_err("eight digits");
        assert!(matches!(err, CliError::Validation(ref message) if message.starts_with("--gray")));
    }

    #[test]
    fn flat_output_lists_every_variable() -> anyhow::Result<()> {
        let output = handle_generate(
            &ctx(),
            &GenerateArgs {
                seed: SeedArgs::default(),
                format: ScaleFormat::Flat,
            },
        )
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;
        let flat: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&output)?;
        assert_eq!(flat.len(), 42);
        assert_eq!(flat["brand/600"], "262AE6");
        assert_eq!(flat["gray/900"], "1D2024");
        Ok(())
    }

    #[test]
    fn json_output_is_the_scale_transport_form() -> anyhow::Result<()> {
        let output = handle_generate(
            &ctx(),
            &GenerateArgs {
                seed: SeedArgs {
                    primary: Some("FF0000".to_string()),
                    ..SeedArgs::default()
                },
                format: ScaleFormat::Json,
            },
        )
        .map_err(|err| anyhow::anyhow!(err.display_message()))?;
        let scale: tonal_core::ColorScale = serde_json::from_str(&output)?;
        assert_eq!(
            scale.family(tonal_core::Family::Primary)[tonal_core::Step::S600].to_hex(),
            "C40505"
        );
        Ok(())
    }
}
