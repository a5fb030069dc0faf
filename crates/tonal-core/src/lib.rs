#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Pure color-scale generation for design-system palettes.
//!
//! Layout: `color.rs` (hex/RGB/HSL conversions), `scale.rs` (ten-step
//! family scales), `palette.rs` (seed palettes and the assembled
//! [`ColorScale`]), `error.rs` (parse and shape errors).
//!
//! Everything in this crate is synchronous and free of shared state; every
//! operation is a function of its explicit arguments.
//!
//! ```
//! use tonal_core::{Color, Step, generate_family};
//!
//! let seed: Color = "6366F1".parse()?;
//! let white: Color = "FFFFFF".parse()?;
//! let black: Color = "000000".parse()?;
//! let family = generate_family(seed, white, black);
//! assert_eq!(family[Step::S500], seed);
//! assert_eq!(family[Step::S50], white);
//! # Ok::<(), tonal_core::ColorError>(())
//! ```

pub mod color;
pub mod error;
pub mod palette;
pub mod scale;

pub use color::{Color, Hsl, Mix, color_to_hex, color_to_hsl, hex_to_color, hsl_to_color};
pub use error::{ColorError, ColorResult};
pub use palette::{
    BaseColors, ColorScale, Family, PaletteBuilder, PartialSeedPalette, Role, SeedPalette,
    build_palette,
};
pub use scale::{ScaleGenerator, ShadeTuning, Step, StepMap, generate_family};
