//! Built-in values used when neither the file nor the environment sets a field.
//!
//! # Design
//! - The default seed is the reference palette the scale tests are pinned to.
//! - The lookup timeout bounds a single store search.

use std::time::Duration;

use tonal_core::{Color, SeedPalette};

/// Collection targeted when none is configured.
#[allow(clippy::redundant_pub_crate)]
pub(crate) const COLLECTION: &str = "Colors";
/// Upper bound for a store search.
#[allow(clippy::redundant_pub_crate)]
pub(crate) const LOOKUP_TIMEOUT: Duration = Duration::from_millis(3_000);

/// Seed palette used when the store yields nothing.
#[allow(clippy::redundant_pub_crate)]
pub(crate) const SEED: SeedPalette = SeedPalette {
    base_white: Color::WHITE,
    base_black: Color::BLACK,
    brand500: Color::from_u32(0x0063_66F1),
    primary500: Color::from_u32(0x003B_82F6),
    secondary500: Color::from_u32(0x00EC_4899),
    gray500: Color::from_u32(0x006B_7280),
};
