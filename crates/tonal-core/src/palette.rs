//! Seed palettes and the assembled multi-family color scale.
//!
//! # Design
//! - A [`SeedPalette`] names exactly six colors; [`PartialSeedPalette`] is the
//!   best-effort form recovered from an external store.
//! - Families are generated independently; no family reads another's output.
//! - [`ColorScale`] transports as string keys mapped to hex strings.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ColorError;
use crate::scale::{ScaleGenerator, StepMap};

/// Named group of steps derived from one seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Brand family, seeded by `brand500`.
    Brand,
    /// Primary family, seeded by `primary500`.
    Primary,
    /// Secondary family, seeded by `secondary500`.
    Secondary,
    /// Gray family, seeded by `gray500`.
    Gray,
}

impl Family {
    /// All families in declaration order.
    pub const ALL: [Self; 4] = [Self::Brand, Self::Primary, Self::Secondary, Self::Gray];

    /// Lowercase family name used in variable paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Gray => "gray",
        }
    }

    /// Seed role feeding this family.
    #[must_use]
    pub const fn seed_role(self) -> Role {
        match self {
            Self::Brand => Role::Brand500,
            Self::Primary => Role::Primary500,
            Self::Secondary => Role::Secondary500,
            Self::Gray => Role::Gray500,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Family {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Semantic slot of a seed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// White anchor.
    BaseWhite,
    /// Black anchor.
    BaseBlack,
    /// Brand seed.
    Brand500,
    /// Primary seed.
    Primary500,
    /// Secondary seed.
    Secondary500,
    /// Gray seed.
    Gray500,
}

impl Role {
    /// All roles in declaration order.
    pub const ALL: [Self; 6] = [
        Self::BaseWhite,
        Self::BaseBlack,
        Self::Brand500,
        Self::Primary500,
        Self::Secondary500,
        Self::Gray500,
    ];

    /// camelCase role name (e.g. `baseWhite`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseWhite => "baseWhite",
            Self::BaseBlack => "baseBlack",
            Self::Brand500 => "brand500",
            Self::Primary500 => "primary500",
            Self::Secondary500 => "secondary500",
            Self::Gray500 => "gray500",
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ColorError::UnknownRole {
                value: s.to_string(),
            })
    }
}

/// One base color per semantic role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedPalette {
    /// White anchor used for tints.
    pub base_white: Color,
    /// Black anchor.
    pub base_black: Color,
    /// Brand seed.
    pub brand500: Color,
    /// Primary seed.
    pub primary500: Color,
    /// Secondary seed.
    pub secondary500: Color,
    /// Gray seed.
    pub gray500: Color,
}

impl SeedPalette {
    /// Color assigned to `role`.
    #[must_use]
    pub const fn get(&self, role: Role) -> Color {
        match role {
            Role::BaseWhite => self.base_white,
            Role::BaseBlack => self.base_black,
            Role::Brand500 => self.brand500,
            Role::Primary500 => self.primary500,
            Role::Secondary500 => self.secondary500,
            Role::Gray500 => self.gray500,
        }
    }

    /// Replace the color assigned to `role`.
    pub const fn set(&mut self, role: Role, color: Color) {
        match role {
            Role::BaseWhite => self.base_white = color,
            Role::BaseBlack => self.base_black = color,
            Role::Brand500 => self.brand500 = color,
            Role::Primary500 => self.primary500 = color,
            Role::Secondary500 => self.secondary500 = color,
            Role::Gray500 => self.gray500 = color,
        }
    }

    /// Copy of this palette with `role` replaced.
    #[must_use]
    pub const fn with(mut self, role: Role, color: Color) -> Self {
        self.set(role, color);
        self
    }
}

/// Best-effort palette where any role may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialSeedPalette {
    /// White anchor, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_white: Option<Color>,
    /// Black anchor, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_black: Option<Color>,
    /// Brand seed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand500: Option<Color>,
    /// Primary seed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary500: Option<Color>,
    /// Secondary seed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary500: Option<Color>,
    /// Gray seed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gray500: Option<Color>,
}

impl PartialSeedPalette {
    /// Color assigned to `role`, if any.
    #[must_use]
    pub const fn get(&self, role: Role) -> Option<Color> {
        match role {
            Role::BaseWhite => self.base_white,
            Role::BaseBlack => self.base_black,
            Role::Brand500 => self.brand500,
            Role::Primary500 => self.primary500,
            Role::Secondary500 => self.secondary500,
            Role::Gray500 => self.gray500,
        }
    }

    /// Assign `color` to `role`, replacing any previous value.
    pub fn set(&mut self, role: Role, color: Color) {
        let slot = match role {
            Role::BaseWhite => &mut self.base_white,
            Role::BaseBlack => &mut self.base_black,
            Role::Brand500 => &mut self.brand500,
            Role::Primary500 => &mut self.primary500,
            Role::Secondary500 => &mut self.secondary500,
            Role::Gray500 => &mut self.gray500,
        };
        *slot = Some(color);
    }

    /// Whether no role is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Role::ALL.iter().all(|role| self.get(*role).is_none())
    }

    /// Roles with an assigned color, in declaration order.
    #[must_use]
    pub fn present_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_some())
            .collect()
    }

    /// Roles without an assigned color, in declaration order.
    #[must_use]
    pub fn missing_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    /// Complete palette using `fallback` for every absent role.
    #[must_use]
    pub fn fill_from(&self, fallback: &SeedPalette) -> SeedPalette {
        let mut seed = *fallback;
        for role in Role::ALL {
            if let Some(color) = self.get(role) {
                seed.set(role, color);
            }
        }
        seed
    }
}

impl From<SeedPalette> for PartialSeedPalette {
    fn from(seed: SeedPalette) -> Self {
        Self {
            base_white: Some(seed.base_white),
            base_black: Some(seed.base_black),
            brand500: Some(seed.brand500),
            primary500: Some(seed.primary500),
            secondary500: Some(seed.secondary500),
            gray500: Some(seed.gray500),
        }
    }
}

/// White and black anchors copied through from the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseColors {
    /// White anchor.
    pub white: Color,
    /// Black anchor.
    pub black: Color,
}

/// Complete palette: base anchors plus one [`StepMap`] per [`Family`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ColorScaleRepr", try_from = "ColorScaleRepr")]
pub struct ColorScale {
    base: BaseColors,
    families: [StepMap; 4],
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColorScaleRepr {
    base: BaseColors,
    families: BTreeMap<Family, StepMap>,
}

impl From<ColorScale> for ColorScaleRepr {
    fn from(scale: ColorScale) -> Self {
        Self {
            base: scale.base,
            families: scale
                .families()
                .map(|(family, steps)| (family, *steps))
                .collect(),
        }
    }
}

impl TryFrom<ColorScaleRepr> for ColorScale {
    type Error = ColorError;

    fn try_from(repr: ColorScaleRepr) -> Result<Self, Self::Error> {
        let lookup = |family: Family| {
            repr.families
                .get(&family)
                .copied()
                .ok_or(ColorError::MissingFamily {
                    family: family.as_str(),
                })
        };
        Ok(Self {
            base: repr.base,
            families: [
                lookup(Family::Brand)?,
                lookup(Family::Primary)?,
                lookup(Family::Secondary)?,
                lookup(Family::Gray)?,
            ],
        })
    }
}

impl ColorScale {
    /// Base anchors.
    #[must_use]
    pub const fn base(&self) -> &BaseColors {
        &self.base
    }

    /// Steps generated for `family`.
    #[must_use]
    pub const fn family(&self, family: Family) -> &StepMap {
        &self.families[family.index()]
    }

    /// Iterate families in declaration order.
    pub fn families(&self) -> impl Iterator<Item = (Family, &StepMap)> + '_ {
        Family::ALL
            .into_iter()
            .map(|family| (family, self.family(family)))
    }

    /// Named entries in write order: `base/white`, `base/black`, then
    /// `<family>/<step>` for each family and step.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Color)> {
        let mut entries = Vec::with_capacity(2 + Family::ALL.len() * 10);
        entries.push(("base/white".to_string(), self.base.white));
        entries.push(("base/black".to_string(), self.base.black));
        for (family, steps) in self.families() {
            entries.extend(
                steps
                    .iter()
                    .map(|(step, color)| (format!("{family}/{step}"), color)),
            );
        }
        entries
    }

    /// Flat `name -> hex` mapping for transport.
    #[must_use]
    pub fn to_flat_map(&self) -> BTreeMap<String, String> {
        self.entries()
            .into_iter()
            .map(|(name, color)| (name, color.to_hex()))
            .collect()
    }
}

/// Assembles a [`ColorScale`] from a [`SeedPalette`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaletteBuilder {
    generator: ScaleGenerator,
}

impl PaletteBuilder {
    /// Construct a builder around `generator`.
    #[must_use]
    pub const fn new(generator: ScaleGenerator) -> Self {
        Self { generator }
    }

    /// Build the full palette. Each family depends only on its own seed and
    /// the two anchors.
    #[must_use]
    pub fn build(&self, seed: &SeedPalette) -> ColorScale {
        let families = Family::ALL.map(|family| {
            self.generator.generate_family(
                seed.get(family.seed_role()),
                seed.base_white,
                seed.base_black,
            )
        });
        ColorScale {
            base: BaseColors {
                white: seed.base_white,
                black: seed.base_black,
            },
            families,
        }
    }
}

/// Build a palette with the default tuning.
#[must_use]
pub fn build_palette(seed: &SeedPalette) -> ColorScale {
    PaletteBuilder::default().build(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{Step, generate_family};

    fn hex(text: &str) -> Color {
        Color::from_hex(text).expect("valid test color")
    }

    fn seed() -> SeedPalette {
        SeedPalette {
            base_white: hex("FFFFFF"),
            base_black: hex("000000"),
            brand500: hex("6366F1"),
            primary500: hex("3B82F6"),
            secondary500: hex("EC4899"),
            gray500: hex("6B7280"),
        }
    }

    #[test]
    fn base_colors_pass_through() {
        let scale = build_palette(&seed().with(Role::BaseWhite, hex("FAFAFA")));
        assert_eq!(scale.base().white, hex("FAFAFA"));
        assert_eq!(scale.base().black, hex("000000"));
        assert_eq!(scale.family(Family::Gray)[Step::S50], hex("FAFAFA"));
    }

    #[test]
    fn families_are_independent() {
        let original = build_palette(&seed());
        let changed = build_palette(&seed().with(Role::Secondary500, hex("10B981")));
        for family in [Family::Brand, Family::Primary, Family::Gray] {
            assert_eq!(original.family(family), changed.family(family));
        }
        assert_ne!(
            original.family(Family::Secondary),
            changed.family(Family::Secondary)
        );
        assert_eq!(
            *changed.family(Family::Secondary),
            generate_family(hex("10B981"), hex("FFFFFF"), hex("000000"))
        );
    }

    #[test]
    fn entries_follow_naming_convention_in_order() {
        let entries = build_palette(&seed()).entries();
        assert_eq!(entries.len(), 42);
        assert_eq!(entries[0], ("base/white".to_string(), hex("FFFFFF")));
        assert_eq!(entries[1], ("base/black".to_string(), hex("000000")));
        assert_eq!(entries[2].0, "brand/50");
        assert_eq!(entries[7], ("brand/500".to_string(), hex("6366F1")));
        assert_eq!(entries[41].0, "gray/900");
    }

    #[test]
    fn flat_map_carries_hex_strings() {
        let flat = build_palette(&seed()).to_flat_map();
        assert_eq!(flat.get("primary/500").map(String::as_str), Some("3B82F6"));
        assert_eq!(flat.get("secondary/900").map(String::as_str), Some("52042A"));
        assert_eq!(flat.len(), 42);
    }

    #[test]
    fn partial_palette_fills_absent_roles() {
        let mut partial = PartialSeedPalette::default();
        assert!(partial.is_empty());
        partial.set(Role::Gray500, hex("71717A"));
        partial.set(Role::BaseBlack, hex("09090B"));

        assert_eq!(partial.present_roles(), vec![Role::BaseBlack, Role::Gray500]);
        assert_eq!(partial.missing_roles().len(), 4);

        let filled = partial.fill_from(&seed());
        assert_eq!(filled.gray500, hex("71717A"));
        assert_eq!(filled.base_black, hex("09090B"));
        assert_eq!(filled.brand500, hex("6366F1"));
    }

    #[test]
    fn seed_palette_uses_camel_case_names() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(seed())?;
        assert_eq!(value["baseWhite"], "FFFFFF");
        assert_eq!(value["gray500"], "6B7280");
        let parsed: SeedPalette = serde_json::from_value(value)?;
        assert_eq!(parsed, seed());
        Ok(())
    }

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!("BRAND500".parse::<Role>().expect("known role"), Role::Brand500);
        assert_eq!("baseWhite".parse::<Role>().expect("known role"), Role::BaseWhite);
        assert!("accent500".parse::<Role>().is_err());
    }

    #[test]
    fn color_scale_serializes_base_and_families() -> Result<(), serde_json::Error> {
        let scale = build_palette(&seed());
        let value = serde_json::to_value(scale)?;
        assert_eq!(value["base"]["white"], "FFFFFF");
        assert_eq!(value["families"]["brand"]["500"], "6366F1");
        assert_eq!(value["families"]["gray"]["50"], "FFFFFF");

        let parsed: ColorScale = serde_json::from_value(value.clone())?;
        assert_eq!(parsed, scale);

        let mut missing = value;
        if let Some(families) = missing["families"].as_object_mut() {
            families.remove("gray");
        }
        let err = serde_json::from_value::<ColorScale>(missing).expect_err("gray removed");
        assert!(err.to_string().contains("missing family"));
        Ok(())
    }
}
