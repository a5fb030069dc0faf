//! Ten-step scale generation for a single color family.
//!
//! # Design
//! - Tints (50–400) interpolate linearly in RGB from the white anchor to the seed.
//! - Step 500 is the seed, copied through untouched.
//! - Shades (600–900) darken in HSL space so the hue is held constant, with a
//!   saturation boost on the two darkest steps.
//! - Step 400 lands on `ratio = 1.0` and therefore equals the seed, like 500.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::ops::Index;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::color::{Color, Hsl, Mix, hsl_to_color};
use crate::error::{ColorError, ColorResult};

/// One of the ten canonical scale positions. Lower numbers are lighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Step 50.
    S50,
    /// Step 100.
    S100,
    /// Step 200.
    S200,
    /// Step 300.
    S300,
    /// Step 400.
    S400,
    /// Step 500, the seed.
    S500,
    /// Step 600.
    S600,
    /// Step 700.
    S700,
    /// Step 800.
    S800,
    /// Step 900.
    S900,
}

impl Step {
    /// All steps, lightest first.
    pub const ALL: [Self; 10] = [
        Self::S50,
        Self::S100,
        Self::S200,
        Self::S300,
        Self::S400,
        Self::S500,
        Self::S600,
        Self::S700,
        Self::S800,
        Self::S900,
    ];

    /// Steps produced by blending toward white.
    pub const TINTS: [Self; 5] = [Self::S50, Self::S100, Self::S200, Self::S300, Self::S400];

    /// Steps produced by HSL darkening.
    pub const SHADES: [Self; 4] = [Self::S600, Self::S700, Self::S800, Self::S900];

    /// Numeric step value (e.g. `600`).
    #[must_use]
    pub const fn value(self) -> u16 {
        match self {
            Self::S50 => 50,
            Self::S100 => 100,
            Self::S200 => 200,
            Self::S300 => 300,
            Self::S400 => 400,
            Self::S500 => 500,
            Self::S600 => 600,
            Self::S700 => 700,
            Self::S800 => 800,
            Self::S900 => 900,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Step {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.value())
    }
}

impl TryFrom<u16> for Step {
    type Error = ColorError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|step| step.value() == value)
            .ok_or_else(|| ColorError::UnknownStep {
                value: value.to_string(),
            })
    }
}

impl FromStr for Step {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>()
            .map_err(|_| ColorError::UnknownStep {
                value: s.to_string(),
            })
            .and_then(Self::try_from)
    }
}

/// Colors for exactly the ten canonical steps of one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepMap {
    colors: [Color; 10],
}

impl StepMap {
    /// Build a map by evaluating `f` once per step, lightest first.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(Step) -> Color) -> Self {
        let mut colors = [Color::BLACK; 10];
        for step in Step::ALL {
            colors[step.index()] = f(step);
        }
        Self { colors }
    }

    /// Color at `step`.
    #[must_use]
    pub const fn get(&self, step: Step) -> Color {
        self.colors[step.index()]
    }

    /// Iterate `(step, color)` pairs, lightest first.
    pub fn iter(&self) -> impl Iterator<Item = (Step, Color)> + '_ {
        Step::ALL.into_iter().map(|step| (step, self.get(step)))
    }

    /// Build from a `step -> color` mapping that must name all ten steps.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::MissingStep`] naming the first absent step.
    pub fn try_from_entries(
        entries: impl IntoIterator<Item = (Step, Color)>,
    ) -> ColorResult<Self> {
        let mut slots: [Option<Color>; 10] = [None; 10];
        for (step, color) in entries {
            slots[step.index()] = Some(color);
        }
        let mut colors = [Color::BLACK; 10];
        for step in Step::ALL {
            colors[step.index()] = slots[step.index()].ok_or(ColorError::MissingStep {
                step: step.value(),
            })?;
        }
        Ok(Self { colors })
    }
}

impl Index<Step> for StepMap {
    type Output = Color;

    fn index(&self, step: Step) -> &Self::Output {
        &self.colors[step.index()]
    }
}

impl Serialize for StepMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Step::ALL.len()))?;
        for (step, color) in self.iter() {
            map.serialize_entry(&step.to_string(), &color)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StepMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Color>::deserialize(deserializer)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (key, color) in raw {
            let step = key
                .parse::<Step>()
                .map_err(|_| de::Error::custom(format!("unknown scale step '{key}'")))?;
            entries.push((step, color));
        }
        Self::try_from_entries(entries)
            .map_err(|_| de::Error::custom("step map must contain all ten steps"))
    }
}

/// Numeric tuning for the shade (600–900) region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadeTuning {
    /// Upper bound on the darkening ratio; `(i + 1) / 4` is capped here.
    pub ratio_cap: f64,
    /// Lightness multiplier: `l' = l * (1 - ratio * lightness_factor)`.
    pub lightness_factor: f64,
    /// Ratios above this threshold boost saturation instead of reducing it.
    pub boost_threshold: f64,
    /// Saturation gain per unit of ratio above the threshold.
    pub boost_factor: f64,
    /// Saturation loss per unit of ratio at or below the threshold.
    pub desaturation_factor: f64,
}

impl Default for ShadeTuning {
    fn default() -> Self {
        Self {
            ratio_cap: 0.85,
            lightness_factor: 0.85,
            boost_threshold: 0.6,
            boost_factor: 0.5,
            desaturation_factor: 0.2,
        }
    }
}

/// Generates family scales with a fixed [`ShadeTuning`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaleGenerator {
    tuning: ShadeTuning,
}

impl ScaleGenerator {
    /// Construct a generator with explicit tuning.
    #[must_use]
    pub const fn new(tuning: ShadeTuning) -> Self {
        Self { tuning }
    }

    /// Tuning applied to shades.
    #[must_use]
    pub const fn tuning(&self) -> &ShadeTuning {
        &self.tuning
    }

    /// Produce the ten-step scale for `seed`.
    ///
    /// `black` is accepted for symmetry with `white`; shades are derived from
    /// the seed's own HSL lightness and never blend toward it.
    #[must_use]
    pub fn generate_family(&self, seed: Color, white: Color, black: Color) -> StepMap {
        let _ = black;
        let mut colors = [seed; 10];

        for (index, step) in (0_u8..).zip(Step::TINTS) {
            let ratio = f64::from(index) / 4.0;
            colors[step.index()] = white.mix(&seed, ratio);
        }

        colors[Step::S500.index()] = seed;

        let hsl = seed.to_hsl();
        for (index, step) in (1_u8..).zip(Step::SHADES) {
            let ratio = (f64::from(index) / 4.0).min(self.tuning.ratio_cap);
            colors[step.index()] = self.shade(hsl, ratio);
        }

        StepMap { colors }
    }

    fn shade(&self, hsl: Hsl, ratio: f64) -> Color {
        let tuning = &self.tuning;
        let lightness = hsl.lightness * (1.0 - ratio * tuning.lightness_factor);
        let saturation = if ratio > tuning.boost_threshold {
            (hsl.saturation * (1.0 + (ratio - tuning.boost_threshold) * tuning.boost_factor))
                .min(1.0)
        } else {
            hsl.saturation * (1.0 - ratio * tuning.desaturation_factor)
        };
        hsl_to_color(Hsl::new(hsl.hue, saturation, lightness))
    }
}

/// Produce a family scale with the default [`ShadeTuning`].
#[must_use]
pub fn generate_family(seed: Color, white: Color, black: Color) -> StepMap {
    ScaleGenerator::default().generate_family(seed, white, black)
}
