//! Collections, variables, and values held by a variable store.
//!
//! # Design
//! - Mirrors a design tool's variable graph: collections own modes, variables
//!   hold one value per mode.
//! - The first mode of a collection is its default; reconciliation only
//!   touches that mode.
//! - Color values are unit-interval RGBA; [`Rgba`] bridges to [`Color`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tonal_core::Color;
use uuid::Uuid;

/// A named value mode within a collection (e.g. light/dark).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    /// Mode identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// A named namespace of variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCollection {
    /// Collection identifier.
    pub id: Uuid,
    /// Display name, used for lookup.
    pub name: String,
    /// Modes declared by the collection; the first is the default.
    pub modes: Vec<Mode>,
}

impl VariableCollection {
    /// New collection with a single default mode.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            modes: vec![Mode {
                id: Uuid::new_v4(),
                name: "Mode 1".to_string(),
            }],
        }
    }

    /// Mode that reads and writes target.
    #[must_use]
    pub fn default_mode(&self) -> Option<&Mode> {
        self.modes.first()
    }
}

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    /// RGBA color.
    Color,
    /// Floating-point number.
    Float,
    /// Text.
    String,
    /// Boolean flag.
    Boolean,
}

/// Unit-interval RGBA color as stored by design tools.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel. [0.0, 1.0]
    pub r: f64,
    /// Green channel. [0.0, 1.0]
    pub g: f64,
    /// Blue channel. [0.0, 1.0]
    pub b: f64,
    /// Alpha channel. [0.0, 1.0]
    #[serde(default = "opaque")]
    pub a: f64,
}

const fn opaque() -> f64 {
    1.0
}

impl Rgba {
    /// Nearest 24-bit color; alpha is discarded.
    #[must_use]
    pub fn to_color(self) -> Color {
        Color::from_unit_rgb(self.r, self.g, self.b)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let [r, g, b] = color.to_unit_rgb();
        Self { r, g, b, a: 1.0 }
    }
}

/// Value held by a variable for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum VariableValue {
    /// Color value.
    Color(Rgba),
    /// Numeric value.
    Float(f64),
    /// Text value.
    String(String),
    /// Boolean value.
    Boolean(bool),
    /// Reference to another variable.
    Alias {
        /// Referenced variable identifier.
        id: Uuid,
    },
}

impl VariableValue {
    /// Type carried by a literal value; aliases have none of their own.
    #[must_use]
    pub const fn resolved_type(&self) -> Option<VariableType> {
        match self {
            Self::Color(_) => Some(VariableType::Color),
            Self::Float(_) => Some(VariableType::Float),
            Self::String(_) => Some(VariableType::String),
            Self::Boolean(_) => Some(VariableType::Boolean),
            Self::Alias { .. } => None,
        }
    }

    /// Literal color, if this value is one.
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(rgba) => Some(rgba.to_color()),
            _ => None,
        }
    }
}

impl From<Color> for VariableValue {
    fn from(color: Color) -> Self {
        Self::Color(Rgba::from(color))
    }
}

/// A named, typed variable with per-mode values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable identifier.
    pub id: Uuid,
    /// Slash-separated name (e.g. `brand/600`).
    pub name: String,
    /// Owning collection.
    pub collection_id: Uuid,
    /// Declared type.
    pub resolved_type: VariableType,
    /// Values keyed by mode identifier.
    #[serde(default)]
    pub values_by_mode: BTreeMap<Uuid, VariableValue>,
}

impl Variable {
    /// Value stored for `mode_id`.
    #[must_use]
    pub fn value_in(&self, mode_id: Uuid) -> Option<&VariableValue> {
        self.values_by_mode.get(&mode_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_bridges_unit_floats_and_hex() {
        let color = Color::new(0x6B, 0x72, 0x80);
        let rgba = Rgba::from(color);
        assert!((rgba.a - 1.0).abs() < f64::EPSILON);
        assert_eq!(rgba.to_color(), color);

        let host = Rgba {
            r: 0.419_607_8,
            g: 0.447_058_8,
            b: 0.501_960_8,
            a: 1.0,
        };
        assert_eq!(host.to_color().to_hex(), "6B7280");
    }

    #[test]
    fn values_serialize_with_type_tags() -> Result<(), serde_json::Error> {
        let value = VariableValue::from(Color::WHITE);
        let json = serde_json::to_value(&value)?;
        assert_eq!(json["type"], "color");
        assert_eq!(json["value"]["r"], 1.0);

        let alias: VariableValue = serde_json::from_value(serde_json::json!({
            "type": "alias",
            "value": {"id": "00000000-0000-0000-0000-000000000001"}
        }))?;
        assert_eq!(alias.resolved_type(), None);
        assert_eq!(alias.as_color(), None);
        Ok(())
    }

    #[test]
    fn new_collection_has_a_default_mode() {
        let collection = VariableCollection::new("Colors");
        assert_eq!(collection.modes.len(), 1);
        assert_eq!(
            collection.default_mode().map(|mode| mode.name.as_str()),
            Some("Mode 1")
        );
    }
}
