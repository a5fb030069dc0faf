//! Error types for color parsing and palette shape checks.

use thiserror::Error;

/// Primary error type for core color operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Hex input was not exactly six hexadecimal digits.
    #[error("invalid color format")]
    InvalidColorFormat {
        /// Offending input as provided by the caller.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Numeric step did not name one of the ten canonical steps.
    #[error("unknown scale step")]
    UnknownStep {
        /// Step value provided by the caller.
        value: String,
    },
    /// Role name did not match any seed palette slot.
    #[error("unknown seed role")]
    UnknownRole {
        /// Role name provided by the caller.
        value: String,
    },
    /// A step map was built without one of the ten steps.
    #[error("step map missing step")]
    MissingStep {
        /// Value of the absent step.
        step: u16,
    },
    /// A serialized scale was missing one of the four families.
    #[error("color scale missing family")]
    MissingFamily {
        /// Name of the absent family.
        family: &'static str,
    },
}

/// Convenience alias for core color results.
pub type ColorResult<T> = Result<T, ColorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_stay_constant() {
        let err = ColorError::InvalidColorFormat {
            value: "12345".to_string(),
            reason: "length",
        };
        assert_eq!(err.to_string(), "invalid color format");
        assert_eq!(
            ColorError::MissingFamily { family: "gray" }.to_string(),
            "color scale missing family"
        );
        assert_eq!(
            ColorError::MissingStep { step: 50 }.to_string(),
            "step map missing step"
        );
    }
}
