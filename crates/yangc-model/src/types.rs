//! Built-in type definitions and numeric range arithmetic.
//!
//! The built-in numeric types form a fixed, enumerable family. Each
//! carries a canonical `[min, max]` pair and a canonical description
//! string; user restrictions narrow these bounds and never widen them.
//!
//! Bounds are `i128` so the full `uint64` range (up to
//! 18446744073709551615) is representable alongside signed minimums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A YANG built-in type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    String,
    Boolean,
}

impl BuiltinType {
    /// Look up a built-in type by its keyword-argument name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int8" => BuiltinType::Int8,
            "int16" => BuiltinType::Int16,
            "int32" => BuiltinType::Int32,
            "int64" => BuiltinType::Int64,
            "uint8" => BuiltinType::Uint8,
            "uint16" => BuiltinType::Uint16,
            "uint32" => BuiltinType::Uint32,
            "uint64" => BuiltinType::Uint64,
            "string" => BuiltinType::String,
            "boolean" => BuiltinType::Boolean,
            _ => return None,
        })
    }

    /// The type's local name as written in source.
    pub fn local_name(&self) -> &'static str {
        match self {
            BuiltinType::Int8 => "int8",
            BuiltinType::Int16 => "int16",
            BuiltinType::Int32 => "int32",
            BuiltinType::Int64 => "int64",
            BuiltinType::Uint8 => "uint8",
            BuiltinType::Uint16 => "uint16",
            BuiltinType::Uint32 => "uint32",
            BuiltinType::Uint64 => "uint64",
            BuiltinType::String => "string",
            BuiltinType::Boolean => "boolean",
        }
    }

    /// Canonical value range, for the numeric members of the family.
    pub fn numeric_range(&self) -> Option<NumericRange> {
        let (min, max) = match self {
            BuiltinType::Int8 => (i8::MIN as i128, i8::MAX as i128),
            BuiltinType::Int16 => (i16::MIN as i128, i16::MAX as i128),
            BuiltinType::Int32 => (i32::MIN as i128, i32::MAX as i128),
            BuiltinType::Int64 => (i64::MIN as i128, i64::MAX as i128),
            BuiltinType::Uint8 => (0, u8::MAX as i128),
            BuiltinType::Uint16 => (0, u16::MAX as i128),
            BuiltinType::Uint32 => (0, u32::MAX as i128),
            BuiltinType::Uint64 => (0, u64::MAX as i128),
            BuiltinType::String | BuiltinType::Boolean => return None,
        };
        Some(NumericRange { min, max })
    }

    /// Canonical description of the type.
    pub fn description(&self) -> String {
        match self.numeric_range() {
            Some(range) => format!(
                "{} represents integer values between {} and {}, inclusively.",
                self.local_name(),
                range.min,
                range.max
            ),
            None => match self {
                BuiltinType::String => {
                    "string represents human-readable character data.".to_string()
                }
                BuiltinType::Boolean => {
                    "boolean represents a true or false value.".to_string()
                }
                _ => unreachable!("numeric types have a range"),
            },
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local_name())
    }
}

/// An inclusive `[min, max]` value range.
///
/// Invariant: `min <= max`, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericRange {
    min: i128,
    max: i128,
}

impl NumericRange {
    /// Create a range, rejecting inverted bounds.
    pub fn new(min: i128, max: i128) -> Result<Self, RangeError> {
        if min > max {
            return Err(RangeError::InvertedBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Inclusive lower bound.
    pub fn min(&self) -> i128 {
        self.min
    }

    /// Inclusive upper bound.
    pub fn max(&self) -> i128 {
        self.max
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &NumericRange) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Narrow this range to `restriction`.
    ///
    /// A restriction whose bounds fall outside this range is a validation
    /// error, never silently clamped.
    pub fn narrow(&self, restriction: NumericRange) -> Result<NumericRange, RangeError> {
        if !self.contains(&restriction) {
            return Err(RangeError::OutsideBase {
                min: restriction.min,
                max: restriction.max,
                base: *self,
            });
        }
        Ok(restriction)
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Error raised by range construction or narrowing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// `min > max`.
    #[error("inverted range bounds {min}..{max}")]
    InvertedBounds { min: i128, max: i128 },
    /// Restriction bounds fall outside the base type's range.
    #[error("range {min}..{max} is outside base range {base}")]
    OutsideBase {
        min: i128,
        max: i128,
        base: NumericRange,
    },
}
