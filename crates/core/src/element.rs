use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntegralError;

/// Sample element type of a [`Grid`](crate::Grid).
///
/// Only [`ElementType::U8`], [`ElementType::U16`] and [`ElementType::I16`]
/// can be transformed; the remaining variants describe grids a provider may
/// hand over but that are rejected at transform time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl ElementType {
    pub const ALL: [ElementType; 7] = [
        ElementType::U8,
        ElementType::I8,
        ElementType::U16,
        ElementType::I16,
        ElementType::I32,
        ElementType::F32,
        ElementType::F64,
    ];

    /// Whether the prefix-sum transform accepts this element type.
    pub fn is_supported(self) -> bool {
        matches!(self, ElementType::U8 | ElementType::U16 | ElementType::I16)
    }

    /// Tag used in the header line of grid text files.
    pub fn tag(self) -> &'static str {
        match self {
            ElementType::U8 => "CV_8U",
            ElementType::I8 => "CV_8S",
            ElementType::U16 => "CV_16U",
            ElementType::I16 => "CV_16S",
            ElementType::I32 => "CV_32S",
            ElementType::F32 => "CV_32F",
            ElementType::F64 => "CV_64F",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            ElementType::U8 => "u8",
            ElementType::I8 => "i8",
            ElementType::U16 => "u16",
            ElementType::I16 => "i16",
            ElementType::I32 => "i32",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for ElementType {
    type Err = IntegralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ElementType::ALL
            .into_iter()
            .find(|t| t.tag() == s || t.short_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| IntegralError::UnknownElementType(s.to_string()))
    }
}
