//! The closed set of value kinds a column can hold.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};

/// Value kind of a column.
///
/// Every column stores exactly one kind, and every kind maps to exactly one
/// Rust type in packed storage.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColumnType {
    /// UTF-8 text.
    String,
    /// A single Unicode scalar value.
    Char,
    /// Boolean.
    Bool,
    /// 8-bit signed integer.
    I8,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit signed integer.
    I16,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit signed integer.
    I32,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit signed integer.
    I64,
    /// 64-bit unsigned integer.
    U64,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
    /// Two-component float vector.
    Vec2,
    /// Three-component float vector.
    Vec3,
    /// Four-component float vector.
    Vec4,
    /// Two-component integer vector.
    Vec2I,
    /// Three-component integer vector.
    Vec3I,
    /// Rotation quaternion.
    Quaternion,
    /// Float rectangle.
    Rect,
    /// Integer rectangle.
    RectI,
    /// RGBA color.
    Color,
    /// Float axis-aligned bounding box.
    Bounds,
    /// Integer axis-aligned bounding box.
    BoundsI,
    /// 128-bit hash.
    Hash128,
    /// Integer-backed enumeration value.
    Enum,
    /// Reference to an external asset, constrained per column by a type name.
    ObjectRef,
}

impl ColumnType {
    /// Every supported kind, in declaration order.
    pub const ALL: [ColumnType; 27] = [
        Self::String,
        Self::Char,
        Self::Bool,
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::Vec2,
        Self::Vec3,
        Self::Vec4,
        Self::Vec2I,
        Self::Vec3I,
        Self::Quaternion,
        Self::Rect,
        Self::RectI,
        Self::Color,
        Self::Bounds,
        Self::BoundsI,
        Self::Hash128,
        Self::Enum,
        Self::ObjectRef,
    ];

    /// Returns the canonical lowercase name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Char => "char",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Vec2I => "vec2i",
            Self::Vec3I => "vec3i",
            Self::Quaternion => "quaternion",
            Self::Rect => "rect",
            Self::RectI => "recti",
            Self::Color => "color",
            Self::Bounds => "bounds",
            Self::BoundsI => "boundsi",
            Self::Hash128 => "hash128",
            Self::Enum => "enum",
            Self::ObjectRef => "object-ref",
        }
    }

    /// Returns true for the integer and floating point kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::U8
                | Self::I16
                | Self::U16
                | Self::I32
                | Self::U32
                | Self::I64
                | Self::U64
                | Self::F32
                | Self::F64
        )
    }

    /// Returns true for kinds made of several numeric components.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            Self::Vec2
                | Self::Vec3
                | Self::Vec4
                | Self::Vec2I
                | Self::Vec3I
                | Self::Quaternion
                | Self::Rect
                | Self::RectI
                | Self::Color
                | Self::Bounds
                | Self::BoundsI
        )
    }
}

impl fmt::Debug for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    /// Parses a kind name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::new(ErrorKind::UnknownColumnType(trimmed.to_string())))
    }
}
