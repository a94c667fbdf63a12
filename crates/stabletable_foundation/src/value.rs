//! Type-erased cell values and their text form.
//!
//! Packed storage never holds [`CellValue`]s; it keeps one strongly typed
//! array per column. `CellValue` exists for the boundaries that must treat
//! every kind uniformly: text interchange, sorting, and debugging output.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Bounds, BoundsI, Color, Quaternion, Rect, RectI, Vec2, Vec2I, Vec3, Vec3I, Vec4};
use crate::types::ColumnType;

/// 128-bit hash value. Text form is 32 lowercase hex digits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hash128(pub u128);

/// Integer value of an enumeration. Text form is the integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumValue(pub i32);

/// Reference to an external asset by path. The empty path is the null reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectRef {
    /// Asset path of the referenced object.
    pub path: String,
}

impl ObjectRef {
    /// Creates a reference to the asset at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Returns true if this is the null reference.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.path.is_empty()
    }
}

/// Conversion between a value and its interchange text.
///
/// Parsing trims surrounding whitespace for every kind except `String`,
/// `Char`, and `ObjectRef`, which keep their text verbatim.
pub trait TextForm: Sized {
    /// Parses `text` into a value.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is not a valid value of this kind.
    fn parse_text(text: &str) -> Result<Self>;

    /// Writes the text form of this value.
    ///
    /// # Errors
    ///
    /// Propagates formatter errors.
    fn write_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! text_form_via_from_str {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl TextForm for $ty {
                fn parse_text(text: &str) -> Result<Self> {
                    <$ty as FromStr>::from_str(text.trim())
                        .map_err(|_| Error::parse(ColumnType::$kind, text))
                }

                fn write_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(self, f)
                }
            }
        )+
    };
}

text_form_via_from_str!(
    i8 => I8, u8 => U8, i16 => I16, u16 => U16, i32 => I32, u32 => U32,
    i64 => I64, u64 => U64, f32 => F32, f64 => F64,
    Vec2 => Vec2, Vec3 => Vec3, Vec4 => Vec4, Vec2I => Vec2I, Vec3I => Vec3I,
    Quaternion => Quaternion, Rect => Rect, RectI => RectI, Color => Color,
    Bounds => Bounds, BoundsI => BoundsI,
);

impl TextForm for String {
    fn parse_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl TextForm for char {
    fn parse_text(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok('\0'),
            (Some(c), None) => Ok(c),
            _ => Err(Error::parse(ColumnType::Char, text)),
        }
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == '\0' {
            Ok(())
        } else {
            write!(f, "{self}")
        }
    }
}

impl TextForm for bool {
    fn parse_text(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
            Ok(false)
        } else {
            Err(Error::parse(ColumnType::Bool, text))
        }
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl TextForm for Hash128 {
    fn parse_text(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.len() > 32 {
            return Err(Error::parse(ColumnType::Hash128, text));
        }
        u128::from_str_radix(trimmed, 16)
            .map(Hash128)
            .map_err(|_| Error::parse(ColumnType::Hash128, text))
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl TextForm for EnumValue {
    fn parse_text(text: &str) -> Result<Self> {
        text.trim()
            .parse()
            .map(EnumValue)
            .map_err(|_| Error::parse(ColumnType::Enum, text))
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TextForm for ObjectRef {
    fn parse_text(text: &str) -> Result<Self> {
        Ok(Self::new(text))
    }

    fn write_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

macro_rules! cell_value {
    ($($kind:ident($ty:ty)),+ $(,)?) => {
        /// A single cell of any supported kind.
        #[derive(Clone, Debug, PartialEq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[allow(missing_docs)]
        pub enum CellValue {
            $($kind($ty)),+
        }

        impl CellValue {
            /// Returns the kind of this value.
            #[must_use]
            pub const fn column_type(&self) -> ColumnType {
                match self {
                    $(Self::$kind(_) => ColumnType::$kind),+
                }
            }

            /// Returns the default value of the given kind.
            #[must_use]
            pub fn default_for(ty: ColumnType) -> Self {
                match ty {
                    $(ColumnType::$kind => Self::$kind(<$ty>::default())),+
                }
            }

            /// Parses interchange text as a value of the given kind.
            ///
            /// Empty (or all-whitespace) text parses to the kind's default value,
            /// except for the verbatim kinds `String`, `Char` and `ObjectRef`.
            ///
            /// # Errors
            ///
            /// Returns a parse error if the text is not a valid value of `ty`.
            pub fn parse(ty: ColumnType, text: &str) -> Result<Self> {
                let verbatim = matches!(
                    ty,
                    ColumnType::String | ColumnType::Char | ColumnType::ObjectRef
                );
                if !verbatim && text.trim().is_empty() {
                    return Ok(Self::default_for(ty));
                }
                match ty {
                    $(ColumnType::$kind => <$ty as TextForm>::parse_text(text).map(Self::$kind)),+
                }
            }
        }

        impl fmt::Display for CellValue {
            /// Writes the interchange text form.
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$kind(v) => v.write_text(f)),+
                }
            }
        }

        $(
            impl From<$ty> for CellValue {
                fn from(v: $ty) -> Self {
                    Self::$kind(v)
                }
            }
        )+
    };
}

cell_value!(
    String(String),
    Char(char),
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Vec2I(Vec2I),
    Vec3I(Vec3I),
    Quaternion(Quaternion),
    Rect(Rect),
    RectI(RectI),
    Color(Color),
    Bounds(Bounds),
    BoundsI(BoundsI),
    Hash128(Hash128),
    Enum(EnumValue),
    ObjectRef(ObjectRef),
);

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl CellValue {
    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an integer of any integer kind, widened to `i128`.
    #[must_use]
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::I8(n) => Some(i128::from(*n)),
            Self::U8(n) => Some(i128::from(*n)),
            Self::I16(n) => Some(i128::from(*n)),
            Self::U16(n) => Some(i128::from(*n)),
            Self::I32(n) => Some(i128::from(*n)),
            Self::U32(n) => Some(i128::from(*n)),
            Self::I64(n) => Some(i128::from(*n)),
            Self::U64(n) => Some(i128::from(*n)),
            Self::Enum(e) => Some(i128::from(e.0)),
            _ => None,
        }
    }

    /// Attempts to extract a floating point number.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::F32(n) => Some(f64::from(*n)),
            Self::F64(n) => Some(*n),
            _ => None,
        }
    }
}
