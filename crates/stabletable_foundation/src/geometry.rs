//! Small geometric value kinds.
//!
//! These are plain `Copy` structs. Their text form is their components in
//! declaration order, separated by commas (`"1,2.5,-3"` for a [`Vec3`]).

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ColumnType;

/// Parses exactly `N` comma-separated components.
pub(crate) fn parse_components<T, const N: usize>(text: &str, ty: ColumnType) -> Result<[T; N]>
where
    T: FromStr + Default + Copy,
{
    let mut out = [T::default(); N];
    let mut parts = text.split(',');
    for slot in &mut out {
        let part = parts.next().ok_or_else(|| Error::parse(ty, text))?;
        *slot = part.trim().parse().map_err(|_| Error::parse(ty, text))?;
    }
    if parts.next().is_some() {
        return Err(Error::parse(ty, text));
    }
    Ok(out)
}

fn write_components<T: fmt::Display>(f: &mut fmt::Formatter<'_>, parts: &[T]) -> fmt::Result {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{part}")?;
    }
    Ok(())
}

macro_rules! flat_components {
    ($(#[$meta:meta])* $name:ident: $scalar:ty, $kind:ident, $n:literal, [$($field:ident),+], [$($derive:ident),*]) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, $($derive),*)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name {
            $(
                #[allow(missing_docs)]
                pub $field: $scalar,
            )+
        }

        impl $name {
            /// Creates a value from its components.
            #[must_use]
            pub const fn new($($field: $scalar),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_components(f, &[$(self.$field),+])
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let [$($field),+] = parse_components::<$scalar, $n>(s, ColumnType::$kind)?;
                Ok(Self { $($field),+ })
            }
        }
    };
}

flat_components!(
    /// Two-component float vector.
    Vec2: f32, Vec2, 2, [x, y], [Default]
);
flat_components!(
    /// Three-component float vector.
    Vec3: f32, Vec3, 3, [x, y, z], [Default]
);
flat_components!(
    /// Four-component float vector.
    Vec4: f32, Vec4, 4, [x, y, z, w], [Default]
);
flat_components!(
    /// Two-component integer vector.
    Vec2I: i32, Vec2I, 2, [x, y], [Default, Eq, Hash]
);
flat_components!(
    /// Three-component integer vector.
    Vec3I: i32, Vec3I, 3, [x, y, z], [Default, Eq, Hash]
);
flat_components!(
    /// Rotation quaternion. Defaults to the identity rotation.
    Quaternion: f32, Quaternion, 4, [x, y, z, w], []
);
flat_components!(
    /// Float rectangle given by its origin and size.
    Rect: f32, Rect, 4, [x, y, width, height], [Default]
);
flat_components!(
    /// Integer rectangle given by its origin and size.
    RectI: i32, RectI, 4, [x, y, width, height], [Default, Eq, Hash]
);
flat_components!(
    /// Linear RGBA color.
    Color: f32, Color, 4, [r, g, b, a], [Default]
);

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Float axis-aligned bounding box given by its center and size.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Center of the box.
    pub center: Vec3,
    /// Full extent of the box along each axis.
    pub size: Vec3,
}

impl Bounds {
    /// Creates bounds from a center and size.
    #[must_use]
    pub const fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.center, self.size)
    }
}

impl FromStr for Bounds {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let [cx, cy, cz, sx, sy, sz] = parse_components::<f32, 6>(s, ColumnType::Bounds)?;
        Ok(Self::new(Vec3::new(cx, cy, cz), Vec3::new(sx, sy, sz)))
    }
}

/// Integer axis-aligned bounding box given by its minimum corner and size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundsI {
    /// Minimum corner of the box.
    pub position: Vec3I,
    /// Extent of the box along each axis.
    pub size: Vec3I,
}

impl BoundsI {
    /// Creates bounds from a minimum corner and size.
    #[must_use]
    pub const fn new(position: Vec3I, size: Vec3I) -> Self {
        Self { position, size }
    }
}

impl fmt::Display for BoundsI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.position, self.size)
    }
}

impl FromStr for BoundsI {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let [px, py, pz, sx, sy, sz] = parse_components::<i32, 6>(s, ColumnType::BoundsI)?;
        Ok(Self::new(Vec3I::new(px, py, pz), Vec3I::new(sx, sy, sz)))
    }
}
