//! Id newtypes so source and merged glyph ids cannot be mixed up.

use std::fmt;

macro_rules! u16_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u16);

        impl $name {
            pub const fn new(id: u16) -> Self {
                Self(id)
            }

            pub const fn to_u16(self) -> u16 {
                self.0
            }

            pub const fn to_u32(self) -> u32 {
                self.0 as u32
            }
        }

        impl From<u16> for $name {
            fn from(id: u16) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $label, self.0)
            }
        }
    };
}

u16_id!(
    /// A glyph id inside one of the fonts being merged
    GlyphId,
    "GID"
);

u16_id!(
    /// A glyph id in the merged font
    MegaGlyphId,
    "MGID"
);

/// Position of a font in the merge order
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontIndex(pub usize);

impl FontIndex {
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// The first font provides every table that is not merged.
    pub const fn is_primary(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for FontIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Font[{}]", self.0)
    }
}

/// A Unicode codepoint
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codepoint(pub u32);

impl Codepoint {
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}
