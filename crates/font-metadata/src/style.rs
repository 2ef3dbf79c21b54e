//! The four styles of the family and the flags each one carries.

use std::{fmt, str::FromStr};

use anyhow::{Error, bail};
use write_fonts::tables::{head::MacStyle, os2::SelectionFlags};

/// Caret slope (rise, run) for italic styles: 1000 * tan(9 deg) rounded.
const ITALIC_CARET_SLOPE: (i16, i16) = (1000, 158);
const UPRIGHT_CARET_SLOPE: (i16, i16) = (1, 0);

/// PANOSE for a monospaced sans; the weight digit is filled per style.
const PANOSE: [u8; 10] = [2, 11, 0, 9, 2, 2, 3, 2, 2, 7];
const PANOSE_WEIGHT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Regular, Style::Bold, Style::Italic, Style::BoldItalic];

    pub const fn name(self) -> &'static str {
        match self {
            Style::Regular => "Regular",
            Style::Bold => "Bold",
            Style::Italic => "Italic",
            Style::BoldItalic => "BoldItalic",
        }
    }

    pub const fn is_bold(self) -> bool {
        matches!(self, Style::Bold | Style::BoldItalic)
    }

    pub const fn is_italic(self) -> bool {
        matches!(self, Style::Italic | Style::BoldItalic)
    }

    pub fn mac_style(self) -> MacStyle {
        let mut flags = MacStyle::empty();
        if self.is_bold() {
            flags |= MacStyle::BOLD;
        }
        if self.is_italic() {
            flags |= MacStyle::ITALIC;
        }
        flags
    }

    /// fsSelection for the final font. USE_TYPO_METRICS is left off.
    pub fn fs_selection(self) -> SelectionFlags {
        match self {
            Style::Regular => SelectionFlags::REGULAR,
            Style::Bold => SelectionFlags::BOLD,
            Style::Italic => SelectionFlags::ITALIC,
            Style::BoldItalic => SelectionFlags::BOLD | SelectionFlags::ITALIC,
        }
    }

    pub fn panose(self) -> [u8; 10] {
        let mut panose = PANOSE;
        panose[PANOSE_WEIGHT] = if self.is_bold() { 8 } else { 5 };
        panose
    }

    /// hhea caret slope as (rise, run).
    pub const fn caret_slope(self) -> (i16, i16) {
        if self.is_italic() { ITALIC_CARET_SLOPE } else { UPRIGHT_CARET_SLOPE }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Style::ALL.into_iter().find(|style| style.name() == s) {
            Some(style) => Ok(style),
            None => bail!("Unknown style '{s}'. Expected Regular, Bold, Italic or BoldItalic."),
        }
    }
}
