//! Options of an assemble run.

use kanamono_font_metadata::Style;
use log::warn;

use crate::config::BuildConfig;

pub const DEFAULT_REGULAR_WEIGHT: u16 = 400;
pub const DEFAULT_BOLD_WEIGHT: u16 = 700;

#[derive(Debug, Clone, PartialEq)]
pub struct AssembleOptions {
    /// Keep an existing build directory instead of recreating it.
    pub keep_build_dir: bool,
    pub invisible_zenkaku_space: bool,
    pub half_width: bool,
    pub jpdoc: bool,
    pub nerd_font: bool,
    pub regular_weight: u16,
    pub bold_weight: u16,
    pub line_height: Option<f64>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            keep_build_dir: false,
            invisible_zenkaku_space: false,
            half_width: false,
            jpdoc: false,
            nerd_font: false,
            regular_weight: DEFAULT_REGULAR_WEIGHT,
            bold_weight: DEFAULT_BOLD_WEIGHT,
            line_height: None,
        }
    }
}

impl AssembleOptions {
    /// Token inserted between the font name and the style in every name.
    pub fn token(&self, config: &BuildConfig) -> String {
        let mut token = if self.half_width {
            config.half_width_str.clone()
        } else {
            config.full_width_35_str.clone()
        };
        if self.invisible_zenkaku_space {
            token.push_str(&config.invisible_zenkaku_space_str);
        }
        if self.jpdoc {
            token.push_str(&config.jpdoc_str);
        }
        if self.nerd_font {
            token.push_str(&config.nerd_fonts_str);
        }
        token
    }

    pub fn weight_class(&self, style: Style) -> u16 {
        if style.is_bold() { self.bold_weight } else { self.regular_weight }
    }
}

/// Parse a weight given on the command line. Anything but plain digits is
/// ignored.
pub fn parse_weight(value: &str) -> Option<u16> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        warn!("Ignoring weight '{value}'");
        return None;
    }
    value.parse().ok()
}

/// Parse a line height given on the command line. Unparseable or
/// non-positive values are ignored.
pub fn parse_line_height(value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(height) if height.is_finite() && height > 0.0 => Some(height),
        _ => {
            warn!("Ignoring line height '{value}'");
            None
        }
    }
}
