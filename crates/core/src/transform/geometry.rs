//! Em size, advance widths and cell placement.

use anyhow::{Context, Result, bail};
use glyph_container::FontContainer;
use kurbo::Affine;
use log::{debug, warn};

use crate::config::CellWidths;

const HIRAGANA_A: u32 = 0x3042;
const DIGIT_ZERO: u32 = 0x0030;

/// Fullwidth opening brackets: parenthesis, square bracket, curly bracket.
const OPENING_BRACKETS: [u32; 3] = [0xFF08, 0xFF3B, 0xFF5B];
const CLOSING_BRACKETS: [u32; 3] = [0xFF09, 0xFF3D, 0xFF5D];

/// Latin digits are scaled to this width before compression.
const COMPRESSED_DIGIT_WIDTH: f64 = 540.0;

/// Widths this far above the half cell still snap to it.
const HALF_WIDTH_TOLERANCE: i32 = 20;

pub fn normalize_em(font: &mut FontContainer, units_per_em: u16) {
    font.set_units_per_em(units_per_em);
}

/// Move fullwidth brackets towards the character they enclose.
///
/// The shift is a sixth of the width of U+3042, which also becomes the width
/// of every bracket.
pub fn center_brackets(japanese: &mut FontContainer) -> Result<()> {
    let full = japanese.width_of(HIRAGANA_A).context("Japanese font has no U+3042")?;
    let shift = (f64::from(full) / 6.0).round_ties_even();

    let moves = OPENING_BRACKETS.iter().map(|&cp| (cp, -shift));
    for (codepoint, dx) in moves.chain(CLOSING_BRACKETS.iter().map(|&cp| (cp, shift))) {
        let Some(index) = japanese.lookup(codepoint) else {
            warn!("Japanese font has no U+{codepoint:04X}");
            continue;
        };
        japanese.translate(index, dx, 0.0)?;
        japanese.set_width(index, full)?;
    }
    Ok(())
}

/// Snap every advance to the half or the full cell, centering the outline.
pub fn quantize_widths(japanese: &mut FontContainer, cells: CellWidths) -> Result<()> {
    let half = cells.half_width_35;
    let full = cells.full_width_35;

    let mut changed = 0;
    for index in 0..japanese.len() {
        let width = japanese.glyph(index)?.width;
        let target = if width > 0 && width <= half + HALF_WIDTH_TOLERANCE {
            half
        } else if width > half && width < full {
            full
        } else {
            continue;
        };
        if target == width {
            continue;
        }
        japanese.translate(index, f64::from(target - width) / 2.0, 0.0)?;
        japanese.set_width(index, target)?;
        changed += 1;
    }
    debug!("Quantized {changed} Japanese widths");
    Ok(())
}

/// Compress both fonts so a Japanese character is exactly two Latin cells.
///
/// Latin glyphs are narrowed by the ratio that brings the digit zero to
/// 540 units and placed in a whole number of `half_width_12` cells. Japanese
/// glyphs on the half or the full cell are recentered on one or two of them.
pub fn compress_half_width(
    latin: &mut FontContainer,
    japanese: &mut FontContainer,
    cells: CellWidths,
) -> Result<()> {
    let digit = latin.width_of(DIGIT_ZERO).context("Latin font has no U+0030")?;
    if digit <= 0 {
        bail!("Latin U+0030 has no advance width");
    }
    let x_scale = COMPRESSED_DIGIT_WIDTH / f64::from(digit);
    let cell = cells.half_width_12;

    for index in 0..latin.len() {
        let width = latin.glyph(index)?.width;
        if width <= 0 {
            continue;
        }
        let cells_spanned =
            (f64::from(width) / f64::from(cells.half_width_35)).round_ties_even() as i32;
        let target = cell * cells_spanned;
        let scaled = f64::from(width) * x_scale;
        latin.transform(index, Affine::scale_non_uniform(x_scale, 1.0))?;
        latin.translate(index, (f64::from(target) - scaled) / 2.0, 0.0)?;
        latin.set_width(index, target)?;
    }

    for index in 0..japanese.len() {
        let width = japanese.glyph(index)?.width;
        let target = if width == cells.half_width_35 {
            cell
        } else if width == cells.full_width_35 {
            cell * 2
        } else {
            continue;
        };
        japanese.translate(index, f64::from(target - width) / 2.0, 0.0)?;
        japanese.set_width(index, target)?;
    }
    Ok(())
}
