//! Symbol and box-drawing glyphs.
//!
//! Symbols are taken either from the Latin font or, with `jpdoc`, from the
//! Japanese font. Box-drawing glyphs of whichever font keeps them are
//! stretched into the line gap so they join across lines.

use std::ops::RangeInclusive;

use anyhow::Result;
use glyph_container::FontContainer;
use kanamono_font_metadata::VerticalMetrics;
use kurbo::Point;
use log::debug;

pub const BOX_DRAWING: RangeInclusive<u32> = 0x2500..=0x259F;

/// Latin symbols replaced by their Japanese forms with `jpdoc`.
pub const JPDOC_SYMBOLS: &[RangeInclusive<u32>] = &[
    0x00A7..=0x00A7,
    0x00B1..=0x00B1,
    0x00B6..=0x00B6,
    0x00F7..=0x00F7,
    0x00D7..=0x00D7,
    0x21D2..=0x21D2,
    0x21D4..=0x21D4,
    0x25A0..=0x25A1,
    0x25B2..=0x25B3,
    0x25BC..=0x25BD,
    0x25C6..=0x25C7,
    0x25CB..=0x25CB,
    0x25CE..=0x25CF,
    0x25E5..=0x25E5,
    0x25EF..=0x25EF,
    0x221A..=0x221A,
    0x221E..=0x221E,
    0x2010..=0x2010,
    0x2018..=0x201A,
    0x201C..=0x201E,
    0x2020..=0x2021,
    0x2026..=0x2026,
    0x2030..=0x2030,
    0x2190..=0x2194,
    0x2200..=0x2200,
    0x2202..=0x2203,
    0x2208..=0x2208,
    0x220B..=0x220B,
    0x2211..=0x2211,
    0x2225..=0x2225,
    0x2227..=0x222C,
    0x2260..=0x2261,
    0x2282..=0x2283,
    0x2286..=0x2287,
    BOX_DRAWING,
];

/// Latin glyphs reaching beyond these are taller than the Japanese line.
const SYMBOL_LIMIT_TOP: f64 = 980.0;
const SYMBOL_LIMIT_BOTTOM: f64 = -220.0;

/// Points above this move up into the ascent gap.
const STRETCH_THRESHOLD_TOP: f64 = 600.0;
/// Points below this move down into the descent gap.
const STRETCH_THRESHOLD_BOTTOM: f64 = 200.0;
/// Points this close to either side snap to the edge of the cell.
const STRETCH_SIDE_MARGIN: f64 = 200.0;

fn is_block_element_name(name: &str) -> bool {
    name.starts_with("uni25") && name.len() == 7
}

/// Delete Latin glyphs that the Japanese font should provide.
///
/// A glyph goes when it is taller than the line, when its codepoint is one of
/// [`JPDOC_SYMBOLS`], or when it is named like a U+25xx glyph. Deleted glyphs
/// lose their outline and codepoints and are renamed `deleted_symbol_{n}`.
/// Returns the number deleted.
pub fn remove_jpdoc_symbols(latin: &mut FontContainer) -> Result<usize> {
    let mut count = 0;
    for index in 0..latin.len() {
        let glyph = latin.glyph(index)?;
        let too_tall = glyph
            .bounding_box()
            .is_some_and(|bbox| bbox.y1 > SYMBOL_LIMIT_TOP || bbox.y0 < SYMBOL_LIMIT_BOTTOM);
        let listed = glyph
            .codepoint
            .is_some_and(|cp| JPDOC_SYMBOLS.iter().any(|range| range.contains(&cp)));

        if too_tall || listed || is_block_element_name(&glyph.name) {
            latin.clear(index)?;
            latin.rename(index, format!("deleted_symbol_{count}"))?;
            count += 1;
        }
    }
    debug!("Removed {count} Latin symbols");
    Ok(count)
}

/// Stretch box-drawing glyphs to the full line height and cell width.
///
/// Returns the number of glyphs touched.
pub fn extend_box_drawing(font: &mut FontContainer, metrics: &VerticalMetrics) -> Result<usize> {
    let move_up = f64::from(metrics.os2_ascent - metrics.em_ascent);
    let move_down = f64::from(metrics.os2_descent - metrics.em_descent);

    let selected = font.select_range(BOX_DRAWING);
    for &index in &selected {
        font.map_points(index, |p, width| {
            let width = f64::from(width);
            let y = if p.y > STRETCH_THRESHOLD_TOP {
                p.y + move_up
            } else if p.y < STRETCH_THRESHOLD_BOTTOM {
                p.y - move_down
            } else {
                p.y
            };
            let x = if p.x < STRETCH_SIDE_MARGIN {
                0.0
            } else if p.x > width - STRETCH_SIDE_MARGIN {
                width
            } else {
                p.x
            };
            Point::new(x, y)
        })?;
    }
    debug!("Stretched {} box-drawing glyphs", selected.len());
    Ok(selected.len())
}
