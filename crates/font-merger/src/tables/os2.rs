//! OS/2 table merging
//!
//! Descriptive fields come from the first font. Vertical metrics take the
//! extremes, and Unicode and code page coverage is the union of all fonts.

use read_fonts::{TableProvider, tables::os2::Os2 as ReadOs2};
use write_fonts::tables::os2::{Os2, SelectionFlags};

use crate::{
    Result,
    context::MergeContext,
    strategies::{Bit, first, max, merge_bits, min, union_bits},
};

use Bit::{All, Any, First};

const FS_SELECTION: [Bit; 16] = [
    All, // italic
    Any, Any, Any, Any, // underscore, negative, outlined, strikeout
    All, All, All, All, All, // bold, regular, typo metrics, wws, oblique
    First, First, First, First, First, First,
];

/// Merge OS/2; `None` unless every font has one.
pub fn merge_os2(ctx: &MergeContext) -> Result<Option<Os2>> {
    let tables: Vec<ReadOs2> = ctx.fonts().iter().filter_map(|f| f.os2().ok()).collect();
    if tables.len() != ctx.fonts().len() {
        return Ok(None);
    }
    let primary = first(&tables)?;
    let version = max(tables.iter().map(|t| t.version()))?;
    let selection: Vec<u16> = tables.iter().map(|t| t.fs_selection().bits()).collect();

    let since = |min_version: u16, value: u16| (version >= min_version).then_some(value);
    let code_page = |field: fn(&ReadOs2) -> Option<u32>| {
        (version >= 1).then(|| tables.iter().filter_map(field).fold(0, |acc, bits| acc | bits))
    };
    let tallest = |field: fn(&ReadOs2) -> Option<i16>| {
        (version >= 2).then(|| tables.iter().filter_map(field).max().unwrap_or(0))
    };

    Ok(Some(Os2 {
        x_avg_char_width: primary.x_avg_char_width(),
        us_weight_class: primary.us_weight_class(),
        us_width_class: primary.us_width_class(),
        fs_type: primary.fs_type(),
        y_subscript_x_size: primary.y_subscript_x_size(),
        y_subscript_y_size: primary.y_subscript_y_size(),
        y_subscript_x_offset: primary.y_subscript_x_offset(),
        y_subscript_y_offset: primary.y_subscript_y_offset(),
        y_superscript_x_size: primary.y_superscript_x_size(),
        y_superscript_y_size: primary.y_superscript_y_size(),
        y_superscript_x_offset: primary.y_superscript_x_offset(),
        y_superscript_y_offset: primary.y_superscript_y_offset(),
        y_strikeout_size: primary.y_strikeout_size(),
        y_strikeout_position: primary.y_strikeout_position(),
        s_family_class: primary.s_family_class(),
        panose_10: primary.panose_10().try_into().unwrap_or([0; 10]),
        ul_unicode_range_1: union_bits(tables.iter().map(|t| t.ul_unicode_range_1()))?,
        ul_unicode_range_2: union_bits(tables.iter().map(|t| t.ul_unicode_range_2()))?,
        ul_unicode_range_3: union_bits(tables.iter().map(|t| t.ul_unicode_range_3()))?,
        ul_unicode_range_4: union_bits(tables.iter().map(|t| t.ul_unicode_range_4()))?,
        ach_vend_id: primary.ach_vend_id(),
        fs_selection: SelectionFlags::from_bits_truncate(merge_bits(&selection, &FS_SELECTION)?),
        us_first_char_index: min(tables.iter().map(|t| t.us_first_char_index()))?,
        us_last_char_index: max(tables.iter().map(|t| t.us_last_char_index()))?,
        s_typo_ascender: max(tables.iter().map(|t| t.s_typo_ascender()))?,
        s_typo_descender: min(tables.iter().map(|t| t.s_typo_descender()))?,
        s_typo_line_gap: max(tables.iter().map(|t| t.s_typo_line_gap()))?,
        us_win_ascent: max(tables.iter().map(|t| t.us_win_ascent()))?,
        us_win_descent: max(tables.iter().map(|t| t.us_win_descent()))?,
        ul_code_page_range_1: code_page(|t| t.ul_code_page_range_1()),
        ul_code_page_range_2: code_page(|t| t.ul_code_page_range_2()),
        sx_height: tallest(|t| t.sx_height()),
        s_cap_height: tallest(|t| t.s_cap_height()),
        us_default_char: since(2, primary.us_default_char().unwrap_or(0)),
        us_break_char: since(2, primary.us_break_char().unwrap_or(0x20)),
        us_max_context: since(2, primary.us_max_context().unwrap_or(0)),
        us_lower_optical_point_size: since(
            5,
            primary.us_lower_optical_point_size().unwrap_or(0),
        ),
        us_upper_optical_point_size: since(
            5,
            primary.us_upper_optical_point_size().unwrap_or(0xFFFF),
        ),
    }))
}
