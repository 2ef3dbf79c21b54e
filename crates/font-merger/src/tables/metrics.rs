//! hmtx, vhea and vmtx merging
//!
//! Metrics are written one long metric per glyph in merged order.

use font_types::{BigEndian, FWord, UfWord};
use read_fonts::{TableProvider, tables::hmtx::LongMetric as ReadMetric};
use write_fonts::tables::{
    hmtx::{Hmtx, LongMetric},
    vhea::Vhea,
    vmtx::Vmtx,
};

use crate::{
    Result,
    context::MergeContext,
    strategies::{first, max, min},
};

pub fn merge_hmtx(ctx: &MergeContext) -> Result<Hmtx> {
    let mut h_metrics = Vec::with_capacity(ctx.total_glyphs() as usize);
    for (font_idx, font) in ctx.indexed_fonts() {
        let hmtx = font.hmtx()?;
        for gid in ctx.source_glyphs(font_idx) {
            h_metrics.push(metric(hmtx.h_metrics(), hmtx.left_side_bearings(), gid.to_u16()));
        }
    }
    Ok(Hmtx { h_metrics, left_side_bearings: Vec::new() })
}

/// Merge vertical metrics; `None` unless every font has both vhea and vmtx.
pub fn merge_vertical(ctx: &MergeContext) -> Result<Option<(Vhea, Vmtx)>> {
    let (Ok(heads), Ok(metrics)) = (ctx.tables(|f| f.vhea()), ctx.tables(|f| f.vmtx())) else {
        return Ok(None);
    };

    let mut v_metrics = Vec::with_capacity(ctx.total_glyphs() as usize);
    for ((font_idx, _), vmtx) in ctx.indexed_fonts().zip(&metrics) {
        for gid in ctx.source_glyphs(font_idx) {
            v_metrics.push(metric(vmtx.v_metrics(), vmtx.top_side_bearings(), gid.to_u16()));
        }
    }

    let primary = first(&heads)?;
    let vhea = Vhea {
        ascender: FWord::new(max(heads.iter().map(|t| t.ascender().to_i16()))?),
        descender: FWord::new(min(heads.iter().map(|t| t.descender().to_i16()))?),
        line_gap: FWord::new(max(heads.iter().map(|t| t.line_gap().to_i16()))?),
        advance_height_max: UfWord::new(max(
            heads.iter().map(|t| t.advance_height_max().to_u16()),
        )?),
        min_top_side_bearing: FWord::new(min(
            heads.iter().map(|t| t.min_top_side_bearing().to_i16()),
        )?),
        min_bottom_side_bearing: FWord::new(min(
            heads.iter().map(|t| t.min_bottom_side_bearing().to_i16()),
        )?),
        y_max_extent: FWord::new(max(heads.iter().map(|t| t.y_max_extent().to_i16()))?),
        caret_slope_rise: primary.caret_slope_rise(),
        caret_slope_run: primary.caret_slope_run(),
        caret_offset: primary.caret_offset(),
        number_of_long_ver_metrics: ctx.total_glyphs(),
    };
    Ok(Some((vhea, Vmtx { v_metrics, top_side_bearings: Vec::new() })))
}

/// Advance and side bearing of a glyph. Glyphs past the long metrics reuse
/// the last advance.
fn metric(long: &[ReadMetric], bearings: &[BigEndian<i16>], gid: u16) -> LongMetric {
    let gid = usize::from(gid);
    match long.get(gid) {
        Some(m) => LongMetric { advance: m.advance.get(), side_bearing: m.side_bearing.get() },
        None => LongMetric {
            advance: long.last().map(|m| m.advance.get()).unwrap_or(0),
            side_bearing: bearings
                .get(gid - long.len())
                .map(BigEndian::get)
                .unwrap_or(0),
        },
    }
}
