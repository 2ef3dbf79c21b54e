use font_types::{FWord, UfWord};
use read_fonts::TableProvider;
use write_fonts::tables::hhea::Hhea;

use crate::{
    Result,
    context::MergeContext,
    strategies::{first, max, min},
};

pub fn merge_hhea(ctx: &MergeContext, number_of_h_metrics: u16) -> Result<Hhea> {
    let tables = ctx.tables(|f| f.hhea())?;
    let primary = first(&tables)?;

    Ok(Hhea {
        ascender: FWord::new(max(tables.iter().map(|t| t.ascender().to_i16()))?),
        descender: FWord::new(min(tables.iter().map(|t| t.descender().to_i16()))?),
        line_gap: FWord::new(max(tables.iter().map(|t| t.line_gap().to_i16()))?),
        advance_width_max: UfWord::new(max(tables.iter().map(|t| t.advance_width_max().to_u16()))?),
        min_left_side_bearing: FWord::new(min(
            tables.iter().map(|t| t.min_left_side_bearing().to_i16()),
        )?),
        min_right_side_bearing: FWord::new(min(
            tables.iter().map(|t| t.min_right_side_bearing().to_i16()),
        )?),
        x_max_extent: FWord::new(max(tables.iter().map(|t| t.x_max_extent().to_i16()))?),
        caret_slope_rise: primary.caret_slope_rise(),
        caret_slope_run: primary.caret_slope_run(),
        caret_offset: primary.caret_offset(),
        number_of_h_metrics,
    })
}
