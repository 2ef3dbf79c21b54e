use font_types::Version16Dot16;
use read_fonts::{TableProvider, tables::maxp::Maxp as ReadMaxp};
use write_fonts::tables::maxp::Maxp;

use crate::{
    Result,
    context::MergeContext,
    strategies::{first, max},
};

/// Merge maxp. Limits that size the glyph set take the maximum; hinting
/// program limits follow the first font, whose programs are kept.
pub fn merge_maxp(ctx: &MergeContext) -> Result<Maxp> {
    let tables = ctx.tables(|f| f.maxp())?;
    let num_glyphs = ctx.total_glyphs();

    if first(&tables)?.version() != Version16Dot16::VERSION_1_0 {
        return Ok(Maxp {
            num_glyphs,
            max_points: None,
            max_contours: None,
            max_composite_points: None,
            max_composite_contours: None,
            max_zones: None,
            max_twilight_points: None,
            max_storage: None,
            max_function_defs: None,
            max_instruction_defs: None,
            max_stack_elements: None,
            max_size_of_instructions: None,
            max_component_elements: None,
            max_component_depth: None,
        });
    }

    let largest = |field: fn(&ReadMaxp) -> Option<u16>| {
        max(tables.iter().map(|t| field(t).unwrap_or(0))).map(Some)
    };
    let primary = |field: fn(&ReadMaxp) -> Option<u16>| {
        first(tables.iter().map(|t| field(t).unwrap_or(0))).map(Some)
    };

    Ok(Maxp {
        num_glyphs,
        max_points: largest(|t| t.max_points())?,
        max_contours: largest(|t| t.max_contours())?,
        max_composite_points: largest(|t| t.max_composite_points())?,
        max_composite_contours: largest(|t| t.max_composite_contours())?,
        max_zones: largest(|t| t.max_zones())?,
        max_twilight_points: largest(|t| t.max_twilight_points())?,
        max_storage: primary(|t| t.max_storage())?,
        max_function_defs: primary(|t| t.max_function_defs())?,
        max_instruction_defs: primary(|t| t.max_instruction_defs())?,
        max_stack_elements: largest(|t| t.max_stack_elements())?,
        max_size_of_instructions: primary(|t| t.max_size_of_instructions())?,
        max_component_elements: largest(|t| t.max_component_elements())?,
        max_component_depth: largest(|t| t.max_component_depth())?,
    })
}
