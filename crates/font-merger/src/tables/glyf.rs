//! glyf/loca merging
//!
//! Per-glyph instructions survive only for the first font. They call into
//! the first font's `fpgm` and `cvt `, which are the only hinting programs
//! that reach the merged font.

use std::collections::HashSet;

use read_fonts::{
    TableProvider,
    tables::glyf::{Anchor as ReadAnchor, CurvePoint, Glyph as ReadGlyph},
};
use write_fonts::tables::{
    glyf::{
        Anchor, Bbox, Component, CompositeGlyph, Contour, Glyf, GlyfLocaBuilder, Glyph,
        SimpleGlyph, Transform,
    },
    loca::{Loca, LocaFormat},
};

use crate::{
    MergeError, Result,
    context::MergeContext,
    types::{FontIndex, GlyphId},
};

pub fn merge_glyf(ctx: &MergeContext) -> Result<(Glyf, Loca, LocaFormat)> {
    let mut glyphs: Vec<Glyph> = Vec::with_capacity(ctx.total_glyphs() as usize);

    for (font_idx, font) in ctx.indexed_fonts() {
        let glyf = font.glyf().map_err(|_| MergeError::NotTrueType(font_idx.as_usize()))?;
        let loca = font.loca(None)?;

        for gid in ctx.source_glyphs(font_idx) {
            let glyph = match loca.get_glyf(read_fonts::types::GlyphId::new(gid.to_u32()), &glyf) {
                Ok(Some(glyph)) => convert_glyph(ctx, font_idx, &glyph),
                _ => Glyph::Empty,
            };
            glyphs.push(glyph);
        }
    }

    // composites pointing at empty glyphs are rejected by OTS
    let empty: HashSet<u16> = glyphs
        .iter()
        .enumerate()
        .filter(|(_, g)| matches!(g, Glyph::Empty))
        .map(|(gid, _)| gid as u16)
        .collect();
    for glyph in &mut glyphs {
        if let Glyph::Composite(composite) = glyph
            && composite.components().iter().any(|c| empty.contains(&c.glyph.to_u16()))
        {
            *glyph = Glyph::Empty;
        }
    }

    let mut builder = GlyfLocaBuilder::new();
    for glyph in &glyphs {
        builder.add_glyph(glyph)?;
    }
    Ok(builder.build())
}

fn convert_glyph(ctx: &MergeContext, font_idx: FontIndex, glyph: &ReadGlyph) -> Glyph {
    match glyph {
        ReadGlyph::Simple(simple) => {
            let mut points = simple.points();
            let mut start = 0usize;
            let contours: Vec<Contour> = simple
                .end_pts_of_contours()
                .iter()
                .map(|end| {
                    let end = end.get() as usize;
                    let contour: Vec<CurvePoint> =
                        points.by_ref().take((end + 1).saturating_sub(start)).collect();
                    start = end + 1;
                    contour.into()
                })
                .collect();

            let instructions =
                if font_idx.is_primary() { simple.instructions().to_vec() } else { Vec::new() };

            Glyph::Simple(SimpleGlyph {
                bbox: Bbox {
                    x_min: simple.x_min(),
                    y_min: simple.y_min(),
                    x_max: simple.x_max(),
                    y_max: simple.y_max(),
                },
                contours,
                instructions,
            })
        }
        ReadGlyph::Composite(composite) => {
            let bbox = Bbox {
                x_min: composite.x_min(),
                y_min: composite.y_min(),
                x_max: composite.x_max(),
                y_max: composite.y_max(),
            };
            let mut components = composite.components().filter_map(|comp| {
                let gid = ctx.remap(font_idx, GlyphId::new(comp.glyph.to_u16()))?;
                Some(Component {
                    glyph: font_types::GlyphId16::new(gid.to_u16()),
                    anchor: match comp.anchor {
                        ReadAnchor::Offset { x, y } => Anchor::Offset { x, y },
                        ReadAnchor::Point { base, component } => Anchor::Point { base, component },
                    },
                    transform: Transform {
                        xx: comp.transform.xx,
                        yx: comp.transform.yx,
                        xy: comp.transform.xy,
                        yy: comp.transform.yy,
                    },
                    flags: comp.flags.into(),
                })
            });

            let Some(first) = components.next() else {
                return Glyph::Empty;
            };
            let mut merged = CompositeGlyph::new(first, bbox);
            for component in components {
                merged.add_component(component, bbox);
            }
            Glyph::Composite(merged)
        }
    }
}
