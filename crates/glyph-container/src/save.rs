//! Writing a container back out as a TrueType font.

use std::{collections::HashSet, fs, path::Path};

use kanamono_font_ops::{VariationSequence, splice_cmap14};
use kurbo::{BezPath, PathEl};
use log::{debug, warn};
use read_fonts::types::{GlyphId, Tag};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, GlyfLocaBuilder, Glyph as GlyfGlyph, SimpleGlyph},
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        post::Post,
    },
};

use crate::{FontContainer, GlyphError, Result};

impl FontContainer {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_bytes()?;
        fs::write(path, &data)
            .map_err(|source| GlyphError::Io { path: path.to_path_buf(), source })?;
        debug!("Wrote {} ({} glyphs)", path.display(), self.glyphs.len());
        Ok(())
    }

    /// Serialize to a TrueType font.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let num_glyphs = u16::try_from(self.glyphs.len())
            .map_err(|_| GlyphError::TooManyGlyphs(self.glyphs.len()))?;

        let simple_glyphs = self
            .glyphs
            .iter()
            .map(|glyph| {
                if !glyph.has_outline() {
                    return Ok(None);
                }
                SimpleGlyph::from_bezpath(&drawable_contours(&glyph.outline))
                    .map(Some)
                    .map_err(|e| GlyphError::MalformedOutline {
                        name: glyph.name.clone(),
                        reason: format!("{e:?}"),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut glyf_builder = GlyfLocaBuilder::new();
        let mut bounds: Option<Bbox> = None;
        let mut max_points = 0u16;
        let mut max_contours = 0u16;
        let mut h_metrics = Vec::with_capacity(simple_glyphs.len());
        let mut min_lsb = i16::MAX;
        let mut min_rsb = i16::MAX;
        let mut max_extent = i16::MIN;
        let mut max_advance = 0u16;

        for (glyph, simple) in self.glyphs.iter().zip(&simple_glyphs) {
            let advance = glyph.width.clamp(0, i32::from(u16::MAX)) as u16;
            max_advance = max_advance.max(advance);

            let Some(simple) = simple else {
                glyf_builder.add_glyph(&GlyfGlyph::Empty)?;
                h_metrics.push(LongMetric { advance, side_bearing: 0 });
                continue;
            };

            let bbox = simple.bbox;
            bounds = Some(bounds.map_or(bbox, |b| b.union(bbox)));
            max_contours = max_contours.max(simple.contours.len() as u16);
            max_points =
                max_points.max(simple.contours.iter().map(|c| c.len()).sum::<usize>() as u16);

            min_lsb = min_lsb.min(bbox.x_min);
            min_rsb = min_rsb.min((i32::from(advance) - i32::from(bbox.x_max)) as i16);
            max_extent = max_extent.max(bbox.x_max);
            h_metrics.push(LongMetric { advance, side_bearing: bbox.x_min });

            glyf_builder.add_glyph(simple)?;
        }
        let (glyf, loca, loca_format) = glyf_builder.build();
        if bounds.is_none() {
            min_lsb = 0;
            min_rsb = 0;
            max_extent = 0;
        }
        let bounds = bounds.unwrap_or_default();

        let mut head = self.head.clone();
        head.units_per_em = self.units_per_em;
        head.x_min = bounds.x_min;
        head.y_min = bounds.y_min;
        head.x_max = bounds.x_max;
        head.y_max = bounds.y_max;
        head.index_to_loc_format = match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        };

        let mut hhea = self.hhea.clone();
        hhea.advance_width_max = font_types::UfWord::new(max_advance);
        hhea.min_left_side_bearing = font_types::FWord::new(min_lsb);
        hhea.min_right_side_bearing = font_types::FWord::new(min_rsb);
        hhea.x_max_extent = font_types::FWord::new(max_extent);
        hhea.number_of_h_metrics = num_glyphs;

        let maxp = Maxp {
            num_glyphs,
            max_points: Some(max_points),
            max_contours: Some(max_contours),
            max_composite_points: Some(0),
            max_composite_contours: Some(0),
            max_zones: Some(1),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(0),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(0),
            max_component_elements: Some(0),
            max_component_depth: Some(0),
        };

        let mut post = Post::new_v2(self.glyphs.iter().map(|g| g.name.as_str()));
        post.italic_angle = font_types::Fixed::from_f64(self.italic_angle);
        post.underline_position = self.post.underline_position;
        post.underline_thickness = self.post.underline_thickness;
        post.is_fixed_pitch = self.post.is_fixed_pitch;

        let (cmap, first_cp, last_cp) = self.build_cmap()?;

        let mut builder = FontBuilder::new();
        builder.add_table(&head)?;
        builder.add_table(&hhea)?;
        builder.add_table(&Hmtx { h_metrics, left_side_bearings: vec![] })?;
        builder.add_table(&maxp)?;
        builder.add_table(&post)?;
        builder.add_table(&cmap)?;
        if let Some(os2) = &self.os2 {
            let mut os2 = os2.clone();
            os2.us_first_char_index = first_cp.min(0xFFFF) as u16;
            os2.us_last_char_index = last_cp.min(0xFFFF) as u16;
            builder.add_table(&os2)?;
        }
        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;

        for (tag, data) in &self.passthrough {
            builder.add_raw(*tag, data.clone());
        }

        Ok(builder.build())
    }

    /// Build the cmap; the lowest glyph id wins for a codepoint.
    ///
    /// Also returns the first and last mapped codepoint.
    fn build_cmap(&self) -> Result<(Cmap, u32, u32)> {
        let mut seen = HashSet::new();
        let mut mappings: Vec<(char, GlyphId)> = Vec::new();
        for (index, glyph) in self.glyphs.iter().enumerate() {
            for cp in glyph.codepoints() {
                let Some(ch) = char::from_u32(cp) else {
                    warn!("Skipping invalid codepoint {cp:#X} on '{}'", glyph.name);
                    continue;
                };
                if seen.insert(cp) {
                    mappings.push((ch, GlyphId::new(index as u32)));
                }
            }
        }
        mappings.sort_by_key(|(ch, _)| *ch);
        let first = mappings.first().map(|(ch, _)| *ch as u32).unwrap_or(0);
        let last = mappings.last().map(|(ch, _)| *ch as u32).unwrap_or(0);

        let mut cmap =
            Cmap::from_mappings(mappings).map_err(|e| GlyphError::Cmap(format!("{e:?}")))?;

        let sequences: Vec<VariationSequence> = self
            .variation_sequences
            .iter()
            .copied()
            .filter(|seq| match seq.glyph {
                Some(gid) => (gid.to_u32() as usize) < self.glyphs.len(),
                None => seen.contains(&seq.base),
            })
            .collect();
        splice_cmap14(&mut cmap, &sequences);

        Ok((cmap, first, last))
    }

    /// Raw bytes of a passthrough table.
    pub fn table_data(&self, tag: Tag) -> Option<&[u8]> {
        self.passthrough.get(&tag).map(Vec::as_slice)
    }
}

/// Drop contours that draw nothing (a bare move, or a move straight to close).
fn drawable_contours(path: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut pending: Vec<PathEl> = Vec::new();
    let mut draws = false;
    for &el in path.elements() {
        if let PathEl::MoveTo(_) = el {
            if draws {
                pending.drain(..).for_each(|el| out.push(el));
            }
            pending.clear();
            draws = false;
        } else if !matches!(el, PathEl::ClosePath) {
            draws = true;
        }
        pending.push(el);
    }
    if draws {
        pending.into_iter().for_each(|el| out.push(el));
    }
    out
}
