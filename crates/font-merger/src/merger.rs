use std::collections::HashSet;

use log::info;
use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::FontBuilder;

use crate::{
    MergeError, Result,
    context::MergeContext,
    glyph_order::GlyphOrder,
    tables::{
        cmap::merge_cmap,
        glyf::merge_glyf,
        head::merge_head,
        hhea::merge_hhea,
        hint::{check_hint_compatibility, log_hint_info},
        maxp::merge_maxp,
        metrics::{merge_hmtx, merge_vertical},
        os2::merge_os2,
        post::merge_post,
    },
};

/// Tables built by the mergers rather than copied from the first font
const HANDLED_TABLES: &[[u8; 4]] = &[
    *b"head", *b"maxp", *b"cmap", *b"hmtx", *b"hhea", *b"post", *b"OS/2", *b"vhea", *b"vmtx",
    *b"glyf", *b"loca",
];

/// Outlines that cannot be carried next to glyf
const UNSUPPORTED_TABLES: &[[u8; 4]] = &[*b"CFF ", *b"CFF2", *b"VORG"];

/// A merged font and where each source font's glyphs start in it
#[derive(Debug, Clone)]
pub struct Merged {
    pub data: Vec<u8>,
    pub offsets: Vec<u16>,
}

/// Merges TrueType fonts into one, earlier fonts taking precedence
#[derive(Debug, Default)]
pub struct Merger;

impl Merger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, font_data: &[&[u8]]) -> Result<Merged> {
        let fonts: Vec<FontRef> =
            font_data.iter().map(|data| FontRef::new(data)).collect::<std::result::Result<_, _>>()?;
        self.merge_fonts(&fonts)
    }

    pub fn merge_fonts(&self, fonts: &[FontRef]) -> Result<Merged> {
        if fonts.is_empty() {
            return Err(MergeError::NoFonts);
        }
        self.validate_units_per_em(fonts)?;
        log_hint_info(fonts);
        check_hint_compatibility(fonts);

        let glyph_order = GlyphOrder::compute(fonts)?;
        let offsets = glyph_order.offsets().to_vec();
        let ctx = MergeContext::new(fonts, glyph_order);
        info!("Merging {} fonts into {} glyphs", fonts.len(), ctx.total_glyphs());

        let (glyf, loca, loca_format) = merge_glyf(&ctx)?;
        let head = merge_head(&ctx, loca_format)?;
        let hmtx = merge_hmtx(&ctx)?;
        let hhea = merge_hhea(&ctx, hmtx.h_metrics.len() as u16)?;
        let maxp = merge_maxp(&ctx)?;
        let cmap = merge_cmap(&ctx)?;
        let post = merge_post(&ctx)?;
        let os2 = merge_os2(&ctx)?;
        let vertical = merge_vertical(&ctx)?;

        let mut builder = FontBuilder::new();
        builder.add_table(&head)?;
        builder.add_table(&hhea)?;
        builder.add_table(&hmtx)?;
        builder.add_table(&maxp)?;
        builder.add_table(&cmap)?;
        builder.add_table(&post)?;
        if let Some(os2) = os2 {
            builder.add_table(&os2)?;
        }
        if let Some((vhea, vmtx)) = vertical {
            builder.add_table(&vhea)?;
            builder.add_table(&vmtx)?;
        }
        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;

        self.copy_other_tables(&mut builder, ctx.first_font());

        Ok(Merged { data: builder.build(), offsets })
    }

    fn validate_units_per_em(&self, fonts: &[FontRef]) -> Result<()> {
        let (first, rest) = fonts.split_first().ok_or(MergeError::NoFonts)?;
        let expected = first.head()?.units_per_em();
        rest.iter().try_for_each(|font| {
            let actual = font.head()?.units_per_em();
            if actual == expected {
                Ok(())
            } else {
                Err(MergeError::IncompatibleUnitsPerEm { expected, actual })
            }
        })
    }

    /// Copy name, layout, hinting programs and anything else from the first font.
    fn copy_other_tables(&self, builder: &mut FontBuilder, font: &FontRef) {
        let skipped: HashSet<Tag> =
            HANDLED_TABLES.iter().chain(UNSUPPORTED_TABLES).map(Tag::new).collect();

        for record in font.table_directory.table_records() {
            let tag = record.tag();
            if skipped.contains(&tag) || builder.contains(tag) {
                continue;
            }
            if let Some(data) = font.table_data(tag) {
                builder.add_raw(tag, data.as_bytes().to_vec());
            }
        }
    }
}
