//! State shared by the table mergers.

use read_fonts::{FontRef, ReadError};

use crate::{
    Result,
    glyph_order::{GlyphName, GlyphOrder},
    types::{FontIndex, GlyphId, MegaGlyphId},
};

/// The fonts being merged and their merged glyph order
pub struct MergeContext<'a> {
    fonts: &'a [FontRef<'a>],
    glyph_order: GlyphOrder,
}

impl<'a> MergeContext<'a> {
    pub fn new(fonts: &'a [FontRef<'a>], glyph_order: GlyphOrder) -> Self {
        Self { fonts, glyph_order }
    }

    pub fn fonts(&self) -> &[FontRef<'a>] {
        self.fonts
    }

    pub fn glyph_order(&self) -> &GlyphOrder {
        &self.glyph_order
    }

    pub fn names(&self) -> &[GlyphName] {
        self.glyph_order.names()
    }

    pub fn total_glyphs(&self) -> u16 {
        self.glyph_order.total_glyphs()
    }

    /// Fonts with their merge position
    pub fn indexed_fonts(&self) -> impl Iterator<Item = (FontIndex, &FontRef<'a>)> {
        self.fonts.iter().enumerate().map(|(i, font)| (FontIndex(i), font))
    }

    /// Source glyph ids of a font, in order
    pub fn source_glyphs(&self, font: FontIndex) -> impl Iterator<Item = GlyphId> + use<> {
        (0..self.glyph_order.glyph_count(font)).map(GlyphId::new)
    }

    pub fn remap(&self, font: FontIndex, gid: GlyphId) -> Option<MegaGlyphId> {
        self.glyph_order.remap(font, gid)
    }

    /// Read one table from every font, failing if any font lacks it.
    pub fn tables<T>(
        &self,
        read: impl Fn(&FontRef<'a>) -> std::result::Result<T, ReadError>,
    ) -> Result<Vec<T>> {
        Ok(self.fonts.iter().map(read).collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn first_font(&self) -> &FontRef<'a> {
        &self.fonts[0]
    }
}
