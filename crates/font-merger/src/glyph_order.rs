//! Merged glyph order and glyph names.

use std::{collections::HashSet, fmt, ops::Deref};

use read_fonts::{FontRef, TableProvider};
use skrifa::MetadataProvider;

use crate::{
    MergeError, Result,
    types::{FontIndex, GlyphId, MegaGlyphId},
};

/// A glyph name in the merged font
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlyphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Glyph order of the merged font.
///
/// Fonts are concatenated in merge order, so glyph `g` of font `i` lands at
/// `offset(i) + g`. A name already taken by an earlier glyph is renamed with
/// the first free `.N` suffix.
#[derive(Debug, Clone)]
pub struct GlyphOrder {
    names: Vec<GlyphName>,
    offsets: Vec<u16>,
    counts: Vec<u16>,
}

impl GlyphOrder {
    pub fn compute(fonts: &[FontRef]) -> Result<Self> {
        let mut names = Vec::new();
        let mut taken: HashSet<String> = HashSet::new();
        let mut offsets = Vec::with_capacity(fonts.len());
        let mut counts = Vec::with_capacity(fonts.len());

        for font in fonts {
            let offset =
                u16::try_from(names.len()).map_err(|_| MergeError::TooManyGlyphs(names.len()))?;
            offsets.push(offset);

            let font_names = source_glyph_names(font);
            counts.push(font_names.len() as u16);
            for name in font_names {
                let name = if taken.contains(&name) { free_name(&name, &taken) } else { name };
                taken.insert(name.clone());
                names.push(GlyphName::new(name));
            }
        }

        if names.len() > usize::from(u16::MAX) {
            return Err(MergeError::TooManyGlyphs(names.len()));
        }
        Ok(Self { names, offsets, counts })
    }

    /// Names in merged glyph order
    pub fn names(&self) -> &[GlyphName] {
        &self.names
    }

    pub fn total_glyphs(&self) -> u16 {
        self.names.len() as u16
    }

    /// First merged glyph id of a font
    pub fn offset(&self, font: FontIndex) -> u16 {
        self.offsets[font.as_usize()]
    }

    pub fn offsets(&self) -> &[u16] {
        &self.offsets
    }

    /// Number of glyphs contributed by a font
    pub fn glyph_count(&self, font: FontIndex) -> u16 {
        self.counts[font.as_usize()]
    }

    /// Merged id of a source glyph, `None` when the id is out of range.
    pub fn remap(&self, font: FontIndex, gid: GlyphId) -> Option<MegaGlyphId> {
        (gid.to_u16() < self.glyph_count(font)).then(|| MegaGlyphId::new(self.offset(font) + gid.0))
    }
}

fn free_name(name: &str, taken: &HashSet<String>) -> String {
    (1..)
        .map(|n| format!("{name}.{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Glyph names from post or the CFF charset, `glyphNNNNN` where none is stored.
fn source_glyph_names(font: &FontRef) -> Vec<String> {
    let num_glyphs = font.maxp().map(|m| m.num_glyphs()).unwrap_or_default();
    let names = font.glyph_names();

    (0..num_glyphs)
        .map(|gid| {
            names
                .get(skrifa::GlyphId::from(gid))
                .filter(|name| !name.is_synthesized())
                .map(|name| name.as_str().to_string())
                .unwrap_or_else(|| format!("glyph{gid:05}"))
        })
        .collect()
}
