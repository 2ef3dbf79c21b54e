//! Opening fonts into editable containers and editing them.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs,
    ops::RangeInclusive,
    path::Path,
};

use kanamono_font_ops::{VariationSequence, read_variation_sequences};
use kurbo::{Affine, BezPath, Point, Rect};
use log::debug;
use read_fonts::{FontRef, TableProvider, types::Tag};
use skrifa::{
    MetadataProvider,
    instance::{LocationRef, Size},
    outline::DrawSettings,
};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{head::Head, hhea::Hhea, os2::Os2, post::Post},
};

use crate::{
    GlyphError, Result,
    glyph::{Glyph, QuadPen},
};

const CARET_SLOPE_RISE: i16 = 1000;

/// Tables rebuilt from the glyph list when the container is saved.
pub(crate) const REBUILT_TABLES: &[[u8; 4]] =
    &[*b"head", *b"hhea", *b"hmtx", *b"maxp", *b"post", *b"cmap", *b"OS/2", *b"glyf", *b"loca"];

/// Tables that do not survive a load/save cycle.
///
/// Hinting programs and device metrics refer to the original outlines, and
/// vertical metrics are not maintained.
pub(crate) const DROPPED_TABLES: &[[u8; 4]] = &[
    *b"fpgm", *b"prep", *b"cvt ", *b"gasp", *b"hdmx", *b"LTSH", *b"VDMX", *b"DSIG", *b"vhea",
    *b"vmtx", *b"CFF ", *b"CFF2", *b"VORG",
];

const LOOKUP_TABLES: &[[u8; 4]] = &[*b"GSUB", *b"GPOS", *b"kern"];

/// Result of [`FontContainer::create_glyph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    /// A glyph already held the codepoint or name.
    Existing(usize),
    /// A new glyph was appended.
    Created(usize),
}

impl Creation {
    pub fn index(self) -> usize {
        match self {
            Creation::Existing(index) | Creation::Created(index) => index,
        }
    }
}

/// An editable font: an ordered glyph list plus the tables needed to write
/// it back out as TrueType.
///
/// Glyph indices are glyph ids. Glyphs are never removed, only cleared, so
/// an index stays valid for the life of the container.
#[derive(Debug, Clone)]
pub struct FontContainer {
    pub(crate) glyphs: Vec<Glyph>,
    /// codepoint -> glyph indices, ascending; the first one is the mapping
    codepoints: HashMap<u32, Vec<usize>>,
    pub(crate) variation_sequences: Vec<VariationSequence>,
    pub(crate) units_per_em: u16,
    pub(crate) italic_angle: f64,
    pub(crate) head: Head,
    pub(crate) hhea: Hhea,
    pub(crate) post: Post,
    pub(crate) os2: Option<Os2>,
    pub(crate) passthrough: BTreeMap<Tag, Vec<u8>>,
}

impl FontContainer {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|source| GlyphError::Io { path: path.to_path_buf(), source })?;
        debug!("Opening {}", path.display());
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let font = FontRef::new(data)?;
        let num_glyphs = font.maxp()?.num_glyphs();
        let is_postscript = font.table_data(Tag::new(b"CFF ")).is_some()
            || font.table_data(Tag::new(b"CFF2")).is_some();

        let names = glyph_names(&font, num_glyphs);
        let widths = advance_widths(&font, num_glyphs)?;
        let outlines = font.outline_glyphs();

        let mut glyphs = Vec::with_capacity(num_glyphs as usize);
        for (gid, name) in names.into_iter().enumerate() {
            let mut glyph = Glyph::new(name);
            glyph.width = i32::from(widths.get(gid).copied().unwrap_or_default());
            if let Some(outline) = outlines.get(skrifa::GlyphId::new(gid as u32)) {
                let mut pen = QuadPen::default();
                outline
                    .draw(
                        DrawSettings::unhinted(Size::unscaled(), LocationRef::default()),
                        &mut pen,
                    )
                    .map_err(|e| GlyphError::Draw { gid: gid as u32, reason: e.to_string() })?;
                glyph.outline = pen.finish(is_postscript);
            }
            glyphs.push(glyph);
        }

        let mut mapped: BTreeMap<usize, Vec<u32>> = BTreeMap::new();
        for (codepoint, gid) in font.charmap().mappings() {
            mapped.entry(gid.to_u32() as usize).or_default().push(codepoint);
        }
        for (gid, mut cps) in mapped {
            let Some(glyph) = glyphs.get_mut(gid) else {
                continue;
            };
            cps.sort_unstable();
            cps.dedup();
            glyph.codepoint = cps.first().copied();
            glyph.alternates = cps.into_iter().skip(1).collect();
        }

        let variation_sequences = read_variation_sequences(&font)?.unwrap_or_default();

        let handled: HashSet<Tag> =
            REBUILT_TABLES.iter().chain(DROPPED_TABLES).map(Tag::new).collect();
        let mut passthrough = BTreeMap::new();
        for record in font.table_directory.table_records() {
            let tag = record.tag();
            if handled.contains(&tag) {
                continue;
            }
            if let Some(table) = font.table_data(tag) {
                passthrough.insert(tag, table.as_bytes().to_vec());
            }
        }

        let head: Head = font.head()?.to_owned_table();
        let post: Post = font.post()?.to_owned_table();
        let mut container = Self {
            glyphs,
            codepoints: HashMap::new(),
            variation_sequences,
            units_per_em: head.units_per_em,
            italic_angle: post.italic_angle.to_f64(),
            hhea: font.hhea()?.to_owned_table(),
            os2: font.os2().ok().map(|os2| os2.to_owned_table()),
            head,
            post,
            passthrough,
        };
        container.reindex();
        Ok(container)
    }

    /// Save and reopen, rebuilding the encoding from scratch.
    pub fn compact(&self) -> Result<Self> {
        Self::from_bytes(&self.to_bytes()?)
    }

    fn reindex(&mut self) {
        self.codepoints.clear();
        for (index, glyph) in self.glyphs.iter().enumerate() {
            for cp in glyph.codepoints() {
                self.codepoints.entry(cp).or_default().push(index);
            }
        }
        for indices in self.codepoints.values_mut() {
            indices.dedup();
        }
    }

    fn index_codepoint(&mut self, codepoint: u32, index: usize) {
        let indices = self.codepoints.entry(codepoint).or_default();
        if let Err(pos) = indices.binary_search(&index) {
            indices.insert(pos, index);
        }
    }

    fn unindex_codepoint(&mut self, codepoint: u32, index: usize) {
        if let Some(indices) = self.codepoints.get_mut(&codepoint) {
            indices.retain(|&i| i != index);
            if indices.is_empty() {
                self.codepoints.remove(&codepoint);
            }
        }
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn glyph(&self, index: usize) -> Result<&Glyph> {
        self.glyphs.get(index).ok_or(GlyphError::NoSuchGlyph(index))
    }

    /// Mutable access to a glyph's outline and width.
    ///
    /// Codepoints must be changed through the container so its index stays
    /// in sync; use [`clear`](Self::clear) or
    /// [`detach_alternates`](Self::detach_alternates).
    pub fn edit(&mut self, index: usize, f: impl FnOnce(&mut BezPath, &mut i32)) -> Result<()> {
        let glyph = self.glyphs.get_mut(index).ok_or(GlyphError::NoSuchGlyph(index))?;
        f(&mut glyph.outline, &mut glyph.width);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn italic_angle(&self) -> f64 {
        self.italic_angle
    }

    /// Record the italic angle in post and derive the hhea caret slope from it.
    pub fn set_italic_angle(&mut self, angle: f64) {
        self.italic_angle = angle;
        if angle == 0.0 {
            self.hhea.caret_slope_rise = 1;
            self.hhea.caret_slope_run = 0;
        } else {
            self.hhea.caret_slope_rise = CARET_SLOPE_RISE;
            self.hhea.caret_slope_run =
                (f64::from(CARET_SLOPE_RISE) * (-angle).to_radians().tan()).round() as i16;
        }
    }

    pub fn variation_sequences(&self) -> &[VariationSequence] {
        &self.variation_sequences
    }

    /// Glyph mapped by `codepoint`. The lowest glyph id wins when several
    /// glyphs claim the same codepoint.
    pub fn lookup(&self, codepoint: u32) -> Option<usize> {
        self.codepoints.get(&codepoint).and_then(|indices| indices.first().copied())
    }

    pub fn lookup_glyph(&self, codepoint: u32) -> Option<&Glyph> {
        self.lookup(codepoint).map(|index| &self.glyphs[index])
    }

    pub fn width_of(&self, codepoint: u32) -> Option<i32> {
        self.lookup_glyph(codepoint).map(|glyph| glyph.width)
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.glyphs.iter().position(|glyph| glyph.name == name)
    }

    /// Glyphs mapped by any codepoint in `range`, in codepoint order.
    pub fn select_range(&self, range: RangeInclusive<u32>) -> Vec<usize> {
        let mut cps: Vec<u32> =
            self.codepoints.keys().copied().filter(|cp| range.contains(cp)).collect();
        cps.sort_unstable();

        let mut seen = HashSet::new();
        cps.into_iter()
            .filter_map(|cp| self.lookup(cp))
            .filter(|index| seen.insert(*index))
            .collect()
    }

    /// Select a list of codepoint ranges, in the order given.
    pub fn select_ranges(&self, ranges: &[RangeInclusive<u32>]) -> Vec<usize> {
        let mut seen = HashSet::new();
        ranges
            .iter()
            .flat_map(|range| self.select_range(range.clone()))
            .filter(|index| seen.insert(*index))
            .collect()
    }

    /// Every codepoint currently mapped.
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.codepoints.keys().copied()
    }

    /// Find or create the glyph for `codepoint`.
    ///
    /// An existing glyph is one already mapped by `codepoint` or named
    /// `name`; an unmapped glyph found by name takes the codepoint.
    pub fn create_glyph(&mut self, codepoint: u32, name: &str) -> Result<Creation> {
        if char::from_u32(codepoint).is_none() {
            return Err(GlyphError::CreationFailed { codepoint, name: name.to_string() });
        }
        if let Some(index) = self.lookup(codepoint) {
            return Ok(Creation::Existing(index));
        }
        if let Some(index) = self.find_by_name(name) {
            let glyph = &mut self.glyphs[index];
            if glyph.codepoint.is_some() {
                return Err(GlyphError::CreationFailed { codepoint, name: name.to_string() });
            }
            glyph.codepoint = Some(codepoint);
            self.index_codepoint(codepoint, index);
            return Ok(Creation::Existing(index));
        }

        let index = self.glyphs.len();
        self.glyphs.push(Glyph { codepoint: Some(codepoint), ..Glyph::new(name) });
        self.index_codepoint(codepoint, index);
        Ok(Creation::Created(index))
    }

    /// Remove the alternate codepoints of a glyph, returning them.
    pub fn detach_alternates(&mut self, index: usize) -> Result<Vec<u32>> {
        let glyph = self.glyphs.get_mut(index).ok_or(GlyphError::NoSuchGlyph(index))?;
        let alternates = std::mem::take(&mut glyph.alternates);
        for &cp in &alternates {
            self.unindex_codepoint(cp, index);
        }
        Ok(alternates)
    }

    /// Clear a glyph: the outline and every codepoint and variation sequence
    /// pointing at it are removed. The slot, name and width stay.
    pub fn clear(&mut self, index: usize) -> Result<()> {
        let glyph = self.glyphs.get_mut(index).ok_or(GlyphError::NoSuchGlyph(index))?;
        let cps: Vec<u32> = glyph.codepoints().collect();
        glyph.clear();
        for cp in cps {
            self.unindex_codepoint(cp, index);
        }
        self.variation_sequences
            .retain(|seq| seq.glyph.is_none_or(|gid| gid.to_u32() as usize != index));
        Ok(())
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let glyph = self.glyphs.get_mut(index).ok_or(GlyphError::NoSuchGlyph(index))?;
        glyph.name = name.into();
        Ok(())
    }

    /// Replace the outline and width of `index` with those of `source`.
    pub fn copy_outline(&mut self, index: usize, source: &Glyph) -> Result<()> {
        let glyph = self.glyphs.get_mut(index).ok_or(GlyphError::NoSuchGlyph(index))?;
        glyph.outline = source.outline.clone();
        glyph.width = source.width;
        Ok(())
    }

    pub fn transform(&mut self, index: usize, affine: Affine) -> Result<()> {
        self.glyphs.get_mut(index).ok_or(GlyphError::NoSuchGlyph(index))?.transform(affine);
        Ok(())
    }

    pub fn translate(&mut self, index: usize, dx: f64, dy: f64) -> Result<()> {
        self.transform(index, Affine::translate((dx, dy)))
    }

    pub fn set_width(&mut self, index: usize, width: i32) -> Result<()> {
        self.glyphs.get_mut(index).ok_or(GlyphError::NoSuchGlyph(index))?.width = width;
        Ok(())
    }

    /// Rewrite every point of a glyph. The closure also receives the width.
    pub fn map_points(
        &mut self,
        index: usize,
        mut f: impl FnMut(Point, i32) -> Point,
    ) -> Result<()> {
        let glyph = self.glyphs.get_mut(index).ok_or(GlyphError::NoSuchGlyph(index))?;
        let width = glyph.width;
        glyph.map_points(|p| f(p, width));
        Ok(())
    }

    pub fn bounding_box(&self, index: usize) -> Result<Option<Rect>> {
        Ok(self.glyph(index)?.bounding_box())
    }

    /// Apply `affine` to every glyph.
    pub fn transform_all(&mut self, affine: Affine) {
        for glyph in &mut self.glyphs {
            glyph.transform(affine);
        }
    }

    /// Scale outlines, widths and the vertical metrics to a new em size.
    pub fn set_units_per_em(&mut self, units_per_em: u16) {
        if units_per_em == self.units_per_em || self.units_per_em == 0 {
            return;
        }
        let factor = f64::from(units_per_em) / f64::from(self.units_per_em);
        let scale = |v: i16| (f64::from(v) * factor).round() as i16;

        for glyph in &mut self.glyphs {
            glyph.transform(Affine::scale(factor));
            glyph.width = (f64::from(glyph.width) * factor).round() as i32;
        }

        self.hhea.ascender = font_types::FWord::new(scale(self.hhea.ascender.to_i16()));
        self.hhea.descender = font_types::FWord::new(scale(self.hhea.descender.to_i16()));
        self.hhea.line_gap = font_types::FWord::new(scale(self.hhea.line_gap.to_i16()));
        self.post.underline_position =
            font_types::FWord::new(scale(self.post.underline_position.to_i16()));
        self.post.underline_thickness =
            font_types::FWord::new(scale(self.post.underline_thickness.to_i16()));
        if let Some(os2) = self.os2.as_mut() {
            os2.y_strikeout_size = scale(os2.y_strikeout_size);
            os2.y_strikeout_position = scale(os2.y_strikeout_position);
            os2.y_subscript_x_size = scale(os2.y_subscript_x_size);
            os2.y_subscript_y_size = scale(os2.y_subscript_y_size);
            os2.y_subscript_y_offset = scale(os2.y_subscript_y_offset);
            os2.y_superscript_x_size = scale(os2.y_superscript_x_size);
            os2.y_superscript_y_size = scale(os2.y_superscript_y_size);
            os2.y_superscript_y_offset = scale(os2.y_superscript_y_offset);
            os2.sx_height = os2.sx_height.map(scale);
            os2.s_cap_height = os2.s_cap_height.map(scale);
        }

        debug!("Rescaled em {} -> {units_per_em}", self.units_per_em);
        self.units_per_em = units_per_em;
    }

    /// Remove substitution and positioning lookups.
    pub fn strip_lookups(&mut self) {
        for tag in LOOKUP_TABLES {
            self.passthrough.remove(&Tag::new(tag));
        }
    }

    pub fn has_table(&self, tag: Tag) -> bool {
        self.passthrough.contains_key(&tag)
    }

    /// Append every glyph of `other`.
    ///
    /// Names that already exist get a `.N` suffix. Variation sequences of
    /// `other` are carried over with their glyph ids shifted.
    pub fn merge_glyphs_from(&mut self, other: &FontContainer) {
        let offset = self.glyphs.len() as u32;
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut names: HashSet<String> = self.glyphs.iter().map(|g| g.name.clone()).collect();

        for glyph in &other.glyphs {
            let mut glyph = glyph.clone();
            if names.contains(&glyph.name) {
                let base = glyph.name.clone();
                let count = counts.entry(base.clone()).or_insert(0);
                loop {
                    *count += 1;
                    let candidate = format!("{base}.{count}");
                    if !names.contains(&candidate) {
                        glyph.name = candidate;
                        break;
                    }
                }
            }
            names.insert(glyph.name.clone());

            let index = self.glyphs.len();
            for cp in glyph.codepoints() {
                self.index_codepoint(cp, index);
            }
            self.glyphs.push(glyph);
        }

        self.variation_sequences
            .extend(other.variation_sequences.iter().map(|seq| seq.offset_glyph(offset)));
    }
}

/// Glyph names from the post table or the CFF charset, `glyphNNNNN` where neither has one.
fn glyph_names(font: &FontRef, num_glyphs: u16) -> Vec<String> {
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

fn advance_widths(font: &FontRef, num_glyphs: u16) -> Result<Vec<u16>> {
    let num_h_metrics = font.hhea()?.number_of_h_metrics() as usize;
    let hmtx = font.hmtx()?;
    let metrics = hmtx.h_metrics();
    let last = metrics.get(num_h_metrics.saturating_sub(1)).map(|m| m.advance.get()).unwrap_or(0);

    Ok((0..num_glyphs as usize)
        .map(|gid| metrics.get(gid).map(|m| m.advance.get()).unwrap_or(last))
        .collect())
}
