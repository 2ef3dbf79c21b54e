//! Unicode variation sequences (cmap format 14).

use std::collections::BTreeMap;

use anyhow::Result;
use read_fonts::{
    FontRef, TableProvider,
    tables::cmap::{CmapSubtable as ReadCmapSubtable, MapVariant},
    types::GlyphId,
};
use write_fonts::{
    tables::cmap::{
        Cmap, Cmap14, CmapSubtable, DefaultUvs, EncodingRecord, NonDefaultUvs, PlatformId,
        UnicodeRange, UvsMapping, VariationSelector,
    },
    types::Uint24,
};

const UNICODE_VARIATION_ENCODING: u16 = 5;

/// One (base, selector) pair and where it maps.
///
/// `glyph` is `None` for sequences that fall back to the base character's
/// nominal glyph (the "default UVS" table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariationSequence {
    pub base: u32,
    pub selector: u32,
    pub glyph: Option<GlyphId>,
}

impl VariationSequence {
    /// Shift the explicit glyph by `offset` glyph ids.
    pub fn offset_glyph(self, offset: u32) -> Self {
        Self { glyph: self.glyph.map(|gid| GlyphId::new(gid.to_u32() + offset)), ..self }
    }
}

/// Read every variation sequence of the font's format 14 subtable.
///
/// Returns `Ok(None)` when the font carries no format 14 subtable.
pub fn read_variation_sequences(font: &FontRef) -> Result<Option<Vec<VariationSequence>>> {
    let cmap = font.cmap()?;
    for record in cmap.encoding_records() {
        if let Ok(ReadCmapSubtable::Format14(cmap14)) = record.subtable(cmap.offset_data()) {
            let sequences = cmap14
                .iter()
                .map(|(base, selector, variant)| VariationSequence {
                    base,
                    selector,
                    glyph: match variant {
                        MapVariant::UseDefault => None,
                        MapVariant::Variant(gid) => Some(gid),
                    },
                })
                .collect();
            return Ok(Some(sequences));
        }
    }
    Ok(None)
}

/// Build a format 14 subtable.
///
/// Returns `None` when there is nothing to encode. Sequences whose glyph id
/// does not fit in 16 bits are skipped.
pub fn build_cmap14(sequences: &[VariationSequence]) -> Option<Cmap14> {
    let mut by_selector: BTreeMap<u32, (Vec<u32>, BTreeMap<u32, u16>)> = BTreeMap::new();
    for seq in sequences {
        let (defaults, mappings) = by_selector.entry(seq.selector).or_default();
        match seq.glyph {
            None => defaults.push(seq.base),
            Some(gid) => {
                if let Ok(gid) = u16::try_from(gid.to_u32()) {
                    mappings.entry(seq.base).or_insert(gid);
                }
            }
        }
    }

    let mut length: u32 = 10;
    let mut selectors = Vec::with_capacity(by_selector.len());
    for (selector, (mut defaults, mappings)) in by_selector {
        defaults.sort_unstable();
        defaults.dedup();
        let ranges = compress_ranges(&defaults);
        if ranges.is_empty() && mappings.is_empty() {
            continue;
        }

        length += 11;
        let default_uvs = (!ranges.is_empty()).then(|| {
            length += 4 + 4 * ranges.len() as u32;
            DefaultUvs::new(ranges.len() as u32, ranges)
        });
        let non_default_uvs = (!mappings.is_empty()).then(|| {
            length += 4 + 5 * mappings.len() as u32;
            let records: Vec<UvsMapping> = mappings
                .into_iter()
                .map(|(base, gid)| UvsMapping::new(Uint24::new(base), gid))
                .collect();
            NonDefaultUvs::new(records.len() as u32, records)
        });

        selectors.push(VariationSelector::new(Uint24::new(selector), default_uvs, non_default_uvs));
    }

    if selectors.is_empty() {
        return None;
    }
    Some(Cmap14::new(length, selectors.len() as u32, selectors))
}

/// Put a format 14 subtable into `cmap` as the Unicode variation-sequence
/// record, replacing any existing one.
///
/// Returns `false` (and leaves `cmap` untouched) when the sequences encode
/// nothing.
pub fn splice_cmap14(cmap: &mut Cmap, sequences: &[VariationSequence]) -> bool {
    let Some(cmap14) = build_cmap14(sequences) else {
        return false;
    };

    let is_uvs = |r: &EncodingRecord| {
        r.platform_id == PlatformId::Unicode && r.encoding_id == UNICODE_VARIATION_ENCODING
    };
    cmap.encoding_records.retain(|r| !is_uvs(r));

    // records are ordered by (platform, encoding)
    let position = cmap
        .encoding_records
        .iter()
        .position(|r| {
            r.platform_id != PlatformId::Unicode || r.encoding_id > UNICODE_VARIATION_ENCODING
        })
        .unwrap_or(cmap.encoding_records.len());
    cmap.encoding_records.insert(
        position,
        EncodingRecord::new(
            PlatformId::Unicode,
            UNICODE_VARIATION_ENCODING,
            CmapSubtable::Format14(cmap14),
        ),
    );
    true
}

/// Collapse sorted codepoints into (start, additional_count) ranges.
fn compress_ranges(sorted: &[u32]) -> Vec<UnicodeRange> {
    let mut ranges: Vec<(u32, u8)> = Vec::new();
    for &cp in sorted {
        match ranges.last_mut() {
            Some((start, extra)) if *extra < u8::MAX && *start + *extra as u32 + 1 == cp => {
                *extra += 1;
            }
            _ => ranges.push((cp, 0)),
        }
    }
    ranges
        .into_iter()
        .map(|(start, extra)| UnicodeRange::new(Uint24::new(start), extra))
        .collect()
}
