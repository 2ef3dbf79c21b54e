//! cmap table merging
//!
//! The first font to map a codepoint keeps it. Format 14 variation sequences
//! are not merged; callers splice them in afterwards.

use indexmap::{IndexMap, map::Entry};
use log::debug;
use read_fonts::{
    TableProvider,
    tables::cmap::{Cmap as ReadCmap, CmapSubtable, PlatformId},
};
use write_fonts::tables::cmap::Cmap;

use crate::{
    MergeError, Result,
    context::MergeContext,
    types::{Codepoint, FontIndex, GlyphId, MegaGlyphId},
};

pub fn merge_cmap(ctx: &MergeContext) -> Result<Cmap> {
    let mut mapping: IndexMap<Codepoint, (FontIndex, MegaGlyphId)> = IndexMap::new();
    let mut shadowed = 0usize;

    for (font_idx, font) in ctx.indexed_fonts() {
        let cmap = font.cmap()?;
        for (codepoint, gid) in unicode_mappings(&cmap) {
            let Some(mega) = ctx.remap(font_idx, gid) else {
                continue;
            };
            match mapping.entry(codepoint) {
                Entry::Vacant(slot) => {
                    slot.insert((font_idx, mega));
                }
                Entry::Occupied(slot) => {
                    if slot.get().0 != font_idx {
                        shadowed += 1;
                    }
                }
            }
        }
    }
    if shadowed > 0 {
        debug!("{shadowed} codepoints already mapped by an earlier font were ignored");
    }

    let mut mappings: Vec<(char, read_fonts::types::GlyphId)> = mapping
        .into_iter()
        .filter_map(|(cp, (_, mega))| {
            Some((cp.to_char()?, read_fonts::types::GlyphId::new(mega.to_u32())))
        })
        .collect();
    mappings.sort_by_key(|(ch, _)| *ch);

    Cmap::from_mappings(mappings).map_err(|e| MergeError::CmapBuildError(format!("{e:?}")))
}

/// Codepoint mappings of the best Unicode subtable.
///
/// Full-repertoire format 12 is preferred over BMP format 4.
fn unicode_mappings(cmap: &ReadCmap) -> Vec<(Codepoint, GlyphId)> {
    let is_unicode = |platform: PlatformId, encoding: u16| {
        platform == PlatformId::Unicode
            || (platform == PlatformId::Windows && (encoding == 1 || encoding == 10))
    };

    let subtables: Vec<CmapSubtable> = cmap
        .encoding_records()
        .iter()
        .filter(|r| is_unicode(r.platform_id(), r.encoding_id()))
        .filter_map(|r| r.subtable(cmap.offset_data()).ok())
        .collect();

    let to_pair = |(cp, gid): (u32, read_fonts::types::GlyphId)| {
        u16::try_from(gid.to_u32())
            .ok()
            .filter(|&gid| gid != 0)
            .map(|gid| (Codepoint(cp), GlyphId::new(gid)))
    };

    if let Some(CmapSubtable::Format12(f12)) =
        subtables.iter().find(|s| matches!(s, CmapSubtable::Format12(_)))
    {
        return f12.iter().filter_map(to_pair).collect();
    }
    if let Some(CmapSubtable::Format4(f4)) =
        subtables.iter().find(|s| matches!(s, CmapSubtable::Format4(_)))
    {
        return f4.iter().filter_map(to_pair).collect();
    }
    Vec::new()
}
