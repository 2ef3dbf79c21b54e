use std::collections::BTreeSet;

use anyhow::Result;
use glyph_container::FontContainer;
use log::debug;

/// Clear the Japanese glyphs whose codepoints the Latin font already covers.
///
/// Only codepoints of glyphs worth outputting are considered. Returns the
/// number of glyphs cleared.
pub fn remove_duplicates(japanese: &mut FontContainer, latin: &FontContainer) -> Result<usize> {
    let duplicates: BTreeSet<usize> = japanese
        .codepoints()
        .filter(|&cp| cp > 0 && latin.lookup(cp).is_some())
        .filter_map(|cp| japanese.lookup(cp))
        .filter(|&index| japanese.glyphs()[index].is_worth_outputting())
        .collect();

    for &index in &duplicates {
        japanese.clear(index)?;
    }
    debug!("Cleared {} Japanese glyphs covered by the Latin font", duplicates.len());
    Ok(duplicates.len())
}
