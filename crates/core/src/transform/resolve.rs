use anyhow::{Context, Result};
use glyph_container::FontContainer;
use log::debug;

/// Give every alternate codepoint its own glyph.
///
/// Each alternate gets a `uniXXXXcopy` glyph holding a copy of the source
/// outline and width. Repeated alternates are copied once. The font is then
/// compacted so its encoding is rebuilt.
pub fn resolve_alternates(mut font: FontContainer) -> Result<FontContainer> {
    let mut copies = 0;

    for index in 0..font.len() {
        let source = font.glyph(index)?;
        if source.alternates.is_empty() {
            continue;
        }
        let source = source.clone();
        font.detach_alternates(index)?;

        let mut previous = None;
        for codepoint in source.alternates.iter().copied() {
            if previous == Some(codepoint) {
                continue;
            }
            previous = Some(codepoint);

            let name = format!("uni{codepoint:04X}copy");
            let target = font
                .create_glyph(codepoint, &name)
                .with_context(|| format!("Failed to create {name} from {}", source.name))?
                .index();
            font.copy_outline(target, &source)?;
            copies += 1;
        }
    }

    debug!("Resolved {copies} alternate codepoints");
    font.compact().context("Failed to compact font")
}
