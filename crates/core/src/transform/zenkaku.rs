use anyhow::{Context, Result};
use glyph_container::FontContainer;
use log::warn;

pub const IDEOGRAPHIC_SPACE: u32 = 0x3000;

/// Replace the ideographic space with the filler font's visible one.
///
/// The filler outline is centered in the original advance, which is kept.
pub fn visualize_zenkaku_space(japanese: &mut FontContainer, filler: &FontContainer) -> Result<()> {
    let Some(index) = japanese.lookup(IDEOGRAPHIC_SPACE) else {
        warn!("Japanese font has no U+3000; leaving it invisible");
        return Ok(());
    };
    let source = filler.lookup_glyph(IDEOGRAPHIC_SPACE).context("Filler font has no U+3000")?;

    let glyph = japanese.glyph(index)?;
    let width_to = glyph.width;
    let name = glyph.name.clone();

    japanese.clear(index)?;
    let target = japanese.create_glyph(IDEOGRAPHIC_SPACE, &name)?.index();
    japanese.copy_outline(target, source)?;
    japanese.translate(target, f64::from(width_to - source.width) / 2.0, 0.0)?;
    japanese.set_width(target, width_to)?;
    Ok(())
}
