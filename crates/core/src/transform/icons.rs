//! Icon glyphs from a symbol font.

use std::{
    collections::HashSet,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glyph_container::FontContainer;
use kurbo::Affine;
use log::{debug, info};

/// Powerline separators, which must line up with the cell edges.
const POWERLINE: RangeInclusive<u32> = 0xE0B0..=0xE0D4;

/// Right-pointing powerline glyphs drawn right of their origin.
const POWERLINE_NUDGES: [(u32, f64); 5] = [
    (0xE0B2, -353.0),
    (0xE0B6, -414.0),
    (0xE0C5, -137.0),
    (0xE0C7, -214.0),
    (0xE0D4, -314.0),
];

/// Powerline glyphs are stretched to cover the line gap.
const POWERLINE_Y_SCALE: f64 = 1.21;
const POWERLINE_Y_SHIFT: f64 = -24.0;

/// The icon font, loaded and prepared on first use.
///
/// Preparation depends on the em size and the Latin cell width, which are the
/// same for every variant of a build.
#[derive(Debug)]
pub struct IconCache {
    path: PathBuf,
    icons: Option<FontContainer>,
}

impl IconCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), icons: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.icons.is_some()
    }

    /// The prepared icons, loading them if needed.
    ///
    /// `half` is the width every icon is set to; `full_width` is the cell
    /// below which plain icons are centered on `half`.
    pub fn get(
        &mut self,
        units_per_em: u16,
        half: i32,
        full_width: i32,
    ) -> Result<&FontContainer> {
        if self.icons.is_none() {
            let mut icons = FontContainer::open(&self.path)
                .with_context(|| format!("Failed to open icon font: {}", self.path.display()))?;
            prepare_icons(&mut icons, units_per_em, half, full_width)?;
            info!("Loaded {} icons from {}", icons.len(), self.path.display());
            self.icons = Some(icons);
        }
        self.icons.as_ref().context("Icon font not loaded")
    }
}

fn prepare_icons(
    icons: &mut FontContainer,
    units_per_em: u16,
    half: i32,
    full_width: i32,
) -> Result<()> {
    icons.set_units_per_em(units_per_em);

    let mut names = HashSet::new();
    for index in 0..icons.len() {
        let name = icons.glyph(index)?.name.clone();
        if !names.insert(name.clone()) {
            let unique = format!("{name}-{index}");
            names.insert(unique.clone());
            icons.rename(index, unique)?;
        }

        let glyph = icons.glyph(index)?;
        let codepoint = glyph.codepoint;
        let width = glyph.width;

        if codepoint.is_some_and(|cp| POWERLINE.contains(&cp)) {
            if let Some(&(_, dx)) = POWERLINE_NUDGES.iter().find(|(cp, _)| Some(*cp) == codepoint)
            {
                icons.translate(index, dx, 0.0)?;
            }
            if width < half {
                icons.translate(index, f64::from(half - width) / 2.0, 0.0)?;
            } else if width > half {
                let x_scale = f64::from(half) / f64::from(width);
                icons.transform(index, Affine::scale_non_uniform(x_scale, 1.0))?;
            }
            icons.transform(index, Affine::scale_non_uniform(1.0, POWERLINE_Y_SCALE))?;
            icons.translate(index, 0.0, POWERLINE_Y_SHIFT)?;
        } else if width < full_width {
            icons.translate(index, f64::from(half - width) / 2.0, 0.0)?;
        }
        icons.set_width(index, half)?;
    }
    Ok(())
}

/// Append every icon to the Japanese font.
///
/// Glyphs of either font at an icon codepoint are cleared first so the icon
/// takes the codepoint in the merged font. Returns the number of codepoints
/// taken over.
pub fn splice_icons(
    icons: &FontContainer,
    japanese: &mut FontContainer,
    latin: &mut FontContainer,
) -> Result<usize> {
    let mut taken = 0;
    for codepoint in icons.glyphs().iter().flat_map(|glyph| glyph.codepoints()) {
        let mut replaced = false;
        for font in [&mut *japanese, &mut *latin] {
            while let Some(index) = font.lookup(codepoint) {
                font.clear(index)?;
                replaced = true;
            }
        }
        if replaced {
            taken += 1;
        }
    }

    japanese.merge_glyphs_from(icons);
    debug!("Spliced {} icons, {taken} replacing existing glyphs", icons.len());
    Ok(taken)
}
