//! The four variants of a build and the files each one goes through.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kanamono_font_metadata::Style;

use crate::{config::BuildConfig, options::AssembleOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub style: Style,
    /// Style of the Japanese source.
    pub japanese_style: &'static str,
    /// Slant suffix of the Latin source, after the weight.
    pub latin_slant: &'static str,
}

impl Variant {
    pub const fn new(
        style: Style,
        japanese_style: &'static str,
        latin_slant: &'static str,
    ) -> Self {
        Self { style, japanese_style, latin_slant }
    }

    pub const fn is_italic(&self) -> bool {
        self.style.is_italic()
    }

    /// Latin source style, e.g. `700-Italic`.
    pub fn latin_style(&self, options: &AssembleOptions) -> String {
        format!("{}-{}", options.weight_class(self.style), self.latin_slant)
    }
}

/// Build order of the variants.
pub const VARIANTS: [Variant; 4] = [
    Variant::new(Style::Regular, "Regular", "Regular"),
    Variant::new(Style::Bold, "Bold", "Regular"),
    Variant::new(Style::Italic, "Regular", "Italic"),
    Variant::new(Style::BoldItalic, "Bold", "Italic"),
];

/// Paths of the intermediate and final files of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFiles {
    pub latin: PathBuf,
    pub japanese: PathBuf,
    pub hinted: PathBuf,
    pub merged: PathBuf,
    pub output: PathBuf,
}

impl VariantFiles {
    pub fn new(config: &BuildConfig, token: &str, style: Style) -> Self {
        let dir = &config.build_fonts_dir;
        let name = config.compact_name();
        let stem = format!("{}{name}{token}-{style}", config.fontforge_prefix);
        let merged = format!("{}{name}{token}-{style}_merged.ttf", config.fonttools_prefix);
        Self {
            latin: dir.join(format!("{stem}-eng.ttf")),
            japanese: dir.join(format!("{stem}-jp.ttf")),
            hinted: dir.join(format!("{stem}-eng-hinted.ttf")),
            merged: dir.join(merged),
            output: dir.join(format!("{name}{token}-{style}.ttf")),
        }
    }

    /// Recover the token and style from the path of a Latin intermediate.
    ///
    /// The style is the second `-` separated field of the file stem; the
    /// token is the first field without the prefix and the font name.
    pub fn parse_latin(config: &BuildConfig, path: &Path) -> Result<(String, Style)> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Invalid filename: {}", path.display()))?;
        let mut fields = stem.split('-');
        let head = fields.next().unwrap_or_default();
        let style = fields
            .next()
            .with_context(|| format!("No style in filename: {}", path.display()))?
            .parse::<Style>()?;

        let prefix = format!("{}{}", config.fontforge_prefix, config.compact_name());
        let token = head
            .strip_prefix(&prefix)
            .with_context(|| format!("Filename does not start with {prefix}: {}", path.display()))?;
        Ok((token.to_string(), style))
    }
}
