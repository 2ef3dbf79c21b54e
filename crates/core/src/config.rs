//! Build configuration loaded from `build.toml`.

use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use kanamono_font_metadata::{FontVersion, VerticalMetrics};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "build.toml";

/// Environment variables that take precedence over the configured directories.
pub const SOURCE_FONTS_DIR_ENV: &str = "SOURCE_FONTS_DIR";
pub const BUILD_FONTS_DIR_ENV: &str = "BUILD_FONTS_DIR";

/// Icon font, relative to the source directory.
const ICON_FONT: &str = "nerd-fonts/SymbolsNerdFont-Regular.ttf";

/// Placeholder replaced by the source style in `JP_FONT` and `ENG_FONT`.
const STYLE_PLACEHOLDER: &str = "{style}";

fn default_hinter() -> String {
    "ttfautohint".to_string()
}

/// Every setting of a build. Loaded once and never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct BuildConfig {
    pub version: String,
    pub font_name: String,
    /// Japanese source file name, with a `{style}` placeholder.
    pub jp_font: String,
    /// Latin source file name, with a `{style}` placeholder.
    pub eng_font: String,
    pub source_fonts_dir: PathBuf,
    pub build_fonts_dir: PathBuf,
    pub vender_name: String,
    pub fontforge_prefix: String,
    pub fonttools_prefix: String,
    /// Filler font providing the visible U+3000, relative to the source directory.
    pub ideographic_space: String,
    pub half_width_str: String,
    pub full_width_35_str: String,
    pub invisible_zenkaku_space_str: String,
    pub jpdoc_str: String,
    pub nerd_fonts_str: String,
    pub em_ascent: i16,
    pub em_descent: i16,
    pub os2_ascent: i16,
    pub os2_descent: i16,
    pub os2_linegap: i16,
    pub half_width_12: i32,
    pub half_width_35: i32,
    pub full_width_35: i32,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default = "default_hinter")]
    pub hinter: String,
}

/// Advance widths of the character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWidths {
    /// Half-width cell after compression to a 1:2 ratio.
    pub half_width_12: i32,
    pub half_width_35: i32,
    pub full_width_35: i32,
}

impl BuildConfig {
    /// Load the configuration file, then apply the directory overrides from
    /// the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        config.apply_overrides(
            env::var_os(SOURCE_FONTS_DIR_ENV).map(PathBuf::from),
            env::var_os(BUILD_FONTS_DIR_ENV).map(PathBuf::from),
        );
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the source and build directories. Empty values are ignored.
    pub fn apply_overrides(&mut self, source: Option<PathBuf>, build: Option<PathBuf>) {
        if let Some(dir) = source.filter(|d| !d.as_os_str().is_empty()) {
            self.source_fonts_dir = dir;
        }
        if let Some(dir) = build.filter(|d| !d.as_os_str().is_empty()) {
            self.build_fonts_dir = dir;
        }
    }

    fn validate(&self) -> Result<()> {
        if i32::from(self.em_ascent) + i32::from(self.em_descent) <= 0 {
            bail!("EM_ASCENT + EM_DESCENT must be positive");
        }
        if self.half_width_12 <= 0 || self.half_width_35 <= 0 || self.full_width_35 <= 0 {
            bail!("HALF_WIDTH_12, HALF_WIDTH_35 and FULL_WIDTH_35 must be positive");
        }
        if self.half_width_35 >= self.full_width_35 {
            bail!("HALF_WIDTH_35 must be narrower than FULL_WIDTH_35");
        }
        // intermediates are deleted by prefix, final fonts have none
        if self.fontforge_prefix.is_empty() || self.fonttools_prefix.is_empty() {
            bail!("FONTFORGE_PREFIX and FONTTOOLS_PREFIX must not be empty");
        }
        for (key, value) in [("JP_FONT", &self.jp_font), ("ENG_FONT", &self.eng_font)] {
            if !value.contains(STYLE_PLACEHOLDER) {
                bail!("{key} must contain {STYLE_PLACEHOLDER}: {value}");
            }
        }
        Ok(())
    }

    pub fn units_per_em(&self) -> u16 {
        (i32::from(self.em_ascent) + i32::from(self.em_descent)) as u16
    }

    /// Metrics as configured, before any line-height option.
    pub fn metrics(&self) -> VerticalMetrics {
        VerticalMetrics {
            em_ascent: self.em_ascent,
            em_descent: self.em_descent,
            os2_ascent: self.os2_ascent,
            os2_descent: self.os2_descent,
            os2_linegap: self.os2_linegap,
        }
    }

    pub fn cells(&self) -> CellWidths {
        CellWidths {
            half_width_12: self.half_width_12,
            half_width_35: self.half_width_35,
            full_width_35: self.full_width_35,
        }
    }

    pub fn font_version(&self) -> FontVersion {
        FontVersion::new(&self.version)
    }

    /// `FONT_NAME` without spaces, as used in file and PostScript names.
    pub fn compact_name(&self) -> String {
        self.font_name.replace(' ', "")
    }

    pub fn japanese_source(&self, style: &str) -> PathBuf {
        self.source_fonts_dir.join(self.jp_font.replace(STYLE_PLACEHOLDER, style))
    }

    pub fn latin_source(&self, style: &str) -> PathBuf {
        self.source_fonts_dir.join(self.eng_font.replace(STYLE_PLACEHOLDER, style))
    }

    pub fn icon_font(&self) -> PathBuf {
        self.source_fonts_dir.join(ICON_FONT)
    }

    pub fn filler_font(&self) -> PathBuf {
        self.source_fonts_dir.join(&self.ideographic_space)
    }
}
