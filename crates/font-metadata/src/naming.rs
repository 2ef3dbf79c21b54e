//! Per-container naming and metrics, written before the containers are merged.

use anyhow::{Result, bail};
use font_types::{FWord, Tag};
use kanamono_font_ops::{rewrite_font, set_name_records};
use read_fonts::TableProvider;
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{head::Head, hhea::Hhea, os2::Os2},
};

use crate::{FontVersion, Style, VerticalMetrics};

const NAME_ID_COPYRIGHT: u16 = 0;
const NAME_ID_FAMILY: u16 = 1;
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_UNIQUE_ID: u16 = 3;
const NAME_ID_FULL_NAME: u16 = 4;
const NAME_ID_VERSION: u16 = 5;
const NAME_ID_POSTSCRIPT: u16 = 6;
const NAME_ID_LICENSE: u16 = 13;
const NAME_ID_LICENSE_URL: u16 = 14;

pub const LICENSE: &str = "This Font Software is licensed under the SIL Open Font License, \
Version 1.1. This license is available with a FAQ at: http://scripts.sil.org/OFL";
pub const LICENSE_URL: &str = "http://scripts.sil.org/OFL";

const WIDTH_CLASS_MEDIUM: u16 = 5;
const FS_TYPE_INSTALLABLE: u16 = 0;
/// Sans serif, typewriter gothic
const FAMILY_CLASS_TYPEWRITER_GOTHIC: i16 = 2057;

/// Names of one member of the family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyNames {
    font_name: String,
    token: String,
    style: Style,
}

impl FamilyNames {
    pub fn new(font_name: impl Into<String>, token: impl Into<String>, style: Style) -> Self {
        Self { font_name: font_name.into(), token: token.into(), style }
    }

    /// "{font name} {token}", trimmed when the token is empty.
    pub fn family(&self) -> String {
        format!("{} {}", self.font_name, self.token).trim().to_string()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.family(), self.style)
    }

    pub fn postscript_name(&self) -> String {
        format!("{}{}-{}", self.font_name.replace(' ', ""), self.token, self.style)
    }

    /// Stem shared by every file of this member, e.g. `KanamonoHW-Bold`.
    pub fn file_stem(&self) -> String {
        self.postscript_name()
    }
}

/// Metadata written to each container of a variant.
#[derive(Debug, Clone)]
pub struct ContainerMetadata {
    pub names: FamilyNames,
    pub version: FontVersion,
    pub vendor: String,
    pub copyright: Option<String>,
    pub metrics: VerticalMetrics,
    pub weight_class: u16,
}

impl ContainerMetadata {
    fn style(&self) -> Style {
        self.names.style
    }

    fn name_records(&self) -> Vec<(u16, String)> {
        let postscript = self.names.postscript_name();
        let mut records = vec![
            (NAME_ID_FAMILY, self.names.family()),
            (NAME_ID_SUBFAMILY, self.style().to_string()),
            (
                NAME_ID_UNIQUE_ID,
                format!("{};{};{postscript}", self.version.as_str(), self.vendor),
            ),
            (NAME_ID_FULL_NAME, self.names.full_name()),
            (NAME_ID_VERSION, self.version.as_str().to_string()),
            (NAME_ID_POSTSCRIPT, postscript),
            (NAME_ID_LICENSE, LICENSE.to_string()),
            (NAME_ID_LICENSE_URL, LICENSE_URL.to_string()),
        ];
        if let Some(copyright) = &self.copyright {
            records.insert(0, (NAME_ID_COPYRIGHT, copyright.trim_end().to_string()));
        }
        records
    }

    /// Write names, style flags and vertical metrics into font data.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>> {
        let vendor = vendor_tag(&self.vendor)?;
        let metrics = self.metrics;
        let style = self.style();

        rewrite_font(data, |font, builder| {
            let mut head: Head = font.head()?.to_owned_table();
            if let Some(revision) = self.version.revision() {
                head.font_revision = revision;
            }
            head.mac_style = style.mac_style();
            builder.add_table(&head)?;

            let mut hhea: Hhea = font.hhea()?.to_owned_table();
            hhea.ascender = FWord::new(metrics.os2_ascent);
            hhea.descender = FWord::new(-metrics.os2_descent);
            hhea.line_gap = FWord::new(0);
            builder.add_table(&hhea)?;

            if let Ok(os2) = font.os2() {
                let mut os2: Os2 = os2.to_owned_table();
                os2.s_typo_ascender = metrics.em_ascent;
                os2.s_typo_descender = -metrics.em_descent;
                os2.s_typo_line_gap = metrics.os2_linegap;
                os2.us_win_ascent = metrics.win_ascent();
                os2.us_win_descent = metrics.win_descent();
                os2.ach_vend_id = vendor;
                os2.us_width_class = WIDTH_CLASS_MEDIUM;
                os2.fs_type = FS_TYPE_INSTALLABLE;
                os2.s_family_class = FAMILY_CLASS_TYPEWRITER_GOTHIC;
                os2.us_weight_class = self.weight_class;
                builder.add_table(&os2)?;
            }

            if font.name().is_ok() {
                builder.add_table(&set_name_records(font, &self.name_records())?)?;
            }
            Ok(())
        })
    }
}

/// OS/2 vendor id, padded with spaces to four bytes.
pub fn vendor_tag(vendor: &str) -> Result<Tag> {
    let bytes = vendor.as_bytes();
    if bytes.is_empty() || bytes.len() > 4 || !vendor.is_ascii() {
        bail!("Vendor id '{vendor}' must be one to four ASCII characters");
    }
    let mut tag = [b' '; 4];
    tag[..bytes.len()].copy_from_slice(bytes);
    Ok(Tag::new(&tag))
}
