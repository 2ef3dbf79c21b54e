//! Generic font table manipulation utilities.

mod tree;
mod uvs;

pub use tree::TableTree;
pub use uvs::{VariationSequence, build_cmap14, read_variation_sequences, splice_cmap14};

use anyhow::Result;
use read_fonts::{FontRef, TableProvider, types::Tag};
use write_fonts::{
    FontBuilder,
    tables::name::{Name, NameRecord},
    types::NameId,
};

/// Windows platform, Unicode BMP encoding, English (US).
const WINDOWS_PLATFORM: u16 = 3;
const WINDOWS_UNICODE_BMP: u16 = 1;
const ENGLISH_US: u16 = 0x0409;

/// Rewrite font data by applying a transformation function.
///
/// Copies all tables from the source font, then calls `f` to modify or add tables.
/// The function receives a reference to the source font and a mutable builder
/// that already contains all original tables.
pub fn rewrite_font(
    data: &[u8],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}

/// Rebuild font data without the listed tables.
///
/// Tables that are not present are ignored.
pub fn drop_tables(data: &[u8], tags: &[Tag]) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if tags.contains(&tag) {
            continue;
        }
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    Ok(builder.build())
}

/// Set name records to fixed values.
///
/// Every existing Windows record carrying one of the given IDs is replaced; IDs
/// without a Windows English (US) record get one. Records on other platforms for
/// those IDs are dropped so stale Macintosh strings cannot shadow the new ones.
pub fn set_name_records(font: &FontRef, values: &[(u16, String)]) -> Result<Name> {
    let lookup = |id: u16| values.iter().find(|(name_id, _)| *name_id == id).map(|(_, v)| v);
    let name = font.name()?;
    let mut new_records = Vec::new();
    let mut present = Vec::new();

    for record in name.name_record() {
        let name_id = record.name_id().to_u16();
        let platform = record.platform_id();
        let new_string = match lookup(name_id) {
            Some(_) if platform != WINDOWS_PLATFORM => continue,
            Some(value) => {
                if record.language_id() == ENGLISH_US {
                    present.push(name_id);
                }
                value.clone()
            }
            None => match record.string(name.string_data()) {
                Ok(s) => s.chars().collect::<String>(),
                Err(_) => continue,
            },
        };

        new_records.push(NameRecord::new(
            platform,
            record.encoding_id(),
            record.language_id(),
            NameId::new(name_id),
            new_string.into(),
        ));
    }

    for (name_id, value) in values {
        if present.contains(name_id) {
            continue;
        }
        new_records.push(NameRecord::new(
            WINDOWS_PLATFORM,
            WINDOWS_UNICODE_BMP,
            ENGLISH_US,
            NameId::new(*name_id),
            value.clone().into(),
        ));
    }

    new_records.sort_by_key(|r| (r.platform_id, r.encoding_id, r.language_id, r.name_id.to_u16()));
    Ok(Name::new(new_records))
}
