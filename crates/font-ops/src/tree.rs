//! Editable copies of the compact metrics tables.

use anyhow::{Context, Result};
use read_fonts::{FontRef, TableProvider};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{cmap::Cmap, head::Head, hhea::Hhea, os2::Os2, post::Post},
};

use crate::rewrite_font;

/// The OS/2, post, hhea, cmap and head tables of a font, parsed into owned
/// structures that can be edited and written back.
#[derive(Debug, Clone)]
pub struct TableTree {
    pub head: Head,
    pub hhea: Hhea,
    pub os2: Os2,
    pub post: Post,
    pub cmap: Cmap,
}

impl TableTree {
    /// Dump the five tables from font data.
    pub fn dump(data: &[u8]) -> Result<Self> {
        let font = FontRef::new(data).context("Failed to parse font")?;
        Ok(Self {
            head: font.head().context("Font has no head table")?.to_owned_table(),
            hhea: font.hhea().context("Font has no hhea table")?.to_owned_table(),
            os2: font.os2().context("Font has no OS/2 table")?.to_owned_table(),
            post: font.post().context("Font has no post table")?.to_owned_table(),
            cmap: font.cmap().context("Font has no cmap table")?.to_owned_table(),
        })
    }

    /// Apply the tree onto font data, keeping every other table as-is.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>> {
        rewrite_font(data, |_font, builder| {
            builder.add_table(&self.head)?;
            builder.add_table(&self.hhea)?;
            builder.add_table(&self.os2)?;
            builder.add_table(&self.post)?;
            builder.add_table(&self.cmap)?;
            Ok(())
        })
    }
}
