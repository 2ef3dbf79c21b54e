//! Binary font merging.
//!
//! Fonts are merged in order: glyphs are concatenated, the first font to map
//! a codepoint keeps it, and tables without a merge rule come from the first
//! font.

mod context;
mod error;
mod glyph_order;
mod merger;
mod strategies;
mod tables;
mod types;

pub use context::MergeContext;
pub use error::{MergeError, Result};
pub use glyph_order::{GlyphName, GlyphOrder};
pub use merger::{Merged, Merger};
pub use types::{Codepoint, FontIndex, GlyphId, MegaGlyphId};
