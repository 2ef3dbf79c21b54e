//! Editable glyph containers.
//!
//! A [`FontContainer`] loads every outline of a TrueType or CFF font into
//! quadratic [`kurbo::BezPath`]s, lets callers edit glyphs by index or
//! codepoint, and saves the result as a TrueType font.

mod container;
mod error;
mod glyph;
mod save;

pub use container::{Creation, FontContainer};
pub use error::{GlyphError, Result};
pub use glyph::Glyph;
