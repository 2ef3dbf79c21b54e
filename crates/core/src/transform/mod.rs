//! Glyph edits applied while assembling a variant.

mod dedup;
mod geometry;
mod icons;
mod italic;
mod resolve;
mod symbols;
mod zenkaku;

pub use dedup::remove_duplicates;
pub use geometry::{center_brackets, compress_half_width, normalize_em, quantize_widths};
pub use icons::{IconCache, splice_icons};
pub use italic::{ITALIC_ANGLE, italicize};
pub use resolve::resolve_alternates;
pub use symbols::{BOX_DRAWING, JPDOC_SYMBOLS, extend_box_drawing, remove_jpdoc_symbols};
pub use zenkaku::{IDEOGRAPHIC_SPACE, visualize_zenkaku_space};
