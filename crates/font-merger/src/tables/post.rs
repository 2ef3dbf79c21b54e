use font_types::{FWord, Fixed};
use read_fonts::TableProvider;
use write_fonts::tables::post::Post;

use crate::{Result, context::MergeContext, strategies::first};

/// Version 2 post carrying the merged glyph names; everything else comes
/// from the first font.
pub fn merge_post(ctx: &MergeContext) -> Result<Post> {
    let tables = ctx.tables(|f| f.post())?;
    let primary = first(&tables)?;

    let mut post = Post::new_v2(ctx.names().iter().map(|name| name.as_str()));
    post.italic_angle = Fixed::from_bits(primary.italic_angle().to_bits());
    post.underline_position = FWord::new(primary.underline_position().to_i16());
    post.underline_thickness = FWord::new(primary.underline_thickness().to_i16());
    post.is_fixed_pitch = primary.is_fixed_pitch();
    post.min_mem_type42 = primary.min_mem_type42();
    post.max_mem_type42 = primary.max_mem_type42();
    post.min_mem_type1 = primary.min_mem_type1();
    post.max_mem_type1 = primary.max_mem_type1();
    Ok(post)
}
