use glyph_container::FontContainer;
use kurbo::Affine;

/// Slant of the italic styles, in degrees.
pub const ITALIC_ANGLE: f64 = 9.0;

/// Shear every outline by [`ITALIC_ANGLE`] and record the angle.
pub fn italicize(font: &mut FontContainer) {
    font.set_italic_angle(-ITALIC_ANGLE);
    font.transform_all(Affine::skew(ITALIC_ANGLE.to_radians().tan(), 0.0));
}
