//! Table values of the merged font.
//!
//! Renderers disagree on which of hhea, OS/2 typo and OS/2 win metrics they
//! honor, so all three are written explicitly along with the style flags.

use font_types::FWord;
use kanamono_font_ops::TableTree;

use crate::{Style, VerticalMetrics};

const UNDERLINE_POSITION: i16 = -100;

/// Rewrite applied to the head, hhea, OS/2 and post tables of a merged font.
#[derive(Debug, Clone, Copy)]
pub struct TableFix {
    pub style: Style,
    pub metrics: VerticalMetrics,
    /// OS/2 xAvgCharWidth
    pub average_width: i16,
}

impl TableFix {
    pub fn apply(&self, tree: &mut TableTree) {
        tree.head.mac_style = self.style.mac_style();

        let os2 = &mut tree.os2;
        os2.x_avg_char_width = self.average_width;
        os2.s_typo_ascender = self.metrics.em_ascent;
        os2.s_typo_descender = -self.metrics.em_descent;
        os2.s_typo_line_gap = self.metrics.os2_linegap;
        os2.us_win_ascent = self.metrics.win_ascent();
        os2.us_win_descent = self.metrics.win_descent();
        os2.fs_selection = self.style.fs_selection();
        os2.panose_10 = self.style.panose();
        force_os2_version(os2);

        let (rise, run) = self.style.caret_slope();
        let hhea = &mut tree.hhea;
        hhea.ascender = FWord::new(self.metrics.os2_ascent);
        hhea.descender = FWord::new(-self.metrics.os2_descent);
        hhea.line_gap = FWord::new(0);
        hhea.caret_slope_rise = rise;
        hhea.caret_slope_run = run;

        tree.post.is_fixed_pitch = 1;
        tree.post.underline_position = FWord::new(UNDERLINE_POSITION);
    }
}

/// Shape the OS/2 table as a version 4 table.
///
/// write-fonts derives the version from which optional fields are present:
/// the version 2 to 4 fields set and the version 5 ones cleared gives 4.
fn force_os2_version(os2: &mut write_fonts::tables::os2::Os2) {
    os2.ul_code_page_range_1.get_or_insert(0);
    os2.ul_code_page_range_2.get_or_insert(0);
    os2.sx_height.get_or_insert(0);
    os2.s_cap_height.get_or_insert(0);
    os2.us_default_char.get_or_insert(0);
    os2.us_break_char.get_or_insert(0x20);
    os2.us_max_context.get_or_insert(0);
    os2.us_lower_optical_point_size = None;
    os2.us_upper_optical_point_size = None;
}
