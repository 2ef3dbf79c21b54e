/// Ascent, descent and line gap values written to hhea and OS/2.
///
/// `em_ascent + em_descent` is the em size. The `os2_*` values set the line
/// height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalMetrics {
    pub em_ascent: i16,
    pub em_descent: i16,
    pub os2_ascent: i16,
    pub os2_descent: i16,
    pub os2_linegap: i16,
}

impl VerticalMetrics {
    pub const fn units_per_em(&self) -> u16 {
        (self.em_ascent as i32 + self.em_descent as i32) as u16
    }

    pub const fn win_ascent(&self) -> u16 {
        if self.os2_ascent < 0 { 0 } else { self.os2_ascent as u16 }
    }

    pub const fn win_descent(&self) -> u16 {
        if self.os2_descent < 0 { 0 } else { self.os2_descent as u16 }
    }
}
