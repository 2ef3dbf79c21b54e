//! TrueType hinting program checks
//!
//! Only the first font's `fpgm`, `prep` and `cvt ` are kept, so glyphs from
//! later fonts lose their instructions. A mismatch is worth a warning.

use log::{debug, warn};
use read_fonts::{FontRef, types::Tag};

const HINT_TABLES: [Tag; 3] = [Tag::new(b"fpgm"), Tag::new(b"prep"), Tag::new(b"cvt ")];

/// `true` when every hinted font carries the same programs.
pub fn check_hint_compatibility(fonts: &[FontRef]) -> bool {
    let programs = |font: &FontRef| -> Vec<Option<Vec<u8>>> {
        HINT_TABLES
            .iter()
            .map(|tag| font.table_data(*tag).map(|data| data.as_bytes().to_vec()))
            .collect()
    };
    let hinted: Vec<Vec<Option<Vec<u8>>>> = fonts
        .iter()
        .map(programs)
        .filter(|tables| tables.iter().any(Option::is_some))
        .collect();

    let compatible = hinted.windows(2).all(|pair| pair[0] == pair[1]);
    if !compatible {
        warn!(
            "Fonts carry different TrueType hinting programs; only the first font's are kept \
             and glyphs from later fonts lose their instructions"
        );
    }
    compatible
}

pub fn log_hint_info(fonts: &[FontRef]) {
    for (i, font) in fonts.iter().enumerate() {
        let [fpgm, prep, cvt] = HINT_TABLES.map(|tag| font.table_data(tag).is_some());
        if fpgm || prep || cvt {
            debug!("Font {i}: fpgm={fpgm}, prep={prep}, cvt={cvt}");
        }
    }
}
