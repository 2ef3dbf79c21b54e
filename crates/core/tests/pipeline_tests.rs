use std::{
    fs,
    path::{Path, PathBuf},
};

use glyph_container::FontContainer;
use kanamono_core::{
    AssembleOptions, BuildConfig, Hinter, Style, assemble, build,
    config::CellWidths,
    finish,
    transform::{
        ITALIC_ANGLE, IconCache, center_brackets, compress_half_width, extend_box_drawing,
        italicize, quantize_widths, remove_duplicates, remove_jpdoc_symbols, resolve_alternates,
        splice_icons, visualize_zenkaku_space,
    },
};
use kanamono_font_metadata::TableFix;
use kanamono_font_ops::{TableTree, VariationSequence, read_variation_sequences, splice_cmap14};
use kurbo::{BezPath, Rect};
use read_fonts::{FontRef, TableProvider, types::GlyphId16};
use skrifa::MetadataProvider;
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::{Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::GlyphId,
};

#[derive(Clone, Copy)]
struct TestGlyph {
    name: &'static str,
    codepoints: &'static [u32],
    rect: Option<(f64, f64, f64, f64)>,
    width: u16,
}

const fn glyph(
    name: &'static str,
    codepoints: &'static [u32],
    rect: Option<(f64, f64, f64, f64)>,
    width: u16,
) -> TestGlyph {
    TestGlyph { name, codepoints, rect, width }
}

fn rect_path((x0, y0, x1, y1): (f64, f64, f64, f64)) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((x0, y0));
    path.line_to((x0, y1));
    path.line_to((x1, y1));
    path.line_to((x1, y0));
    path.close_path();
    path
}

fn make_os2(advance: u16) -> Os2 {
    Os2 {
        x_avg_char_width: advance as i16,
        us_weight_class: 400,
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: 650,
        y_subscript_y_size: 600,
        y_subscript_x_offset: 0,
        y_subscript_y_offset: 75,
        y_superscript_x_size: 650,
        y_superscript_y_size: 600,
        y_superscript_x_offset: 0,
        y_superscript_y_offset: 350,
        y_strikeout_size: 50,
        y_strikeout_position: 300,
        s_family_class: 0,
        panose_10: [0; 10],
        ul_unicode_range_1: 1,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: font_types::Tag::new(b"NONE"),
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: 0x20,
        us_last_char_index: 0x20,
        s_typo_ascender: 800,
        s_typo_descender: -200,
        s_typo_line_gap: 0,
        us_win_ascent: 900,
        us_win_descent: 200,
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(500),
        s_cap_height: Some(700),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    }
}

/// Build a TrueType font with rectangle outlines and an OS/2 table.
fn make_font(glyphs: &[TestGlyph]) -> Vec<u8> {
    make_font_with_sequences(glyphs, &[])
}

fn make_font_with_sequences(glyphs: &[TestGlyph], sequences: &[VariationSequence]) -> Vec<u8> {
    let mut glyf_builder = GlyfLocaBuilder::new();
    for g in glyphs {
        match g.rect {
            Some(rect) => {
                let simple = SimpleGlyph::from_bezpath(&rect_path(rect)).unwrap();
                glyf_builder.add_glyph(&simple).unwrap();
            }
            None => {
                glyf_builder.add_glyph(&Glyph::Empty).unwrap();
            }
        }
    }
    let (glyf, loca, loca_format) = glyf_builder.build();
    let max_advance = glyphs.iter().map(|g| g.width).max().unwrap_or(0);

    let head = Head {
        font_revision: font_types::Fixed::from_f64(1.0),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: write_fonts::tables::head::Flags::empty(),
        units_per_em: 1000,
        created: font_types::LongDateTime::new(0),
        modified: font_types::LongDateTime::new(0),
        x_min: 0,
        y_min: -300,
        x_max: 1000,
        y_max: 1100,
        mac_style: MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            write_fonts::tables::loca::LocaFormat::Short => 0,
            write_fonts::tables::loca::LocaFormat::Long => 1,
        },
    };
    let hhea = Hhea {
        ascender: font_types::FWord::new(880),
        descender: font_types::FWord::new(-120),
        line_gap: font_types::FWord::new(0),
        advance_width_max: font_types::UfWord::new(max_advance),
        min_left_side_bearing: font_types::FWord::new(0),
        min_right_side_bearing: font_types::FWord::new(0),
        x_max_extent: font_types::FWord::new(1000),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: glyphs.len() as u16,
    };
    let hmtx = Hmtx {
        h_metrics: glyphs
            .iter()
            .map(|g| LongMetric {
                advance: g.width,
                side_bearing: g.rect.map(|r| r.0 as i16).unwrap_or(0),
            })
            .collect(),
        left_side_bearings: vec![],
    };
    let maxp = Maxp {
        num_glyphs: glyphs.len() as u16,
        max_points: Some(4),
        max_contours: Some(1),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };
    let post = Post::new_v2(glyphs.iter().map(|g| g.name));
    let mut mappings: Vec<(char, GlyphId)> = glyphs
        .iter()
        .enumerate()
        .flat_map(|(gid, g)| {
            g.codepoints
                .iter()
                .map(move |&cp| (char::from_u32(cp).unwrap(), GlyphId::new(gid as u32)))
        })
        .collect();
    mappings.sort();
    let mut cmap = Cmap::from_mappings(mappings).unwrap();
    splice_cmap14(&mut cmap, sequences);

    let mut builder = FontBuilder::new();
    builder.add_table(&head).unwrap();
    builder.add_table(&hhea).unwrap();
    builder.add_table(&hmtx).unwrap();
    builder.add_table(&maxp).unwrap();
    builder.add_table(&post).unwrap();
    builder.add_table(&cmap).unwrap();
    builder.add_table(&make_os2(max_advance)).unwrap();
    builder.add_table(&glyf).unwrap();
    builder.add_table(&loca).unwrap();
    builder.build()
}

const LATIN: &[TestGlyph] = &[
    glyph(".notdef", &[], None, 600),
    glyph("space", &[0x20], None, 600),
    glyph("zero", &[0x30], Some((100.0, 0.0, 500.0, 700.0)), 600),
    glyph("A", &[0x41], Some((50.0, 0.0, 550.0, 700.0)), 600),
    glyph("bar", &[0x7C], Some((250.0, -250.0, 350.0, 990.0)), 600),
    glyph("uni2500", &[0x2500], Some((100.0, 150.0, 500.0, 650.0)), 600),
    glyph("arrowboth", &[0x2194], Some((50.0, 100.0, 550.0, 500.0)), 600),
    glyph("home", &[0xF015], Some((100.0, 0.0, 500.0, 400.0)), 600),
];

const JAPANESE: &[TestGlyph] = &[
    glyph(".notdef", &[], None, 1000),
    glyph("A", &[0x41], Some((100.0, 0.0, 900.0, 800.0)), 1000),
    glyph("uni3042", &[0x3042], Some((100.0, -50.0, 900.0, 800.0)), 1000),
    glyph("uni3000", &[0x3000], None, 1000),
    glyph("uniFF08", &[0xFF08], Some((600.0, -50.0, 900.0, 850.0)), 1000),
    glyph("uniFF09", &[0xFF09], Some((100.0, -50.0, 400.0, 850.0)), 1000),
    glyph("uni2194", &[0x2194], Some((100.0, 100.0, 900.0, 500.0)), 1000),
    glyph("uni2500", &[0x2500], Some((0.0, 150.0, 1000.0, 650.0)), 1000),
    glyph("uniFF61", &[0xFF61], Some((100.0, 0.0, 500.0, 400.0)), 610),
    glyph("uni30FC", &[0x30FC], Some((100.0, 300.0, 700.0, 400.0)), 800),
    glyph("uni6F22", &[0x6F22, 0xFA47], Some((50.0, -50.0, 950.0, 850.0)), 1000),
];

const FILLER: &[TestGlyph] = &[
    glyph(".notdef", &[], None, 900),
    glyph("ideographicspace", &[0x3000], Some((50.0, -50.0, 850.0, 800.0)), 900),
];

const ICONS: &[TestGlyph] = &[
    glyph(".notdef", &[], None, 1000),
    glyph("pl-right", &[0xE0B0], Some((0.0, -100.0, 700.0, 900.0)), 700),
    glyph("home", &[0xF015], Some((0.0, 0.0, 400.0, 400.0)), 400),
];

fn open(glyphs: &[TestGlyph]) -> FontContainer {
    FontContainer::from_bytes(&make_font(glyphs)).unwrap()
}

fn bbox(font: &FontContainer, codepoint: u32) -> Rect {
    font.lookup_glyph(codepoint).unwrap().bounding_box().unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}

const CELLS: CellWidths =
    CellWidths { half_width_12: 500, half_width_35: 600, full_width_35: 1000 };

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kanamono-{name}-{}", std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_quantize_snaps_to_cells() {
    let mut japanese = open(JAPANESE);
    quantize_widths(&mut japanese, CELLS).unwrap();

    for g in japanese.glyphs() {
        assert!(
            g.width == 0 || g.width == CELLS.half_width_35 || g.width == CELLS.full_width_35,
            "{} has width {}",
            g.name,
            g.width
        );
    }
    assert_eq!(japanese.width_of(0xFF61), Some(600));
    assert_close(bbox(&japanese, 0xFF61).x0, 95.0);
    assert_eq!(japanese.width_of(0x30FC), Some(1000));
    assert_close(bbox(&japanese, 0x30FC).x0, 200.0);
    assert_close(bbox(&japanese, 0x3042).x0, 100.0);
}

#[test]
fn test_remove_duplicates_prefers_latin() {
    let latin = open(LATIN);
    let mut japanese = open(JAPANESE);
    let cleared = remove_duplicates(&mut japanese, &latin).unwrap();

    // A, U+2194 and U+2500
    assert_eq!(cleared, 3);
    for cp in japanese.codepoints() {
        assert!(latin.lookup(cp).is_none(), "U+{cp:04X} is still in both fonts");
    }
    let index = japanese.find_by_name("A").unwrap();
    assert!(!japanese.glyph(index).unwrap().has_outline());
    assert!(japanese.lookup(0x3042).is_some());
}

#[test]
fn test_jpdoc_keeps_japanese_symbols() {
    let mut latin = open(LATIN);
    let mut japanese = open(JAPANESE);

    let removed = remove_jpdoc_symbols(&mut latin).unwrap();
    // bar is taller than the line, U+2194 is listed, uni2500 is a block name
    assert_eq!(removed, 3);
    assert!(latin.lookup(0x2194).is_none());
    assert!(latin.lookup(0x7C).is_none());
    assert!(latin.find_by_name("deleted_symbol_0").is_some());
    assert!(latin.lookup(0x41).is_some());

    remove_duplicates(&mut japanese, &latin).unwrap();
    assert!(japanese.lookup_glyph(0x2194).unwrap().has_outline());
    assert!(japanese.lookup(0x41).is_none());
}

#[test]
fn test_box_drawing_reaches_line_edges() {
    let config = BuildConfig::from_toml(&config_toml(Path::new("src"), Path::new("out"))).unwrap();
    let mut latin = open(LATIN);
    let stretched = extend_box_drawing(&mut latin, &config.metrics()).unwrap();
    assert_eq!(stretched, 1);

    // 950 - 880 above, 225 - 120 below
    let rect = bbox(&latin, 0x2500);
    assert_close(rect.y1, 720.0);
    assert_close(rect.y0, 45.0);
    assert_close(rect.x0, 0.0);
    assert_close(rect.x1, 600.0);
    assert_close(bbox(&latin, 0x41).y1, 700.0);
}

#[test]
fn test_center_brackets() {
    let mut japanese = open(JAPANESE);
    center_brackets(&mut japanese).unwrap();
    assert_close(bbox(&japanese, 0xFF08).x0, 433.0);
    assert_close(bbox(&japanese, 0xFF09).x0, 267.0);
    assert_eq!(japanese.width_of(0xFF08), Some(1000));
}

#[test]
fn test_half_width_digit_cell() {
    let mut latin = open(LATIN);
    let mut japanese = open(JAPANESE);
    quantize_widths(&mut japanese, CELLS).unwrap();
    compress_half_width(&mut latin, &mut japanese, CELLS).unwrap();

    assert_eq!(latin.width_of(0x30), Some(CELLS.half_width_12));
    let zero = bbox(&latin, 0x30);
    assert_close(zero.x0, 70.0);
    assert_close(zero.x1, 430.0);
    assert_eq!(japanese.width_of(0x3042), Some(2 * CELLS.half_width_12));
    assert_eq!(japanese.width_of(0xFF61), Some(CELLS.half_width_12));
}

const ODD_WIDTHS: &[TestGlyph] = &[
    glyph(".notdef", &[], None, 600),
    glyph("zero", &[0x30], Some((100.0, 0.0, 500.0, 700.0)), 600),
    glyph("hairspace", &[0x200A], None, 300),
    glyph("threequarter", &[0x2E3A], Some((0.0, 300.0, 1500.0, 400.0)), 1500),
];

#[test]
fn test_half_width_rounds_cells_to_even() {
    let mut latin = open(ODD_WIDTHS);
    let mut japanese = open(JAPANESE);
    compress_half_width(&mut latin, &mut japanese, CELLS).unwrap();

    assert_eq!(latin.width_of(0x200A), Some(0));
    assert_eq!(latin.width_of(0x2E3A), Some(2 * CELLS.half_width_12));
}

#[test]
fn test_italicize_shears_and_records_angle() {
    let mut japanese = open(JAPANESE);
    let upright = bbox(&japanese, 0x3042);
    italicize(&mut japanese);

    let slant = ITALIC_ANGLE.to_radians().tan();
    let sheared = bbox(&japanese, 0x3042);
    assert_close(sheared.x0, upright.x0 + upright.y0 * slant);
    assert_close(sheared.x1, upright.x1 + upright.y1 * slant);
    assert_close(sheared.y1, upright.y1);
    assert_eq!(japanese.lookup_glyph(0x3042).unwrap().width, 1000);

    let data = japanese.to_bytes().unwrap();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.post().unwrap().italic_angle().to_f64(), -9.0);
    let hhea = font.hhea().unwrap();
    assert_eq!((hhea.caret_slope_rise(), hhea.caret_slope_run()), (1000, 158));
}

#[test]
fn test_assemble_slants_only_japanese() {
    let (root, config) = workspace("italic");
    assemble(&config, &AssembleOptions::default()).unwrap();

    let open_intermediate = |name: &str| {
        FontContainer::open(config.build_fonts_dir.join(format!("fontforge_KanamonoMono-{name}")))
            .unwrap()
    };
    let slant = ITALIC_ANGLE.to_radians().tan();

    let upright = open_intermediate("Regular-jp.ttf");
    let italic = open_intermediate("Italic-jp.ttf");
    let (before, after) = (bbox(&upright, 0x3042), bbox(&italic, 0x3042));
    // saved outlines are rounded to whole units
    assert!((after.x1 - (before.x1 + before.y1 * slant)).abs() <= 1.0);
    assert_eq!(italic.italic_angle(), -9.0);

    let upright = open_intermediate("Regular-eng.ttf");
    let italic = open_intermediate("Italic-eng.ttf");
    assert_eq!(bbox(&italic, 0x41), bbox(&upright, 0x41));
    assert_eq!(italic.italic_angle(), 0.0);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_resolve_alternates() {
    let japanese = resolve_alternates(open(JAPANESE)).unwrap();

    let copy = japanese.lookup_glyph(0xFA47).unwrap();
    assert_eq!(copy.name, "uniFA47copy");
    assert_eq!(copy.width, 1000);
    assert_eq!(copy.bounding_box(), Some(Rect::new(50.0, -50.0, 950.0, 850.0)));

    let source = japanese.lookup_glyph(0x6F22).unwrap();
    assert_eq!(source.name, "uni6F22");
    assert!(source.alternates.is_empty());
    assert_eq!(japanese.len(), JAPANESE.len() + 1);
}

#[test]
fn test_visualize_zenkaku_space() {
    let mut japanese = open(JAPANESE);
    let filler = open(FILLER);
    visualize_zenkaku_space(&mut japanese, &filler).unwrap();

    let space = japanese.lookup_glyph(0x3000).unwrap();
    assert_eq!(space.name, "uni3000");
    assert_eq!(space.width, 1000);
    assert_eq!(space.bounding_box(), Some(Rect::new(100.0, -50.0, 900.0, 800.0)));
    assert_eq!(japanese.len(), JAPANESE.len());
}

#[test]
fn test_splice_icons() {
    let dir = temp_dir("icons");
    let path = dir.join("icons.ttf");
    fs::write(&path, make_font(ICONS)).unwrap();

    let mut cache = IconCache::new(&path);
    assert!(!cache.is_loaded());
    let icons = cache.get(1000, 600, 1000).unwrap();

    let mut latin = open(LATIN);
    let mut japanese = open(JAPANESE);
    let taken = splice_icons(icons, &mut japanese, &mut latin).unwrap();
    assert_eq!(taken, 1);
    assert!(latin.lookup(0xF015).is_none());

    let home = japanese.lookup_glyph(0xF015).unwrap();
    assert_eq!(home.width, 600);
    assert_eq!(home.bounding_box(), Some(Rect::new(100.0, 0.0, 500.0, 400.0)));

    let powerline = bbox(&japanese, 0xE0B0);
    assert_eq!(japanese.width_of(0xE0B0), Some(600));
    assert_close(powerline.x0, 0.0);
    assert_close(powerline.x1, 600.0);
    assert_close(powerline.y0, -100.0 * 1.21 - 24.0);
    assert_close(powerline.y1, 900.0 * 1.21 - 24.0);
    assert!(cache.is_loaded());

    fs::remove_dir_all(&dir).unwrap();
}

struct CopyHinter;

impl Hinter for CopyHinter {
    fn hint(&self, input: &Path, output: &Path) -> anyhow::Result<()> {
        fs::copy(input, output)?;
        Ok(())
    }
}

fn config_toml(source: &Path, build: &Path) -> String {
    format!(
        r#"
VERSION = "0.1.0"
FONT_NAME = "Kanamono Mono"
JP_FONT = "Japanese-{{style}}.ttf"
ENG_FONT = "Latin-{{style}}.ttf"
SOURCE_FONTS_DIR = "{}"
BUILD_FONTS_DIR = "{}"
VENDER_NAME = "KNM"
FONTFORGE_PREFIX = "fontforge_"
FONTTOOLS_PREFIX = "fonttools_"
IDEOGRAPHIC_SPACE = "filler.ttf"
HALF_WIDTH_STR = "HW"
FULL_WIDTH_35_STR = ""
INVISIBLE_ZENKAKU_SPACE_STR = "Hidden"
JPDOC_STR = "JPDOC"
NERD_FONTS_STR = "NF"
EM_ASCENT = 880
EM_DESCENT = 120
OS2_ASCENT = 950
OS2_DESCENT = 225
OS2_LINEGAP = 0
HALF_WIDTH_12 = 500
HALF_WIDTH_35 = 600
FULL_WIDTH_35 = 1000
"#,
        source.display(),
        build.display()
    )
}

/// Write every source font into a fresh directory and load a config for it.
/// The Japanese glyphs plus an unencoded variant of U+3042 reached through
/// a variation sequence.
fn japanese_with_variant() -> Vec<u8> {
    let mut glyphs = JAPANESE.to_vec();
    glyphs.push(glyph("uni3042.var", &[], Some((150.0, -50.0, 850.0, 800.0)), 1000));
    let variant = GlyphId::new(JAPANESE.len() as u32);
    make_font_with_sequences(
        &glyphs,
        &[
            VariationSequence { base: 0x3042, selector: 0xE0100, glyph: None },
            VariationSequence { base: 0x3042, selector: 0xE0101, glyph: Some(variant) },
        ],
    )
}

fn workspace(name: &str) -> (PathBuf, BuildConfig) {
    let root = temp_dir(name);
    let source = root.join("source");
    fs::create_dir_all(source.join("nerd-fonts")).unwrap();

    let latin = make_font(LATIN);
    for style in ["400-Regular", "700-Regular", "400-Italic", "700-Italic"] {
        fs::write(source.join(format!("Latin-{style}.ttf")), &latin).unwrap();
    }
    let japanese = japanese_with_variant();
    for style in ["Regular", "Bold"] {
        fs::write(source.join(format!("Japanese-{style}.ttf")), &japanese).unwrap();
    }
    fs::write(source.join("filler.ttf"), make_font(FILLER)).unwrap();
    fs::write(source.join("nerd-fonts/SymbolsNerdFont-Regular.ttf"), make_font(ICONS)).unwrap();

    let config = BuildConfig::from_toml(&config_toml(&source, &root.join("build"))).unwrap();
    (root, config)
}

fn build_dir_entries(config: &BuildConfig) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(&config.build_fonts_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_assemble_then_finish() {
    let (root, config) = workspace("stages");

    assemble(&config, &AssembleOptions::default()).unwrap();
    let intermediates = build_dir_entries(&config);
    assert_eq!(intermediates.len(), 8);
    assert!(intermediates.contains(&"fontforge_KanamonoMono-BoldItalic-jp.ttf".to_string()));

    finish(&config, &CopyHinter, None, None).unwrap();
    assert_eq!(
        build_dir_entries(&config),
        [
            "KanamonoMono-Bold.ttf",
            "KanamonoMono-BoldItalic.ttf",
            "KanamonoMono-Italic.ttf",
            "KanamonoMono-Regular.ttf",
        ]
    );

    let data = fs::read(config.build_fonts_dir.join("KanamonoMono-Regular.ttf")).unwrap();
    let font = FontRef::new(&data).unwrap();
    let os2 = font.os2().unwrap();
    assert_eq!(os2.us_win_ascent(), 950);
    assert_eq!(os2.us_win_descent(), 225);
    assert_eq!(os2.s_typo_ascender(), 880);
    assert_eq!(os2.s_typo_descender(), -120);
    assert_eq!(os2.s_typo_line_gap(), 0);
    assert_eq!(os2.x_avg_char_width(), 600);
    assert_eq!(os2.us_weight_class(), 400);
    assert_eq!(os2.fs_selection().bits(), SelectionFlags::REGULAR.bits());
    assert_eq!(font.hhea().unwrap().ascender().to_i16(), 950);
    assert_eq!(font.hhea().unwrap().descender().to_i16(), -225);
    assert_eq!(font.post().unwrap().is_fixed_pitch(), 1);
    assert_eq!(font.head().unwrap().mac_style().bits(), 0);

    let charmap = font.charmap();
    let latin_count = LATIN.len() as u32;
    let a = charmap.map('A').unwrap();
    assert!(a.to_u32() < latin_count, "A should come from the Latin font");
    let hiragana = charmap.map('あ').unwrap();
    assert!(hiragana.to_u32() >= latin_count);
    assert!(charmap.map('\u{3000}').is_some());
    assert!(charmap.map('\u{FA47}').is_some());

    let data = fs::read(config.build_fonts_dir.join("KanamonoMono-Bold.ttf")).unwrap();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.head().unwrap().mac_style().bits(), MacStyle::BOLD.bits());
    assert_eq!(font.os2().unwrap().us_weight_class(), 700);

    // fixing the tables of a finished font changes nothing
    let data = fs::read(config.build_fonts_dir.join("KanamonoMono-BoldItalic.ttf")).unwrap();
    let before = TableTree::dump(&data).unwrap();
    let mut after = before.clone();
    TableFix { style: Style::BoldItalic, metrics: config.metrics(), average_width: 600 }
        .apply(&mut after);
    assert_eq!(after.os2, before.os2);
    assert_eq!(after.hhea, before.hhea);
    assert_eq!(after.head.mac_style, before.head.mac_style);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_build_with_every_option() {
    let (root, config) = workspace("build");
    let options = AssembleOptions {
        invisible_zenkaku_space: true,
        half_width: true,
        jpdoc: true,
        nerd_font: true,
        ..Default::default()
    };
    assert_eq!(options.token(&config), "HWHiddenJPDOCNF");

    build(&config, &options, &CopyHinter).unwrap();
    let outputs = build_dir_entries(&config);
    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|name| name.starts_with("KanamonoMonoHWHiddenJPDOCNF-")));

    let data = fs::read(config.build_fonts_dir.join("KanamonoMonoHWHiddenJPDOCNF-Italic.ttf"))
        .unwrap();
    let font = FontRef::new(&data).unwrap();
    assert_eq!(font.os2().unwrap().x_avg_char_width(), 500);
    assert_eq!(font.os2().unwrap().fs_selection().bits(), SelectionFlags::ITALIC.bits());
    assert_ne!(font.hhea().unwrap().caret_slope_run(), 0);

    let charmap = font.charmap();
    assert!(charmap.map('\u{E0B0}').is_some());
    let zero = charmap.map('0').unwrap();
    assert_eq!(font.hmtx().unwrap().advance(zero), Some(500));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_build_line_height_reaches_finish() {
    let (root, config) = workspace("line-height");
    let options = AssembleOptions { line_height: Some(1.2), ..Default::default() };
    build(&config, &options, &CopyHinter).unwrap();

    let data = fs::read(config.build_fonts_dir.join("KanamonoMono-Regular.ttf")).unwrap();
    let font = FontRef::new(&data).unwrap();
    let os2 = font.os2().unwrap();
    assert_eq!(os2.us_win_ascent(), 980);
    assert_eq!(os2.us_win_descent(), 220);
    assert_eq!(os2.s_typo_line_gap(), 160);

    let merged = FontContainer::from_bytes(&data).unwrap();
    let line = bbox(&merged, 0x2500);
    assert_close(line.y1, 750.0);
    assert_close(line.y0, 50.0);
    assert_close(line.y1 - 650.0, f64::from(os2.us_win_ascent()) - 880.0);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_finish_restores_shifted_variation_sequences() {
    let (root, config) = workspace("uvs");
    assemble(&config, &AssembleOptions::default()).unwrap();

    let intermediate = |suffix: &str| {
        fs::read(config.build_fonts_dir.join(format!("fontforge_KanamonoMono-Regular-{suffix}")))
            .unwrap()
    };
    let latin_data = intermediate("eng.ttf");
    let latin_glyphs = FontRef::new(&latin_data).unwrap().maxp().unwrap().num_glyphs() as u32;
    let japanese_data = intermediate("jp.ttf");
    let japanese = FontRef::new(&japanese_data).unwrap();
    let before = read_variation_sequences(&japanese).unwrap().unwrap();
    let variant = before.iter().find_map(|seq| seq.glyph).unwrap();

    finish(&config, &CopyHinter, None, None).unwrap();
    let data = fs::read(config.build_fonts_dir.join("KanamonoMono-Regular.ttf")).unwrap();
    let font = FontRef::new(&data).unwrap();
    let after = read_variation_sequences(&font).unwrap().unwrap();
    assert_eq!(after.len(), 2);

    let shifted = after.iter().find(|seq| seq.selector == 0xE0101).unwrap().glyph.unwrap();
    assert_eq!(shifted.to_u32(), variant.to_u32() + latin_glyphs);
    let post = font.post().unwrap();
    let name = post.glyph_name(GlyphId16::new(shifted.to_u32() as u16));
    assert_eq!(name, Some("uni3042.var"));
    let default = after.iter().find(|seq| seq.selector == 0xE0100).unwrap();
    assert_eq!(default.glyph, None);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_out_of_range_line_height_fails_before_writing() {
    let (root, config) = workspace("tall");
    let options = AssembleOptions { line_height: Some(70.0), ..Default::default() };
    assert!(build(&config, &options, &CopyHinter).is_err());
    assert!(assemble(&config, &options).is_err());
    assert!(!config.build_fonts_dir.exists());

    fs::remove_dir_all(&root).unwrap();
}
