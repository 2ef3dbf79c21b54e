use kanamono_font_merger::{GlyphOrder, MergeError, Merger};
use read_fonts::{
    FontRef, TableProvider,
    tables::glyf::{CurvePoint, Glyph as ReadGlyph},
    types::{GlyphId, GlyphId16, Tag},
};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, Contour, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::Os2,
        post::Post,
        vhea::Vhea,
        vmtx::Vmtx,
    },
    types::NameId,
};

struct TestFont<'a> {
    upem: u16,
    glyphs: &'a [&'a str],
    cmap: &'a [(char, u16)],
    advance: u16,
    instructions: Vec<u8>,
    family: &'a str,
    vertical: bool,
}

impl Default for TestFont<'_> {
    fn default() -> Self {
        Self {
            upem: 1000,
            glyphs: &[".notdef", "a"],
            cmap: &[('a', 1)],
            advance: 500,
            instructions: Vec::new(),
            family: "Latin",
            vertical: false,
        }
    }
}

fn triangle() -> Contour {
    vec![
        CurvePoint::on_curve(50, 0),
        CurvePoint::on_curve(250, 600),
        CurvePoint::on_curve(450, 0),
    ]
    .into()
}

fn make_font(spec: TestFont) -> Vec<u8> {
    let num_glyphs = spec.glyphs.len() as u16;

    let mut glyf_builder = GlyfLocaBuilder::new();
    for _ in spec.glyphs {
        let simple = SimpleGlyph {
            bbox: Bbox { x_min: 50, y_min: 0, x_max: 450, y_max: 600 },
            contours: vec![triangle()],
            instructions: spec.instructions.clone(),
        };
        glyf_builder.add_glyph(&Glyph::Simple(simple)).unwrap();
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let head = Head {
        font_revision: font_types::Fixed::from_f64(1.0),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: write_fonts::tables::head::Flags::empty(),
        units_per_em: spec.upem,
        created: font_types::LongDateTime::new(0),
        modified: font_types::LongDateTime::new(0),
        x_min: 50,
        y_min: 0,
        x_max: 450,
        y_max: 600,
        mac_style: write_fonts::tables::head::MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    };
    let hhea = Hhea {
        ascender: font_types::FWord::new(800),
        descender: font_types::FWord::new(-200),
        line_gap: font_types::FWord::new(0),
        advance_width_max: font_types::UfWord::new(spec.advance),
        min_left_side_bearing: font_types::FWord::new(50),
        min_right_side_bearing: font_types::FWord::new(50),
        x_max_extent: font_types::FWord::new(450),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
    };
    let hmtx = Hmtx {
        h_metrics: (0..num_glyphs)
            .map(|_| LongMetric { advance: spec.advance, side_bearing: 50 })
            .collect(),
        left_side_bearings: vec![],
    };
    let maxp = Maxp {
        num_glyphs,
        max_points: Some(3),
        max_contours: Some(1),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(spec.instructions.len() as u16),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };
    let post = Post::new_v2(spec.glyphs.iter().copied());
    let cmap = Cmap::from_mappings(
        spec.cmap.iter().map(|(ch, gid)| (*ch, GlyphId::new(u32::from(*gid)))),
    )
    .unwrap();
    let name = Name::new(vec![NameRecord::new(
        3,
        1,
        0x409,
        NameId::new(1),
        spec.family.to_string().into(),
    )]);

    let mut builder = FontBuilder::new();
    builder.add_table(&head).unwrap();
    builder.add_table(&hhea).unwrap();
    builder.add_table(&hmtx).unwrap();
    builder.add_table(&maxp).unwrap();
    builder.add_table(&post).unwrap();
    builder.add_table(&cmap).unwrap();
    builder.add_table(&name).unwrap();
    builder.add_table(&make_os2(spec.advance)).unwrap();
    builder.add_table(&glyf).unwrap();
    builder.add_table(&loca).unwrap();
    if spec.vertical {
        let vhea = Vhea {
            ascender: font_types::FWord::new(500),
            descender: font_types::FWord::new(-500),
            line_gap: font_types::FWord::new(0),
            advance_height_max: font_types::UfWord::new(1000),
            min_top_side_bearing: font_types::FWord::new(0),
            min_bottom_side_bearing: font_types::FWord::new(0),
            y_max_extent: font_types::FWord::new(1000),
            caret_slope_rise: 0,
            caret_slope_run: 1,
            caret_offset: 0,
            number_of_long_ver_metrics: num_glyphs,
        };
        let vmtx = Vmtx {
            v_metrics: (0..num_glyphs)
                .map(|_| write_fonts::tables::vmtx::LongMetric { advance: 1000, side_bearing: 0 })
                .collect(),
            top_side_bearings: vec![],
        };
        builder.add_table(&vhea).unwrap();
        builder.add_table(&vmtx).unwrap();
    }
    builder.add_raw(Tag::new(b"GSUB"), spec.family.as_bytes().to_vec());
    builder.build()
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
        fs_selection: write_fonts::tables::os2::SelectionFlags::REGULAR,
        us_first_char_index: 0x61,
        us_last_char_index: 0x61,
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

fn japanese() -> Vec<u8> {
    make_font(TestFont {
        glyphs: &[".notdef", "a", "uni3042"],
        cmap: &[('a', 1), ('あ', 2)],
        advance: 1000,
        family: "Japanese",
        ..Default::default()
    })
}

fn glyph_instructions(font: &FontRef, gid: u32) -> Vec<u8> {
    let glyf = font.glyf().unwrap();
    match font.loca(None).unwrap().get_glyf(GlyphId::new(gid), &glyf).unwrap() {
        Some(ReadGlyph::Simple(simple)) => simple.instructions().to_vec(),
        _ => panic!("expected a simple glyph at {gid}"),
    }
}

#[test]
fn test_merge_concatenates_glyphs() {
    let latin = make_font(TestFont::default());
    let jp = japanese();
    let merged = Merger::new().merge(&[&latin, &jp]).unwrap();
    assert_eq!(merged.offsets, vec![0, 2]);

    let font = FontRef::new(&merged.data).unwrap();
    assert_eq!(font.maxp().unwrap().num_glyphs(), 5);
    assert_eq!(font.hhea().unwrap().number_of_h_metrics(), 5);

    let hmtx = font.hmtx().unwrap();
    assert_eq!(hmtx.advance(GlyphId::new(1)), Some(500));
    assert_eq!(hmtx.advance(GlyphId::new(4)), Some(1000));
}

#[test]
fn test_first_font_wins_cmap() {
    let latin = make_font(TestFont::default());
    let jp = japanese();
    let merged = Merger::new().merge(&[&latin, &jp]).unwrap();
    let font = FontRef::new(&merged.data).unwrap();
    let cmap = font.cmap().unwrap();

    assert_eq!(cmap.map_codepoint('a'), Some(GlyphId::new(1)));
    assert_eq!(cmap.map_codepoint('あ'), Some(GlyphId::new(4)));
}

#[test]
fn test_duplicate_names_are_renamed() {
    let latin = make_font(TestFont::default());
    let jp = japanese();
    let merged = Merger::new().merge(&[&latin, &jp]).unwrap();
    let font = FontRef::new(&merged.data).unwrap();
    let post = font.post().unwrap();

    let names: Vec<&str> =
        (0..5).map(|gid| post.glyph_name(GlyphId16::new(gid)).unwrap()).collect();
    assert_eq!(names, vec![".notdef", "a", ".notdef.1", "a.1", "uni3042"]);
}

#[test]
fn test_instructions_kept_only_for_first_font() {
    let latin = make_font(TestFont { instructions: vec![0xB0, 0x01], ..Default::default() });
    let jp = make_font(TestFont {
        glyphs: &[".notdef", "uni3042"],
        cmap: &[('あ', 1)],
        instructions: vec![0xB0, 0x02],
        ..Default::default()
    });
    let merged = Merger::new().merge(&[&latin, &jp]).unwrap();
    let font = FontRef::new(&merged.data).unwrap();

    assert_eq!(glyph_instructions(&font, 1), vec![0xB0, 0x01]);
    assert!(glyph_instructions(&font, 3).is_empty());
}

#[test]
fn test_units_per_em_must_match() {
    let latin = make_font(TestFont::default());
    let jp = make_font(TestFont { upem: 2048, ..Default::default() });
    let result = Merger::new().merge(&[&latin, &jp]);
    assert!(matches!(
        result,
        Err(MergeError::IncompatibleUnitsPerEm { expected: 1000, actual: 2048 })
    ));
}

#[test]
fn test_unmerged_tables_come_from_first_font() {
    let latin = make_font(TestFont::default());
    let jp = japanese();
    let merged = Merger::new().merge(&[&latin, &jp]).unwrap();
    let font = FontRef::new(&merged.data).unwrap();

    assert_eq!(font.table_data(Tag::new(b"GSUB")).unwrap().as_bytes(), b"Latin");
    let name = font.name().unwrap();
    let family: String =
        name.name_record()[0].string(name.string_data()).unwrap().chars().collect();
    assert_eq!(family, "Latin");
}

#[test]
fn test_os2_merge() {
    let latin = make_font(TestFont::default());
    let jp = japanese();
    let merged = Merger::new().merge(&[&latin, &jp]).unwrap();
    let font = FontRef::new(&merged.data).unwrap();
    let os2 = font.os2().unwrap();

    assert_eq!(os2.x_avg_char_width(), 500);
    assert_eq!(os2.ul_unicode_range_1(), 1);
    assert_eq!(os2.ul_code_page_range_1(), Some(1));
    assert_eq!(os2.us_win_ascent(), 900);
}

#[test]
fn test_vertical_tables_need_every_font() {
    let latin = make_font(TestFont { vertical: true, ..Default::default() });
    let jp = japanese();
    let merged = Merger::new().merge(&[&latin, &jp]).unwrap();
    let font = FontRef::new(&merged.data).unwrap();
    assert!(font.vhea().is_err());
    assert!(font.vmtx().is_err());

    let jp = make_font(TestFont { vertical: true, family: "Japanese", ..Default::default() });
    let merged = Merger::new().merge(&[&latin, &jp]).unwrap();
    let font = FontRef::new(&merged.data).unwrap();
    assert_eq!(font.vhea().unwrap().number_of_long_ver_metrics(), 4);
}

#[test]
fn test_glyph_order_reads_cff_names() {
    let cff = FontRef::new(font_test_data::NOTO_SERIF_DISPLAY_TRIMMED).unwrap();
    let jp_data = japanese();
    let jp = FontRef::new(&jp_data).unwrap();
    let order = GlyphOrder::compute(&[cff, jp]).unwrap();

    let names: Vec<&str> = order.names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, [".notdef", "i", "j", "k", "l", ".notdef.1", "a", "uni3042"]);
    assert_eq!(order.offsets(), [0, 5]);
}
