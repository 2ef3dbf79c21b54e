//! Stage 1: per-variant glyph edits.

use anyhow::{Context, Result};
use glyph_container::FontContainer;
use kanamono_font_metadata::{ContainerMetadata, FamilyNames, Style, VerticalMetrics};

use super::{Step, run_step, run_steps};
use crate::{
    config::BuildConfig,
    io::FontFile,
    metrics::assemble_metrics,
    options::AssembleOptions,
    styles::{Variant, VariantFiles},
    transform::{
        IconCache, center_brackets, compress_half_width, extend_box_drawing, italicize,
        normalize_em, quantize_widths, remove_duplicates, remove_jpdoc_symbols,
        resolve_alternates, splice_icons, visualize_zenkaku_space,
    },
};

const DIGIT_ZERO: u32 = 0x0030;

/// Settings shared by every variant of an assemble run.
#[derive(Debug, Clone)]
pub struct AssembleContext {
    pub config: BuildConfig,
    pub options: AssembleOptions,
    pub metrics: VerticalMetrics,
    pub token: String,
}

impl AssembleContext {
    pub fn new(config: BuildConfig, options: AssembleOptions) -> Result<Self> {
        let metrics = assemble_metrics(&config, options.line_height)?;
        let token = options.token(&config);
        Ok(Self { config, options, metrics, token })
    }

    pub fn files(&self, style: Style) -> VariantFiles {
        VariantFiles::new(&self.config, &self.token, style)
    }

    pub fn metadata(&self, style: Style) -> ContainerMetadata {
        ContainerMetadata {
            names: FamilyNames::new(&self.config.font_name, &self.token, style),
            version: self.config.font_version(),
            vendor: self.config.vender_name.clone(),
            copyright: self.config.copyright.clone(),
            metrics: self.metrics,
            weight_class: self.options.weight_class(style),
        }
    }
}

/// The two containers of one variant while it is being assembled.
pub struct VariantBuild<'a> {
    ctx: &'a AssembleContext,
    icons: &'a mut IconCache,
    variant: Variant,
    pub latin: FontContainer,
    pub japanese: FontContainer,
    /// Serialized (Latin, Japanese) fonts with metadata applied.
    tagged: Option<(Vec<u8>, Vec<u8>)>,
}

impl<'a> VariantBuild<'a> {
    /// Open both sources and give the Japanese alternates their own glyphs.
    pub fn open(
        ctx: &'a AssembleContext,
        icons: &'a mut IconCache,
        variant: Variant,
    ) -> Result<Self> {
        let latin_style = variant.latin_style(&ctx.options);
        let latin = FontFile::new(ctx.config.latin_source(&latin_style)).open()?;

        let japanese_file = FontFile::new(ctx.config.japanese_source(variant.japanese_style));
        let japanese = resolve_alternates(japanese_file.open()?).with_context(|| {
            format!("Failed to resolve alternates of {}", japanese_file.path().display())
        })?;

        println!(
            "  {} ({} glyphs) + {} ({} glyphs)",
            latin_style,
            latin.len(),
            variant.japanese_style,
            japanese.len()
        );
        Ok(Self { ctx, icons, variant, latin, japanese, tagged: None })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }
}

/// Steps run on each variant after opening, optional ones left out.
pub fn variant_steps<'a>(
    ctx: &AssembleContext,
    variant: &Variant,
) -> Vec<Step<VariantBuild<'a>>> {
    let options = &ctx.options;
    let mut steps: Vec<Step<VariantBuild<'a>>> = Vec::new();
    steps.push(("curate-symbols", step_curate_symbols));
    steps.push(("remove-duplicates", step_remove_duplicates));
    steps.push(("normalize-em", step_normalize_em));
    steps.push(("center-brackets", step_center_brackets));
    if variant.is_italic() {
        steps.push(("italicize", step_italicize));
    }
    steps.push(("quantize-widths", step_quantize_widths));
    if options.half_width {
        steps.push(("half-width", step_half_width));
    }
    steps.push(("strip-lookups", step_strip_lookups));
    if !options.invisible_zenkaku_space {
        steps.push(("visualize-zenkaku-space", step_visualize_zenkaku_space));
    }
    if options.nerd_font {
        steps.push(("splice-icons", step_splice_icons));
    }
    steps.push(("tag-metadata", step_tag_metadata));
    steps.push(("emit", step_emit));
    steps
}

/// Assemble one variant, returning the paths of its files.
pub fn assemble_variant(
    ctx: &AssembleContext,
    icons: &mut IconCache,
    variant: Variant,
) -> Result<VariantFiles> {
    let steps = variant_steps(ctx, &variant);
    let total = steps.len() + 1;

    println!("\n── {} ──", variant.style);
    let mut build = run_step("open", 1, total, move || VariantBuild::open(ctx, icons, variant))?;
    run_steps(&steps, &mut build, 1, total)?;
    Ok(ctx.files(variant.style))
}

fn step_curate_symbols(build: &mut VariantBuild) -> Result<()> {
    let metrics = build.ctx.metrics;
    if build.ctx.options.jpdoc {
        let removed = remove_jpdoc_symbols(&mut build.latin)?;
        let stretched = extend_box_drawing(&mut build.japanese, &metrics)?;
        println!("  Removed {removed} Latin symbols, stretched {stretched} Japanese box glyphs");
    } else {
        let stretched = extend_box_drawing(&mut build.latin, &metrics)?;
        println!("  Stretched {stretched} Latin box glyphs");
    }
    Ok(())
}

fn step_remove_duplicates(build: &mut VariantBuild) -> Result<()> {
    let cleared = remove_duplicates(&mut build.japanese, &build.latin)?;
    println!("  Cleared {cleared} Japanese glyphs already in the Latin font");
    Ok(())
}

fn step_normalize_em(build: &mut VariantBuild) -> Result<()> {
    let units_per_em = build.ctx.config.units_per_em();
    normalize_em(&mut build.japanese, units_per_em);
    normalize_em(&mut build.latin, units_per_em);
    Ok(())
}

fn step_center_brackets(build: &mut VariantBuild) -> Result<()> {
    center_brackets(&mut build.japanese)
}

fn step_italicize(build: &mut VariantBuild) -> Result<()> {
    italicize(&mut build.japanese);
    Ok(())
}

fn step_quantize_widths(build: &mut VariantBuild) -> Result<()> {
    quantize_widths(&mut build.japanese, build.ctx.config.cells())
}

fn step_half_width(build: &mut VariantBuild) -> Result<()> {
    compress_half_width(&mut build.latin, &mut build.japanese, build.ctx.config.cells())
}

fn step_strip_lookups(build: &mut VariantBuild) -> Result<()> {
    build.japanese.strip_lookups();
    Ok(())
}

fn step_visualize_zenkaku_space(build: &mut VariantBuild) -> Result<()> {
    let mut filler = FontFile::new(build.ctx.config.filler_font()).open()?;
    filler.set_units_per_em(build.japanese.units_per_em());
    visualize_zenkaku_space(&mut build.japanese, &filler)
}

fn step_splice_icons(build: &mut VariantBuild) -> Result<()> {
    let half = build.latin.width_of(DIGIT_ZERO).context("Latin font has no U+0030")?;
    let units_per_em = build.japanese.units_per_em();
    let full_width = build.ctx.config.full_width_35;

    let icons = build.icons.get(units_per_em, half, full_width)?;
    let taken = splice_icons(icons, &mut build.japanese, &mut build.latin)?;
    println!("  Added {} icons, {taken} replacing existing glyphs", icons.len());
    Ok(())
}

fn step_tag_metadata(build: &mut VariantBuild) -> Result<()> {
    let metadata = build.ctx.metadata(build.variant.style);
    let latin = metadata.apply(&build.latin.to_bytes()?).context("Failed to tag Latin font")?;
    let japanese =
        metadata.apply(&build.japanese.to_bytes()?).context("Failed to tag Japanese font")?;
    build.tagged = Some((latin, japanese));
    Ok(())
}

fn step_emit(build: &mut VariantBuild) -> Result<()> {
    let (latin, japanese) = build.tagged.as_ref().context("Fonts were not tagged")?;
    let files = build.ctx.files(build.variant.style);

    for (path, data) in [(&files.latin, latin), (&files.japanese, japanese)] {
        let file = FontFile::new(path);
        file.ensure_parent_dir()?;
        file.write(data)?;
        println!("  Wrote {}", path.display());
    }
    Ok(())
}
