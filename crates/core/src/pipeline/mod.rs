//! Build pipeline for Kanamono fonts.
//!
//! `assemble` edits the glyphs of each variant and writes a Latin and a
//! Japanese intermediate. `finish` hints and merges those pairs and fixes the
//! tables of the result.

mod assemble;
mod clean;
mod finish;
mod hinting;

pub use assemble::{AssembleContext, VariantBuild, assemble_variant, variant_steps};
pub use clean::prepare_build_dir;
pub use finish::{FinishContext, FinishJob, finish_steps, finish_variants};
pub use hinting::{Hinter, TTFAUTOHINT_ARGS, Ttfautohint};

use std::{path::Path, time::Instant};

use anyhow::Result;

use crate::{
    config::BuildConfig,
    metrics::finish_metrics,
    options::AssembleOptions,
    styles::VARIANTS,
    transform::IconCache,
};

const RULE: &str =
    "═══════════════════════════════════════════════════════════════════════════════";

/// A named step run against a mutable job.
pub type Step<C> = (&'static str, fn(&mut C) -> Result<()>);

pub fn run_step<T>(
    name: &str,
    step_num: usize,
    total: usize,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    println!("\n[{step_num}/{total}] {name}");
    let start = Instant::now();
    let value = f()?;
    println!("  ✓ {name} ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(value)
}

pub fn run_steps<C>(steps: &[Step<C>], ctx: &mut C, offset: usize, total: usize) -> Result<()> {
    for (i, (name, step_fn)) in steps.iter().enumerate() {
        run_step(name, offset + i + 1, total, || step_fn(ctx))?;
    }
    Ok(())
}

fn print_header(title: &str) {
    println!("{RULE}");
    println!("{title}");
    println!("{RULE}");
}

fn print_footer(title: &str, start: Instant, dir: &Path, fonts: usize) {
    println!("\n{RULE}");
    println!("✨ {title} complete in {:.2}s", start.elapsed().as_secs_f64());
    println!("   Output: {}", dir.display());
    println!("   Fonts: {fonts}");
    println!("{RULE}");
}

fn run_assemble(config: &BuildConfig, options: &AssembleOptions) -> Result<usize> {
    let ctx = AssembleContext::new(config.clone(), options.clone())?;
    prepare_build_dir(&config.build_fonts_dir, options.keep_build_dir)?;

    let mut icons = IconCache::new(config.icon_font());
    for variant in VARIANTS {
        assemble_variant(&ctx, &mut icons, variant)?;
    }
    Ok(VARIANTS.len() * 2)
}

/// Stage 1: write the Latin and Japanese intermediates of every variant.
pub fn assemble(config: &BuildConfig, options: &AssembleOptions) -> Result<()> {
    let start = Instant::now();
    print_header("Kanamono Assemble");
    let written = run_assemble(config, options)?;
    print_footer("Assemble", start, &config.build_fonts_dir, written);
    Ok(())
}

/// Stage 2: finish every intermediate pair whose token starts with `filter`.
pub fn finish(
    config: &BuildConfig,
    hinter: &dyn Hinter,
    filter: Option<&str>,
    line_height: Option<f64>,
) -> Result<()> {
    let start = Instant::now();
    print_header("Kanamono Finish");
    let ctx = FinishContext { config, hinter, metrics: finish_metrics(config, line_height)? };
    let outputs = finish_variants(&ctx, filter.unwrap_or_default())?;
    print_footer("Finish", start, &config.build_fonts_dir, outputs.len());
    Ok(())
}

/// Both stages with one set of options. The line height reaches both
/// stages.
pub fn build(config: &BuildConfig, options: &AssembleOptions, hinter: &dyn Hinter) -> Result<()> {
    let start = Instant::now();
    print_header("Kanamono Build Pipeline");

    let metrics = finish_metrics(config, options.line_height)?;
    run_assemble(config, options)?;
    let ctx = FinishContext { config, hinter, metrics };
    let token = options.token(config);
    let outputs = finish_variants(&ctx, &token)?;

    print_footer("Build", start, &config.build_fonts_dir, outputs.len());
    Ok(())
}
