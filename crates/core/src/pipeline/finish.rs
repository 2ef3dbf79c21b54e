//! Stage 2: hint, merge and fix the tables of each intermediate pair.

use std::path::PathBuf;

use anyhow::{Context, Result};
use kanamono_font_merger::{Merged, Merger};
use kanamono_font_metadata::{Style, TableFix, VerticalMetrics};
use kanamono_font_ops::{
    TableTree, VariationSequence, drop_tables, read_variation_sequences, splice_cmap14,
};
use log::{info, warn};
use read_fonts::{FontRef, types::Tag};

use super::{Hinter, Step, run_steps};
use crate::{
    config::BuildConfig,
    io::{FontFile, glob_fonts, remove_with_prefix},
    styles::VariantFiles,
};

const VERTICAL_TABLES: [Tag; 2] = [Tag::new(b"vhea"), Tag::new(b"vmtx")];

/// Settings shared by every file of a finish run.
pub struct FinishContext<'a> {
    pub config: &'a BuildConfig,
    pub hinter: &'a dyn Hinter,
    pub metrics: VerticalMetrics,
}

/// One intermediate pair being finished.
pub struct FinishJob<'a> {
    ctx: &'a FinishContext<'a>,
    pub token: String,
    pub style: Style,
    pub files: VariantFiles,
    merged: Option<Merged>,
}

impl<'a> FinishJob<'a> {
    pub fn new(ctx: &'a FinishContext<'a>, token: String, style: Style) -> Self {
        let files = VariantFiles::new(ctx.config, &token, style);
        Self { ctx, token, style, files, merged: None }
    }

    fn average_width(&self) -> i16 {
        let config = self.ctx.config;
        let width = if self.token.contains(&config.half_width_str) {
            config.half_width_12
        } else {
            config.half_width_35
        };
        width as i16
    }
}

pub fn finish_steps<'a>() -> [Step<FinishJob<'a>>; 4] {
    [
        ("drop-vertical-metrics", step_drop_vertical_metrics),
        ("hint", step_hint),
        ("merge", step_merge),
        ("fix-tables", step_fix_tables),
    ]
}

/// Finish every Latin intermediate whose token starts with `filter`, then
/// delete the intermediates. Returns the paths of the final fonts.
pub fn finish_variants(ctx: &FinishContext, filter: &str) -> Result<Vec<PathBuf>> {
    let config = ctx.config;
    let dir = &config.build_fonts_dir;
    let name = config.compact_name();

    let prefix = format!("{}{name}{filter}", config.fontforge_prefix);
    let latin_files = glob_fonts(dir, &prefix, "*-eng.ttf")?;
    if latin_files.is_empty() {
        warn!("No {prefix}*-eng.ttf in {}", dir.display());
        return Ok(Vec::new());
    }

    let steps = finish_steps();
    let mut outputs = Vec::new();
    for path in &latin_files {
        let (token, style) = VariantFiles::parse_latin(config, path)?;
        println!("\n── {} ──", path.display());

        let mut job = FinishJob::new(ctx, token, style);
        run_steps(&steps, &mut job, 0, steps.len())?;
        println!("  Wrote {}", job.files.output.display());
        outputs.push(job.files.output);
    }

    let merged_prefix = format!("{}{name}{filter}", config.fonttools_prefix);
    let removed = remove_with_prefix(dir, &merged_prefix)? + remove_with_prefix(dir, &prefix)?;
    info!("Removed {removed} intermediate files");
    Ok(outputs)
}

fn step_drop_vertical_metrics(job: &mut FinishJob) -> Result<()> {
    FontFile::new(&job.files.japanese).transform(|data| drop_tables(data, &VERTICAL_TABLES))
}

fn step_hint(job: &mut FinishJob) -> Result<()> {
    job.ctx
        .hinter
        .hint(&job.files.latin, &job.files.hinted)
        .with_context(|| format!("Failed to hint {}", job.files.latin.display()))
}

fn step_merge(job: &mut FinishJob) -> Result<()> {
    let latin = FontFile::new(&job.files.hinted).read()?;
    let japanese = FontFile::new(&job.files.japanese).read()?;
    let merged = Merger::new()
        .merge(&[&latin, &japanese])
        .with_context(|| format!("Failed to merge {}", job.files.merged.display()))?;
    FontFile::new(&job.files.merged).write(&merged.data)?;
    job.merged = Some(merged);
    Ok(())
}

fn step_fix_tables(job: &mut FinishJob) -> Result<()> {
    let merged = job.merged.as_ref().context("Fonts were not merged")?;
    let mut tree = TableTree::dump(&merged.data)?;

    let fix = TableFix {
        style: job.style,
        metrics: job.ctx.metrics,
        average_width: job.average_width(),
    };
    fix.apply(&mut tree);

    let japanese_offset = merged.offsets.get(1).copied().context("Merged font has no offsets")?;
    match japanese_sequences(&job.files)? {
        Some(sequences) => {
            let shifted: Vec<VariationSequence> = sequences
                .into_iter()
                .map(|seq| seq.offset_glyph(u32::from(japanese_offset)))
                .collect();
            if splice_cmap14(&mut tree.cmap, &shifted) {
                println!("  Restored {} variation sequences", shifted.len());
            }
        }
        None => warn!("No cmap format 14 in {}", job.files.japanese.display()),
    }

    FontFile::new(&job.files.output).write(tree.apply(&merged.data)?)
}

fn japanese_sequences(files: &VariantFiles) -> Result<Option<Vec<VariationSequence>>> {
    let data = FontFile::new(&files.japanese).read()?;
    let font = FontRef::new(&data)
        .with_context(|| format!("Failed to parse {}", files.japanese.display()))?;
    read_variation_sequences(&font)
}
