//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use kanamono_core::{
    AssembleOptions, BuildConfig, DEFAULT_CONFIG_FILE, Ttfautohint, assemble, build, finish,
    parse_line_height, parse_weight,
};
use log::debug;

#[derive(Parser)]
#[command(name = "kanamono")]
#[command(about = "Build Kanamono fonts from a Latin and a Japanese source")]
pub struct Cli {
    /// Build configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = BuildConfig::load(&self.config)?;
        debug!("Loaded {}", self.config.display());
        self.command.run(&config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct AssembleArgs {
    /// Keep an existing build directory
    #[arg(long)]
    pub do_not_delete_build_dir: bool,
    /// Leave the ideographic space blank
    #[arg(long)]
    pub invisible_zenkaku_space: bool,
    /// Japanese characters two Latin cells wide
    #[arg(long)]
    pub half_width: bool,
    /// Symbols from the Japanese font
    #[arg(long)]
    pub jpdoc: bool,
    /// Add icon glyphs
    #[arg(long)]
    pub nerd_font: bool,
    /// Weight of the regular Latin source; ignored unless plain digits
    #[arg(long, value_name = "N")]
    pub regular_weight: Option<String>,
    /// Weight of the bold Latin source; ignored unless plain digits
    #[arg(long, value_name = "N")]
    pub bold_weight: Option<String>,
    /// Line height as a multiple of the em
    #[arg(long, value_name = "N")]
    pub line_height: Option<String>,
}

impl AssembleArgs {
    pub fn options(&self) -> AssembleOptions {
        let defaults = AssembleOptions::default();
        AssembleOptions {
            keep_build_dir: self.do_not_delete_build_dir,
            invisible_zenkaku_space: self.invisible_zenkaku_space,
            half_width: self.half_width,
            jpdoc: self.jpdoc,
            nerd_font: self.nerd_font,
            regular_weight: self
                .regular_weight
                .as_deref()
                .and_then(parse_weight)
                .unwrap_or(defaults.regular_weight),
            bold_weight: self
                .bold_weight
                .as_deref()
                .and_then(parse_weight)
                .unwrap_or(defaults.bold_weight),
            line_height: self.line_height.as_deref().and_then(parse_line_height),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Edit the glyphs of every style and write the intermediate fonts
    Assemble(AssembleArgs),
    /// Hint, merge and fix the tables of the intermediate fonts
    Finish {
        /// Only finish variants whose token starts with this
        filter: Option<String>,
        /// Line height as a multiple of the em
        #[arg(long, value_name = "N")]
        line_height: Option<String>,
    },
    /// Assemble, then finish the variants just assembled
    Build(AssembleArgs),
}

impl Commands {
    pub fn run(self, config: &BuildConfig) -> Result<()> {
        let hinter = Ttfautohint::new(config.hinter.clone());
        match self {
            Commands::Assemble(args) => {
                assemble(config, &args.options())?;
            }
            Commands::Finish { filter, line_height } => {
                let line_height = line_height.as_deref().and_then(parse_line_height);
                finish(config, &hinter, filter.as_deref(), line_height)?;
            }
            Commands::Build(args) => {
                build(config, &args.options(), &hinter)?;
            }
        }
        Ok(())
    }
}
