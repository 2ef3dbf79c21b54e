use std::result;

use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to read font: {0}")]
    ReadError(#[from] ReadError),

    #[error("failed to write font: {0}")]
    WriteError(#[from] error::Error),

    #[error("failed to build font: {0}")]
    BuilderError(#[from] BuilderError),

    #[error("no fonts provided for merging")]
    NoFonts,

    #[error("fonts have incompatible unitsPerEm: expected {expected}, got {actual}")]
    IncompatibleUnitsPerEm { expected: u16, actual: u16 },

    #[error("table values must be equal for '{table}' field '{field}'")]
    NotEqual { table: &'static str, field: &'static str },

    #[error("merged font would have {0} glyphs, more than 65535")]
    TooManyGlyphs(usize),

    #[error("failed to build cmap table: {0}")]
    CmapBuildError(String),

    #[error("only TrueType outlines can be merged; font {0} has none")]
    NotTrueType(usize),
}

pub type Result<T> = result::Result<T, MergeError>;
