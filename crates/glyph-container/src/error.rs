use std::{io, path::PathBuf, result};

use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error};

#[derive(Error, Debug)]
pub enum GlyphError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse font: {0}")]
    ReadError(#[from] ReadError),

    #[error("failed to write font: {0}")]
    WriteError(#[from] error::Error),

    #[error("failed to build font: {0}")]
    BuilderError(#[from] BuilderError),

    #[error("failed to draw glyph {gid}: {reason}")]
    Draw { gid: u32, reason: String },

    #[error("glyph '{name}' has a malformed outline: {reason}")]
    MalformedOutline { name: String, reason: String },

    #[error("could not create glyph '{name}' at U+{codepoint:04X}")]
    CreationFailed { codepoint: u32, name: String },

    #[error("glyph index {0} is out of range")]
    NoSuchGlyph(usize),

    #[error("font has more than 65535 glyphs ({0})")]
    TooManyGlyphs(usize),

    #[error("failed to build cmap: {0}")]
    Cmap(String),

    #[error(transparent)]
    Tables(#[from] anyhow::Error),
}

pub type Result<T> = result::Result<T, GlyphError>;
