//! Kanamono fonts CLI library.

pub mod cli;
