//! Field merge strategies for header tables.
//!
//! Each strategy folds one field taken from every font into a single value.

use crate::{MergeError, Result};

/// All values must agree; returns the shared value.
pub fn equal<T: PartialEq>(
    values: impl IntoIterator<Item = T>,
    table: &'static str,
    field: &'static str,
) -> Result<T> {
    let mut values = values.into_iter();
    let first = values.next().ok_or(MergeError::NoFonts)?;
    if values.all(|v| v == first) {
        Ok(first)
    } else {
        Err(MergeError::NotEqual { table, field })
    }
}

pub fn first<T>(values: impl IntoIterator<Item = T>) -> Result<T> {
    values.into_iter().next().ok_or(MergeError::NoFonts)
}

pub fn max<T: Ord>(values: impl IntoIterator<Item = T>) -> Result<T> {
    values.into_iter().max().ok_or(MergeError::NoFonts)
}

pub fn min<T: Ord>(values: impl IntoIterator<Item = T>) -> Result<T> {
    values.into_iter().min().ok_or(MergeError::NoFonts)
}

/// Bitwise OR across all fonts.
pub fn union_bits<T: Copy + std::ops::BitOr<Output = T>>(
    values: impl IntoIterator<Item = T>,
) -> Result<T> {
    values.into_iter().reduce(|a, b| a | b).ok_or(MergeError::NoFonts)
}

/// How a single flag bit is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    /// Set if any font sets it
    Any,
    /// Set only if every font sets it
    All,
    /// Taken from the first font
    First,
}

/// Merge 16-bit flags bit by bit.
pub fn merge_bits(values: &[u16], bits: &[Bit; 16]) -> Result<u16> {
    let first = *values.first().ok_or(MergeError::NoFonts)?;
    Ok(bits.iter().enumerate().fold(0u16, |acc, (idx, mode)| {
        let mask = 1u16 << idx;
        let set = match mode {
            Bit::Any => values.iter().any(|v| v & mask != 0),
            Bit::All => values.iter().all(|v| v & mask != 0),
            Bit::First => first & mask != 0,
        };
        if set { acc | mask } else { acc }
    }))
}
