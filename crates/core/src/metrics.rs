//! Line-height arithmetic for the two build stages.

use anyhow::{Result, anyhow};
use kanamono_font_metadata::VerticalMetrics;

use crate::config::BuildConfig;

/// Typo line gap is kept this many units below the win line height.
const TYPO_GAP_REDUCTION: i64 = 40;

fn total_height(line_height: f64) -> i64 {
    (1000.0 * line_height).round_ties_even() as i64
}

fn font_units(value: i64, line_height: f64) -> Result<i16> {
    i16::try_from(value)
        .map_err(|_| anyhow!("Line height {line_height} needs {value} font units, out of range"))
}

/// Metrics for assembling: the extra height is split evenly above and below
/// the em box, ties rounding to even.
///
/// `1.2` with an 880/120 em gives 980/220.
pub fn assemble_metrics(config: &BuildConfig, line_height: Option<f64>) -> Result<VerticalMetrics> {
    let mut metrics = config.metrics();
    let Some(line_height) = line_height else {
        return Ok(metrics);
    };

    let extra = total_height(line_height) - i64::from(config.units_per_em());
    let half = (extra as f64 / 2.0).round_ties_even() as i64;
    metrics.os2_ascent = font_units(i64::from(config.em_ascent) + half, line_height)?;
    metrics.os2_descent = font_units(i64::from(config.em_descent) + extra - half, line_height)?;
    Ok(metrics)
}

/// Metrics for finishing: the win metrics get the full line height, the
/// typo line gap a little less.
///
/// `1.12` with an 880/120 em gives a gap of 80 and 940/180.
pub fn finish_metrics(config: &BuildConfig, line_height: Option<f64>) -> Result<VerticalMetrics> {
    let mut metrics = config.metrics();
    let Some(line_height) = line_height else {
        return Ok(metrics);
    };

    let extra = total_height(line_height) - i64::from(config.units_per_em());
    let above = extra.div_euclid(2);
    metrics.os2_linegap = font_units((extra - TYPO_GAP_REDUCTION).max(0), line_height)?;
    metrics.os2_ascent = font_units(i64::from(config.em_ascent) + above, line_height)?;
    metrics.os2_descent = font_units(i64::from(config.em_descent) + extra - above, line_height)?;
    Ok(metrics)
}
