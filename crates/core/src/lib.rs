//! Kanamono Core - build pipeline logic for Kanamono fonts.

pub mod config;
pub mod io;
pub mod metrics;
pub mod options;
pub mod pipeline;
pub mod styles;
pub mod transform;

pub use config::{BuildConfig, CellWidths, DEFAULT_CONFIG_FILE};
pub use kanamono_font_metadata::{Style, VerticalMetrics};
pub use options::{AssembleOptions, parse_line_height, parse_weight};
pub use pipeline::{Hinter, Ttfautohint, assemble, build, finish};
pub use styles::{VARIANTS, Variant, VariantFiles};
