//! Style flags, naming and table rules for the Kanamono family.

mod finish;
mod metrics;
mod naming;
mod style;
mod version;

pub use finish::TableFix;
pub use metrics::VerticalMetrics;
pub use naming::{ContainerMetadata, FamilyNames, LICENSE, LICENSE_URL, vendor_tag};
pub use style::Style;
pub use version::FontVersion;
