use write_fonts::types::Fixed;

/// Font version as configured, e.g. `0.1.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontVersion(String);

impl FontVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `head.fontRevision` for the version.
    ///
    /// Everything after the first dot is concatenated into the fraction, so
    /// `1.2.3` becomes 1.23. Returns `None` for non-numeric versions.
    pub fn revision(&self) -> Option<Fixed> {
        let number = match self.0.split_once('.') {
            Some((major, rest)) => format!("{major}.{}", rest.replace('.', "")),
            None => self.0.clone(),
        };
        number.parse::<f64>().ok().filter(|v| v.is_finite()).map(Fixed::from_f64)
    }
}
