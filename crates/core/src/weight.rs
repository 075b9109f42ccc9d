//! Weight keys
//!
//! A product can be sold at several weights or pack sizes; the weight key is
//! the canonical string that distinguishes cart lines for the same product at
//! different sizes.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Sentinel key for unweighed, per-piece items.
pub const DEFAULT_WEIGHT_KEY: &str = "default";

/// Canonical key distinguishing cart lines for the same product at different
/// weights or pack sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightKey(String);

impl WeightKey {
    /// The key used for unweighed, per-piece items.
    #[must_use]
    pub fn default_key() -> Self {
        Self(DEFAULT_WEIGHT_KEY.to_owned())
    }

    /// Canonicalize a product's weight selector into a stable line key.
    ///
    /// An absent, blank or `"default"` weight yields the default key
    /// regardless of unit; any other weight is kept verbatim, trimmed.
    /// Piece-based and weighed items share this rule — the measurement unit
    /// does not participate in line identity.
    #[must_use]
    pub fn normalize(weight: Option<&str>, _measurement_unit: Option<&str>) -> Self {
        match weight.map(str::trim) {
            None | Some("" | DEFAULT_WEIGHT_KEY) => Self::default_key(),
            Some(trimmed) => Self(trimmed.to_owned()),
        }
    }

    /// Whether this is the per-piece default key.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_WEIGHT_KEY
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WeightKey {
    fn default() -> Self {
        Self::default_key()
    }
}

impl Display for WeightKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<&str> for WeightKey {
    fn from(value: &str) -> Self {
        Self::normalize(Some(value), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_weight_is_default_regardless_of_unit() {
        assert_eq!(WeightKey::normalize(None, Some("pieces")), WeightKey::default_key());
        assert_eq!(WeightKey::normalize(None, Some("grams")), WeightKey::default_key());
        assert_eq!(WeightKey::normalize(None, None), WeightKey::default_key());
    }

    #[test]
    fn numeric_weight_is_kept_verbatim() {
        assert_eq!(WeightKey::normalize(Some("250"), Some("grams")).as_str(), "250");
    }

    #[test]
    fn weight_is_trimmed() {
        assert_eq!(WeightKey::normalize(Some("  500 "), Some("grams")).as_str(), "500");
    }

    #[test]
    fn default_sentinel_maps_to_default_key() {
        let key = WeightKey::normalize(Some("default"), Some("pieces"));

        assert!(key.is_default());
    }

    #[test]
    fn blank_weight_maps_to_default_key() {
        assert!(WeightKey::normalize(Some("   "), None).is_default());
        assert!(WeightKey::normalize(Some(""), Some("grams")).is_default());
    }

    #[test]
    fn unit_does_not_affect_line_identity() {
        let weighed = WeightKey::normalize(Some("250"), Some("grams"));
        let pieces = WeightKey::normalize(Some("250"), Some("pieces"));

        assert_eq!(weighed, pieces);
    }
}
