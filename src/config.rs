use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::validate::ValidationConfig;

/// Settings for one subdivision session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub validation: ValidationConfig,
    /// New subdivisions are titled `"{prefix} {n}"`.
    pub default_title_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            default_title_prefix: "Subdivision".into(),
        }
    }
}

impl SessionConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_bytes(&bytes)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse a JSON config. Missing keys keep their defaults.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("Failed to parse session config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::OverlapTest;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SessionConfig::from_json_bytes(b"{}").unwrap(), SessionConfig::default());
    }

    #[test]
    fn nested_validation_settings() {
        let config = SessionConfig::from_json_bytes(
            br#"{"defaultTitlePrefix": "Lot", "validation": {"overlapTest": "vertices", "areaTolerance": 0.01}}"#,
        ).unwrap();
        assert_eq!(config.default_title_prefix, "Lot");
        assert_eq!(config.validation.overlap_test, OverlapTest::Vertices);
        assert_eq!(config.validation.area_tolerance, 0.01);
        assert_eq!(config.validation.share_total, 100.0);
    }

    #[test]
    fn unknown_overlap_test_is_rejected() {
        assert!(SessionConfig::from_json_bytes(br#"{"validation": {"overlapTest": "fuzzy"}}"#).is_err());
    }
}
