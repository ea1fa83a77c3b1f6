// ⚙️ Configuration - knobs for merging, the fetch window and output naming

use crate::identity::MIN_TRANSACTION_KEY_LEN;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for `history_years`
pub const MAX_HISTORY_YEARS: u32 = 100;

/// Upper bound for `extra_months`
pub const MAX_EXTRA_MONTHS: u32 = 11;

/// Default output file name stem
pub const DEFAULT_FILE_PREFIX: &str = "Costco_In-Warehouse_Receipts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Barcodes shorter than this are dropped (default: 15)
    pub min_transaction_key_len: usize,

    /// How far back the fetch window reaches, in years (default: 3)
    pub history_years: u32,

    /// Extra months on top of `history_years` (default: 1)
    pub extra_months: u32,

    /// Stem for the output file name
    pub file_prefix: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig {
            min_transaction_key_len: MIN_TRANSACTION_KEY_LEN,
            history_years: 3,
            extra_months: 1,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Load from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ArchiveConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_transaction_key_len == 0 {
            bail!("min_transaction_key_len must be at least 1");
        }
        if self.history_years > MAX_HISTORY_YEARS {
            bail!(
                "history_years must be at most {MAX_HISTORY_YEARS}, got {}",
                self.history_years
            );
        }
        if self.extra_months > MAX_EXTRA_MONTHS {
            bail!(
                "extra_months must be at most {MAX_EXTRA_MONTHS}, got {}",
                self.extra_months
            );
        }
        if self.file_prefix.trim().is_empty() {
            bail!("file_prefix must not be empty");
        }
        if self.file_prefix.contains(['/', '\\']) {
            bail!("file_prefix must not contain path separators: {}", self.file_prefix);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ArchiveConfig::default();

        assert_eq!(config.min_transaction_key_len, 15);
        assert_eq!(config.history_years, 3);
        assert_eq!(config.extra_months, 1);
        assert_eq!(config.file_prefix, "Costco_In-Warehouse_Receipts");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"history_years": 2, "file_prefix": "Receipts"}}"#).unwrap();

        let config = ArchiveConfig::load(file.path()).unwrap();

        assert_eq!(config.history_years, 2);
        assert_eq!(config.file_prefix, "Receipts");
        assert_eq!(config.min_transaction_key_len, 15);
        assert_eq!(config.extra_months, 1);
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_transaction_key_len": 0}}"#).unwrap();

        assert!(ArchiveConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_out_of_range_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"history_years": 400000000}}"#).unwrap();

        let err = ArchiveConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("history_years must be at most 100"));

        let config = ArchiveConfig {
            history_years: MAX_HISTORY_YEARS,
            extra_months: MAX_EXTRA_MONTHS,
            ..ArchiveConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = ArchiveConfig {
            extra_months: MAX_EXTRA_MONTHS + 1,
            ..ArchiveConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArchiveConfig::load(&dir.path().join("nope.json")).unwrap_err();

        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_prefix_with_separator_rejected() {
        let config = ArchiveConfig {
            file_prefix: "../escape".to_string(),
            ..ArchiveConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(ArchiveConfig::load_or_default(None).unwrap(), ArchiveConfig::default());
    }
}
