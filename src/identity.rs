// 🔑 Identity Keying - which records are "the same receipt"
// Key = (owner, transaction barcode). Compared structurally, never as a joined string.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Barcodes shorter than this are treated as malformed
pub const MIN_TRANSACTION_KEY_LEN: usize = 15;

/// Display label for records without an owner identifier
pub const UNKNOWN_OWNER_LABEL: &str = "UNKNOWN_MEMBER";

// ============================================================================
// OWNER
// ============================================================================

/// Owner grouping of a record.
///
/// `Unknown` is a distinct variant, so a real membership number that happens
/// to read "UNKNOWN_MEMBER" never collides with the missing-owner group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Owner {
    Known(String),
    Unknown,
}

impl Owner {
    /// Absent and empty identifiers both map to `Unknown`
    pub fn from_id(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.is_empty() => Owner::Known(id.to_string()),
            _ => Owner::Unknown,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Owner::Known(id) => Some(id),
            Owner::Unknown => None,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Known(id) => f.write_str(id),
            Owner::Unknown => f.write_str(UNKNOWN_OWNER_LABEL),
        }
    }
}

// ============================================================================
// IDENTITY KEY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub owner: Owner,
    pub transaction_key: String,
}

/// Legacy `<owner>-<barcode>` form. For log output only.
impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.owner, self.transaction_key)
    }
}

/// Whether a transaction key passes the shape check
pub fn is_valid_transaction_key(key: Option<&str>, min_len: usize) -> bool {
    match key {
        Some(key) => !key.is_empty() && key.chars().count() >= min_len,
        None => false,
    }
}

/// Compute the identity key of a record, or `None` if its transaction key is malformed
pub fn compute_key(record: &Record) -> Option<IdentityKey> {
    compute_key_with_min_len(record, MIN_TRANSACTION_KEY_LEN)
}

pub fn compute_key_with_min_len(record: &Record, min_len: usize) -> Option<IdentityKey> {
    let key = record.transaction_key();
    if !is_valid_transaction_key(key, min_len) {
        return None;
    }

    Some(IdentityKey {
        owner: record.owner(),
        transaction_key: key?.to_string(),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_key_uses_owner_and_barcode() {
        let record = Record::new(Some("M1"), Some("123456789012345"), Some("2024-01-01"));

        let key = compute_key(&record).unwrap();
        assert_eq!(key.owner, Owner::Known("M1".to_string()));
        assert_eq!(key.transaction_key, "123456789012345");
    }

    #[test]
    fn test_short_barcode_is_invalid() {
        let record = Record::new(Some("M1"), Some("short"), None);
        assert!(compute_key(&record).is_none());

        // One short of the limit
        let record = Record::new(Some("M1"), Some("12345678901234"), None);
        assert!(compute_key(&record).is_none());
    }

    #[test]
    fn test_missing_or_empty_barcode_is_invalid() {
        assert!(compute_key(&Record::new(Some("M1"), None, None)).is_none());
        assert!(compute_key(&Record::new(Some("M1"), Some(""), None)).is_none());
    }

    #[test]
    fn test_validity_matches_length_rule() {
        for len in 0..30 {
            let barcode = "7".repeat(len);
            let record = Record::new(Some("M1"), Some(&barcode), None);
            assert_eq!(compute_key(&record).is_some(), len >= MIN_TRANSACTION_KEY_LEN, "len {len}");
        }
    }

    #[test]
    fn test_missing_owner_groups_as_unknown() {
        let record = Record::new(None, Some("123456789012345"), None);

        let key = compute_key(&record).unwrap();
        assert_eq!(key.owner, Owner::Unknown);
        assert_eq!(key.to_string(), "UNKNOWN_MEMBER-123456789012345");
    }

    #[test]
    fn test_sentinel_text_does_not_collide_with_unknown() {
        let named = Record::new(Some(UNKNOWN_OWNER_LABEL), Some("123456789012345"), None);
        let anonymous = Record::new(None, Some("123456789012345"), None);

        assert_ne!(compute_key(&named), compute_key(&anonymous));
    }

    #[test]
    fn test_delimiter_in_fields_does_not_collide() {
        // "A-B" + "C..." vs "A" + "B-C..." would join to the same string
        let first = Record::new(Some("A-B"), Some("C12345678901234"), None);
        let second = Record::new(Some("A"), Some("B-C12345678901234"), None);

        assert_ne!(compute_key(&first), compute_key(&second));
    }

    #[test]
    fn test_custom_min_len() {
        let record = Record::new(Some("M1"), Some("12345"), None);
        assert!(compute_key_with_min_len(&record, 5).is_some());
        assert!(compute_key_with_min_len(&record, 6).is_none());
    }
}
