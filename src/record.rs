// 🧾 Record Model - one receipt as returned by the receipts API
// The whole JSON object is kept as-is; only three fields are ever read.

use crate::identity::Owner;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// WIRE FIELD NAMES
// ============================================================================

/// Owner identifier (membership number)
pub const OWNER_FIELD: &str = "membershipNumber";

/// Transaction identifier (receipt barcode)
pub const TRANSACTION_KEY_FIELD: &str = "transactionBarcode";

/// When the transaction happened
pub const OCCURRED_AT_FIELD: &str = "transactionDateTime";

// ============================================================================
// RECORD
// ============================================================================

/// A single transaction record.
///
/// Stored as the raw JSON object so that item lines, tenders, tax detail and
/// anything else the API adds later are written back verbatim, in their
/// original field order. Following the "aggregates as maps" approach, the
/// merge engine only looks at the owner, the transaction key and the
/// timestamp through the accessors below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Build a record from the three identity-relevant fields.
    /// Absent values are simply not inserted.
    pub fn new(
        owner_id: Option<&str>,
        transaction_key: Option<&str>,
        occurred_at: Option<&str>,
    ) -> Self {
        let mut record = Record::default();
        if let Some(owner_id) = owner_id {
            record.set(OWNER_FIELD, Value::from(owner_id));
        }
        if let Some(key) = transaction_key {
            record.set(TRANSACTION_KEY_FIELD, Value::from(key));
        }
        if let Some(occurred_at) = occurred_at {
            record.set(OCCURRED_AT_FIELD, Value::from(occurred_at));
        }
        record
    }

    /// Chainable variant of [`Record::set`]
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Raw owner identifier. Empty strings and non-string values count as absent.
    pub fn owner_id(&self) -> Option<&str> {
        self.str_field(OWNER_FIELD)
    }

    /// Raw transaction key, if present as a non-empty string
    pub fn transaction_key(&self) -> Option<&str> {
        self.str_field(TRANSACTION_KEY_FIELD)
    }

    /// Raw timestamp text, unparsed
    pub fn occurred_at(&self) -> Option<&str> {
        self.str_field(OCCURRED_AT_FIELD)
    }

    /// Owner grouping for this record
    pub fn owner(&self) -> Owner {
        Owner::from_id(self.owner_id())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors_read_wire_fields() {
        let record = Record::new(
            Some("111222333"),
            Some("21134300501862404041420"),
            Some("2024-04-04T14:20:00"),
        );

        assert_eq!(record.owner_id(), Some("111222333"));
        assert_eq!(record.transaction_key(), Some("21134300501862404041420"));
        assert_eq!(record.occurred_at(), Some("2024-04-04T14:20:00"));
        assert_eq!(record.owner(), Owner::Known("111222333".to_string()));
    }

    #[test]
    fn test_empty_and_null_fields_are_absent() {
        let record: Record = serde_json::from_value(json!({
            "membershipNumber": "",
            "transactionBarcode": null,
            "transactionDateTime": 20240101,
        }))
        .unwrap();

        assert_eq!(record.owner_id(), None);
        assert_eq!(record.transaction_key(), None);
        assert_eq!(record.occurred_at(), None);
        assert_eq!(record.owner(), Owner::Unknown);
    }

    #[test]
    fn test_opaque_payload_survives_serialization() {
        let raw = json!({
            "documentType": "WarehouseReceiptDetail",
            "transactionBarcode": "21134300501862404041420",
            "membershipNumber": "111222333",
            "itemArray": [{"itemNumber": "1234", "amount": 12.99}],
            "tenderArray": [{"tenderTypeName": "VISA", "amountTender": 12.99}],
            "transactionDateTime": "2024-04-04T14:20:00",
        });
        let record: Record = serde_json::from_value(raw.clone()).unwrap();

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, serde_json::to_string(&raw).unwrap());

        let keys: Vec<&String> = record.fields().keys().collect();
        assert_eq!(keys[0], "documentType");
        assert_eq!(keys[2], "membershipNumber");
    }

    #[test]
    fn test_with_field_adds_payload() {
        let record = Record::new(None, Some("123456789012345"), None)
            .with_field("total", json!(42.5));

        assert_eq!(record.get("total"), Some(&json!(42.5)));
        assert_eq!(record.owner_id(), None);
    }
}
