// 📡 Fetch Request/Response - what we ask the receipts API and how we read the answer
// Sending the request (and the auth headers it needs) is left to the caller.

use crate::config::ArchiveConfig;
use crate::error::FetchError;
use crate::record::Record;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// GraphQL query for in-warehouse receipts in a date range
pub const RECEIPTS_QUERY: &str = r#"
    query receipts($startDate: String!, $endDate: String!) {
      receipts(startDate: $startDate, endDate: $endDate) {
        documentType
        receiptType
        membershipNumber
        transactionType
        transactionDateTime
        transactionDate
        warehouseShortName
        warehouseNumber
        warehouseName
        warehouseAddress1
        warehouseAddress2
        warehouseCity
        warehouseState
        warehouseCountry
        warehousePostalCode
        warehouseAreaCode
        warehousePhone
        companyNumber
        transactionBarcode
        totalItemCount
        instantSavings
        subTotal
        taxes
        total
        registerNumber
        transactionNumber
        operatorNumber
        itemArray {
          itemNumber itemUPCNumber itemDescription01 itemDescription02
          frenchItemDescription1 frenchItemDescription2 itemIdentifier
          itemDepartmentNumber transDepartmentNumber itemUnitPriceAmount
          unit amount taxFlag refundFlag resaleFlag voidFlag merchantID
          entryMethod fuelUnitQuantity fuelUomCode fuelUomDescription
          fuelUomDescriptionFr fuelGradeCode fuelGradeDescription
          fuelGradeDescriptionFr
        }
        couponArray {
          couponNumber upcnumberCoupon associatedItemNumber unitCoupon
          amountCoupon taxflagCoupon voidflagCoupon refundflagCoupon
        }
        subTaxes {
          tax1 tax2 tax3 tax4
          aTaxPercent aTaxLegend aTaxAmount aTaxPrintCode aTaxPrintCodeFR aTaxIdentifierCode
          bTaxPercent bTaxLegend bTaxAmount bTaxPrintCode bTaxPrintCodeFR bTaxIdentifierCode
          cTaxPercent cTaxLegend cTaxAmount cTaxIdentifierCode
          dTaxPercent dTaxLegend dTaxAmount dTaxPrintCode dTaxPrintCodeFR dTaxIdentifierCode
          uTaxLegend uTaxAmount uTaxableAmount
        }
        tenderArray {
          tenderTypeCode tenderSubTypeCode tenderTypeName tenderTypeNameFr
          tenderDescription amountTender displayAccountNumber sequenceNumber
          approvalNumber responseCode transactionID merchantID entryMethod
          tenderAcctTxnNumber tenderAuthorizationCode
          tenderEntryMethodDescription walletType walletId
        }
      }
    }
"#;

// ============================================================================
// FETCH WINDOW
// ============================================================================

/// Inclusive date range sent to the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Window ending `today`, starting on the first of the month
    /// `history_years` years and `extra_months` months earlier.
    pub fn ending(today: NaiveDate, history_years: u32, extra_months: u32) -> Self {
        let first_of_month = today.with_day(1).unwrap_or(today);
        let start = history_years
            .checked_mul(12)
            .and_then(|months| months.checked_add(extra_months))
            .and_then(|months| first_of_month.checked_sub_months(Months::new(months)))
            .unwrap_or(NaiveDate::MIN);

        FetchWindow { start, end: today }
    }

    pub fn from_config(today: NaiveDate, config: &ArchiveConfig) -> Self {
        Self::ending(today, config.history_years, config.extra_months)
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

// ============================================================================
// REQUEST / RESPONSE
// ============================================================================

/// GraphQL request body for a window. Query whitespace is collapsed.
pub fn receipts_request(window: &FetchWindow) -> Value {
    let query = RECEIPTS_QUERY.split_whitespace().collect::<Vec<_>>().join(" ");
    json!({
        "query": query,
        "variables": {
            "startDate": window.start_str(),
            "endDate": window.end_str(),
        },
    })
}

/// Pull the receipt list out of a response body.
///
/// Any `errors` member fails the whole response, even alongside data.
pub fn parse_receipts_response(body: Value) -> Result<Vec<Record>, FetchError> {
    if let Some(errors) = body.get("errors").filter(|e| !e.is_null()) {
        return Err(FetchError::GraphQl(errors.to_string()));
    }

    let receipts = match body.pointer("/data/receipts") {
        Some(Value::Array(items)) => items.clone(),
        _ => return Err(FetchError::MissingReceipts),
    };

    receipts
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| FetchError::InvalidRecord { index, source })
        })
        .collect()
}

/// Same as [`parse_receipts_response`], from raw text
pub fn parse_receipts_response_str(text: &str) -> Result<Vec<Record>, FetchError> {
    let body: Value = serde_json::from_str(text)?;
    parse_receipts_response(body)
}

// ============================================================================
// TESTS
// ============================================================================
