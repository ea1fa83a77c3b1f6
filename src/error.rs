use thiserror::Error;

/// Problems with a receipts API response body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("receipts query failed with GraphQL errors: {0}")]
    GraphQl(String),
    #[error("response did not contain a `data.receipts` array")]
    MissingReceipts,
    #[error("receipt #{index} in response is not a JSON object: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
