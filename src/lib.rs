// Receipt Archive - Core Library
// Incremental merge of saved and freshly fetched receipts, used by the CLI and tests

pub mod record;
pub mod identity;   // Identity keys + owner grouping
pub mod stats;      // Per-member counters
pub mod merge;      // Merge + dedup engine
pub mod ordering;   // Chronological sort
pub mod report;     // Statistics report
pub mod archive;    // JSON load/save + file naming
pub mod fetch;      // Fetch window, GraphQL body, response envelope
pub mod config;
pub mod error;

// Re-export commonly used types
pub use record::Record;
pub use identity::{
    compute_key, compute_key_with_min_len, is_valid_transaction_key,
    IdentityKey, Owner, MIN_TRANSACTION_KEY_LEN,
};
pub use stats::{StatsAggregator, StatsEntry, StatsSnapshot};
pub use merge::{merge, MergeEngine, MergeResult};
pub use ordering::{order, parse_occurred_at};
pub use report::{MemberReport, MergeReport, ReportTotals, RunTotals};
pub use archive::{load_records, save_records, suggested_filename};
pub use fetch::{parse_receipts_response, receipts_request, FetchWindow};
pub use config::ArchiveConfig;
pub use error::FetchError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
