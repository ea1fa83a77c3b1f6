// 🔄 Merge Engine - combine saved receipts with a freshly fetched batch
// Single pass over prior ++ fresh. First-seen wins, so saved receipts always
// take precedence over re-fetched copies.

use crate::identity::{compute_key_with_min_len, IdentityKey, MIN_TRANSACTION_KEY_LEN};
use crate::ordering;
use crate::record::Record;
use crate::report::{self, MergeReport, RunTotals};
use crate::stats::{StatsAggregator, StatsSnapshot};
use log::{debug, info};
use std::collections::HashSet;

// ============================================================================
// MERGE RESULT
// ============================================================================

#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Deduplicated records in first-seen order (not yet sorted)
    pub records: Vec<Record>,

    /// Everything dropped: true duplicates plus malformed records
    pub duplicates_removed: usize,

    /// The malformed part of `duplicates_removed`
    pub invalid_records: usize,

    /// Per-owner counters for this run
    pub stats: StatsSnapshot,
}

impl MergeResult {
    /// True duplicates only
    pub fn true_duplicates(&self) -> usize {
        self.duplicates_removed - self.invalid_records
    }

    pub fn totals(&self) -> RunTotals {
        RunTotals {
            unique_saved: self.records.len(),
            duplicates_removed: self.duplicates_removed,
        }
    }

    pub fn report(&self) -> MergeReport {
        report::format(&self.stats, self.totals())
    }

    /// Sort the records oldest first, consuming the result
    pub fn into_ordered(mut self) -> Self {
        self.records = ordering::order(self.records);
        self
    }
}

// ============================================================================
// MERGE ENGINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Prior,
    Fresh,
}

#[derive(Debug, Clone)]
pub struct MergeEngine {
    /// Minimum transaction key length (default: 15)
    pub min_transaction_key_len: usize,
}

impl MergeEngine {
    /// Create engine with the default key length rule
    pub fn new() -> Self {
        MergeEngine {
            min_transaction_key_len: MIN_TRANSACTION_KEY_LEN,
        }
    }

    pub fn with_min_key_len(min_transaction_key_len: usize) -> Self {
        MergeEngine {
            min_transaction_key_len,
        }
    }

    /// Merge a prior dataset with a fresh batch.
    ///
    /// Never fails: malformed records are dropped and counted, not reported
    /// as errors.
    pub fn merge(&self, prior: Vec<Record>, fresh: Vec<Record>) -> MergeResult {
        let mut stats = StatsAggregator::new();

        // Input counts are taken before dedup, so they include records that
        // get dropped below
        for owner_id in prior.iter().filter_map(Record::owner_id) {
            stats.record_existing(owner_id);
        }
        for owner_id in fresh.iter().filter_map(Record::owner_id) {
            stats.record_fetched(owner_id);
        }

        let total_input = prior.len() + fresh.len();
        info!(
            "Merging {} existing receipts with {} fetched = {} total",
            prior.len(),
            fresh.len(),
            total_input
        );

        let mut seen: HashSet<IdentityKey> = HashSet::with_capacity(total_input);
        let mut records = Vec::with_capacity(total_input);
        let mut duplicates_removed = 0;
        let mut invalid_records = 0;

        let tagged = prior
            .into_iter()
            .map(|r| (Origin::Prior, r))
            .chain(fresh.into_iter().map(|r| (Origin::Fresh, r)));

        for (origin, record) in tagged {
            let Some(key) = compute_key_with_min_len(&record, self.min_transaction_key_len) else {
                debug!(
                    "Dropping {:?} record with malformed transaction key {:?}",
                    origin,
                    record.transaction_key()
                );
                duplicates_removed += 1;
                invalid_records += 1;
                continue;
            };

            if seen.contains(&key) {
                debug!("Dropping duplicate {:?} record {}", origin, key);
                duplicates_removed += 1;
                continue;
            }

            if origin == Origin::Fresh {
                if let Some(owner_id) = key.owner.id() {
                    stats.record_unique_merged(owner_id);
                }
            }
            seen.insert(key);
            records.push(record);
        }

        info!(
            "Deduplication complete: removed {} ({} malformed), {} unique receipts",
            duplicates_removed,
            invalid_records,
            records.len()
        );

        MergeResult {
            records,
            duplicates_removed,
            invalid_records,
            stats: stats.into_snapshot(),
        }
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge with the default engine
pub fn merge(prior: Vec<Record>, fresh: Vec<Record>) -> MergeResult {
    MergeEngine::new().merge(prior, fresh)
}

// ============================================================================
// TESTS
// ============================================================================
