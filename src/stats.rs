// 📊 Statistics Aggregator - per-member counters for one merge run

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owner id → counters. Ordered by owner id so reports are reproducible.
pub type StatsSnapshot = BTreeMap<String, StatsEntry>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsEntry {
    /// Records for this owner in the prior dataset
    pub existing: u64,

    /// Records for this owner in the fetched batch
    pub fetched: u64,

    /// Fetched records that made it into the output
    pub unique_merged: u64,
}

impl StatsEntry {
    /// Fetched records that were already known (or malformed)
    pub fn duplicates_in_fetch(&self) -> u64 {
        self.fetched.saturating_sub(self.unique_merged)
    }

    pub fn final_total_saved(&self) -> u64 {
        self.existing + self.unique_merged
    }
}

/// Accumulates [`StatsEntry`] counters. Counters only ever go up.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    entries: StatsSnapshot,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_existing(&mut self, owner_id: &str) {
        self.entry(owner_id).existing += 1;
    }

    pub fn record_fetched(&mut self, owner_id: &str) {
        self.entry(owner_id).fetched += 1;
    }

    pub fn record_unique_merged(&mut self, owner_id: &str) {
        self.entry(owner_id).unique_merged += 1;
    }

    /// Read-only view; does not reset anything
    pub fn snapshot(&self) -> &StatsSnapshot {
        &self.entries
    }

    pub fn into_snapshot(self) -> StatsSnapshot {
        self.entries
    }

    fn entry(&mut self, owner_id: &str) -> &mut StatsEntry {
        self.entries.entry(owner_id.to_string()).or_default()
    }
}
