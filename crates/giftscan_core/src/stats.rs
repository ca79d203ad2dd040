use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ExtractedRecord;

/// Occurrences of one category and the rarity first seen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub count: u64,
    pub rarity: String,
}

/// Why an identifier was left out of the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// The page could not be retrieved or decoded.
    Fetch,
    /// The page was retrieved but did not carry the expected row.
    Parse,
}

/// Dropped identifiers, split by failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FailureTally {
    pub fetch: u64,
    pub parse: u64,
}

impl FailureTally {
    pub fn total(&self) -> u64 {
        self.fetch + self.parse
    }
}

/// Frequency statistics accumulated over one scan.
///
/// Only the scan coordinator mutates this value; callers receive it by value
/// once every unit has finished.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    category_counts: BTreeMap<String, CategoryCount>,
    total_processed: u64,
    available_count: u64,
    failures: FailureTally,
}

impl AggregateStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one successful extraction into the counters.
    pub fn merge(&mut self, record: ExtractedRecord) {
        let ExtractedRecord { category, rarity } = record;
        self.category_counts
            .entry(category)
            .and_modify(|entry| entry.count += 1)
            .or_insert(CategoryCount { count: 1, rarity });
        self.total_processed += 1;
        // Every extracted page is currently treated as available.
        self.available_count += 1;
    }

    pub fn record_failure(&mut self, category: FailureCategory) {
        match category {
            FailureCategory::Fetch => self.failures.fetch += 1,
            FailureCategory::Parse => self.failures.parse += 1,
        }
    }

    pub fn category_counts(&self) -> &BTreeMap<String, CategoryCount> {
        &self.category_counts
    }

    pub fn category(&self, name: &str) -> Option<&CategoryCount> {
        self.category_counts.get(name)
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn available_count(&self) -> u64 {
        self.available_count
    }

    pub fn failures(&self) -> FailureTally {
        self.failures
    }

    /// Identifiers that reached the aggregate, counted or dropped.
    pub fn attempted(&self) -> u64 {
        self.total_processed + self.failures.total()
    }

    pub fn is_empty(&self) -> bool {
        self.category_counts.is_empty()
    }

    /// True when per-category counts add up to both global totals.
    pub fn is_consistent(&self) -> bool {
        let sum: u64 = self.category_counts.values().map(|c| c.count).sum();
        sum == self.total_processed && self.total_processed == self.available_count
    }
}
