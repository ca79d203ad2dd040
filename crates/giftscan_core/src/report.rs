use std::cmp::Ordering;

use serde::Serialize;

use crate::{AggregateStats, FailureTally};

/// Sort key given to rarity labels that do not parse as a finite number.
pub const UNPARSABLE_RARITY: f64 = 100.0;

/// One category line of the final report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub category: String,
    pub count: u64,
    pub percent: f64,
    pub rarity: String,
}

impl ReportRow {
    /// Percentage share with one decimal place, e.g. `63.6%`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Ordered summary of a finished scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub checked: u64,
    pub available: u64,
    pub failures: FailureTally,
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Builds the report for `stats`, where `checked` is the requested scan size.
    ///
    /// Rows are ordered rarest first (ascending rarity value), then by
    /// descending count. Categories that tie on both keep name order.
    pub fn new(stats: &AggregateStats, checked: u64) -> Self {
        let total = stats.total_processed();
        let mut keyed: Vec<(f64, ReportRow)> = stats
            .category_counts()
            .iter()
            .map(|(category, entry)| {
                let percent = if total == 0 {
                    0.0
                } else {
                    entry.count as f64 / total as f64 * 100.0
                };
                (
                    parse_rarity(&entry.rarity),
                    ReportRow {
                        category: category.clone(),
                        count: entry.count,
                        percent,
                        rarity: entry.rarity.clone(),
                    },
                )
            })
            .collect();

        keyed.sort_by(|(rarity_a, row_a), (rarity_b, row_b)| {
            match rarity_a.total_cmp(rarity_b) {
                Ordering::Equal => row_b.count.cmp(&row_a.count),
                other => other,
            }
        });

        Self {
            checked,
            available: stats.available_count(),
            failures: stats.failures(),
            rows: keyed.into_iter().map(|(_, row)| row).collect(),
        }
    }
}

/// Parses a rarity label such as `"1.5%"` into its numeric value.
///
/// Labels that are not a finite number after stripping a trailing `%` map to
/// [`UNPARSABLE_RARITY`].
pub fn parse_rarity(rarity: &str) -> f64 {
    let trimmed = rarity.trim();
    let numeral = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    match numeral.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => UNPARSABLE_RARITY,
    }
}
