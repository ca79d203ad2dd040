use giftscan_core::{AggregateStats, CategoryCount, ExtractedRecord, FailureCategory};
use pretty_assertions::assert_eq;

fn record(category: &str, rarity: &str) -> ExtractedRecord {
    ExtractedRecord {
        category: category.to_string(),
        rarity: rarity.to_string(),
    }
}

#[test]
fn new_stats_are_empty_and_consistent() {
    let stats = AggregateStats::new();
    assert!(stats.is_empty());
    assert_eq!(stats.total_processed(), 0);
    assert_eq!(stats.available_count(), 0);
    assert_eq!(stats.attempted(), 0);
    assert!(stats.is_consistent());
}

#[test]
fn merge_counts_categories_and_keeps_first_rarity() {
    giftscan_logging::initialize_for_tests();
    let mut stats = AggregateStats::new();
    stats.merge(record("Toy Bear", "1.5%"));
    stats.merge(record("Plush Pepe", "0.4%"));
    stats.merge(record("Toy Bear", "9.9%"));

    assert_eq!(
        stats.category("Toy Bear"),
        Some(&CategoryCount {
            count: 2,
            rarity: "1.5%".to_string()
        })
    );
    assert_eq!(stats.category("Plush Pepe").map(|c| c.count), Some(1));
    assert_eq!(stats.total_processed(), 3);
    assert_eq!(stats.available_count(), 3);
    assert!(stats.is_consistent());
}

#[test]
fn failures_are_tallied_without_touching_counts() {
    let mut stats = AggregateStats::new();
    stats.merge(record("X", "20%"));
    stats.record_failure(FailureCategory::Fetch);
    stats.record_failure(FailureCategory::Fetch);
    stats.record_failure(FailureCategory::Parse);

    let failures = stats.failures();
    assert_eq!(failures.fetch, 2);
    assert_eq!(failures.parse, 1);
    assert_eq!(failures.total(), 3);
    assert_eq!(stats.total_processed(), 1);
    assert_eq!(stats.attempted(), 4);
    assert!(stats.is_consistent());
}

#[test]
fn categories_iterate_in_name_order() {
    let mut stats = AggregateStats::new();
    for name in ["b", "c", "a"] {
        stats.merge(record(name, "1%"));
    }
    let names: Vec<_> = stats.category_counts().keys().cloned().collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn record_captures_are_trimmed_and_require_both_fields() {
    assert_eq!(
        ExtractedRecord::from_captures("  Toy Bear \n", " 1.5% "),
        Some(record("Toy Bear", "1.5%"))
    );
    assert_eq!(ExtractedRecord::from_captures("   ", "1%"), None);
    assert_eq!(ExtractedRecord::from_captures("Toy Bear", " \t"), None);
}
