use giftscan_core::{parse_rarity, AggregateStats, ExtractedRecord, Report, UNPARSABLE_RARITY};
use pretty_assertions::assert_eq;

fn stats_from(entries: &[(&str, &str, u64)]) -> AggregateStats {
    let mut stats = AggregateStats::new();
    for (category, rarity, count) in entries {
        for _ in 0..*count {
            stats.merge(ExtractedRecord {
                category: category.to_string(),
                rarity: rarity.to_string(),
            });
        }
    }
    stats
}

#[test]
fn rows_are_ordered_by_rarity_then_count() {
    let stats = stats_from(&[("A", "50%", 3), ("B", "10%", 7), ("C", "abc", 1)]);
    assert_eq!(stats.total_processed(), 11);

    let report = Report::new(&stats, 11);
    let order: Vec<_> = report.rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(order, vec!["B", "A", "C"]);

    let percents: Vec<_> = report.rows.iter().map(|r| r.percent_label()).collect();
    assert_eq!(percents, vec!["63.6%", "27.3%", "9.1%"]);
    assert_eq!(report.available, 11);
}

#[test]
fn equal_rarity_puts_larger_count_first() {
    let stats = stats_from(&[("Few", "2%", 1), ("Many", "2%", 4), ("Rare", "0.5%", 1)]);
    let report = Report::new(&stats, 10);
    let order: Vec<_> = report.rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(order, vec!["Rare", "Many", "Few"]);
    assert_eq!(report.checked, 10);
}

#[test]
fn rarity_parsing_strips_percent_and_falls_back() {
    assert_eq!(parse_rarity("1.5%"), 1.5);
    assert_eq!(parse_rarity(" 0.2 % "), 0.2);
    assert_eq!(parse_rarity("7"), 7.0);
    assert_eq!(parse_rarity("abc"), UNPARSABLE_RARITY);
    assert_eq!(parse_rarity(""), UNPARSABLE_RARITY);
    assert_eq!(parse_rarity("NaN%"), UNPARSABLE_RARITY);
    assert_eq!(parse_rarity("inf"), UNPARSABLE_RARITY);
}

#[test]
fn empty_stats_produce_no_rows() {
    let report = Report::new(&AggregateStats::new(), 25);
    assert!(report.rows.is_empty());
    assert_eq!(report.checked, 25);
    assert_eq!(report.available, 0);
}

#[test]
fn report_serializes_to_json() {
    let stats = stats_from(&[("X", "20%", 2)]);
    let report = Report::new(&stats, 5);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["checked"], 5);
    assert_eq!(value["available"], 2);
    assert_eq!(value["failures"]["fetch"], 0);
    assert_eq!(value["rows"][0]["category"], "X");
    assert_eq!(value["rows"][0]["rarity"], "20%");
    assert_eq!(value["rows"][0]["percent"], 100.0);
}
