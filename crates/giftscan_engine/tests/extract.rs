use giftscan_core::ExtractedRecord;
use giftscan_engine::{AttributeRowExtractor, RecordExtractor};
use pretty_assertions::assert_eq;

const GIFT_PAGE: &str = r#"
<html><head><title>Plush Pepe #12</title></head>
<body>
  <div class="tgme_gift_preview"></div>
  <table class="tgme_gift_table">
    <tr><th>Owner</th><td><a href="/someone">someone</a></td></tr>
    <tr><th>Model</th><td>Aqua Plush <mark>1.5%</mark></td></tr>
    <tr><th>Backdrop</th><td>
        Electric Indigo
        <mark> 2% </mark>
    </td></tr>
    <tr><th>Symbol</th><td>Lotus <mark>0.3%</mark></td></tr>
    <tr><th>Quantity</th><td>12/2 853 issued</td></tr>
  </table>
</body></html>
"#;

fn record(category: &str, rarity: &str) -> ExtractedRecord {
    ExtractedRecord {
        category: category.to_string(),
        rarity: rarity.to_string(),
    }
}

#[test]
fn default_extractor_reads_model_row() {
    let extracted = AttributeRowExtractor::default().extract(GIFT_PAGE);
    assert_eq!(extracted, Some(record("Aqua Plush", "1.5%")));
}

#[test]
fn other_attribute_rows_are_trimmed() {
    let backdrop = AttributeRowExtractor::new("backdrop").extract(GIFT_PAGE);
    assert_eq!(backdrop, Some(record("Electric Indigo", "2%")));

    let symbol = AttributeRowExtractor::new("Symbol").extract(GIFT_PAGE);
    assert_eq!(symbol, Some(record("Lotus", "0.3%")));
}

#[test]
fn row_without_rarity_mark_is_not_a_match() {
    let extracted = AttributeRowExtractor::new("Quantity").extract(GIFT_PAGE);
    assert_eq!(extracted, None);
}

#[test]
fn page_without_table_is_not_a_match() {
    let html = "<html><body><p>Gift not found</p></body></html>";
    assert_eq!(AttributeRowExtractor::default().extract(html), None);
}

#[test]
fn empty_category_is_not_a_match() {
    let html = "<table><tr><th>Model</th><td>  <mark>5%</mark></td></tr></table>";
    assert_eq!(AttributeRowExtractor::default().extract(html), None);
}

#[test]
fn empty_rarity_mark_is_not_a_match() {
    let html = "<table><tr><th>Model</th><td>Toy Bear <mark></mark></td></tr></table>";
    assert_eq!(AttributeRowExtractor::default().extract(html), None);

    let blank = "<table><tr><th>Model</th><td>Toy Bear <mark>  </mark></td></tr></table>";
    assert_eq!(AttributeRowExtractor::default().extract(blank), None);
}

#[test]
fn text_after_mark_stays_out_of_category() {
    let html = "<table><tr><th>Model</th><td>Toy Bear <mark>1%</mark> tail</td></tr></table>";
    assert_eq!(
        AttributeRowExtractor::default().extract(html),
        Some(record("Toy Bear", "1%"))
    );
}

#[test]
fn element_before_mark_is_not_a_match() {
    let html =
        "<table><tr><th>Model</th><td>Toy <b>Bear</b> <mark>1%</mark></td></tr></table>";
    assert_eq!(AttributeRowExtractor::default().extract(html), None);
}
