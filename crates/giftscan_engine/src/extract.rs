use giftscan_core::ExtractedRecord;
use scraper::{ElementRef, Html, Selector};

/// Row label read when no other attribute is configured.
pub const DEFAULT_ATTRIBUTE: &str = "Model";

pub trait RecordExtractor: Send + Sync {
    fn extract(&self, html: &str) -> Option<ExtractedRecord>;
}

/// Reads one attribute row of a gift page:
///
/// ```html
/// <tr><th>Model</th><td>Toy Bear <mark>1.5%</mark></td></tr>
/// ```
///
/// The cell text leading up to `<mark>` becomes the category and the `<mark>`
/// text the rarity. Both must be non-empty. The header is matched
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct AttributeRowExtractor {
    label: String,
}

impl AttributeRowExtractor {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for AttributeRowExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ATTRIBUTE)
    }
}

impl RecordExtractor for AttributeRowExtractor {
    fn extract(&self, html: &str) -> Option<ExtractedRecord> {
        let doc = Html::parse_document(html);
        let row_sel = Selector::parse("tr").ok()?;
        let header_sel = Selector::parse("th").ok()?;
        let cell_sel = Selector::parse("td").ok()?;

        doc.select(&row_sel).find_map(|row| {
            let header = row.select(&header_sel).next()?;
            if !text_of(header).trim().eq_ignore_ascii_case(self.label.trim()) {
                return None;
            }
            let cell = row.select(&cell_sel).next()?;
            let (category, mark) = leading_text_and_mark(cell)?;
            ExtractedRecord::from_captures(&category, &text_of(mark))
        })
    }
}

/// Text nodes at the start of `cell`, up to a `<mark>` that must directly follow them.
fn leading_text_and_mark(cell: ElementRef<'_>) -> Option<(String, ElementRef<'_>)> {
    let mut leading = String::new();
    for node in cell.children() {
        if let Some(text) = node.value().as_text() {
            leading.push_str(text);
            continue;
        }
        let mark = ElementRef::wrap(node).filter(|el| el.value().name() == "mark")?;
        return Some((leading, mark));
    }
    None
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
