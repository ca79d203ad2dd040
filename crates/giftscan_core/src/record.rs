use serde::{Deserialize, Serialize};

/// Position of one page in the scanned sequence (1-based).
pub type Identifier = u64;

/// The two fields captured from one successfully parsed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub category: String,
    pub rarity: String,
}

impl ExtractedRecord {
    /// Builds a record from raw captures, trimming both fields.
    ///
    /// Returns `None` when either field is empty after trimming.
    pub fn from_captures(category: &str, rarity: &str) -> Option<Self> {
        let (category, rarity) = (category.trim(), rarity.trim());
        if category.is_empty() || rarity.is_empty() {
            return None;
        }
        Some(Self {
            category: category.to_string(),
            rarity: rarity.to_string(),
        })
    }
}
