use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchIndex {
    #[serde(default)]
    pub stories: Vec<SearchIndexEntry>,
}

/// Denormalized projection of a story used only for substring matching.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchIndexEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
}

impl SearchIndexEntry {
    /// Case-insensitive substring match against title, keywords and tags.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.keywords.iter().any(|k| k.to_lowercase().contains(needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

impl SearchIndex {
    /// Ids of every entry matching `query`, in index order.
    /// A blank query matches nothing.
    pub fn matching_ids(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return vec![];
        }
        self.stories
            .iter()
            .filter(|s| s.matches(&needle))
            .map(|s| s.id.clone())
            .collect()
    }
}
