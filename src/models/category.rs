use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub story_ids: Vec<String>,
}

/// `categories/index.json`: the slugs of every published category.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CategoryIndex {
    #[serde(default)]
    pub categories: Vec<String>,
}
