use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoryMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub excerpt: String,
    pub total_parts: u32,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub featured: bool,
}

impl StoryMeta {
    /// Date used for sitemap `lastmod`: updatedAt, else publishedAt, as `YYYY-MM-DD`.
    pub fn last_modified(&self) -> Option<String> {
        [self.updated_at.as_str(), self.published_at.as_str()]
            .into_iter()
            .find_map(parse_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Human-readable publish date, e.g. "January 15, 2024".
    pub fn published_display(&self) -> String {
        parse_date(&self.published_at)
            .map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|| self.published_at.clone())
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok())
}
