use serde::{Deserialize, Serialize};

// ── Site ────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub contact: ContactConfig,
    pub seo: SeoConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ContactConfig {
    pub email: String,
    pub instagram: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SeoConfig {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            name: "Story Portal".to_string(),
            tagline: String::new(),
            description: String::new(),
            contact: ContactConfig::default(),
            seo: SeoConfig::default(),
        }
    }
}

// ── Pagination ──────────────────────────────────────────

pub const DEFAULT_STORIES_PER_PAGE: usize = 12;
pub const DEFAULT_PARTS_PER_PAGE: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    pub stories_per_page: usize,
    pub parts_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            stories_per_page: DEFAULT_STORIES_PER_PAGE,
            parts_per_page: DEFAULT_PARTS_PER_PAGE,
        }
    }
}

impl PaginationConfig {
    /// Both sizes must be positive; zero from a hand-edited file is clamped to 1.
    pub fn normalized(self) -> Self {
        PaginationConfig {
            stories_per_page: self.stories_per_page.max(1),
            parts_per_page: self.parts_per_page.max(1),
        }
    }
}

// ── Backend selection ───────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Static,
    Api,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendConfig {
    pub mode: BackendMode,
    pub api_base_url: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub stories: String,
    pub categories: String,
    pub search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            stories: "/stories".to_string(),
            categories: "/categories".to_string(),
            search: "/search".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            mode: BackendMode::Static,
            api_base_url: String::new(),
            endpoints: Endpoints::default(),
        }
    }
}
