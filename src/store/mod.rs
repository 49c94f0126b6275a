use std::sync::Arc;

use crate::config::PortalConfig;
use crate::models::ads::AdsConfig;
use crate::models::category::Category;
use crate::models::search::SearchIndex;
use crate::models::settings::{BackendConfig, BackendMode, PaginationConfig, SiteConfig};
use crate::models::story::StoryMeta;

pub mod files;
pub mod remote;

/// One page of the story listing as served by [`Store::stories_paginated`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoryPage {
    pub stories: Vec<StoryMeta>,
    pub total_pages: usize,
}

/// Unified content-access trait. Every content read goes through here.
/// Implementations: `FileStore` (pre-generated JSON/text files) and
/// `RemoteStore` (HTTP content API).
///
/// Lookups return `None` for anything that cannot be resolved and list
/// operations return an empty `Vec`; failures are logged by the implementation
/// and never surface to callers.
pub trait Store: Send + Sync {
    fn backend_name(&self) -> &'static str;

    // ── Configuration ───────────────────────────────────────────────
    fn site_config(&self) -> SiteConfig;
    fn pagination_config(&self) -> PaginationConfig;
    fn ads_config(&self) -> AdsConfig;

    // ── Categories ──────────────────────────────────────────────────
    fn categories(&self) -> Vec<Category>;
    fn category(&self, slug: &str) -> Option<Category>;

    // ── Stories ─────────────────────────────────────────────────────
    fn story_meta(&self, id: &str) -> Option<StoryMeta>;
    fn story_part(&self, id: &str, part: u32) -> Option<String>;

    /// Parts `start .. start + count` keyed by part number; parts that fail
    /// to resolve are skipped.
    fn story_parts(&self, id: &str, start: u32, count: u32) -> Vec<(u32, String)> {
        (start..start.saturating_add(count))
            .filter_map(|n| self.story_part(id, n).map(|text| (n, text)))
            .collect()
    }

    fn all_stories(&self) -> Vec<StoryMeta>;

    /// 1-based page of [`Store::all_stories`]. Out-of-range pages (including
    /// page 0) yield an empty slice; `total_pages` is `ceil(total / per_page)`.
    fn stories_paginated(&self, page: usize, per_page: usize) -> StoryPage {
        let per_page = per_page.max(1);
        let all = self.all_stories();
        let total_pages = all.len().div_ceil(per_page);
        let stories = if page == 0 {
            vec![]
        } else {
            all.into_iter()
                .skip((page - 1).saturating_mul(per_page))
                .take(per_page)
                .collect()
        };
        StoryPage { stories, total_pages }
    }

    fn stories_by_category(&self, slug: &str) -> Vec<StoryMeta>;

    // ── Search ──────────────────────────────────────────────────────
    fn search_index(&self) -> SearchIndex;
    fn search_stories(&self, query: &str) -> Vec<StoryMeta>;

    /// Resolve ids to full metadata, dropping ids that do not resolve.
    fn hydrate(&self, ids: &[String]) -> Vec<StoryMeta> {
        ids.iter().filter_map(|id| self.story_meta(id)).collect()
    }
}

/// Backend selection: `[backend]` from `portal.toml`, else
/// `<data_dir>/config/backend.json`, else static files.
pub fn backend_config(config: &PortalConfig) -> BackendConfig {
    if let Some(backend) = &config.backend {
        return backend.clone();
    }
    let path = config.data_dir.join("config").join("backend.json");
    match files::read_json_file::<BackendConfig>(&path) {
        Ok(backend) => backend,
        Err(e) => {
            log::debug!("No backend.json ({}), using static files", e);
            BackendConfig::default()
        }
    }
}

/// Create the store for the configured backend. An API backend that cannot
/// be constructed degrades to static files.
pub fn create_store(config: &PortalConfig) -> Arc<dyn Store> {
    let backend = backend_config(config);
    match backend.mode {
        BackendMode::Api => match remote::RemoteStore::new(&backend) {
            Ok(rs) => {
                log::info!("Content backend: api ({})", backend.api_base_url);
                Arc::new(rs) as Arc<dyn Store>
            }
            Err(e) => {
                log::error!("Remote backend unavailable ({}), falling back to static files", e);
                Arc::new(files::FileStore::new(&config.data_dir)) as Arc<dyn Store>
            }
        },
        BackendMode::Static => {
            log::info!("Content backend: static ({})", config.data_dir.display());
            Arc::new(files::FileStore::new(&config.data_dir)) as Arc<dyn Store>
        }
    }
}
