use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::models::ads::AdsConfig;
use crate::models::category::{Category, CategoryIndex};
use crate::models::search::SearchIndex;
use crate::models::settings::{PaginationConfig, SiteConfig};
use crate::models::story::StoryMeta;

use super::Store;

/// Width of the zero-padded part number in `part-NNN.txt`.
pub const PART_NUMBER_WIDTH: usize = 3;

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("{}: {}", path.display(), e))
}

/// `part-007.txt` for part 7.
pub fn part_file_name(part: u32) -> String {
    format!("part-{:0width$}.txt", part, width = PART_NUMBER_WIDTH)
}

/// Ids and slugs become path segments; anything that could escape the data
/// directory is treated as not found.
fn is_safe_segment(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && !s.contains('/')
        && !s.contains('\\')
        && !s.contains('\0')
}

/// Store backed by the pre-generated content directory:
///
/// ```text
/// config/{site,pagination,ads}.json
/// categories/index.json, categories/<slug>.json
/// stories/<id>/meta.json, stories/<id>/part-NNN.txt
/// search/index.json
/// ```
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    fn read_json<T: DeserializeOwned>(&self, rel: &str) -> Result<T, String> {
        read_json_file(&self.root.join(rel))
    }

    fn read_text(&self, rel: &str) -> Result<String, String> {
        let path = self.root.join(rel);
        std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Config documents fall back to their defaults when missing or malformed.
    fn read_config<T: DeserializeOwned + Default>(&self, rel: &str) -> T {
        match self.read_json(rel) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Using default config, could not load {}", e);
                T::default()
            }
        }
    }

    /// Slugs listed in `categories/index.json`.
    pub fn category_slugs(&self) -> Vec<String> {
        match self.read_json::<CategoryIndex>("categories/index.json") {
            Ok(index) => index.categories,
            Err(e) => {
                log::warn!("No category index found ({}), listing no categories", e);
                vec![]
            }
        }
    }

    /// Story directories present on disk, sorted by name.
    pub fn story_ids_on_disk(&self) -> Vec<String> {
        let dir = self.root.join("stories");
        let mut ids: Vec<String> = std::fs::read_dir(&dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_dir())
                    .filter_map(|e| e.file_name().into_string().ok())
                    .collect()
            })
            .unwrap_or_default();
        ids.sort();
        ids
    }
}

impl Store for FileStore {
    fn backend_name(&self) -> &'static str {
        "static"
    }

    fn site_config(&self) -> SiteConfig {
        self.read_config("config/site.json")
    }

    fn pagination_config(&self) -> PaginationConfig {
        self.read_config::<PaginationConfig>("config/pagination.json")
            .normalized()
    }

    fn ads_config(&self) -> AdsConfig {
        self.read_config("config/ads.json")
    }

    fn categories(&self) -> Vec<Category> {
        self.category_slugs()
            .iter()
            .filter_map(|slug| self.category(slug))
            .collect()
    }

    fn category(&self, slug: &str) -> Option<Category> {
        if !is_safe_segment(slug) {
            return None;
        }
        self.read_json(&format!("categories/{}.json", slug))
            .map_err(|e| log::debug!("Category not found: {}", e))
            .ok()
    }

    fn story_meta(&self, id: &str) -> Option<StoryMeta> {
        if !is_safe_segment(id) {
            return None;
        }
        self.read_json(&format!("stories/{}/meta.json", id))
            .map_err(|e| log::debug!("Story not found: {}", e))
            .ok()
    }

    fn story_part(&self, id: &str, part: u32) -> Option<String> {
        if !is_safe_segment(id) || part == 0 {
            return None;
        }
        self.read_text(&format!("stories/{}/{}", id, part_file_name(part)))
            .map_err(|e| log::debug!("Story part not found: {}", e))
            .ok()
    }

    fn all_stories(&self) -> Vec<StoryMeta> {
        let ids: Vec<String> = self.search_index().stories.into_iter().map(|s| s.id).collect();
        self.hydrate(&ids)
    }

    fn stories_by_category(&self, slug: &str) -> Vec<StoryMeta> {
        match self.category(slug) {
            Some(category) => self.hydrate(&category.story_ids),
            None => vec![],
        }
    }

    fn search_index(&self) -> SearchIndex {
        match self.read_json("search/index.json") {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Search index unavailable: {}", e);
                SearchIndex::default()
            }
        }
    }

    fn search_stories(&self, query: &str) -> Vec<StoryMeta> {
        let ids = self.search_index().matching_ids(query);
        self.hydrate(&ids)
    }
}
