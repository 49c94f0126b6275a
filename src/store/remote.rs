use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::models::ads::AdsConfig;
use crate::models::category::Category;
use crate::models::search::SearchIndex;
use crate::models::settings::{BackendConfig, Endpoints, PaginationConfig, SiteConfig};
use crate::models::story::StoryMeta;

use super::Store;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Store backed by an HTTP content API. Every failure is logged and
/// resolved to an absent or empty result.
pub struct RemoteStore {
    client: reqwest::blocking::Client,
    base_url: String,
    endpoints: Endpoints,
}

impl RemoteStore {
    pub fn new(backend: &BackendConfig) -> Result<Self, String> {
        let base_url = backend.api_base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| format!("Invalid apiBaseUrl '{}': {}", base_url, e))?;

        let client = off_runtime(|| {
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .map_err(|e| format!("HTTP client error: {}", e))
        })?;

        Ok(RemoteStore {
            client,
            base_url,
            endpoints: backend.endpoints.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn get(&self, endpoint: &str) -> Result<reqwest::blocking::Response, String> {
        let url = self.url(endpoint);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| format!("GET {} failed: {}", url, e))?;
        if !resp.status().is_success() {
            return Err(format!("GET {} returned {}", url, resp.status()));
        }
        Ok(resp)
    }

    fn get_json<T: DeserializeOwned + Send>(&self, endpoint: &str) -> Result<T, String> {
        off_runtime(|| {
            self.get(endpoint)?
                .json()
                .map_err(|e| format!("{}: JSON parse error: {}", endpoint, e))
        })
    }

    /// Part bodies may come back as plain text or as a JSON string literal.
    fn get_text(&self, endpoint: &str) -> Result<String, String> {
        let body = off_runtime(|| {
            self.get(endpoint)?
                .text()
                .map_err(|e| format!("{}: body read error: {}", endpoint, e))
        })?;
        Ok(serde_json::from_str::<String>(&body).unwrap_or(body))
    }

    fn list<T: DeserializeOwned + Send>(&self, endpoint: &str) -> Vec<T> {
        self.get_json(endpoint).unwrap_or_else(|e| {
            log::warn!("Content API: {}", e);
            vec![]
        })
    }

    fn lookup<T: DeserializeOwned + Send>(&self, endpoint: &str) -> Option<T> {
        self.get_json(endpoint)
            .map_err(|e| log::debug!("Content API: {}", e))
            .ok()
    }

    fn config<T: DeserializeOwned + Default + Send>(&self, endpoint: &str) -> T {
        self.get_json(endpoint).unwrap_or_else(|e| {
            log::warn!("Using default config, content API: {}", e);
            T::default()
        })
    }
}

/// The blocking client must not run on an async worker thread, so every
/// blocking call happens on a short-lived scoped thread.
fn off_runtime<T: Send>(f: impl FnOnce() -> Result<T, String> + Send) -> Result<T, String> {
    std::thread::scope(|scope| {
        scope
            .spawn(f)
            .join()
            .unwrap_or_else(|_| Err("content API request thread panicked".to_string()))
    })
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

impl Store for RemoteStore {
    fn backend_name(&self) -> &'static str {
        "api"
    }

    fn site_config(&self) -> SiteConfig {
        self.config("/config/site")
    }

    fn pagination_config(&self) -> PaginationConfig {
        self.config::<PaginationConfig>("/config/pagination").normalized()
    }

    fn ads_config(&self) -> AdsConfig {
        self.config("/config/ads")
    }

    fn categories(&self) -> Vec<Category> {
        self.list(&self.endpoints.categories)
    }

    fn category(&self, slug: &str) -> Option<Category> {
        self.lookup(&format!("{}/{}", self.endpoints.categories, encode(slug)))
    }

    fn story_meta(&self, id: &str) -> Option<StoryMeta> {
        self.lookup(&format!("{}/{}", self.endpoints.stories, encode(id)))
    }

    fn story_part(&self, id: &str, part: u32) -> Option<String> {
        if part == 0 {
            return None;
        }
        self.get_text(&format!("{}/{}/parts/{}", self.endpoints.stories, encode(id), part))
            .map_err(|e| log::debug!("Content API: {}", e))
            .ok()
    }

    fn all_stories(&self) -> Vec<StoryMeta> {
        self.list(&self.endpoints.stories)
    }

    fn stories_by_category(&self, slug: &str) -> Vec<StoryMeta> {
        self.list(&format!("{}?category={}", self.endpoints.stories, encode(slug)))
    }

    fn search_index(&self) -> SearchIndex {
        self.config(&self.endpoints.search)
    }

    fn search_stories(&self, query: &str) -> Vec<StoryMeta> {
        if query.trim().is_empty() {
            return vec![];
        }
        self.list(&format!("{}?q={}", self.endpoints.search, encode(query.trim())))
    }
}
