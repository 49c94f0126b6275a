use std::path::{Path, PathBuf};

use crate::models::settings::{BackendConfig, BackendMode, Endpoints};

pub const CONFIG_FILE: &str = "portal.toml";

/// Process-level configuration, read once from `portal.toml`.
/// Content-level configuration (site, pagination, ads) lives with the content
/// itself and is loaded through the store.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub site_url: String,
    pub data_dir: PathBuf,
    /// `[backend]` table. `None` defers to `<data_dir>/config/backend.json`.
    pub backend: Option<BackendConfig>,
    /// Shared secret for `POST /api/refresh`. Empty disables the endpoint.
    pub refresh_token: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            site_url: "http://localhost:8000".to_string(),
            data_dir: PathBuf::from("public/data"),
            backend: None,
            refresh_token: String::new(),
        }
    }
}

impl PortalConfig {
    /// Load from `portal.toml` in the working directory.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Missing file or keys fall back to defaults; a malformed file is logged
    /// and treated as missing.
    pub fn load_from(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => {
                log::info!("{} not found, using defaults", path.display());
                return Self::default();
            }
        };
        match raw.parse::<toml::Value>() {
            Ok(value) => Self::from_toml(&value),
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml(value: &toml::Value) -> Self {
        let defaults = Self::default();
        let get_str = |table: &str, key: &str| -> Option<String> {
            value
                .get(table)?
                .get(key)?
                .as_str()
                .map(|s| s.to_string())
        };

        let site_url = get_str("site", "url")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.site_url);
        let data_dir = get_str("data", "dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let refresh_token = get_str("site", "refresh_token").unwrap_or_default();

        let backend = value.get("backend").map(|_| {
            let fallback = Endpoints::default();
            let mode = match get_str("backend", "mode").as_deref() {
                Some("api") => BackendMode::Api,
                _ => BackendMode::Static,
            };
            let endpoint = |key: &str, default: String| {
                value
                    .get("backend")
                    .and_then(|b| b.get("endpoints"))
                    .and_then(|e| e.get(key))
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or(default)
            };
            BackendConfig {
                mode,
                api_base_url: get_str("backend", "api_base_url").unwrap_or_default(),
                endpoints: Endpoints {
                    stories: endpoint("stories", fallback.stories),
                    categories: endpoint("categories", fallback.categories),
                    search: endpoint("search", fallback.search),
                },
            }
        });

        PortalConfig {
            site_url,
            data_dir,
            backend,
            refresh_token,
        }
    }
}
