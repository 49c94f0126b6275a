use log::{error, info, warn};
use std::path::Path;
use std::process;

use crate::config::PortalConfig;
use crate::models::settings::BackendMode;
use crate::store::files::FileStore;

/// Content subdirectories the static backend reads from
const REQUIRED_DIRS: &[&str] = &["config", "categories", "stories", "search"];

/// Documents whose absence degrades the site to defaults
const EXPECTED_FILES: &[&str] = &[
    "config/site.json",
    "config/pagination.json",
    "config/ads.json",
    "categories/index.json",
    "search/index.json",
];

/// Run all boot checks. Call this before Rocket launches.
/// Missing documents only warn since every read has a fallback; a static
/// backend without a data directory at all aborts.
pub fn run(config: &PortalConfig) {
    info!("Portal boot check starting...");

    let backend = crate::store::backend_config(config);
    if backend.mode == BackendMode::Api {
        if backend.api_base_url.trim().is_empty() {
            warn!("  Backend mode is 'api' but apiBaseUrl is empty");
        }
        info!("Boot check passed (api backend, local data checks skipped).");
        return;
    }

    let root = config.data_dir.as_path();
    if !root.is_dir() {
        error!(
            "Boot check FAILED: data directory {} does not exist. Aborting.",
            root.display()
        );
        process::exit(1);
    }

    let mut warnings = 0u32;

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS {
        if !root.join(dir).is_dir() {
            warn!("  Missing content directory: {}", root.join(dir).display());
            warnings += 1;
        }
    }

    // ── 2. Documents ───────────────────────────────────
    for file in EXPECTED_FILES {
        if !Path::new(&root.join(file)).is_file() {
            warn!("  Missing {} (defaults will be used)", file);
            warnings += 1;
        }
    }

    // ── 3. Stories on disk vs. search index ────────────
    let store = FileStore::new(root);
    let on_disk = store.story_ids_on_disk();
    let indexed = crate::store::Store::search_index(&store).stories.len();
    info!("  {} story directories, {} indexed", on_disk.len(), indexed);
    if on_disk.len() != indexed {
        warn!("  Search index and story directories disagree; unindexed stories are unreachable");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some pages may render empty.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
