use std::sync::{Arc, RwLock};

use crate::config::PortalConfig;
use crate::models::ads::AdsConfig;
use crate::models::settings::{PaginationConfig, SiteConfig};
use crate::store::{self, Store};

type StoreResolver = Box<dyn Fn(&PortalConfig) -> Arc<dyn Store> + Send + Sync>;

/// Process-wide state shared by every request: the resolved content store
/// and the configuration documents loaded through it. Each is resolved
/// lazily on first use and kept until [`Portal::invalidate`].
pub struct Portal {
    config: PortalConfig,
    resolver: StoreResolver,
    store: RwLock<Option<Arc<dyn Store>>>,
    site: RwLock<Option<Arc<SiteConfig>>>,
    pagination: RwLock<Option<PaginationConfig>>,
    ads: RwLock<Option<Arc<AdsConfig>>>,
}

impl Portal {
    pub fn new(config: PortalConfig) -> Self {
        Self::with_resolver(config, Box::new(store::create_store))
    }

    pub fn with_resolver(config: PortalConfig, resolver: StoreResolver) -> Self {
        Portal {
            config,
            resolver,
            store: RwLock::new(None),
            site: RwLock::new(None),
            pagination: RwLock::new(None),
            ads: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn Store> {
        cached(&self.store, || (self.resolver)(&self.config))
    }

    pub fn site_config(&self) -> Arc<SiteConfig> {
        cached(&self.site, || Arc::new(self.store().site_config()))
    }

    pub fn pagination_config(&self) -> PaginationConfig {
        cached(&self.pagination, || self.store().pagination_config().normalized())
    }

    pub fn ads_config(&self) -> Arc<AdsConfig> {
        cached(&self.ads, || Arc::new(self.store().ads_config()))
    }

    /// Drop every cached value; the next access re-resolves the backend and
    /// reloads configuration.
    pub fn invalidate(&self) {
        clear(&self.store);
        clear(&self.site);
        clear(&self.pagination);
        clear(&self.ads);
        log::info!("Portal caches invalidated");
    }
}

/// Concurrent first accesses may both load; the last write wins.
fn cached<T: Clone>(slot: &RwLock<Option<T>>, load: impl FnOnce() -> T) -> T {
    if let Ok(guard) = slot.read() {
        if let Some(value) = guard.as_ref() {
            return value.clone();
        }
    }
    let value = load();
    if let Ok(mut guard) = slot.write() {
        *guard = Some(value.clone());
    }
    value
}

fn clear<T>(slot: &RwLock<Option<T>>) {
    if let Ok(mut guard) = slot.write() {
        *guard = None;
    }
}
