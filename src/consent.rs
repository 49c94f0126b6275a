use rocket::http::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::sync::Mutex;

/// Cookie holding the age-gate affirmation.
pub const AGE_CONSENT_KEY: &str = "age_consent";

/// Device-local key/value storage that survives page reloads.
/// Reads and writes are not coordinated across clients.
pub trait ClientStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// ── Cookie-backed storage (per request) ─────────────────

pub struct CookieStorage<'a, 'r> {
    jar: &'a CookieJar<'r>,
}

impl<'a, 'r> CookieStorage<'a, 'r> {
    pub fn new(jar: &'a CookieJar<'r>) -> Self {
        CookieStorage { jar }
    }
}

impl ClientStorage for CookieStorage<'_, '_> {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|c| c.value().to_string())
    }

    fn set(&self, key: &str, value: &str) {
        let mut cookie = Cookie::new(key.to_string(), value.to_string());
        cookie.set_path("/");
        cookie.set_same_site(SameSite::Lax);
        cookie.make_permanent();
        self.jar.add(cookie);
    }

    fn remove(&self, key: &str) {
        self.jar.remove(Cookie::build((key.to_string(), "")).path("/"));
    }
}

// ── In-memory storage ───────────────────────────────────

#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

// ── Gate ────────────────────────────────────────────────

/// Age-verification state. Once granted it stays granted until cleared.
#[derive(Clone, Copy)]
pub struct ConsentGate<'a> {
    storage: &'a dyn ClientStorage,
}

impl<'a> ConsentGate<'a> {
    pub fn new(storage: &'a dyn ClientStorage) -> Self {
        ConsentGate { storage }
    }

    pub fn has_consent(&self) -> bool {
        self.storage.get(AGE_CONSENT_KEY).as_deref() == Some("true")
    }

    pub fn grant(&self) {
        self.storage.set(AGE_CONSENT_KEY, "true");
    }

    pub fn clear(&self) {
        self.storage.remove(AGE_CONSENT_KEY);
    }
}
