use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_STICKY_REFRESH_MINUTES: u64 = 10;
pub const DEFAULT_STICKY_HIDE_MINUTES: u64 = 10;
pub const DEFAULT_LIST_INTERVAL: usize = 6;
pub const DEFAULT_INLINE_AFTER_PARTS: usize = 2;

/// `config/ads.json`. Missing or malformed documents resolve to
/// [`AdsConfig::default`], which has ads disabled.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdsConfig {
    pub enabled: bool,
    pub require_age_consent: bool,
    pub provider: String,
    pub sticky_refresh_minutes: Option<u64>,
    pub sticky_hide_minutes: Option<u64>,
    pub story_inline_after_parts: Option<usize>,
    pub list_banner_after_items: Option<usize>,
    pub positions: HashMap<String, PositionConfig>,
    pub allowed_pages: Option<Vec<String>>,
    pub blocked_pages: Option<Vec<String>>,
}

impl Default for AdsConfig {
    fn default() -> Self {
        AdsConfig {
            enabled: false,
            require_age_consent: true,
            provider: "custom".to_string(),
            sticky_refresh_minutes: None,
            sticky_hide_minutes: None,
            story_inline_after_parts: None,
            list_banner_after_items: None,
            positions: HashMap::new(),
            allowed_pages: None,
            blocked_pages: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionConfig {
    pub enabled: bool,
    pub r#type: Option<String>,
    /// Generic creative, used when no device-specific payload matches.
    pub code: Option<String>,
    pub mobile_code: Option<String>,
    pub desktop_code: Option<String>,
    /// Device restriction; absent means every device class is allowed.
    pub devices: Option<DeviceFlags>,
    pub after_parts: Option<usize>,
    pub frequency: Option<usize>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub url: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DeviceFlags {
    pub mobile: bool,
    pub desktop: bool,
}

impl Default for DeviceFlags {
    fn default() -> Self {
        DeviceFlags { mobile: true, desktop: true }
    }
}

impl AdsConfig {
    pub fn position(&self, name: &str) -> Option<&PositionConfig> {
        self.positions.get(name)
    }

    pub fn sticky_refresh_minutes(&self) -> u64 {
        self.sticky_refresh_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_STICKY_REFRESH_MINUTES)
    }

    pub fn sticky_hide_minutes(&self) -> u64 {
        self.sticky_hide_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_STICKY_HIDE_MINUTES)
    }

    /// Items between list banners: position `frequency`, then the global
    /// `listBannerAfterItems`, then 6.
    pub fn list_interval(&self) -> usize {
        self.position(LIST_BANNER)
            .and_then(|p| p.frequency)
            .or(self.list_banner_after_items)
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LIST_INTERVAL)
    }

    /// Parts between inline story ads: position `afterParts`, then the
    /// global `storyInlineAfterParts`, then 2.
    pub fn inline_after_parts(&self) -> usize {
        self.position(STORY_INLINE)
            .and_then(|p| p.after_parts)
            .or(self.story_inline_after_parts)
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_INLINE_AFTER_PARTS)
    }

    /// Pages that may host the sticky placement: the configured allow-list
    /// (or the default set) minus the block-list.
    pub fn sticky_pages(&self) -> Vec<String> {
        let allowed: Vec<String> = match &self.allowed_pages {
            Some(pages) => pages.clone(),
            None => DEFAULT_STICKY_PAGES.iter().map(|p| p.to_string()).collect(),
        };
        let blocked = self.blocked_pages.as_deref().unwrap_or(&[]);
        allowed
            .into_iter()
            .filter(|p| !blocked.contains(p))
            .collect()
    }
}

// ── Position names ──────────────────────────────────────

pub const STICKY_BOTTOM: &str = "stickyBottom";
pub const STORY_INLINE: &str = "storyInline";
pub const STORY_TOP: &str = "storyTop";
pub const LIST_BANNER: &str = "listBanner";
pub const BANNER_728X90: &str = "banner728x90";
pub const NATIVE_BANNER: &str = "nativeBanner";
pub const SMART_LINK: &str = "smartLink";
pub const FOOTER: &str = "footer";

pub const DEFAULT_STICKY_PAGES: &[&str] = &["home", "story", "search", "category", "categories"];
