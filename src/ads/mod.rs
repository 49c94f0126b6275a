//! Ad placement policy: whether a position may render for the current
//! visitor, which creative it renders, and how ads are spliced into lists,
//! the story reader and the sticky bottom bar.

use crate::consent::ConsentGate;
use crate::models::ads::{
    AdsConfig, PositionConfig, BANNER_728X90, LIST_BANNER, NATIVE_BANNER, SMART_LINK,
    STICKY_BOTTOM, STORY_INLINE,
};

pub mod device;
pub mod interleave;
pub mod sticky;

use device::{DeviceClass, Viewport};
use interleave::ListAdPlan;
use sticky::StickySettings;

/// Call-to-action link for the `smartLink` position.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartLink {
    pub url: String,
    pub text: String,
}

/// Policy engine for one visitor. Consent and viewport are read at every
/// decision, never captured at construction.
pub struct AdEngine<'a> {
    config: &'a AdsConfig,
    consent: ConsentGate<'a>,
    viewport: &'a dyn Viewport,
}

impl<'a> AdEngine<'a> {
    pub fn new(config: &'a AdsConfig, consent: ConsentGate<'a>, viewport: &'a dyn Viewport) -> Self {
        AdEngine {
            config,
            consent,
            viewport,
        }
    }

    pub fn device_class(&self) -> DeviceClass {
        self.viewport.device_class()
    }

    /// Fails closed on: ads disabled, consent required but missing, position
    /// absent or disabled, or the current device class excluded.
    pub fn should_show(&self, position: &str) -> bool {
        if !self.config.enabled {
            return false;
        }
        if self.config.require_age_consent && !self.consent.has_consent() {
            return false;
        }
        let pos = match self.config.position(position) {
            Some(p) if p.enabled => p,
            _ => return false,
        };
        match pos.devices {
            Some(devices) => match self.viewport.device_class() {
                DeviceClass::Mobile => devices.mobile,
                DeviceClass::Desktop => devices.desktop,
            },
            None => true,
        }
    }

    /// The creative for `position`, unaltered: the payload for the current
    /// device class if one exists, else the generic payload.
    pub fn code(&self, position: &str) -> Option<String> {
        if !self.should_show(position) {
            return None;
        }
        let pos = self.config.position(position)?;
        let code = resolve_creative(pos, self.viewport.device_class());
        if code.is_none() {
            log::debug!("Ad position '{}' has no creative", position);
        }
        code
    }

    // ── Variants ────────────────────────────────────────────────────

    /// Standard responsive banner used between listing chunks.
    pub fn banner_code(&self) -> Option<String> {
        self.code(LIST_BANNER).or_else(|| self.code(BANNER_728X90))
    }

    pub fn large_banner_code(&self) -> Option<String> {
        self.code(BANNER_728X90)
    }

    pub fn inline_story_code(&self) -> Option<String> {
        self.code(STORY_INLINE)
    }

    pub fn native_banner_code(&self) -> Option<String> {
        self.code(NATIVE_BANNER)
    }

    pub fn sticky_code(&self) -> Option<String> {
        self.code(STICKY_BOTTOM).or_else(|| {
            if self.should_show(STICKY_BOTTOM) {
                self.banner_code()
            } else {
                None
            }
        })
    }

    pub fn smart_link(&self) -> Option<SmartLink> {
        if !self.should_show(SMART_LINK) {
            return None;
        }
        let pos = self.config.position(SMART_LINK)?;
        let url = pos.url.clone().filter(|u| !u.trim().is_empty())?;
        Some(SmartLink {
            url,
            text: pos.text.clone().unwrap_or_else(|| "Continue".to_string()),
        })
    }

    // ── Cadence ─────────────────────────────────────────────────────

    pub fn list_plan(&self) -> ListAdPlan {
        ListAdPlan {
            interval: self.config.list_interval(),
            ..ListAdPlan::default()
        }
    }

    pub fn inline_cadence(&self) -> usize {
        self.config.inline_after_parts()
    }

    pub fn sticky_settings(&self) -> StickySettings {
        StickySettings {
            enabled: self.should_show(STICKY_BOTTOM),
            refresh_ms: minutes_to_ms(self.config.sticky_refresh_minutes()),
            hide_ms: minutes_to_ms(self.config.sticky_hide_minutes()),
            pages: self.config.sticky_pages(),
        }
    }
}

fn resolve_creative(pos: &PositionConfig, device: DeviceClass) -> Option<String> {
    let device_code = match device {
        DeviceClass::Mobile => pos.mobile_code.as_ref(),
        DeviceClass::Desktop => pos.desktop_code.as_ref(),
    };
    device_code
        .filter(|c| !c.trim().is_empty())
        .or_else(|| pos.code.as_ref().filter(|c| !c.trim().is_empty()))
        .cloned()
}

fn minutes_to_ms(minutes: u64) -> i64 {
    i64::try_from(minutes.saturating_mul(60_000)).unwrap_or(i64::MAX)
}
