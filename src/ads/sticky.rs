//! Sticky bottom placement.
//!
//! ```text
//! Hidden --Mount--> Visible --Close--> UserHidden --Tick(deadline)--> Visible
//!    \--Mount (suppressed)-----------> UserHidden
//! any --Unmount--> Unmounted
//! ```
//!
//! Timers are deadlines held by the placement: at most one refresh deadline
//! and one hide deadline exist at a time. A driver feeds `Tick` whenever the
//! clock may have passed [`StickyPlacement::next_deadline`].

#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};

use crate::consent::ClientStorage;

use super::AdEngine;

/// Client storage key for the close-button suppression, epoch milliseconds.
pub const HIDE_UNTIL_KEY: &str = "sticky_ad_hide_until";

pub trait Clock {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        ManualClock {
            now: AtomicI64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: i64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StickySettings {
    /// Global, consent, position and device checks for `stickyBottom`.
    pub enabled: bool,
    pub refresh_ms: i64,
    pub hide_ms: i64,
    /// Page identifiers the placement may activate on.
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StickyState {
    Hidden,
    Visible,
    UserHidden { until: i64 },
    Unmounted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StickyEvent {
    Mount,
    Tick,
    Close,
    CreativeLoaded { ticket: u64, code: Option<String> },
    Unmount,
}

/// Work the driver must perform for the placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickyCommand {
    /// Resolve a creative and answer with `CreativeLoaded { ticket, .. }`.
    Load { ticket: u64 },
}

pub struct StickyEnv<'a> {
    pub clock: &'a dyn Clock,
    pub storage: &'a dyn ClientStorage,
    pub settings: &'a StickySettings,
}

#[derive(Debug)]
pub struct StickyPlacement {
    page: String,
    state: StickyState,
    creative: Option<String>,
    refresh_at: Option<i64>,
    hide_at: Option<i64>,
    last_ticket: u64,
    pending: Option<u64>,
}

impl StickyPlacement {
    pub fn new(page: &str) -> Self {
        StickyPlacement {
            page: page.to_string(),
            state: StickyState::Hidden,
            creative: None,
            refresh_at: None,
            hide_at: None,
            last_ticket: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &StickyState {
        &self.state
    }

    pub fn creative(&self) -> Option<&str> {
        self.creative.as_deref()
    }

    /// Rendered only while visible with a creative to show.
    pub fn is_visible(&self) -> bool {
        self.state == StickyState::Visible && self.creative.is_some()
    }

    pub fn refresh_deadline(&self) -> Option<i64> {
        self.refresh_at
    }

    pub fn hide_deadline(&self) -> Option<i64> {
        self.hide_at
    }

    pub fn next_deadline(&self) -> Option<i64> {
        match (self.refresh_at, self.hide_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// The single transition function.
    pub fn apply(&mut self, event: StickyEvent, env: &StickyEnv<'_>) -> Option<StickyCommand> {
        if self.state == StickyState::Unmounted {
            return None;
        }
        let now = env.clock.now_ms();

        match event {
            StickyEvent::Mount => {
                if self.state != StickyState::Hidden {
                    return None;
                }
                if !env.settings.enabled || !env.settings.pages.iter().any(|p| p == &self.page) {
                    log::debug!("Sticky ad inactive on page '{}'", self.page);
                    return None;
                }
                match read_hide_until(env.storage) {
                    Some(until) if now < until => {
                        self.state = StickyState::UserHidden { until };
                        self.hide_at = Some(until);
                        None
                    }
                    Some(_) => {
                        env.storage.remove(HIDE_UNTIL_KEY);
                        Some(self.show(now, env.settings))
                    }
                    None => Some(self.show(now, env.settings)),
                }
            }

            StickyEvent::Tick => match self.state {
                StickyState::UserHidden { .. } if self.hide_at.is_some_and(|t| now >= t) => {
                    env.storage.remove(HIDE_UNTIL_KEY);
                    self.hide_at = None;
                    Some(self.show(now, env.settings))
                }
                StickyState::Visible if self.refresh_at.is_some_and(|t| now >= t) => {
                    self.refresh_at = Some(now + env.settings.refresh_ms);
                    Some(self.request_load())
                }
                _ => None,
            },

            StickyEvent::Close => {
                if self.state != StickyState::Visible {
                    return None;
                }
                let until = now + env.settings.hide_ms;
                env.storage.set(HIDE_UNTIL_KEY, &until.to_string());
                self.state = StickyState::UserHidden { until };
                self.refresh_at = None;
                self.hide_at = Some(until);
                None
            }

            StickyEvent::CreativeLoaded { ticket, code } => {
                if self.pending == Some(ticket) {
                    self.creative = code;
                    self.pending = None;
                }
                None
            }

            StickyEvent::Unmount => {
                self.state = StickyState::Unmounted;
                self.refresh_at = None;
                self.hide_at = None;
                self.pending = None;
                None
            }
        }
    }

    /// Apply `event` and resolve any resulting load synchronously through
    /// the policy engine.
    pub fn drive(&mut self, event: StickyEvent, env: &StickyEnv<'_>, engine: &AdEngine<'_>) {
        if let Some(StickyCommand::Load { ticket }) = self.apply(event, env) {
            let code = engine.sticky_code();
            self.apply(StickyEvent::CreativeLoaded { ticket, code }, env);
        }
    }

    fn show(&mut self, now: i64, settings: &StickySettings) -> StickyCommand {
        self.state = StickyState::Visible;
        self.refresh_at = Some(now + settings.refresh_ms);
        self.request_load()
    }

    /// A newer request supersedes any load still in flight.
    fn request_load(&mut self) -> StickyCommand {
        self.last_ticket += 1;
        self.pending = Some(self.last_ticket);
        StickyCommand::Load {
            ticket: self.last_ticket,
        }
    }
}

pub fn read_hide_until(storage: &dyn ClientStorage) -> Option<i64> {
    storage
        .get(HIDE_UNTIL_KEY)
        .and_then(|v| v.trim().parse::<i64>().ok())
}
