use rocket::request::{FromRequest, Outcome, Request};
#[cfg(test)]
use std::sync::atomic::{AtomicU32, Ordering};

/// Viewports at or below this width (logical pixels) are mobile.
pub const MOBILE_BREAKPOINT: u32 = 768;

/// Cookie the client updates on resize with its current viewport width.
pub const VIEWPORT_COOKIE: &str = "vw";

const UA_MOBILE_WIDTH: u32 = 400;
const UA_DESKTOP_WIDTH: u32 = 1280;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn from_width(width: u32) -> Self {
        if width <= MOBILE_BREAKPOINT {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Desktop => "desktop",
        }
    }
}

/// Pollable viewport signal. Device-sensitive decisions must call
/// [`Viewport::device_class`] at decision time rather than caching it.
pub trait Viewport {
    fn width(&self) -> u32;

    fn device_class(&self) -> DeviceClass {
        DeviceClass::from_width(self.width())
    }
}

/// A viewport whose width can change between decisions.
#[cfg(test)]
#[derive(Debug)]
pub struct ResizableViewport {
    width: AtomicU32,
}

#[cfg(test)]
impl ResizableViewport {
    pub fn new(width: u32) -> Self {
        ResizableViewport {
            width: AtomicU32::new(width),
        }
    }

    pub fn resize(&self, width: u32) {
        self.width.store(width, Ordering::Relaxed);
    }
}

#[cfg(test)]
impl Viewport for ResizableViewport {
    fn width(&self) -> u32 {
        self.width.load(Ordering::Relaxed)
    }
}

// ── Request signal ──────────────────────────────────────

/// Viewport width reported by the visiting client: viewport client hints,
/// then the `vw` cookie, then a guess from the user agent.
#[derive(Debug, Clone, Copy)]
pub struct ClientViewport(pub u32);

impl Viewport for ClientViewport {
    fn width(&self) -> u32 {
        self.0
    }
}

impl ClientViewport {
    pub fn from_parts(
        hint: Option<&str>,
        cookie: Option<&str>,
        user_agent: Option<&str>,
    ) -> Self {
        let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<u32>().ok()).filter(|w| *w > 0);
        let width = parse(hint)
            .or_else(|| parse(cookie))
            .unwrap_or_else(|| width_from_user_agent(user_agent.unwrap_or("")));
        ClientViewport(width)
    }
}

fn width_from_user_agent(ua: &str) -> u32 {
    if ua.contains("Mobile") || ua.contains("Android") || ua.contains("iPhone") {
        UA_MOBILE_WIDTH
    } else {
        UA_DESKTOP_WIDTH
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientViewport {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = request.headers();
        let hint = headers
            .get_one("Sec-CH-Viewport-Width")
            .or_else(|| headers.get_one("Viewport-Width"));
        let cookie = request.cookies().get(VIEWPORT_COOKIE).map(|c| c.value());
        Outcome::Success(ClientViewport::from_parts(
            hint,
            cookie,
            headers.get_one("User-Agent"),
        ))
    }
}
