use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;

use crate::ads::sticky::{read_hide_until, StickyEnv, StickyEvent, StickyPlacement, StickyState, SystemClock};
use crate::ads::AdEngine;
use crate::consent::{ConsentGate, CookieStorage};
use crate::context::Portal;

use super::public::Visitor;

// ── Sticky close ───────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyCloseResponse {
    pub hidden: bool,
    pub hide_until: Option<i64>,
}

/// Close button of the sticky bar. The placement is re-mounted for `page` so
/// the same eligibility checks apply before the suppression is recorded.
#[post("/ads/sticky/close?<page>")]
pub fn sticky_close(portal: &State<Portal>, visitor: Visitor<'_>, page: Option<&str>) -> Json<StickyCloseResponse> {
    let storage = CookieStorage::new(visitor.cookies);
    let ads = portal.ads_config();
    let engine = AdEngine::new(&ads, ConsentGate::new(&storage), &visitor.viewport);
    let settings = engine.sticky_settings();
    let env = StickyEnv {
        clock: &SystemClock,
        storage: &storage,
        settings: &settings,
    };

    let mut placement = StickyPlacement::new(page.unwrap_or("home"));
    placement.drive(StickyEvent::Mount, &env, &engine);
    placement.apply(StickyEvent::Close, &env);

    let hidden = matches!(placement.state(), StickyState::UserHidden { .. });
    placement.apply(StickyEvent::Unmount, &env);

    Json(StickyCloseResponse {
        hidden,
        hide_until: read_hide_until(&storage),
    })
}

// ── Position lookup ────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AdSlotResponse {
    pub position: String,
    pub device: &'static str,
    pub show: bool,
    pub code: Option<String>,
}

#[get("/ads/<position>")]
pub fn ad_slot(portal: &State<Portal>, visitor: Visitor<'_>, position: &str) -> Json<AdSlotResponse> {
    let storage = CookieStorage::new(visitor.cookies);
    let ads = portal.ads_config();
    let engine = AdEngine::new(&ads, ConsentGate::new(&storage), &visitor.viewport);

    Json(AdSlotResponse {
        position: position.to_string(),
        device: engine.device_class().as_str(),
        show: engine.should_show(position),
        code: engine.code(position),
    })
}

// ── Cache refresh ──────────────────────────────────────

pub struct RefreshToken(String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RefreshToken {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request.headers().get_one("X-Refresh-Token") {
            Some(token) => Outcome::Success(RefreshToken(token.to_string())),
            None => Outcome::Forward(Status::Unauthorized),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub ok: bool,
    pub backend: &'static str,
}

/// Drop cached configuration and the resolved backend. Disabled unless a
/// token is configured.
#[post("/refresh")]
pub fn refresh(portal: &State<Portal>, token: RefreshToken) -> Result<Json<RefreshResponse>, Status> {
    let expected = portal.config().refresh_token.as_str();
    if expected.is_empty() {
        return Err(Status::NotFound);
    }
    if token.0 != expected {
        log::warn!("Rejected cache refresh with a bad token");
        return Err(Status::Unauthorized);
    }
    portal.invalidate();
    Ok(Json(RefreshResponse {
        ok: true,
        backend: portal.store().backend_name(),
    }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![sticky_close, ad_slot, refresh]
}
