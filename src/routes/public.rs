use rocket::http::CookieJar;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::response::content::{RawHtml, RawText, RawXml};
use rocket::response::Redirect;
use rocket::State;

use crate::ads::device::ClientViewport;
use crate::ads::interleave::{interleave, interleave_parts};
use crate::ads::sticky::{StickyEnv, StickyEvent, StickyPlacement, StickyState, SystemClock};
use crate::ads::AdEngine;
use crate::consent::{ClientStorage, ConsentGate, CookieStorage};
use crate::context::Portal;
use crate::models::ads::{FOOTER, NATIVE_BANNER, STORY_TOP};
use crate::pagination::{paginate, reader_window};
use crate::render::{self, html_escape, url_encode, Chrome, StickyView};
use crate::seo;
use crate::store::Store;

// ── Visitor (per-request client state) ─────────────────

pub struct Visitor<'r> {
    pub cookies: &'r CookieJar<'r>,
    pub viewport: ClientViewport,
    /// Path and query of the request, for returning after the age gate.
    pub path: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Visitor<'r> {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let viewport = match request.guard::<ClientViewport>().await {
            Outcome::Success(v) => v,
            _ => ClientViewport(1280),
        };
        Outcome::Success(Visitor {
            cookies: request.cookies(),
            viewport,
            path: request.uri().to_string(),
        })
    }
}

/// Body and head metadata produced by a page handler.
struct PageBody {
    title: Option<String>,
    description: Option<String>,
    html: String,
}

impl PageBody {
    fn titled(title: &str, html: String) -> Self {
        PageBody {
            title: Some(title.to_string()),
            description: None,
            html,
        }
    }
}

/// Render a content page behind the age gate. `page_id` scopes the sticky
/// placement; `build` returns `None` for a 404.
fn render_gated<F>(portal: &Portal, visitor: &Visitor<'_>, page_id: &str, build: F) -> Option<RawHtml<String>>
where
    F: FnOnce(&AdEngine<'_>, &dyn Store) -> Option<PageBody>,
{
    let storage = CookieStorage::new(visitor.cookies);
    let consent = ConsentGate::new(&storage);
    let site = portal.site_config();

    if !consent.has_consent() {
        return Some(RawHtml(render::render_age_gate(&site, &visitor.path)));
    }

    let ads = portal.ads_config();
    let engine = AdEngine::new(&ads, consent, &visitor.viewport);
    let store = portal.store();
    let page = build(&engine, store.as_ref())?;

    let sticky = mount_sticky(page_id, &engine, &storage);
    let path = visitor.path.split('?').next().unwrap_or("/");
    let chrome = Chrome {
        site: &site,
        title: page.title.as_deref(),
        description: page.description.as_deref(),
        path,
        site_url: &portal.config().site_url,
        sticky,
        footer_ad: engine.code(FOOTER),
    };

    Some(RawHtml(render::render_page(&chrome, &page.html)))
}

/// Mount the sticky placement for this response and report what to render.
/// Expired suppression records are cleared on the way.
fn mount_sticky(page_id: &str, engine: &AdEngine<'_>, storage: &dyn ClientStorage) -> Option<StickyView> {
    let settings = engine.sticky_settings();
    let env = StickyEnv {
        clock: &SystemClock,
        storage,
        settings: &settings,
    };
    let mut placement = StickyPlacement::new(page_id);
    placement.drive(StickyEvent::Mount, &env, engine);

    let view = match placement.state() {
        StickyState::UserHidden { until } => Some(StickyView {
            page: page_id.to_string(),
            creative: None,
            refresh_ms: settings.refresh_ms,
            hide_until: Some(*until),
        }),
        _ if placement.is_visible() => Some(StickyView {
            page: page_id.to_string(),
            creative: placement.creative().map(str::to_string),
            refresh_ms: settings.refresh_ms,
            hide_until: None,
        }),
        _ => None,
    };
    placement.apply(StickyEvent::Unmount, &env);
    view
}

fn story_grid(stories: &[crate::models::story::StoryMeta], engine: &AdEngine<'_>) -> String {
    if stories.is_empty() {
        return r#"<p class="empty">No stories found.</p>"#.to_string();
    }
    let segments = interleave(stories, &engine.list_plan(), |s| s.id.clone());
    render::story_listing(&segments, engine)
}

// ── Homepage ───────────────────────────────────────────

#[get("/?<page>")]
pub fn home(portal: &State<Portal>, visitor: Visitor<'_>, page: Option<usize>) -> Option<RawHtml<String>> {
    render_gated(portal, &visitor, "home", |engine, store| {
        let current = page.unwrap_or(1);
        let per_page = portal.pagination_config().stories_per_page;
        let listing = store.stories_paginated(current, per_page);
        let site = portal.site_config();

        let mut html = format!(
            "<header><h1>{}</h1><p>{}</p></header>",
            html_escape(&site.name),
            html_escape(&site.tagline)
        );
        html.push_str(&story_grid(&listing.stories, engine));
        html.push_str(&render::pagination_nav(current, listing.total_pages.max(1), "/"));

        Some(PageBody {
            title: None,
            description: None,
            html,
        })
    })
}

// ── Categories ─────────────────────────────────────────

#[get("/categories")]
pub fn categories(portal: &State<Portal>, visitor: Visitor<'_>) -> Option<RawHtml<String>> {
    render_gated(portal, &visitor, "categories", |engine, store| {
        let categories = store.categories();
        let mut html = String::from("<header><h1>Categories</h1></header>");
        if categories.is_empty() {
            html.push_str(r#"<p class="empty">No categories yet.</p>"#);
        } else {
            html.push_str(r#"<div class="grid">"#);
            for category in &categories {
                html.push_str(&render::category_card(category));
            }
            html.push_str("</div>");
        }
        if let Some(code) = engine.large_banner_code() {
            html.push_str(&render::ad_block("banner728x90", &code));
        }
        Some(PageBody::titled("Categories", html))
    })
}

#[get("/category/<slug>?<page>")]
pub fn category(
    portal: &State<Portal>,
    visitor: Visitor<'_>,
    slug: &str,
    page: Option<usize>,
) -> Option<RawHtml<String>> {
    render_gated(portal, &visitor, "category", |engine, store| {
        let category = store.category(slug)?;
        let stories = store.stories_by_category(slug);
        let per_page = portal.pagination_config().stories_per_page;
        let current = page.unwrap_or(1);
        let listing = paginate(&stories, current, per_page);

        let mut html = format!(
            "<header><h1>{}</h1><p>{}</p><p>{} stories</p></header>",
            html_escape(&category.name),
            html_escape(&category.description),
            listing.total_items
        );
        html.push_str(&story_grid(listing.items, engine));
        html.push_str(&render::pagination_nav(
            current,
            listing.total_pages,
            &format!("/category/{}", url_encode(slug)),
        ));

        Some(PageBody {
            title: Some(category.name.clone()),
            description: Some(category.description.clone()),
            html,
        })
    })
}

// ── Story reader ───────────────────────────────────────

#[get("/story/<id>?<page>")]
pub fn story(
    portal: &State<Portal>,
    visitor: Visitor<'_>,
    id: &str,
    page: Option<usize>,
) -> Option<RawHtml<String>> {
    render_gated(portal, &visitor, "story", |engine, store| {
        let meta = store.story_meta(id)?;
        let per_page = portal.pagination_config().parts_per_page;
        let current = page.unwrap_or(1);
        let window = reader_window(meta.total_parts, current, per_page);
        let parts = store.story_parts(id, window.first_part, window.count);

        let mut html = format!(
            r#"<article class="story"><header>
<a class="category-badge" href="/category/{cat_url}">{cat}</a>
<h1>{title}</h1>
<p>{excerpt}</p>
<p class="meta">{date} &middot; {views} views &middot; {parts} parts</p>
<p class="tags">{tags}</p>
</header>"#,
            cat_url = url_encode(&meta.category),
            cat = html_escape(&meta.category),
            title = html_escape(&meta.title),
            excerpt = html_escape(&meta.excerpt),
            date = html_escape(&meta.published_display()),
            views = meta.views,
            parts = meta.total_parts,
            tags = meta
                .tags
                .iter()
                .map(|t| format!("#{}", html_escape(t)))
                .collect::<Vec<_>>()
                .join(" "),
        );

        if let Some(link) = engine.smart_link() {
            html.push_str(&render::smart_link_box(&link));
        }
        if let Some(code) = engine.code(STORY_TOP) {
            html.push_str(&render::ad_block(STORY_TOP, &code));
        }
        if let Some(code) = engine.native_banner_code() {
            html.push_str(&render::ad_block(NATIVE_BANNER, &code));
        }

        if window.total_pages > 1 && window.count > 0 {
            html.push_str(&format!(
                r#"<p class="reading-range">Reading Parts {} - {} of {}</p>"#,
                window.first_part,
                window.last_part(),
                meta.total_parts
            ));
        }

        if parts.is_empty() {
            html.push_str(r#"<p class="empty">This page has no parts.</p>"#);
        } else {
            let segments = interleave_parts(&parts, engine.inline_cadence());
            html.push_str(&render::story_reader(&segments, engine));
        }

        html.push_str(&render::pagination_nav(
            current,
            window.total_pages,
            &format!("/story/{}", url_encode(id)),
        ));
        html.push_str(r#"<p><a href="/">Browse More Stories</a></p></article>"#);

        Some(PageBody {
            title: Some(meta.title.clone()),
            description: Some(meta.excerpt.clone()),
            html,
        })
    })
}

// ── Search ─────────────────────────────────────────────

#[get("/search?<q>")]
pub fn search(portal: &State<Portal>, visitor: Visitor<'_>, q: Option<&str>) -> Option<RawHtml<String>> {
    render_gated(portal, &visitor, "search", |engine, store| {
        let query = q.unwrap_or("").trim();
        let mut html = format!(
            r#"<header><h1>Search Stories</h1><p>Find stories by title, keywords, or tags</p>
<form method="get" action="/search"><input type="search" name="q" value="{}" autofocus><button type="submit">Search</button></form></header>"#,
            html_escape(query)
        );

        if !query.is_empty() {
            let results = store.search_stories(query);
            html.push_str(&format!(
                "<p>{} {} for \"{}\"</p>",
                results.len(),
                if results.len() == 1 { "result" } else { "results" },
                html_escape(query)
            ));
            html.push_str(&story_grid(&results, engine));
        }

        Some(PageBody::titled("Search", html))
    })
}

// ── Static pages ───────────────────────────────────────

fn static_page(portal: &Portal, visitor: &Visitor<'_>, page_id: &str, title: &str, paragraphs: &[&str]) -> Option<RawHtml<String>> {
    render_gated(portal, visitor, page_id, |_, _| {
        let mut html = format!("<article><h1>{}</h1>", html_escape(title));
        for p in paragraphs {
            html.push_str(&format!("<p>{}</p>", p));
        }
        html.push_str("</article>");
        Some(PageBody::titled(title, html))
    })
}

#[get("/contact")]
pub fn contact(portal: &State<Portal>, visitor: Visitor<'_>) -> Option<RawHtml<String>> {
    let site = portal.site_config();
    let email = html_escape(&site.contact.email);
    let instagram = html_escape(&site.contact.instagram);
    let lines = [
        format!("Email: <a href=\"mailto:{0}\">{0}</a>", email),
        format!("Instagram: {}", instagram),
    ];
    let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    static_page(portal, &visitor, "contact", "Contact", &refs)
}

#[get("/dmca")]
pub fn dmca(portal: &State<Portal>, visitor: Visitor<'_>) -> Option<RawHtml<String>> {
    static_page(portal, &visitor, "dmca", "DMCA", &[
        "We respect the intellectual property rights of others. If you believe that content on this site infringes your copyright, send a notice to the contact address listed on the Contact page.",
        "Your notice must identify the copyrighted work, the location of the infringing material on this site, your contact information, and a statement made in good faith and under penalty of perjury that you are the owner or authorized to act on the owner's behalf.",
        "Infringing material will be removed promptly after a valid notice is received.",
    ])
}

#[get("/terms")]
pub fn terms(portal: &State<Portal>, visitor: Visitor<'_>) -> Option<RawHtml<String>> {
    static_page(portal, &visitor, "terms", "Terms of Service", &[
        "This site contains fiction written for adults. You must be at least 18 years old, or the age of majority in your jurisdiction, to access it.",
        "All stories are works of fiction. Any resemblance to real persons is coincidental.",
        "Content is provided as is and may be changed or removed at any time. Copying or redistributing stories without permission is prohibited.",
    ])
}

#[get("/privacy")]
pub fn privacy(portal: &State<Portal>, visitor: Visitor<'_>) -> Option<RawHtml<String>> {
    static_page(portal, &visitor, "privacy", "Privacy Policy", &[
        "We do not operate user accounts and do not collect personal information.",
        "Your browser stores your age confirmation, your viewport width and, if you close the bottom banner, the time until it may reappear. These cookies never leave this site.",
        "Third-party advertising partners may set their own cookies subject to their own policies.",
    ])
}

// ── Age gate ───────────────────────────────────────────

/// Only same-site absolute paths are followed after consent.
pub(crate) fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n.to_string(),
        _ => "/".to_string(),
    }
}

#[post("/consent?<next>")]
pub fn consent_grant(cookies: &CookieJar<'_>, next: Option<&str>) -> Redirect {
    let storage = CookieStorage::new(cookies);
    ConsentGate::new(&storage).grant();
    Redirect::to(safe_next(next))
}

#[post("/consent/clear")]
pub fn consent_clear(cookies: &CookieJar<'_>) -> Redirect {
    let storage = CookieStorage::new(cookies);
    ConsentGate::new(&storage).clear();
    Redirect::to("/")
}

// ── Sitemap ────────────────────────────────────────────

#[get("/sitemap.xml")]
pub fn sitemap(portal: &State<Portal>) -> RawXml<String> {
    let store = portal.store();
    RawXml(seo::sitemap::generate_sitemap(store.as_ref(), &portal.config().site_url))
}

// ── Robots.txt ─────────────────────────────────────────

#[get("/robots.txt")]
pub fn robots(portal: &State<Portal>) -> RawText<String> {
    RawText(seo::sitemap::generate_robots(&portal.config().site_url))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        home,
        categories,
        category,
        story,
        search,
        contact,
        dmca,
        terms,
        privacy,
        consent_grant,
        consent_clear,
        sitemap,
        robots,
    ]
}
