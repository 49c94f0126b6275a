use crate::ads::interleave::{ReaderSegment, Segment};
use crate::ads::{AdEngine, SmartLink};
use crate::models::category::Category;
use crate::models::settings::SiteConfig;
use crate::models::story::StoryMeta;
use crate::pagination::{navigate, page_strip, PageMarker};

/// Sticky bottom bar as rendered on this response.
pub struct StickyView {
    /// Page identifier the placement was mounted on.
    pub page: String,
    /// `None` while the close suppression is in force.
    pub creative: Option<String>,
    pub refresh_ms: i64,
    /// End of the close suppression; the client re-shows the bar then.
    pub hide_until: Option<i64>,
}

/// Everything around the page body.
pub struct Chrome<'a> {
    pub site: &'a SiteConfig,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub path: &'a str,
    pub site_url: &'a str,
    pub sticky: Option<StickyView>,
    pub footer_ad: Option<String>,
}

const BASE_CSS: &str = r#"
body{margin:0;font-family:Georgia,serif;background:#111;color:#e5e5e5}
a{color:#f472b6;text-decoration:none}
header.site,footer.site{padding:16px 24px;background:#0a0a0a}
header.site nav a{margin-right:16px}
main{max-width:1100px;margin:0 auto;padding:24px}
.grid{display:grid;gap:24px;grid-template-columns:repeat(auto-fill,minmax(280px,1fr))}
.story-card{background:#1c1c1c;border-radius:8px;padding:20px}
.ad-slot{margin:32px 0;text-align:center}
.pagination{display:flex;gap:4px;justify-content:center;margin-top:48px}
.pagination .current{font-weight:bold}
.pagination .disabled{opacity:.5}
.story-part{margin:32px 0;line-height:1.8}
.age-gate{position:fixed;inset:0;display:flex;align-items:center;justify-content:center;background:#000}
.age-gate .box{max-width:420px;background:#1c1c1c;padding:32px;border-radius:12px;text-align:center}
.sticky-ad-container{position:fixed;bottom:0;left:0;right:0;z-index:9999;background:rgba(0,0,0,.95);padding:8px;display:flex;justify-content:center}
.sticky-ad-container[hidden]{display:none}
.sticky-ad-close{position:absolute;top:4px;right:8px;cursor:pointer}
.protected-content{user-select:none;-webkit-user-select:none}
"#;

/// Reports the viewport width on load and resize, blocks copying out of
/// `.protected-content`, and drives the sticky bar between responses:
/// creative refresh, close, and re-show at the suppression deadline.
const CLIENT_JS: &str = r#"
(function(){
  function vw(){document.cookie='vw='+window.innerWidth+';path=/;max-age=31536000;samesite=lax';}
  vw();window.addEventListener('resize',vw);
  function guard(e){var n=e.target;if(n&&n.nodeType===3)n=n.parentNode;if(n&&n.closest&&n.closest('.protected-content'))e.preventDefault();}
  ['copy','cut','contextmenu','selectstart'].forEach(function(t){document.addEventListener(t,guard);});
  var bar=document.getElementById('sticky-ad');
  if(!bar)return;
  var content=bar.querySelector('.sticky-ad-content');
  var every=parseInt(bar.dataset.refreshMs||'0',10),timer=null;
  function load(then){
    fetch('/api/ads/stickyBottom',{credentials:'same-origin'}).then(function(r){return r.json();}).then(function(ad){
      if(ad.show&&ad.code){content.innerHTML=ad.code;if(then)then();}
    });
  }
  function startRefresh(){if(timer)clearInterval(timer);timer=every>0?setInterval(function(){load();},every):null;}
  function reshowAt(until){
    setTimeout(function(){
      document.cookie='sticky_ad_hide_until=;path=/;max-age=0';
      load(function(){bar.hidden=false;startRefresh();});
    },Math.max(0,until-Date.now()));
  }
  bar.querySelector('.sticky-ad-close').addEventListener('click',function(){
    bar.hidden=true;if(timer){clearInterval(timer);timer=null;}
    fetch('/api/ads/sticky/close?page='+encodeURIComponent(bar.dataset.page||''),{method:'POST',credentials:'same-origin'})
      .then(function(r){return r.json();}).then(function(res){if(res.hidden&&res.hideUntil)reshowAt(res.hideUntil);});
  });
  var until=parseInt(bar.dataset.hideUntil||'0',10);
  if(until>0){reshowAt(until);}else{startRefresh();}
})();
"#;

pub fn render_page(chrome: &Chrome<'_>, body: &str) -> String {
    let site_name = html_escape(&chrome.site.name);
    let title = match chrome.title {
        Some(t) => format!("{} | {}", html_escape(t), site_name),
        None if !chrome.site.seo.title.is_empty() => html_escape(&chrome.site.seo.title),
        None => site_name.clone(),
    };
    let description = chrome
        .description
        .unwrap_or(&chrome.site.seo.description);
    let keywords = chrome.site.seo.keywords.join(", ");

    let sticky = chrome
        .sticky
        .as_ref()
        .map(|s| {
            let suppressed = match (&s.creative, s.hide_until) {
                (None, Some(until)) => format!(r#" data-hide-until="{}" hidden"#, until),
                _ => String::new(),
            };
            format!(
                r#"<div id="sticky-ad" class="sticky-ad-container" data-page="{}" data-refresh-ms="{}"{}><button class="sticky-ad-close" aria-label="Close advertisement">&times;</button><div class="sticky-ad-content">{}</div></div>"#,
                html_escape(&s.page),
                s.refresh_ms,
                suppressed,
                s.creative.as_deref().unwrap_or_default()
            )
        })
        .unwrap_or_default();
    let footer_ad = chrome
        .footer_ad
        .as_deref()
        .map(|code| ad_block("footer", code))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="description" content="{description}">
    <meta name="keywords" content="{keywords}">
    <meta name="rating" content="adult">
    <link rel="canonical" href="{site_url}{path}">
    <style>{css}</style>
</head>
<body>
    <header class="site"><nav><a href="/"><strong>{site_name}</strong></a><a href="/categories">Categories</a><a href="/search">Search</a></nav></header>
    <main>
{body}
    </main>
    {footer_ad}
    <footer class="site">
        <p>&copy; {year} {site_name}. All content is fiction intended for adults.</p>
        <p><a href="/contact">Contact</a> &middot; <a href="/dmca">DMCA</a> &middot; <a href="/terms">Terms</a> &middot; <a href="/privacy">Privacy</a></p>
    </footer>
    {sticky}
    <script>{js}</script>
</body>
</html>"#,
        title = title,
        description = html_escape(description),
        keywords = html_escape(&keywords),
        site_url = chrome.site_url,
        path = html_escape(chrome.path),
        css = BASE_CSS,
        site_name = site_name,
        body = body,
        footer_ad = footer_ad,
        year = chrono::Utc::now().format("%Y"),
        sticky = sticky,
        js = CLIENT_JS,
    )
}

/// Shown in place of any content until the visitor affirms they are 18+.
pub fn render_age_gate(site: &SiteConfig, next: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="robots" content="noindex">
    <title>{name}</title>
    <style>{css}</style>
</head>
<body>
    <div class="age-gate"><div class="box">
        <h1>Adult Content Warning</h1>
        <p>This website contains adult content intended for individuals aged <strong>18 years or older</strong>. By entering, you confirm that you are of legal age in your jurisdiction.</p>
        <form method="post" action="/consent?next={next}"><button type="submit">I am 18+ - Enter</button></form>
        <p><a href="https://www.google.com">Exit</a></p>
        <p><small>By entering you agree to our Terms of Service.</small></p>
    </div></div>
</body>
</html>"#,
        name = html_escape(&site.name),
        css = BASE_CSS,
        next = url_encode(next),
    )
}

// ── Building blocks ─────────────────────────────────────

/// Creative payloads are inserted verbatim.
pub fn ad_block(position: &str, code: &str) -> String {
    format!(
        r#"<div class="ad-slot ad-{}">{}</div>"#,
        html_escape(position),
        code
    )
}

pub fn smart_link_box(link: &SmartLink) -> String {
    format!(
        r#"<div class="ad-slot ad-smartLink"><a href="{}" rel="nofollow sponsored noopener" target="_blank">{}</a></div>"#,
        html_escape(&link.url),
        html_escape(&link.text)
    )
}

pub fn story_card(story: &StoryMeta) -> String {
    let featured = if story.featured {
        r#"<span class="featured">Featured</span>"#
    } else {
        ""
    };
    format!(
        r#"<article class="story-card">
    <a class="category-badge" href="/category/{cat_url}">{cat}</a>{featured}
    <h2><a href="/story/{id_url}">{title}</a></h2>
    <p>{excerpt}</p>
    <p class="meta">{parts} parts &middot; {views} views</p>
</article>"#,
        cat_url = url_encode(&story.category),
        cat = html_escape(&story.category),
        featured = featured,
        id_url = url_encode(&story.id),
        title = html_escape(&story.title),
        excerpt = html_escape(&story.excerpt),
        parts = story.total_parts,
        views = story.views,
    )
}

pub fn category_card(category: &Category) -> String {
    format!(
        r#"<article class="story-card"><h2><a href="/category/{}">{}</a></h2><p>{}</p><p class="meta">{} stories</p></article>"#,
        url_encode(&category.slug),
        html_escape(&category.name),
        html_escape(&category.description),
        category.story_ids.len()
    )
}

/// Story grid with list banners spliced in. Ad segments without a creative
/// render nothing.
pub fn story_listing(segments: &[Segment<'_, StoryMeta>], engine: &AdEngine<'_>) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment {
            Segment::Items { key, items } => {
                html.push_str(&format!(r#"<div class="grid" data-key="{}">"#, key));
                for entry in items {
                    html.push_str(&format!(r#"<div data-key="{}">"#, html_escape(&entry.key)));
                    html.push_str(&story_card(entry.item));
                    html.push_str("</div>");
                }
                html.push_str("</div>");
            }
            Segment::Ad { .. } => {
                if let Some(code) = engine.banner_code() {
                    html.push_str(&ad_block("listBanner", &code));
                }
            }
        }
    }
    html
}

/// Story parts with inline ads. A leading "<title> - Part N" line is
/// dropped since the part number is shown in the header.
pub fn story_reader(segments: &[ReaderSegment<'_>], engine: &AdEngine<'_>) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment {
            ReaderSegment::Part { number, text } => {
                html.push_str(&format!(
                    r#"<section class="story-part protected-content"><div class="part-header"><span>Part {}</span></div>"#,
                    number
                ));
                for (i, paragraph) in text.split("\n\n").filter(|p| !p.trim().is_empty()).enumerate() {
                    if i == 0 && paragraph.contains(" - Part") {
                        continue;
                    }
                    html.push_str(&format!("<p>{}</p>", html_escape(paragraph.trim())));
                }
                html.push_str("</section>");
            }
            ReaderSegment::Ad { .. } => {
                if let Some(code) = engine.inline_story_code() {
                    html.push_str(&ad_block("storyInline", &code));
                }
            }
        }
    }
    html
}

/// Page-number strip with prev/next; the boundary controls render disabled.
/// `base` is the path the `page` query parameter is appended to.
pub fn pagination_nav(current: usize, total: usize, base: &str) -> String {
    if total <= 1 {
        return String::new();
    }
    let sep = if base.contains('?') { '&' } else { '?' };
    let link = |page: usize, label: &str| format!(r#"<a href="{}{}page={}">{}</a>"#, base, sep, page, label);

    let mut html = String::from(r#"<nav class="pagination">"#);
    match navigate(current.saturating_sub(1), total) {
        Some(prev) => html.push_str(&link(prev, "&laquo; Prev")),
        None => html.push_str(r#"<span class="disabled">&laquo; Prev</span>"#),
    }
    for marker in page_strip(current, total) {
        match marker {
            PageMarker::Number(p) if p == current => {
                html.push_str(&format!(r#"<span class="current">{}</span>"#, p));
            }
            PageMarker::Number(p) => html.push_str(&link(p, &p.to_string())),
            PageMarker::Ellipsis => html.push_str("<span>&hellip;</span>"),
        }
    }
    match navigate(current.saturating_add(1), total) {
        Some(next) => html.push_str(&link(next, "Next &raquo;")),
        None => html.push_str(r#"<span class="disabled">Next &raquo;</span>"#),
    }
    html.push_str("</nav>");
    html
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn url_encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
