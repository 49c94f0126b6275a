use crate::store::Store;

pub struct SitemapUrl {
    pub loc: String,
    pub changefreq: &'static str,
    pub priority: f32,
    pub lastmod: Option<String>,
}

/// Routes that always exist, independent of content.
const STATIC_ROUTES: &[(&str, &str, f32)] = &[
    ("/", "daily", 1.0),
    ("/categories", "weekly", 0.8),
    ("/search", "weekly", 0.7),
    ("/contact", "yearly", 0.5),
    ("/dmca", "yearly", 0.3),
    ("/terms", "yearly", 0.3),
    ("/privacy", "yearly", 0.3),
];

/// Static routes, then every category, then every story.
pub fn collect_urls(store: &dyn Store) -> Vec<SitemapUrl> {
    let mut urls: Vec<SitemapUrl> = STATIC_ROUTES
        .iter()
        .map(|(loc, changefreq, priority)| SitemapUrl {
            loc: loc.to_string(),
            changefreq: *changefreq,
            priority: *priority,
            lastmod: None,
        })
        .collect();

    for category in store.categories() {
        urls.push(SitemapUrl {
            loc: format!("/category/{}", category.slug),
            changefreq: "weekly",
            priority: 0.8,
            lastmod: None,
        });
    }

    for story in store.all_stories() {
        urls.push(SitemapUrl {
            loc: format!("/story/{}", story.id),
            changefreq: "monthly",
            priority: 0.9,
            lastmod: story.last_modified(),
        });
    }

    urls
}

/// Generate sitemap.xml content.
pub fn generate_sitemap(store: &dyn Store, site_url: &str) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
"#,
    );

    for url in collect_urls(store) {
        xml.push_str(&format!("  <url>\n    <loc>{}{}</loc>\n", xml_escape(site_url), xml_escape(&url.loc)));
        if let Some(lastmod) = &url.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            url.changefreq, url.priority
        ));
    }

    xml.push_str("</urlset>");
    xml
}

/// Generate robots.txt content with the sitemap URL.
pub fn generate_robots(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml", site_url)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
