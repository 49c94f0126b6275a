#[macro_use]
extern crate rocket;

use rocket::fs::FileServer;

mod ads;
mod boot;
mod config;
mod consent;
mod context;
mod models;
mod pagination;
mod render;
mod routes;
mod seo;
mod store;


use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::response::content::RawHtml;

use config::PortalConfig;
use context::Portal;

/// Marks rendered pages private; they vary on the consent, viewport and
/// sticky-suppression cookies.
pub struct PrivatePages;

#[rocket::async_trait]
impl Fairing for PrivatePages {
    fn info(&self) -> Info {
        Info { name: "Private Per-Visitor Pages", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        let path = req.uri().path();
        if path.starts_with("/data/") || path == "/sitemap.xml" || path == "/robots.txt" {
            return;
        }
        res.set_header(Header::new("Cache-Control", "private, no-cache"));
        res.set_header(Header::new("Vary", "Cookie"));
    }
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = PortalConfig::load();

    // Boot check: verify the content layout before serving
    boot::run(&config);

    let data_dir = config.data_dir.clone();
    log::info!("Serving content from {}", data_dir.display());

    let mut app = rocket::build()
        .manage(Portal::new(config))
        .attach(PrivatePages)
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error]);

    // Raw content documents, for clients that read them directly
    if data_dir.is_dir() {
        app = app.mount("/data", FileServer::from(data_dir));
    }
    app
}
