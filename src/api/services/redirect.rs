use actix_web::http::header::{HeaderValue, LOCATION};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::new_route::NewRouteService;
use crate::routing::{RouteStore, RouteTable};

/// Redirect behaviour shared by both server modes
#[derive(Clone, Debug)]
pub struct RedirectSettings {
    /// Where unknown keys are sent
    pub fallback_url: String,
}

pub struct RedirectService {}

impl RedirectService {
    /// `GET /<key>`: 302 to the mapped URL, or 302 to the fallback page.
    ///
    /// Reads the current table without taking the writer lock, so a lookup
    /// racing an add-route sees either the old or the new table.
    pub async fn handle_redirect(
        req: HttpRequest,
        store: web::Data<Arc<RouteStore>>,
        settings: web::Data<RedirectSettings>,
    ) -> impl Responder {
        let key = Self::extract_key(&req);

        match store.lookup(key) {
            Some(target) => {
                info!("request: {} --> maps to: {}", key, target);
                Self::found(&target)
            }
            None => {
                info!("hash was {} which is not in the map", key);
                debug!("current table has {} keys", store.table().len());
                Self::found(&settings.fallback_url)
            }
        }
    }

    /// Fallback for static mode, where every known key has its own resource
    pub async fn handle_unknown(
        req: HttpRequest,
        settings: web::Data<RedirectSettings>,
    ) -> impl Responder {
        info!(
            "hash was {} which is not in the map",
            Self::extract_key(&req)
        );
        Self::found(&settings.fallback_url)
    }

    /// The request path with the leading `/` removed
    #[inline]
    pub fn extract_key(req: &HttpRequest) -> &str {
        let path = req.path();
        path.strip_prefix('/').unwrap_or(path)
    }

    /// 302 to `location`, made safe for a header value first.
    pub fn found(location: &str) -> HttpResponse {
        match HeaderValue::from_str(&location_header(location)) {
            Ok(value) => HttpResponse::Found().insert_header((LOCATION, value)).finish(),
            Err(e) => {
                warn!("unusable redirect target {:?}: {}", location, e);
                HttpResponse::Found().finish()
            }
        }
    }
}

/// Stored URLs are never validated, so the header value is cleaned here:
/// CR and LF become spaces, other control bytes and non-ASCII bytes are
/// percent-encoded.
pub fn location_header(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for b in url.bytes() {
        match b {
            b'\r' | b'\n' => out.push(' '),
            b'\t' | 0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "%{:02X}", b);
            }
        }
    }
    out
}

/// Routes for the shared-store mode
///
/// `POST <post_path>` adds routes, with bodies up to `max_body_bytes`; any
/// other path is treated as a key lookup. Other methods on `post_path`
/// answer 405.
/// Requires `Data<Arc<RouteStore>>`, `Data<RedirectSettings>` and
/// `Data<NewRouteSettings>` (see [`NewRouteSettings`](super::NewRouteSettings)) on the app.
pub fn dynamic_routes(
    post_path: &str,
    max_body_bytes: usize,
) -> impl FnOnce(&mut web::ServiceConfig) + '_ {
    move |cfg| {
        cfg.service(
            web::resource(post_path)
                .app_data(web::PayloadConfig::new(max_body_bytes))
                .route(web::post().to(NewRouteService::add_new_route)),
        )
        .default_service(web::to(RedirectService::handle_redirect));
    }
}

/// Routes for static mode: one resource per key, built once.
///
/// Keys answer GET and HEAD; other methods on a key answer 405. Unknown
/// paths go to the fallback page. Requires `Data<RedirectSettings>`.
pub fn static_routes(table: &RouteTable) -> impl FnOnce(&mut web::ServiceConfig) + '_ {
    move |cfg| {
        for (key, target) in table.iter() {
            let target = target.to_string();
            debug!("registering static route /{} --> {}", key, target);
            cfg.service(
                web::resource(format!("/{}", key))
                    .route(web::get().to(static_redirect(target.clone())))
                    .route(web::head().to(static_redirect(target))),
            );
        }
        cfg.default_service(web::to(RedirectService::handle_unknown));
    }
}

fn static_redirect(
    target: String,
) -> impl Fn() -> std::future::Ready<HttpResponse> + Clone + 'static {
    move || std::future::ready(RedirectService::found(&target))
}
