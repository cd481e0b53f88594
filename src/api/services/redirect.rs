//! `GET /r/{code}`：解析短码并渲染页面
//!
//! 每次访问都经过解析器，响应禁止缓存。

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::trace;

use super::helpers::HttpSettings;
use crate::analytics::ScanMetadata;
use crate::presentation::{PresentationState, page};
use crate::resolver::{Resolution, Resolver};
use crate::utils::ip::extract_client_ip;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        resolver: web::Data<Resolver>,
        settings: web::Data<HttpSettings>,
    ) -> HttpResponse {
        let short_code = path.into_inner();
        let metadata = Self::scan_metadata(&req, &settings);

        let visit = resolver.visit(metadata);
        let resolution = visit.resolve(&short_code).await;
        trace!("Resolved {}: {:?}", short_code, resolution);

        let status = match &resolution {
            Resolution::NotFound => StatusCode::NOT_FOUND,
            Resolution::Failure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Resolution::Redirect { .. } | Resolution::Display { .. } => StatusCode::OK,
        };
        let state = PresentationState::from_resolution(resolution);

        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .insert_header(("Referrer-Policy", "no-referrer"))
            .body(page::render(&state))
    }

    fn scan_metadata(req: &HttpRequest, settings: &HttpSettings) -> ScanMetadata {
        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(String::from);
        let ip = extract_client_ip(req, &settings.trusted_proxies);
        ScanMetadata::new(user_agent, ip)
    }
}

pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/r/{code}").route(web::get().to(RedirectService::handle_redirect))
}
