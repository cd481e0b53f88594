mod content;
mod error_code;
mod health;
mod helpers;
mod qr_codes;
mod redirect;
mod types;

use std::sync::Arc;

use actix_web::web;

use crate::api::jwt::SessionVerifier;
use crate::api::middleware::OwnerAuth;

pub use content::ContentService;
pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{
    HttpSettings, api_result, created_response, error_from_qrlinker, error_response,
    json_config, json_response, short_url, success_response,
};
pub use qr_codes::{QrCodeService, qr_code_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use types::*;

/// `/api/v1`：内容预览公开，其余需要会话令牌
pub fn api_routes(verifier: Arc<SessionVerifier>) -> actix_web::Scope {
    web::scope("/api/v1")
        .route("/content/format", web::post().to(ContentService::format))
        .service(
            web::scope("")
                .wrap(OwnerAuth::new(verifier))
                .configure(qr_code_routes),
        )
}
