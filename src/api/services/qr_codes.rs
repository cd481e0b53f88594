//! Owner-scoped QR code management endpoints
//!
//! 所有路由都在 `OwnerAuth` 之后，owner 来自会话令牌。

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::info;

use super::helpers::{
    HttpSettings, api_result, created_response, error_from_qrlinker, success_response,
};
use super::types::{CreateQrCodeBody, ScansQuery, SetActiveBody, UpdateQrCodeBody};
use crate::api::jwt::OwnerIdentity;
use crate::services::{CreateQrCodeRequest, LinkService, UpdateQrCodeRequest};

pub struct QrCodeService;

impl QrCodeService {
    pub async fn list(
        req: HttpRequest,
        owner: web::ReqData<OwnerIdentity>,
        service: web::Data<LinkService>,
        settings: web::Data<HttpSettings>,
    ) -> impl Responder {
        match service.list(&owner.owner_id).await {
            Ok(records) => {
                let views: Vec<_> = records
                    .into_iter()
                    .map(|record| settings.view(&req, record))
                    .collect();
                success_response(views)
            }
            Err(e) => error_from_qrlinker(&e),
        }
    }

    pub async fn create(
        req: HttpRequest,
        owner: web::ReqData<OwnerIdentity>,
        body: web::Json<CreateQrCodeBody>,
        service: web::Data<LinkService>,
        settings: web::Data<HttpSettings>,
    ) -> impl Responder {
        let body = body.into_inner();
        let request = CreateQrCodeRequest {
            name: body.name,
            content: body.content,
        };

        match service.create(&owner.owner_id, request).await {
            Ok(record) => {
                info!("API: created QR code {}", record.short_code);
                created_response(settings.view(&req, record))
            }
            Err(e) => error_from_qrlinker(&e),
        }
    }

    pub async fn get(
        req: HttpRequest,
        path: web::Path<String>,
        owner: web::ReqData<OwnerIdentity>,
        service: web::Data<LinkService>,
        settings: web::Data<HttpSettings>,
    ) -> impl Responder {
        match service.get(&owner.owner_id, &path).await {
            Ok(record) => success_response(settings.view(&req, record)),
            Err(e) => error_from_qrlinker(&e),
        }
    }

    pub async fn update(
        req: HttpRequest,
        path: web::Path<String>,
        owner: web::ReqData<OwnerIdentity>,
        body: web::Json<UpdateQrCodeBody>,
        service: web::Data<LinkService>,
        settings: web::Data<HttpSettings>,
    ) -> impl Responder {
        let body = body.into_inner();
        let request = UpdateQrCodeRequest {
            name: body.name,
            content: body.content,
        };

        match service.update(&owner.owner_id, &path, request).await {
            Ok(record) => success_response(settings.view(&req, record)),
            Err(e) => error_from_qrlinker(&e),
        }
    }

    pub async fn set_active(
        req: HttpRequest,
        path: web::Path<String>,
        owner: web::ReqData<OwnerIdentity>,
        body: web::Json<SetActiveBody>,
        service: web::Data<LinkService>,
        settings: web::Data<HttpSettings>,
    ) -> impl Responder {
        match service
            .set_active(&owner.owner_id, &path, body.is_active)
            .await
        {
            Ok(record) => success_response(settings.view(&req, record)),
            Err(e) => error_from_qrlinker(&e),
        }
    }

    pub async fn delete(
        path: web::Path<String>,
        owner: web::ReqData<OwnerIdentity>,
        service: web::Data<LinkService>,
    ) -> impl Responder {
        match service.delete(&owner.owner_id, &path).await {
            Ok(()) => {
                info!("API: deleted QR code {}", path.as_str());
                HttpResponse::NoContent().finish()
            }
            Err(e) => error_from_qrlinker(&e),
        }
    }

    pub async fn scans(
        path: web::Path<String>,
        query: web::Query<ScansQuery>,
        owner: web::ReqData<OwnerIdentity>,
        service: web::Data<LinkService>,
    ) -> impl Responder {
        api_result(service.scans(&owner.owner_id, &path, query.limit).await)
    }

    pub async fn stats(
        owner: web::ReqData<OwnerIdentity>,
        service: web::Data<LinkService>,
    ) -> impl Responder {
        api_result(service.stats(&owner.owner_id).await)
    }
}

pub fn qr_code_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/qr-codes", web::get().to(QrCodeService::list))
        .route("/qr-codes", web::post().to(QrCodeService::create))
        .route("/qr-codes/{id}", web::get().to(QrCodeService::get))
        .route("/qr-codes/{id}", web::put().to(QrCodeService::update))
        .route("/qr-codes/{id}", web::delete().to(QrCodeService::delete))
        .route(
            "/qr-codes/{id}/active",
            web::patch().to(QrCodeService::set_active),
        )
        .route("/qr-codes/{id}/scans", web::get().to(QrCodeService::scans))
        .route("/stats", web::get().to(QrCodeService::stats));
}
