//! 内容格式化预览（公开接口，不落库）

use actix_web::http::StatusCode;
use actix_web::{Responder, web};

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_response};
use super::types::FormattedContent;
use crate::content::ContentInput;

pub struct ContentService;

impl ContentService {
    pub async fn format(body: web::Json<ContentInput>) -> impl Responder {
        let input = body.into_inner();
        if let Err(e) = input.validate() {
            return error_response(StatusCode::BAD_REQUEST, ErrorCode::InvalidContent, e.message());
        }
        success_response(FormattedContent::from(&input))
    }
}
