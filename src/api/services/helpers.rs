//! API 帮助函数

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::errors::QrLinkerError;
use crate::storage::ShortLinkRecord;

use super::error_code::ErrorCode;
use super::types::{ApiResponse, QrCodeView};

/// 请求体大小上限
const JSON_LIMIT: usize = 64 * 1024;

/// handler 共享的 HTTP 层设置
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    /// 生成短链接使用的地址，未配置时按请求推断
    pub public_base_url: Option<String>,
    pub trusted_proxies: Vec<String>,
}

impl HttpSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            public_base_url: config
                .public_base_url
                .as_deref()
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            trusted_proxies: config.trusted_proxies.clone(),
        }
    }

    pub fn base_url(&self, req: &HttpRequest) -> String {
        match &self.public_base_url {
            Some(url) => url.clone(),
            None => {
                let info = req.connection_info();
                format!("{}://{}", info.scheme(), info.host())
            }
        }
    }

    pub fn view(&self, req: &HttpRequest, record: ShortLinkRecord) -> QrCodeView {
        let short_url = short_url(&self.base_url(req), &record.short_code);
        QrCodeView { record, short_url }
    }
}

pub fn short_url(base_url: &str, short_code: &str) -> String {
    format!("{}/r/{}", base_url.trim_end_matches('/'), short_code)
}

pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// QrLinkerError -> HTTP 状态码 + ErrorCode
///
/// 存储层错误细节不返回给客户端。
pub fn error_from_qrlinker(err: &QrLinkerError) -> HttpResponse {
    let status = err.http_status();
    let message = if status.is_server_error() {
        tracing::error!("API request failed: {}", err);
        "Internal server error"
    } else {
        err.message()
    };
    error_response(status, ErrorCode::from(err), message)
}

/// 成功时返回 200 OK + JSON 数据，失败时映射 QrLinkerError
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<QrLinkerError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_qrlinker(&e.into()),
    }
}

/// JSON 解析失败时同样返回统一信封
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let response = error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                &format!("Invalid request body: {}", err),
            );
            InternalError::from_response(err, response).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url() {
        assert_eq!(
            short_url("https://qr.example.com/", "abc123"),
            "https://qr.example.com/r/abc123"
        );
    }

    #[test]
    fn test_settings_trim_base_url() {
        let config = ServerConfig {
            public_base_url: Some("https://qr.example.com/".into()),
            ..Default::default()
        };
        assert_eq!(
            HttpSettings::from_config(&config).public_base_url.as_deref(),
            Some("https://qr.example.com")
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let resp = error_from_qrlinker(&QrLinkerError::database_operation("disk I/O error"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = error_from_qrlinker(&QrLinkerError::not_found("QR code not found: x"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
