//! HTTP API 类型定义

use serde::{Deserialize, Serialize};

use crate::content::{ContentInput, ContentType};
use crate::storage::ShortLinkRecord;

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreateQrCodeBody {
    pub name: String,
    pub content: ContentInput,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct UpdateQrCodeBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<ContentInput>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveBody {
    pub is_active: bool,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ScansQuery {
    pub limit: Option<u64>,
}

/// 动态码及其对外短链接（二维码编码的就是 short_url）
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeView {
    #[serde(flatten)]
    pub record: ShortLinkRecord,
    pub short_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FormattedContent {
    pub content_type: ContentType,
    pub destination_content: String,
    pub qr_payload: String,
}

impl From<&ContentInput> for FormattedContent {
    fn from(input: &ContentInput) -> Self {
        Self {
            content_type: input.content_type(),
            destination_content: input.stored_content(),
            qr_payload: input.qr_payload(),
        }
    }
}

/// Health check
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}
