use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentType;

/// 动态码记录（`qr_codes` 表）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkRecord {
    pub id: String,
    pub short_code: String,
    pub owner_id: String,
    pub name: String,
    pub content_type: ContentType,
    pub destination_content: String,
    pub is_active: bool,
    #[serde(default)]
    pub scan_count: u64,
    pub last_scanned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 单次扫码记录（`scan_events` 表，只追加）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub id: i64,
    pub short_link_id: String,
    pub scanned_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// 新建记录所需字段，id 与时间戳由存储层生成
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub short_code: String,
    pub owner_id: String,
    pub name: String,
    pub content_type: ContentType,
    pub destination_content: String,
}

/// 所有者可修改的字段，None 表示不变
#[derive(Debug, Clone, Default)]
pub struct ShortLinkChanges {
    pub name: Option<String>,
    pub content: Option<(ContentType, String)>,
}

impl ShortLinkChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_qr_codes: u64,
    pub total_scans: u64,
    pub active_qr_codes: u64,
    pub today_scans: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
    pub support_scan: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let now = Utc::now();
        let record = ShortLinkRecord {
            id: "id-1".into(),
            short_code: "abc123".into(),
            owner_id: "owner".into(),
            name: "Menu".into(),
            content_type: ContentType::Url,
            destination_content: "example.com".into(),
            is_active: true,
            scan_count: 2,
            last_scanned_at: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["shortCode"], "abc123");
        assert_eq!(json["contentType"], "url");
        assert_eq!(json["scanCount"], 2);
        assert!(json["lastScannedAt"].is_null());
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(ShortLinkChanges::default().is_empty());
        let changes = ShortLinkChanges {
            name: Some("x".into()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
