use std::str::FromStr;

use crate::content::ContentType;
use crate::errors::{QrLinkerError, Result};
use crate::storage::{ScanEvent, ShortLinkRecord};
use migration::entities::{scan_event, short_link};

/// Sea-ORM Model -> ShortLinkRecord
///
/// 无法识别的 content_type 视为数据损坏。
pub fn model_to_record(model: short_link::Model) -> Result<ShortLinkRecord> {
    let content_type = ContentType::from_str(&model.content_type).map_err(|_| {
        QrLinkerError::database_operation(format!(
            "记录 {} 的 content_type 无法识别: {}",
            model.id, model.content_type
        ))
    })?;

    Ok(ShortLinkRecord {
        id: model.id,
        short_code: model.short_code,
        owner_id: model.owner_id,
        name: model.name,
        content_type,
        destination_content: model.destination_content,
        is_active: model.is_active,
        scan_count: model.scan_count.max(0) as u64,
        last_scanned_at: model.last_scanned_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn model_to_scan_event(model: scan_event::Model) -> ScanEvent {
    ScanEvent {
        id: model.id,
        short_link_id: model.short_link_id,
        scanned_at: model.scanned_at,
        user_agent: model.user_agent,
        ip_address: model.ip_address,
        country: model.country,
        city: model.city,
    }
}
