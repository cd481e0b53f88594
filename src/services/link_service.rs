//! QR code management service
//!
//! 所有操作都限定在 owner 范围内，他人的记录统一按不存在处理。

use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use tracing::{info, warn};

use crate::content::ContentInput;
use crate::errors::{QrLinkerError, Result};
use crate::storage::{
    DashboardStats, NewShortLink, ScanEvent, SeaOrmStorage, ShortLinkChanges, ShortLinkRecord,
};
use crate::utils::generate_random_code;

/// 短码冲突时的最大尝试次数
pub const MAX_CODE_ATTEMPTS: usize = 5;

pub const MAX_NAME_LEN: usize = 255;

pub const DEFAULT_SCAN_LIMIT: u64 = 50;
pub const MAX_SCAN_LIMIT: u64 = 500;

#[derive(Debug, Clone)]
pub struct CreateQrCodeRequest {
    pub name: String,
    pub content: ContentInput,
}

/// None 表示保持不变
#[derive(Debug, Clone, Default)]
pub struct UpdateQrCodeRequest {
    pub name: Option<String>,
    pub content: Option<ContentInput>,
}

#[derive(Clone)]
pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    short_code_length: usize,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>, short_code_length: usize) -> Self {
        Self {
            storage,
            short_code_length,
        }
    }

    pub fn storage(&self) -> &Arc<SeaOrmStorage> {
        &self.storage
    }

    pub async fn create(
        &self,
        owner_id: &str,
        req: CreateQrCodeRequest,
    ) -> Result<ShortLinkRecord> {
        check_owner(owner_id)?;
        let name = validate_name(&req.name)?;
        req.content.validate()?;

        let content_type = req.content.content_type();
        let destination_content = req.content.stored_content();

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let short_code = generate_random_code(self.short_code_length);
            if self.storage.short_code_exists(&short_code).await? {
                warn!(
                    "Short code collision on attempt {}: {}",
                    attempt, short_code
                );
                continue;
            }

            let new_link = NewShortLink {
                short_code,
                owner_id: owner_id.to_string(),
                name: name.clone(),
                content_type,
                destination_content: destination_content.clone(),
            };

            match self.storage.insert(new_link).await {
                Ok(record) => {
                    info!(
                        "LinkService: created {} '{}' for owner {}",
                        record.content_type, record.short_code, owner_id
                    );
                    return Ok(record);
                }
                // 检查与插入之间被抢占
                Err(QrLinkerError::Conflict(msg)) => {
                    warn!("Short code taken concurrently: {}", msg);
                }
                Err(e) => return Err(e),
            }
        }

        Err(QrLinkerError::conflict(format!(
            "Failed to allocate a unique short code after {} attempts",
            MAX_CODE_ATTEMPTS
        )))
    }

    pub async fn get(&self, owner_id: &str, id: &str) -> Result<ShortLinkRecord> {
        check_owner(owner_id)?;
        self.storage.find_owned(id, owner_id).await
    }

    pub async fn list(&self, owner_id: &str) -> Result<Vec<ShortLinkRecord>> {
        check_owner(owner_id)?;
        self.storage.list_by_owner(owner_id).await
    }

    /// 修改名称和/或内容；短码不变，已印刷的二维码继续有效
    pub async fn update(
        &self,
        owner_id: &str,
        id: &str,
        req: UpdateQrCodeRequest,
    ) -> Result<ShortLinkRecord> {
        check_owner(owner_id)?;

        let name = req.name.as_deref().map(validate_name).transpose()?;
        let content = match req.content {
            Some(input) => {
                input.validate()?;
                Some((input.content_type(), input.stored_content()))
            }
            None => None,
        };

        let changes = ShortLinkChanges { name, content };
        if changes.is_empty() {
            return self.storage.find_owned(id, owner_id).await;
        }

        let record = self.storage.update(id, owner_id, changes).await?;
        info!("LinkService: updated '{}'", record.short_code);
        Ok(record)
    }

    pub async fn set_active(
        &self,
        owner_id: &str,
        id: &str,
        is_active: bool,
    ) -> Result<ShortLinkRecord> {
        check_owner(owner_id)?;
        self.storage.set_active(id, owner_id, is_active).await
    }

    /// 删除记录及扫码记录
    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<()> {
        check_owner(owner_id)?;
        self.storage.delete_with_scans(id, owner_id).await
    }

    pub async fn stats(&self, owner_id: &str) -> Result<DashboardStats> {
        check_owner(owner_id)?;
        let today_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        self.storage.stats_for_owner(owner_id, today_start).await
    }

    pub async fn scans(
        &self,
        owner_id: &str,
        id: &str,
        limit: Option<u64>,
    ) -> Result<Vec<ScanEvent>> {
        check_owner(owner_id)?;
        let record = self.storage.find_owned(id, owner_id).await?;
        let limit = limit
            .unwrap_or(DEFAULT_SCAN_LIMIT)
            .clamp(1, MAX_SCAN_LIMIT);
        self.storage.recent_scans(&record.id, limit).await
    }
}

fn check_owner(owner_id: &str) -> Result<()> {
    if owner_id.trim().is_empty() {
        return Err(QrLinkerError::unauthorized("Missing owner identity"));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(QrLinkerError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(QrLinkerError::validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Menu  ").unwrap(), "Menu");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_check_owner() {
        assert!(check_owner("user-1").is_ok());
        assert!(matches!(
            check_owner(""),
            Err(QrLinkerError::Unauthorized(_))
        ));
    }
}
