//! Mutation operations for SeaOrmStorage
//!
//! 所有者发起的写操作。扫码计数见 scan_sink.rs。

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::model_to_record;
use crate::errors::{QrLinkerError, Result};
use crate::storage::{NewShortLink, ShortLinkChanges, ShortLinkRecord};

use migration::entities::{scan_event, short_link};

impl SeaOrmStorage {
    /// 插入新记录，short_code 冲突时返回 Conflict
    pub async fn insert(&self, link: NewShortLink) -> Result<ShortLinkRecord> {
        let now = Utc::now();
        let model = short_link::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            short_code: Set(link.short_code.clone()),
            owner_id: Set(link.owner_id),
            name: Set(link.name),
            content_type: Set(link.content_type.to_string()),
            destination_content: Set(link.destination_content),
            is_active: Set(true),
            scan_count: Set(0),
            last_scanned_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(&self.db).await.map_err(|e| {
            if matches!(
                e.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            ) {
                QrLinkerError::conflict(format!("短码已存在: {}", link.short_code))
            } else {
                QrLinkerError::database_operation(format!("创建记录失败: {}", e))
            }
        })?;

        info!(
            "QR code created: {} ({})",
            inserted.short_code, inserted.id
        );
        model_to_record(inserted)
    }

    /// 修改名称或内容，short_code 与 owner 不可变
    pub async fn update(
        &self,
        id: &str,
        owner_id: &str,
        changes: ShortLinkChanges,
    ) -> Result<ShortLinkRecord> {
        let existing = self.find_owned_model(id, owner_id).await?;
        let mut model: short_link::ActiveModel = existing.into();

        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some((content_type, content)) = changes.content {
            model.content_type = Set(content_type.to_string());
            model.destination_content = Set(content);
        }
        model.updated_at = Set(Utc::now());

        let updated = model.update(&self.db).await?;
        info!("QR code updated: {}", updated.short_code);
        model_to_record(updated)
    }

    pub async fn set_active(
        &self,
        id: &str,
        owner_id: &str,
        is_active: bool,
    ) -> Result<ShortLinkRecord> {
        let existing = self.find_owned_model(id, owner_id).await?;
        let mut model: short_link::ActiveModel = existing.into();
        model.is_active = Set(is_active);
        model.updated_at = Set(Utc::now());

        let updated = model.update(&self.db).await?;
        info!(
            "QR code {} is now {}",
            updated.short_code,
            if is_active { "active" } else { "inactive" }
        );
        model_to_record(updated)
    }

    /// 删除记录及其全部扫码记录（同一事务内，先删扫码记录）
    pub async fn delete_with_scans(&self, id: &str, owner_id: &str) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QrLinkerError::database_operation(format!("开始事务失败: {}", e)))?;

        let exists = short_link::Entity::find_by_id(id)
            .filter(short_link::Column::OwnerId.eq(owner_id))
            .one(&txn)
            .await?;
        if exists.is_none() {
            // txn drop 时自动回滚
            return Err(QrLinkerError::not_found(format!("QR code not found: {}", id)));
        }

        let scans = scan_event::Entity::delete_many()
            .filter(scan_event::Column::ShortLinkId.eq(id))
            .exec(&txn)
            .await?;

        short_link::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit()
            .await
            .map_err(|e| QrLinkerError::database_operation(format!("提交事务失败: {}", e)))?;

        info!(
            "QR code deleted: {} ({} scan events removed)",
            id, scans.rows_affected
        );
        Ok(())
    }

    async fn find_owned_model(&self, id: &str, owner_id: &str) -> Result<short_link::Model> {
        short_link::Entity::find_by_id(id)
            .filter(short_link::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| QrLinkerError::not_found(format!("QR code not found: {}", id)))
    }
}
