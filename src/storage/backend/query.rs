//! Query operations for SeaOrmStorage
//!
//! 只读查询。所有者范围的查询用 owner_id 过滤，他人的记录按不存在处理。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use super::SeaOrmStorage;
use super::converters::{model_to_record, model_to_scan_event};
use crate::errors::{QrLinkerError, Result};
use crate::storage::{DashboardStats, ScanEvent, ShortLinkRecord, ShortLinkStore};

use migration::entities::{scan_event, short_link};

#[async_trait]
impl ShortLinkStore for SeaOrmStorage {
    async fn find_active_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortLinkRecord>> {
        short_link::Entity::find()
            .filter(short_link::Column::ShortCode.eq(short_code))
            .filter(short_link::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .map(model_to_record)
            .transpose()
    }
}

impl SeaOrmStorage {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<ShortLinkRecord>> {
        short_link::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(model_to_record)
            .transpose()
    }

    /// 按 id 查找属于 owner 的记录
    pub async fn find_owned(&self, id: &str, owner_id: &str) -> Result<ShortLinkRecord> {
        let model = short_link::Entity::find_by_id(id)
            .filter(short_link::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| QrLinkerError::not_found(format!("QR code not found: {}", id)))?;

        model_to_record(model)
    }

    pub async fn short_code_exists(&self, short_code: &str) -> Result<bool> {
        let count = short_link::Entity::find()
            .filter(short_link::Column::ShortCode.eq(short_code))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// owner 的全部记录，新建的在前
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLinkRecord>> {
        short_link::Entity::find()
            .filter(short_link::Column::OwnerId.eq(owner_id))
            .order_by_desc(short_link::Column::CreatedAt)
            .order_by_desc(short_link::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_record)
            .collect()
    }

    /// 最近的扫码记录
    pub async fn recent_scans(&self, record_id: &str, limit: u64) -> Result<Vec<ScanEvent>> {
        let events = scan_event::Entity::find()
            .filter(scan_event::Column::ShortLinkId.eq(record_id))
            .order_by_desc(scan_event::Column::ScannedAt)
            .order_by_desc(scan_event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(events.into_iter().map(model_to_scan_event).collect())
    }

    /// 仪表盘统计
    ///
    /// `today_start` 之后的扫码计入 today_scans。
    /// 按行读取 `BIGINT` 列后在内存中累加：`SUM(bigint)` 在 PostgreSQL / MySQL
    /// 上返回 NUMERIC / DECIMAL，无法解码为 i64。
    pub async fn stats_for_owner(
        &self,
        owner_id: &str,
        today_start: DateTime<Utc>,
    ) -> Result<DashboardStats> {
        let rows: Vec<(String, bool, i64)> = short_link::Entity::find()
            .select_only()
            .column(short_link::Column::Id)
            .column(short_link::Column::IsActive)
            .column(short_link::Column::ScanCount)
            .filter(short_link::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut stats = DashboardStats {
            total_qr_codes: rows.len() as u64,
            ..Default::default()
        };
        let mut ids = Vec::with_capacity(rows.len());
        for (id, is_active, scan_count) in rows {
            stats.total_scans += scan_count.max(0) as u64;
            if is_active {
                stats.active_qr_codes += 1;
            }
            ids.push(id);
        }

        if !ids.is_empty() {
            // COUNT(*) 在三种后端上都是 BIGINT
            stats.today_scans = scan_event::Entity::find()
                .filter(scan_event::Column::ShortLinkId.is_in(ids))
                .filter(scan_event::Column::ScannedAt.gte(today_start))
                .count(&self.db)
                .await?;
        }

        Ok(stats)
    }
}
