//! ScanSink implementation for SeaOrmStorage
//!
//! 计数使用单条 `UPDATE ... SET scan_count = scan_count + 1`，
//! 并发扫码不会丢失计数。

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, ExprTrait, QueryFilter};
use tracing::debug;

use super::SeaOrmStorage;
use crate::analytics::{ScanMetadata, ScanSink};

use migration::entities::{scan_event, short_link};

#[async_trait]
impl ScanSink for SeaOrmStorage {
    async fn increment_scan_atomic(&self, record_id: &str) -> anyhow::Result<()> {
        let result = short_link::Entity::update_many()
            .col_expr(
                short_link::Column::ScanCount,
                Expr::col(short_link::Column::ScanCount).add(1),
            )
            .col_expr(short_link::Column::LastScannedAt, Expr::value(Utc::now()))
            .filter(short_link::Column::Id.eq(record_id))
            .exec(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to increment scan count: {}", e))?;

        if result.rows_affected == 0 {
            anyhow::bail!("Record {} vanished before scan count update", record_id);
        }

        debug!("Scan count incremented for {}", record_id);
        Ok(())
    }

    async fn append_scan_event(
        &self,
        record_id: &str,
        metadata: &ScanMetadata,
    ) -> anyhow::Result<()> {
        let model = scan_event::ActiveModel {
            short_link_id: Set(record_id.to_string()),
            scanned_at: Set(Utc::now()),
            user_agent: Set(metadata.user_agent.clone()),
            ip_address: Set(metadata.ip_address.clone()),
            country: Set(metadata.country.clone()),
            city: Set(metadata.city.clone()),
            ..Default::default()
        };

        scan_event::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to append scan event: {}", e))?;

        debug!("Scan event appended for {}", record_id);
        Ok(())
    }
}
