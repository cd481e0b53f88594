use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{
    DashboardStats, NewShortLink, ScanEvent, ShortLinkChanges, ShortLinkRecord, StorageConfig,
};

/// 解析短码时使用的只读查询
///
/// 只返回 `is_active = true` 的记录；停用与不存在对调用方不可区分。
#[async_trait]
pub trait ShortLinkStore: Send + Sync {
    async fn find_active_by_short_code(&self, short_code: &str)
    -> Result<Option<ShortLinkRecord>>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;

        let storage = SeaOrmStorage::new(config, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
