//! SeaORM storage backend
//!
//! SQLite / MySQL(MariaDB) / PostgreSQL，启动时自动运行迁移。

mod connection;
mod converters;
mod mutations;
mod query;
mod scan_sink;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::analytics::ScanSink;
use crate::config::DatabaseConfig;
use crate::errors::{QrLinkerError, Result};
use crate::storage::models::StorageConfig;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, model_to_scan_event};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(QrLinkerError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(QrLinkerError::database_config("database_url 未设置"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(&config.database_url).await?
        } else {
            connect_generic(config, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 连接 SQLite 数据库文件，测试与单机部署使用
    pub async fn open_sqlite(database_url: &str) -> Result<Self> {
        let config = DatabaseConfig {
            database_url: database_url.to_string(),
            ..Default::default()
        };
        Self::new(&config, "sqlite").await
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn get_backend_config(&self) -> StorageConfig {
        StorageConfig {
            storage_type: self.backend_name.clone(),
            support_scan: true,
        }
    }

    pub fn as_scan_sink(&self) -> Arc<dyn ScanSink> {
        Arc::new(self.clone()) as Arc<dyn ScanSink>
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 健康检查用
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| QrLinkerError::database_connection(format!("数据库不可用: {}", e)))
    }
}
