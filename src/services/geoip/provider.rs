use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::maxmind::MaxMindProvider;
use crate::config::AnalyticsConfig;
use crate::utils::ip::{is_private_or_local, parse_ip};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2 国家代码
    pub country: Option<String>,
    pub city: Option<String>,
}

#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    fn name(&self) -> &'static str;
}

/// 扫码记录使用的 GeoIP 入口
///
/// 私有地址与 localhost 不查询。
#[derive(Clone)]
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
}

impl GeoIpProvider {
    /// 根据配置创建，未启用或数据库不可用时返回 None
    pub fn from_config(config: &AnalyticsConfig) -> Option<Self> {
        if !config.enable_geo_lookup {
            return None;
        }

        let Some(path) = config.maxminddb_path.as_deref().filter(|p| !p.is_empty()) else {
            warn!("GeoIP: enable_geo_lookup is set but maxminddb_path is empty, skipping");
            return None;
        };

        match MaxMindProvider::new(path) {
            Ok(provider) => {
                info!("GeoIP: Using MaxMind database at {}", path);
                Some(Self::with_lookup(Arc::new(provider)))
            }
            Err(e) => {
                warn!("GeoIP: Failed to load MaxMind database at {}: {}", path, e);
                None
            }
        }
    }

    pub fn with_lookup(inner: Arc<dyn GeoIpLookup>) -> Self {
        Self { inner }
    }

    pub async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        match parse_ip(ip) {
            Some(addr) if !is_private_or_local(&addr) => self.inner.lookup(ip).await,
            Some(_) => {
                debug!("GeoIP: skip private address {}", ip);
                None
            }
            None => None,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}
