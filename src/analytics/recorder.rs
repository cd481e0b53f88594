//! 扫码统计记录器
//!
//! 每次成功解析后派生一个独立任务：原子计数 + 追加扫码记录。
//! 失败只记 warn 日志，不重试，也不影响解析结果。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::{ScanMetadata, ScanSink};
use crate::config::AnalyticsConfig;
use crate::services::geoip::GeoIpProvider;

#[derive(Clone)]
pub struct ScanRecorder {
    sink: Arc<dyn ScanSink>,
    geoip: Option<GeoIpProvider>,
    enabled: bool,
    log_ip: bool,
    in_flight: Arc<watch::Sender<usize>>,
}

/// 任务结束（包括 panic / abort）时归还计数
struct InFlightGuard(Arc<watch::Sender<usize>>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl ScanRecorder {
    pub fn new(sink: Arc<dyn ScanSink>) -> Self {
        let (tx, _rx) = watch::channel(0usize);
        Self {
            sink,
            geoip: None,
            enabled: true,
            log_ip: true,
            in_flight: Arc::new(tx),
        }
    }

    pub fn from_config(sink: Arc<dyn ScanSink>, config: &AnalyticsConfig) -> Self {
        let mut recorder = Self::new(sink).with_geoip(GeoIpProvider::from_config(config));
        recorder.enabled = config.enable_scan_tracking;
        recorder.log_ip = config.enable_ip_logging;
        recorder
    }

    pub fn with_geoip(mut self, geoip: Option<GeoIpProvider>) -> Self {
        self.geoip = geoip;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 派生统计任务后立即返回
    pub fn record(&self, record_id: String, metadata: ScanMetadata) {
        if !self.enabled {
            debug!("Scan tracking disabled, skip {}", record_id);
            return;
        }

        self.in_flight.send_modify(|n| *n += 1);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        let sink = Arc::clone(&self.sink);
        let geoip = self.geoip.clone();
        let log_ip = self.log_ip;

        tokio::spawn(async move {
            let _guard = guard;
            let metadata = enrich(geoip.as_ref(), metadata, log_ip).await;

            if let Err(e) = sink.increment_scan_atomic(&record_id).await {
                warn!("Scan counter update failed for {}: {}", record_id, e);
            }
            if let Err(e) = sink.append_scan_event(&record_id, &metadata).await {
                warn!("Scan event append failed for {}: {}", record_id, e);
            }
        });
    }

    /// 当前未完成的统计任务数
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// 等待所有统计任务结束
    pub async fn wait_idle(&self) {
        let mut rx = self.in_flight.subscribe();
        // Sender 由 self 持有，不会关闭
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// 关闭时使用，超时返回 false
    pub async fn drain(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait_idle()).await.is_ok()
    }
}

async fn enrich(
    geoip: Option<&GeoIpProvider>,
    mut metadata: ScanMetadata,
    log_ip: bool,
) -> ScanMetadata {
    if let (Some(geoip), Some(ip)) = (geoip, metadata.ip_address.as_deref())
        && metadata.country.is_none()
        && let Some(info) = geoip.lookup(ip).await
    {
        metadata = metadata.with_geo(info.country, info.city);
    }

    if !log_ip {
        metadata.ip_address = None;
    }
    metadata
}
