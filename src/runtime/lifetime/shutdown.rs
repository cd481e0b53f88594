use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use crate::analytics::ScanRecorder;

/// 等待未完成扫码统计的超时时间（秒）
pub const DRAIN_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C
pub async fn wait_for_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}

/// 等待后台扫码统计写完
pub async fn drain_recorder(recorder: &ScanRecorder) {
    let pending = recorder.in_flight();
    if pending == 0 {
        return;
    }

    info!("Waiting for {} pending scan writes...", pending);
    if recorder
        .drain(Duration::from_secs(DRAIN_TIMEOUT_SECS))
        .await
    {
        info!("Pending scan writes flushed");
    } else {
        error!(
            "Scan writes still pending after {} seconds, {} dropped",
            DRAIN_TIMEOUT_SECS,
            recorder.in_flight()
        );
    }
}
