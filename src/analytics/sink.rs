use super::ScanMetadata;

/// 扫码统计写入端
///
/// 两个操作彼此独立，调用方不会因其中一个失败而跳过另一个。
#[async_trait::async_trait]
pub trait ScanSink: Send + Sync {
    /// 原子自增 scan_count 并更新 last_scanned_at
    async fn increment_scan_atomic(&self, record_id: &str) -> anyhow::Result<()>;

    /// 追加一条扫码记录
    async fn append_scan_event(&self, record_id: &str, metadata: &ScanMetadata)
    -> anyhow::Result<()>;
}

/// 只打日志的 sink，统计关闭或调试时使用
pub struct LogSink;

#[async_trait::async_trait]
impl ScanSink for LogSink {
    async fn increment_scan_atomic(&self, record_id: &str) -> anyhow::Result<()> {
        tracing::info!("Scan counted: {}", record_id);
        Ok(())
    }

    async fn append_scan_event(
        &self,
        record_id: &str,
        metadata: &ScanMetadata,
    ) -> anyhow::Result<()> {
        tracing::info!("Scan event: {} {:?}", record_id, metadata);
        Ok(())
    }
}
