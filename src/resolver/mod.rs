//! 短码解析
//!
//! 一次查询，得到且只得到一种结果；成功时派生扫码统计任务。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, error};

use crate::analytics::{ScanMetadata, ScanRecorder};
use crate::content::{ContentType, normalize_destination};
use crate::storage::ShortLinkStore;
use crate::utils::is_valid_short_code;

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Resolution {
    NotFound,
    #[serde(rename_all = "camelCase")]
    Redirect {
        destination: String,
        countdown_seconds: u32,
    },
    #[serde(rename_all = "camelCase")]
    Display {
        content_type: ContentType,
        content: String,
    },
    Failure {
        reason: String,
    },
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Redirect { .. } | Resolution::Display { .. })
    }
}

#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn ShortLinkStore>,
    recorder: ScanRecorder,
    countdown_seconds: u32,
}

impl Resolver {
    pub fn new(
        store: Arc<dyn ShortLinkStore>,
        recorder: ScanRecorder,
        countdown_seconds: u32,
    ) -> Self {
        Self {
            store,
            recorder,
            countdown_seconds,
        }
    }

    pub fn countdown_seconds(&self) -> u32 {
        self.countdown_seconds
    }

    /// 开始一次访问，统计只会记录一次
    pub fn visit(&self, metadata: ScanMetadata) -> Visit {
        Visit {
            resolver: self.clone(),
            metadata,
            scan_scheduled: AtomicBool::new(false),
        }
    }

    /// 单次访问的便捷写法
    pub async fn resolve(&self, short_code: &str, metadata: ScanMetadata) -> Resolution {
        self.visit(metadata).resolve(short_code).await
    }
}

/// 一次页面访问
///
/// 同一个 Visit 上重复或并发调用 `resolve` 会得到相同形态的结果，
/// 但只有第一次调用会派生扫码统计。
pub struct Visit {
    resolver: Resolver,
    metadata: ScanMetadata,
    scan_scheduled: AtomicBool,
}

impl Visit {
    pub async fn resolve(&self, short_code: &str) -> Resolution {
        if !is_valid_short_code(short_code) {
            debug!("Rejected malformed short code");
            return Resolution::NotFound;
        }

        // 在第一次 await 之前抢占 latch
        let first = !self.scan_scheduled.swap(true, Ordering::AcqRel);

        let record = match self.resolver.store.find_active_by_short_code(short_code).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("Short code not found or inactive: {}", short_code);
                return Resolution::NotFound;
            }
            Err(e) => {
                error!("Lookup failed for {}: {}", short_code, e);
                return Resolution::Failure {
                    reason: e.to_string(),
                };
            }
        };

        if first {
            self.resolver
                .recorder
                .record(record.id.clone(), self.metadata.clone());
        }

        if record.content_type.is_redirectable() {
            Resolution::Redirect {
                destination: normalize_destination(record.destination_content.trim())
                    .into_owned(),
                countdown_seconds: self.resolver.countdown_seconds,
            }
        } else {
            Resolution::Display {
                content_type: record.content_type,
                content: record.destination_content,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::ScanSink;
    use crate::content::ContentInput;
    use crate::errors::{QrLinkerError, Result};
    use crate::storage::ShortLinkRecord;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct MemoryStore {
        records: HashMap<String, ShortLinkRecord>,
        lookups: AtomicUsize,
        broken: bool,
    }

    impl MemoryStore {
        fn with(records: Vec<ShortLinkRecord>) -> Self {
            Self {
                records: records
                    .into_iter()
                    .map(|r| (r.short_code.clone(), r))
                    .collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ShortLinkStore for MemoryStore {
        async fn find_active_by_short_code(
            &self,
            short_code: &str,
        ) -> Result<Option<ShortLinkRecord>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(QrLinkerError::database_connection("connection refused"));
            }
            Ok(self
                .records
                .get(short_code)
                .filter(|r| r.is_active)
                .cloned())
        }
    }

    #[derive(Default)]
    struct CountingSink {
        increments: AtomicUsize,
        appends: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ScanSink for CountingSink {
        async fn increment_scan_atomic(&self, _record_id: &str) -> anyhow::Result<()> {
            self.increments.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn append_scan_event(
            &self,
            record_id: &str,
            _metadata: &ScanMetadata,
        ) -> anyhow::Result<()> {
            self.appends.lock().unwrap().push(record_id.to_string());
            Ok(())
        }
    }

    /// 每次写入都失败的统计后端
    #[derive(Default)]
    struct BrokenSink {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ScanSink for BrokenSink {
        async fn increment_scan_atomic(&self, _record_id: &str) -> anyhow::Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("database is locked")
        }

        async fn append_scan_event(
            &self,
            _record_id: &str,
            _metadata: &ScanMetadata,
        ) -> anyhow::Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("database is locked")
        }
    }

    fn record(code: &str, content_type: ContentType, content: &str, active: bool) -> ShortLinkRecord {
        ShortLinkRecord {
            id: format!("id-{code}"),
            short_code: code.to_string(),
            owner_id: "owner".to_string(),
            name: code.to_string(),
            content_type,
            destination_content: content.to_string(),
            is_active: active,
            scan_count: 0,
            last_scanned_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn setup(store: MemoryStore) -> (Resolver, Arc<MemoryStore>, Arc<CountingSink>) {
        let store = Arc::new(store);
        let sink = Arc::new(CountingSink::default());
        let recorder = ScanRecorder::new(sink.clone());
        (Resolver::new(store.clone(), recorder, 3), store, sink)
    }

    #[tokio::test]
    async fn test_missing_code_has_no_side_effects() {
        let (resolver, _, sink) = setup(MemoryStore::default());
        let outcome = resolver.resolve("nope", ScanMetadata::default()).await;
        assert_eq!(outcome, Resolution::NotFound);

        resolver.recorder.wait_idle().await;
        assert_eq!(sink.increments.load(Ordering::SeqCst), 0);
        assert!(sink.appends.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_record_is_not_found() {
        let (resolver, _, sink) = setup(MemoryStore::with(vec![record(
            "off",
            ContentType::Url,
            "https://example.com",
            false,
        )]));
        assert_eq!(
            resolver.resolve("off", ScanMetadata::default()).await,
            Resolution::NotFound
        );
        resolver.recorder.wait_idle().await;
        assert_eq!(sink.increments.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_code_skips_store() {
        let (resolver, store, _) = setup(MemoryStore::default());
        let outcome = resolver.resolve("../admin", ScanMetadata::default()).await;
        assert_eq!(outcome, Resolution::NotFound);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_url_record_redirects_with_normalized_destination() {
        let (resolver, _, sink) = setup(MemoryStore::with(vec![record(
            "site",
            ContentType::Url,
            "example.com",
            true,
        )]));

        let outcome = resolver.resolve("site", ScanMetadata::default()).await;
        assert_eq!(
            outcome,
            Resolution::Redirect {
                destination: "https://example.com".to_string(),
                countdown_seconds: 3,
            }
        );

        resolver.recorder.wait_idle().await;
        assert_eq!(sink.increments.load(Ordering::SeqCst), 1);
        assert_eq!(*sink.appends.lock().unwrap(), vec!["id-site".to_string()]);
    }

    #[tokio::test]
    async fn test_url_entered_with_leading_space_redirects_cleanly() {
        let entered = ContentInput::Url {
            url: " https://example.com/menu".to_string(),
        };
        entered.validate().unwrap();

        let (resolver, _, _) = setup(MemoryStore::with(vec![
            record("menu", ContentType::Url, &entered.stored_content(), true),
            // 旧数据可能带有空白
            record("legacy", ContentType::Url, " example.com ", true),
        ]));

        assert_eq!(
            resolver.resolve("menu", ScanMetadata::default()).await,
            Resolution::Redirect {
                destination: "https://example.com/menu".to_string(),
                countdown_seconds: 3,
            }
        );
        assert_eq!(
            resolver.resolve("legacy", ScanMetadata::default()).await,
            Resolution::Redirect {
                destination: "https://example.com".to_string(),
                countdown_seconds: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_non_url_record_displays_stored_content() {
        let wifi = "WIFI:T:WPA;S:Home;P:abc123;H:false;;";
        let (resolver, _, _) = setup(MemoryStore::with(vec![record(
            "wifi",
            ContentType::Wifi,
            wifi,
            true,
        )]));

        assert_eq!(
            resolver.resolve("wifi", ScanMetadata::default()).await,
            Resolution::Display {
                content_type: ContentType::Wifi,
                content: wifi.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_scan_write_failures_do_not_change_outcome() {
        let store = Arc::new(MemoryStore::with(vec![
            record("site", ContentType::Url, "example.com", true),
            record("note", ContentType::Text, "Gate code 4411", true),
        ]));
        let sink = Arc::new(BrokenSink::default());
        let recorder = ScanRecorder::new(sink.clone());
        let resolver = Resolver::new(store, recorder.clone(), 3);

        assert_eq!(
            resolver.resolve("site", ScanMetadata::default()).await,
            Resolution::Redirect {
                destination: "https://example.com".to_string(),
                countdown_seconds: 3,
            }
        );
        assert_eq!(
            resolver.resolve("note", ScanMetadata::default()).await,
            Resolution::Display {
                content_type: ContentType::Text,
                content: "Gate code 4411".to_string(),
            }
        );

        recorder.wait_idle().await;
        // 两次访问，每次两个写入都尝试过
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 4);
        assert_eq!(recorder.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_store_error_becomes_failure_without_scan() {
        let (resolver, _, sink) = setup(MemoryStore {
            broken: true,
            ..Default::default()
        });

        let outcome = resolver.resolve("abc", ScanMetadata::default()).await;
        assert!(matches!(outcome, Resolution::Failure { .. }));

        resolver.recorder.wait_idle().await;
        assert_eq!(sink.increments.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_resolve_on_one_visit_records_once() {
        let (resolver, _, sink) = setup(MemoryStore::with(vec![record(
            "menu",
            ContentType::Text,
            "Today: soup",
            true,
        )]));

        let visit = resolver.visit(ScanMetadata::default());
        let (a, b) = tokio::join!(visit.resolve("menu"), visit.resolve("menu"));
        assert!(a.is_found());
        assert_eq!(a, b);

        let c = visit.resolve("menu").await;
        assert_eq!(a, c);

        resolver.recorder.wait_idle().await;
        assert_eq!(sink.increments.load(Ordering::SeqCst), 1);
        assert_eq!(sink.appends.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_separate_visits_each_record() {
        let (resolver, _, sink) = setup(MemoryStore::with(vec![record(
            "menu",
            ContentType::Text,
            "Today: soup",
            true,
        )]));

        let first = resolver.visit(ScanMetadata::default());
        let second = resolver.visit(ScanMetadata::default());
        tokio::join!(first.resolve("menu"), second.resolve("menu"));

        resolver.recorder.wait_idle().await;
        assert_eq!(sink.increments.load(Ordering::SeqCst), 2);
    }
}
