//! 解析结果的展示状态
//!
//! `Loading -> Error | Redirecting | Displaying`，Redirecting 每秒倒计时一次，
//! 到 0 时调用一次 Navigator。会话销毁后不再跳转。

pub mod page;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::content::ContentType;
use crate::resolver::Resolution;

pub const NOT_FOUND_REASON: &str = "QR code not found or inactive";
pub const FAILURE_REASON: &str = "Failed to process redirect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationState {
    Loading,
    Error {
        reason: String,
    },
    Redirecting {
        destination: String,
        countdown: u32,
    },
    Displaying {
        content_type: ContentType,
        content: String,
    },
}

impl PresentationState {
    pub fn from_resolution(resolution: Resolution) -> Self {
        match resolution {
            Resolution::NotFound => PresentationState::Error {
                reason: NOT_FOUND_REASON.to_string(),
            },
            // 具体错误只进日志
            Resolution::Failure { .. } => PresentationState::Error {
                reason: FAILURE_REASON.to_string(),
            },
            Resolution::Redirect {
                destination,
                countdown_seconds,
            } => PresentationState::Redirecting {
                destination,
                countdown: countdown_seconds,
            },
            Resolution::Display {
                content_type,
                content,
            } => PresentationState::Displaying {
                content_type,
                content,
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            PresentationState::Loading | PresentationState::Redirecting { .. }
        )
    }
}

/// 倒计时结束时执行跳转
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, destination: &str);
}

/// 一次展示会话，持有倒计时任务
///
/// `teardown` 或 drop 都会终止倒计时。
pub struct RedirectSession {
    state: Arc<watch::Sender<PresentationState>>,
    ticker: Option<JoinHandle<()>>,
}

impl RedirectSession {
    /// 从 Loading 开始
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PresentationState::Loading);
        Self {
            state: Arc::new(tx),
            ticker: None,
        }
    }

    /// 应用解析结果，Redirect 时启动倒计时
    pub fn apply(&mut self, resolution: Resolution, navigator: Arc<dyn Navigator>) {
        self.stop_ticker();

        let next = PresentationState::from_resolution(resolution);
        if let PresentationState::Redirecting {
            destination,
            countdown,
        } = &next
        {
            let tx = Arc::clone(&self.state);
            let destination = destination.clone();
            let countdown = *countdown;
            self.state.send_replace(next);
            self.ticker = Some(tokio::spawn(run_countdown(
                tx,
                destination,
                countdown,
                navigator,
            )));
        } else {
            self.state.send_replace(next);
        }
    }

    pub fn start(resolution: Resolution, navigator: Arc<dyn Navigator>) -> Self {
        let mut session = Self::new();
        session.apply(resolution, navigator);
        session
    }

    pub fn state(&self) -> PresentationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.state.subscribe()
    }

    /// 等待倒计时结束（已跳转或已取消）
    ///
    /// 可以在 select! 中反复调用，被取消时倒计时任务仍归会话所有。
    pub async fn finished(&mut self) {
        if let Some(handle) = self.ticker.as_mut() {
            let _ = handle.await;
            self.ticker = None;
        }
    }

    pub fn teardown(&mut self) {
        if self.stop_ticker() {
            debug!("Redirect countdown cancelled");
        }
    }

    fn stop_ticker(&mut self) -> bool {
        match self.ticker.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Default for RedirectSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RedirectSession {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

async fn run_countdown(
    state: Arc<watch::Sender<PresentationState>>,
    destination: String,
    initial: u32,
    navigator: Arc<dyn Navigator>,
) {
    let mut remaining = initial;
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // 第一次 tick 立即返回
    interval.tick().await;

    while remaining > 0 {
        interval.tick().await;
        remaining -= 1;
        state.send_replace(PresentationState::Redirecting {
            destination: destination.clone(),
            countdown: remaining,
        });
    }

    navigator.navigate(&destination);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, destination: &str) {
            self.visited.lock().unwrap().push(destination.to_string());
        }
    }

    fn redirect(countdown_seconds: u32) -> Resolution {
        Resolution::Redirect {
            destination: "https://example.com".to_string(),
            countdown_seconds,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_decreases_to_zero_then_navigates_once() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut session = RedirectSession::start(redirect(3), navigator.clone());
        let mut rx = session.subscribe();

        let mut seen = vec![];
        if let PresentationState::Redirecting { countdown, .. } = &*rx.borrow_and_update() {
            seen.push(*countdown);
        }
        while seen.last() != Some(&0) {
            rx.changed().await.unwrap();
            if let PresentationState::Redirecting { countdown, .. } = &*rx.borrow_and_update() {
                seen.push(*countdown);
            }
        }
        session.finished().await;

        assert_eq!(seen, vec![3, 2, 1, 0]);
        assert_eq!(
            *navigator.visited.lock().unwrap(),
            vec!["https://example.com".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_during_countdown_prevents_navigation() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut session = RedirectSession::start(redirect(3), navigator.clone());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(
            session.state(),
            PresentationState::Redirecting {
                destination: "https://example.com".to_string(),
                countdown: 2,
            }
        );

        session.teardown();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(navigator.visited.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_countdown() {
        let navigator = Arc::new(RecordingNavigator::default());
        let session = RedirectSession::start(redirect(2), navigator.clone());
        drop(session);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(navigator.visited.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_never_navigates() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut session = RedirectSession::start(
            Resolution::Display {
                content_type: ContentType::Phone,
                content: "tel:+15551234".to_string(),
            },
            navigator.clone(),
        );

        assert!(session.state().is_terminal());
        session.finished().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(navigator.visited.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_and_failure_map_to_error() {
        let navigator = Arc::new(RecordingNavigator::default());
        let session = RedirectSession::start(Resolution::NotFound, navigator.clone());
        assert_eq!(
            session.state(),
            PresentationState::Error {
                reason: NOT_FOUND_REASON.to_string()
            }
        );

        let state = PresentationState::from_resolution(Resolution::Failure {
            reason: "db down".into(),
        });
        assert_eq!(
            state,
            PresentationState::Error {
                reason: FAILURE_REASON.to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_countdown_navigates_immediately() {
        let navigator = Arc::new(RecordingNavigator::default());
        let mut session = RedirectSession::start(redirect(0), navigator.clone());
        session.finished().await;
        assert_eq!(navigator.visited.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_new_session_is_loading() {
        assert_eq!(RedirectSession::new().state(), PresentationState::Loading);
    }
}
