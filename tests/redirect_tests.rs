//! Redirect flow tests
//!
//! `GET /r/{code}` against a temporary SQLite database.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use tempfile::TempDir;

use qrlinker::analytics::ScanRecorder;
use qrlinker::api::jwt::SessionVerifier;
use qrlinker::api::services::{AppStartTime, HttpSettings};
use qrlinker::content::{ContentInput, WifiNetwork};
use qrlinker::resolver::Resolver;
use qrlinker::runtime::modes::server::{AppState, configure_app};
use qrlinker::services::{CreateQrCodeRequest, LinkService};
use qrlinker::storage::{SeaOrmStorage, ShortLinkRecord, ShortLinkStore};

const OWNER: &str = "owner-redirect";

struct TestEnv {
    state: AppState,
    recorder: ScanRecorder,
    _dir: TempDir,
}

async fn setup() -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    let storage = Arc::new(
        SeaOrmStorage::open_sqlite(&db_url)
            .await
            .expect("Failed to create storage"),
    );

    let recorder = ScanRecorder::new(storage.as_scan_sink());
    let store: Arc<dyn ShortLinkStore> = storage.clone();
    let state = AppState {
        resolver: Resolver::new(store, recorder.clone(), 3),
        link_service: LinkService::new(storage.clone(), 8),
        storage,
        verifier: Arc::new(SessionVerifier::new("redirect_test_secret_32_bytes!!", None, 15).unwrap()),
        settings: HttpSettings {
            public_base_url: Some("https://qr.test".to_string()),
            trusted_proxies: Vec::new(),
        },
        start_time: AppStartTime::now(),
    };

    TestEnv {
        state,
        recorder,
        _dir: dir,
    }
}

async fn create(env: &TestEnv, name: &str, content: ContentInput) -> ShortLinkRecord {
    env.state
        .link_service
        .create(
            OWNER,
            CreateQrCodeRequest {
                name: name.to_string(),
                content,
            },
        )
        .await
        .unwrap()
}

macro_rules! redirect_app {
    ($env:expr) => {{
        let state = $env.state.clone();
        test::init_service(App::new().configure(move |cfg: &mut web::ServiceConfig| {
            configure_app(cfg, &state)
        }))
        .await
    }};
}

#[actix_rt::test]
async fn test_url_code_renders_redirect_page() {
    let env = setup().await;
    let record = create(
        &env,
        "Menu",
        ContentInput::Url {
            url: "example.com/menu".to_string(),
        },
    )
    .await;
    let app = redirect_app!(env);

    let req = TestRequest::get()
        .uri(&format!("/r/{}", record.short_code))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("cache-control").unwrap().to_str().unwrap(),
        "no-store"
    );
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    // 存储的是原始输入，跳转时补全协议
    assert!(html.contains("https://example.com/menu"));
    assert!(html.contains("Go Now"));
    assert!(html.contains("http-equiv=\"refresh\""));
}

#[actix_rt::test]
async fn test_unknown_code_returns_error_page() {
    let env = setup().await;
    let app = redirect_app!(env);

    let req = TestRequest::get().uri("/r/doesnotexist").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("QR Code Error"));
    assert!(html.contains("QR code not found or inactive"));
}

#[actix_rt::test]
async fn test_malformed_code_is_not_found() {
    let env = setup().await;
    let app = redirect_app!(env);

    let req = TestRequest::get().uri("/r/bad%20code!").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_inactive_code_looks_like_missing() {
    let env = setup().await;
    let record = create(
        &env,
        "Paused",
        ContentInput::Url {
            url: "https://example.com".to_string(),
        },
    )
    .await;
    env.state
        .link_service
        .set_active(OWNER, &record.id, false)
        .await
        .unwrap();
    let app = redirect_app!(env);

    let req = TestRequest::get()
        .uri(&format!("/r/{}", record.short_code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    env.recorder.wait_idle().await;
    let stored = env.state.storage.find_by_id(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.scan_count, 0);
}

#[actix_rt::test]
async fn test_wifi_code_displays_content() {
    let env = setup().await;
    let record = create(
        &env,
        "Guest Wi-Fi",
        ContentInput::Wifi(WifiNetwork {
            ssid: "Guest".to_string(),
            password: "welcome".to_string(),
            security: None,
            hidden: false,
        }),
    )
    .await;
    let app = redirect_app!(env);

    let req = TestRequest::get()
        .uri(&format!("/r/{}", record.short_code))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("WIFI:T:WPA;S:Guest;P:welcome;H:false;;"));
    assert!(!html.contains("http-equiv=\"refresh\""));
}

#[actix_rt::test]
async fn test_each_visit_records_one_scan() {
    let env = setup().await;
    let record = create(
        &env,
        "Poster",
        ContentInput::Url {
            url: "https://example.com/poster".to_string(),
        },
    )
    .await;
    let app = redirect_app!(env);

    for _ in 0..3 {
        let req = TestRequest::get()
            .uri(&format!("/r/{}", record.short_code))
            .insert_header(("User-Agent", "Mozilla/5.0 (iPhone)"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    env.recorder.wait_idle().await;
    let stored = env.state.storage.find_by_id(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.scan_count, 3);
    assert!(stored.last_scanned_at.is_some());

    let scans = env.state.storage.recent_scans(&record.id, 10).await.unwrap();
    assert_eq!(scans.len(), 3);
    assert_eq!(scans[0].user_agent.as_deref(), Some("Mozilla/5.0 (iPhone)"));
}

#[actix_rt::test]
async fn test_edited_content_takes_effect_for_same_code() {
    let env = setup().await;
    let record = create(
        &env,
        "Flyer",
        ContentInput::Url {
            url: "https://old.example.com".to_string(),
        },
    )
    .await;
    env.state
        .link_service
        .update(
            OWNER,
            &record.id,
            qrlinker::services::UpdateQrCodeRequest {
                name: None,
                content: Some(ContentInput::Text {
                    text: "Event moved to Friday".to_string(),
                }),
            },
        )
        .await
        .unwrap();
    let app = redirect_app!(env);

    let req = TestRequest::get()
        .uri(&format!("/r/{}", record.short_code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Event moved to Friday"));
    assert!(!html.contains("old.example.com"));
}

#[actix_rt::test]
async fn test_health_reports_storage() {
    let env = setup().await;
    let app = redirect_app!(env);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["storage"]["backend"], "sqlite");
    assert_eq!(body["data"]["status"], "healthy");
}
