//! Server mode
//!
//! 组装 HTTP 服务：跳转页、owner API、健康检查。

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::jwt::SessionVerifier;
use crate::api::services::{
    AppStartTime, HttpSettings, api_routes, health_routes, json_config, redirect_routes,
};
use crate::config::{CorsConfig, StaticConfig};
use crate::resolver::Resolver;
use crate::runtime::lifetime;
use crate::services::LinkService;
use crate::storage::SeaOrmStorage;

/// 每个 worker 共享的应用状态
#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub link_service: LinkService,
    pub storage: Arc<SeaOrmStorage>,
    pub verifier: Arc<SessionVerifier>,
    pub settings: HttpSettings,
    pub start_time: AppStartTime,
}

/// 注册路由与共享数据，测试中也用它搭建 App
pub fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.resolver.clone()))
        .app_data(web::Data::new(state.link_service.clone()))
        .app_data(web::Data::new(state.storage.clone()))
        .app_data(web::Data::new(state.settings.clone()))
        .app_data(web::Data::new(state.start_time.clone()))
        .app_data(json_config())
        .service(health_routes())
        .service(api_routes(Arc::clone(&state.verifier)))
        .service(redirect_routes());
}

fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.enabled && cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 未启用时保持同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "PUT", "DELETE", "OPTIONS"])
        .allowed_header("Content-Type")
        .allowed_header("Authorization")
        .allowed_header("Accept")
        .max_age(cors_config.max_age);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// Ctrl+C 后停止接收请求，等待进行中的请求与扫码统计写完再退出。
/// 日志系统需要在调用前初始化。
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    let recorder = startup.core.recorder.clone();
    let state = AppState {
        resolver: startup.core.resolver,
        link_service: startup.core.link_service,
        storage: startup.core.storage,
        verifier: startup.verifier,
        settings: startup.settings,
        start_time,
    };

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors_middleware(&cors_config))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| configure_app(cfg, &state))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    info!("Starting server at http://{}", bind_address);

    let handle = server.handle();
    let shutdown = tokio::spawn(async move {
        lifetime::shutdown::wait_for_signal().await;
        handle.stop(true).await;
    });

    server.await.context("HTTP server error")?;
    shutdown.abort();

    lifetime::shutdown::drain_recorder(&recorder).await;
    info!("Graceful shutdown complete");
    Ok(())
}
