use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::analytics::ScanRecorder;
use crate::api::jwt::SessionVerifier;
use crate::api::services::HttpSettings;
use crate::config::StaticConfig;
use crate::resolver::Resolver;
use crate::services::LinkService;
use crate::storage::{SeaOrmStorage, ShortLinkStore, StorageFactory};

/// 各模式共享的组件
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub recorder: ScanRecorder,
    pub resolver: Resolver,
    pub link_service: LinkService,
}

/// 服务器额外需要的组件
pub struct ServerContext {
    pub core: StartupContext,
    pub verifier: Arc<SessionVerifier>,
    pub settings: HttpSettings,
}

/// 连接数据库并组装解析器与统计记录器
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let recorder = ScanRecorder::from_config(storage.as_scan_sink(), &config.analytics);
    if !recorder.is_enabled() {
        warn!("Scan tracking is disabled in configuration");
    }

    let store: Arc<dyn ShortLinkStore> = storage.clone();
    let resolver = Resolver::new(store, recorder.clone(), config.redirect.countdown_seconds);
    let link_service = LinkService::new(storage.clone(), config.redirect.short_code_length);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        recorder,
        resolver,
        link_service,
    })
}

pub async fn prepare_server_startup(config: &StaticConfig) -> Result<ServerContext> {
    let core = prepare_startup(config).await?;

    check_jwt_secret_security(config);
    let verifier = Arc::new(
        SessionVerifier::from_config(&config.auth).context("Failed to build session verifier")?,
    );

    let settings = HttpSettings::from_config(&config.server);
    match &settings.public_base_url {
        Some(url) => info!("Short links will use base URL {}", url),
        None => info!("server.public_base_url not set, short links follow the request host"),
    }
    if settings.trusted_proxies.is_empty() {
        warn!(
            "Client IP: auto-detect mode. Connections from private IPs will use X-Forwarded-For. \
             Configure server.trusted_proxies explicitly behind a public proxy."
        );
    }

    Ok(ServerContext {
        core,
        verifier,
        settings,
    })
}

fn check_jwt_secret_security(config: &StaticConfig) {
    let len = config.auth.jwt_secret.len();
    if len > 0 && len < 32 {
        warn!(
            "WARNING: JWT Secret is too short ({} bytes). \
            Recommended minimum is 32 bytes for security.",
            len
        );
    }
}
