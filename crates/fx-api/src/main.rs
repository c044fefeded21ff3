//! 환율 조회 HTTP 서버.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use fx_api::{create_router, AppState};
use fx_core::{init_logging, FxConfig, LogConfig, DEFAULT_CONFIG_PATH};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 설정 파일 경로: FX_CONFIG 환경변수 또는 기본 경로
    let config_path = std::env::var("FX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = FxConfig::load(&config_path)?;

    init_logging(LogConfig::from_settings(&config.logging))?;

    info!("Starting FX API server...");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                error = %e,
                "소켓 주소 설정이 유효하지 않습니다. FX__SERVER__HOST, FX__SERVER__PORT를 확인하세요."
            );
            e
        })?;

    let shutdown_token = CancellationToken::new();
    let state = Arc::new(AppState::new(config)?.with_shutdown(shutdown_token.clone()));

    info!(
        version = %state.version,
        artifact = %state.store.path().display(),
        pair = %format!("{}/{}", state.config.currency.base, state.config.currency.target),
        "Application state initialized"
    );
    if !state.store.exists().await {
        warn!("Artifact not found; run fx-collector or POST /api/v1/refresh to create it");
    }

    let app = create_router(state);

    info!(%addr, "API server listening");
    info!("Chart page available at http://{}/currency-chart-page", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token))
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소하여
/// 진행 중인 일별 갱신을 중단시킵니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
    info!("Shutdown signal propagated to running refresh");
}
