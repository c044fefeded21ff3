//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 환영 메시지
//! - `/api/usd-to-krw` - 최신 환율
//! - `/currency-view` - 최신 환율 페이지
//! - `/currency-chart-page` - 환율 차트 페이지
//! - `/api/v1/history` - 기간 히스토리 원본 데이터
//! - `/api/v1/refresh` - 히스토리 갱신 트리거
//! - `/health`, `/health/ready` - 헬스 체크
//! - `/static` - 정적 파일

pub mod health;
pub mod history;
pub mod pages;
pub mod rates;
pub mod refresh;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use history::{history_router, HistoryQuery};
pub use pages::pages_router;
pub use rates::{rates_router, WelcomeResponse};
pub use refresh::{refresh_router, RefreshQuery, RefreshResponse};

use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// 상태가 주입되기 전의 API 라우터.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(rates_router())
        .merge(pages_router())
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/history", history_router())
        .nest("/api/v1/refresh", refresh_router())
}

/// 전체 라우터 생성 (정적 파일, 요청 트레이싱 포함).
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.server.static_dir.clone();

    create_api_router()
        .with_state(state)
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
