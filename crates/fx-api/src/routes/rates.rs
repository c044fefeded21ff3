//! 환율 조회 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /` - 환영 메시지
//! - `GET /api/usd-to-krw` - 설정된 통화쌍의 최신 환율

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use fx_core::LatestRate;

use crate::error::{upstream_error, ApiResult};
use crate::state::AppState;

/// 환영 메시지 응답.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
}

/// GET /
///
/// 데이터 갱신은 하지 않습니다. 갱신은 `POST /api/v1/refresh`로 요청합니다.
pub async fn welcome(State(state): State<Arc<AppState>>) -> Json<WelcomeResponse> {
    let currency = &state.config.currency;
    Json(WelcomeResponse {
        message: format!(
            "Welcome to the {} to {} Currency Exchange API!",
            currency.base, currency.target
        ),
        version: state.version.clone(),
    })
}

/// GET /api/usd-to-krw
///
/// 외부 API 조회에 실패하면 500을 반환합니다.
pub async fn latest_rate(State(state): State<Arc<AppState>>) -> ApiResult<Json<LatestRate>> {
    let currency = &state.config.currency;
    let latest = state
        .client
        .fetch_latest(&currency.base, &currency.target)
        .await
        .map_err(|e| {
            error!(error = %e, "Error fetching exchange rates");
            upstream_error(&e)
        })?;

    Ok(Json(latest))
}

/// 환율 조회 라우터 생성.
pub fn rates_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(welcome))
        .route("/api/usd-to-krw", get(latest_rate))
}
