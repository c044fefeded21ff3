//! 환율 히스토리 갱신 endpoint.
//!
//! - `POST /api/v1/refresh?mode=daily|bulk&from=YYYY-MM-DD&to=YYYY-MM-DD`
//!
//! 갱신은 동시에 하나만 실행되며, 진행 중이면 409를 반환합니다.
//! 기본 시작일은 일괄 갱신이 `collector.history_start`, 일별 갱신이 올해 1월 1일입니다.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use fx_collector::{refresh_bulk, refresh_daily, CollectionStats, CollectorError, RefreshMode};

use crate::error::{api_error, refresh_error, ApiResult};
use crate::state::AppState;

/// 갱신 요청 파라미터.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub mode: RefreshMode,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// 갱신 응답.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub mode: RefreshMode,
    pub artifact: String,
    pub stats: CollectionStats,
}

/// POST /api/v1/refresh
///
/// 갱신은 별도 태스크에서 실행되므로 요청이 끊겨도 수집한 결과는 저장됩니다.
pub async fn trigger_refresh(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<Json<RefreshResponse>> {
    let Ok(guard) = Arc::clone(&state.refresh_lock).try_lock_owned() else {
        return Err(api_error(
            StatusCode::CONFLICT,
            "REFRESH_IN_PROGRESS",
            "A refresh is already running",
        ));
    };

    info!(mode = %query.mode, from = ?query.from, to = ?query.to, "Refresh requested");

    let mode = query.mode;
    let task_state = Arc::clone(&state);
    let handle = tokio::spawn(async move {
        let _guard = guard;
        let result = run_refresh(&task_state, &query).await;
        match &result {
            Ok(stats) => stats.log_summary(&format!("{} refresh", query.mode)),
            Err(e) => error!(mode = %query.mode, error = %e, "Refresh failed"),
        }
        result
    });

    let stats = handle
        .await
        .map_err(|e| {
            error!(error = %e, "Refresh task aborted");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "REFRESH_ABORTED",
                format!("Refresh task aborted: {}", e),
            )
        })?
        .map_err(|e| refresh_error(&e))?;

    Ok(Json(RefreshResponse {
        mode,
        artifact: state.store.path().display().to_string(),
        stats,
    }))
}

async fn run_refresh(
    state: &AppState,
    query: &RefreshQuery,
) -> Result<CollectionStats, CollectorError> {
    let today = state.today();
    match query.mode {
        RefreshMode::Daily => {
            let from = query.from.unwrap_or_else(|| start_of_year(today));
            let to = query.to.unwrap_or(today);
            refresh_daily(&state.fetcher, &state.store, from, to, &state.shutdown).await
        }
        RefreshMode::Bulk => {
            let from = query.from.unwrap_or(state.config.collector.history_start);
            refresh_bulk(&state.fetcher, &state.store, from, query.to).await
        }
    }
}

fn start_of_year(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
}

/// 갱신 라우터 생성.
pub fn refresh_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(trigger_refresh))
}
