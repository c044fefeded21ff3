//! 환율 히스토리 원본 데이터 endpoint.
//!
//! - `GET /api/v1/history?days=N` - 최근 N일 레코드 (기본값: `window.window_days`)

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use fx_core::{FilteredSeries, TrailingWindow};

use crate::error::{load_error, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 조회 기간 파라미터.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// 오늘 기준 최근 일수
    pub days: Option<u32>,
}

/// GET /api/v1/history
///
/// 응답: `{"base": "USD", "target": "KRW", "filtered_data": [{"date": .., "currency": ..}]}`
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<FilteredSeries>> {
    let window = match query.days {
        Some(days) => TrailingWindow::try_new(days).map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiErrorResponse::with_details(
                    "INVALID_INPUT",
                    e.to_string(),
                    serde_json::json!({"field": "days", "max": TrailingWindow::MAX_DAYS}),
                )),
            )
        })?,
        None => state.config.window.page(),
    };

    let series = state
        .store
        .load_window(window, state.today())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to load currency data");
            load_error(&e)
        })?;

    Ok(Json(series))
}

/// 히스토리 라우터 생성.
pub fn history_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use chrono::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::state::create_test_state;

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = Router::new()
            .nest("/api/v1/history", history_router())
            .with_state(Arc::new(state));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_history_window() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state("http://127.0.0.1:9", dir.path());
        let d = |n: i64| (state.today() - Duration::days(n)).format("%Y-%m-%d").to_string();
        std::fs::write(
            dir.path().join("USD_TO_KRW.json"),
            format!(
                r#"{{"base":"USD","target":"KRW","currency":[
                    {{"date":"{}","currency":1400.0}},
                    {{"date":"{}","currency":1450.0}},
                    {{"date":"{}","currency":1470.5}}
                ]}}"#,
                d(90),
                d(20),
                d(1)
            ),
        )
        .unwrap();
        let (recent, older) = (d(1), d(20));

        let (status, body) = get_json(state.clone(), "/api/v1/history?days=7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "base": "USD",
                "target": "KRW",
                "filtered_data": [{"date": recent, "currency": 1470.5}]
            })
        );

        // 기본값: 60일
        let (_, body) = get_json(state, "/api/v1/history").await;
        let dates: Vec<_> = body["filtered_data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["date"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(dates, vec![older, recent]);
    }

    #[tokio::test]
    async fn test_history_not_found() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get_json(
            create_test_state("http://127.0.0.1:9", dir.path()),
            "/api/v1/history",
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "DATA_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_history_malformed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("USD_TO_KRW.json"), "not json").unwrap();

        let (status, body) = get_json(
            create_test_state("http://127.0.0.1:9", dir.path()),
            "/api/v1/history",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "MALFORMED_DATA");
    }

    #[tokio::test]
    async fn test_history_rejects_zero_days() {
        let dir = TempDir::new().unwrap();
        let (status, body) = get_json(
            create_test_state("http://127.0.0.1:9", dir.path()),
            "/api/v1/history?days=0",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_history_rejects_oversized_days() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("USD_TO_KRW.json"),
            r#"{"base":"USD","target":"KRW","currency":[{"date":"2025-01-02","currency":1470.5}]}"#,
        )
        .unwrap();

        let (status, body) = get_json(
            create_test_state("http://127.0.0.1:9", dir.path()),
            "/api/v1/history?days=4000000000",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert_eq!(body["details"]["field"], "days");
        assert_eq!(body["details"]["max"], 36500);
    }
}
