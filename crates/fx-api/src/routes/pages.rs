//! HTML 페이지 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /currency-view` - 최신 환율 페이지
//! - `GET /currency-chart-page` - 최근 기간 환율 차트 페이지

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::load_error_status;
use crate::pages::{render_chart_page, render_currency_view, render_error_page};
use crate::state::AppState;

fn error_page(status: StatusCode, message: &str) -> Response {
    (status, Html(render_error_page(status, message))).into_response()
}

/// GET /currency-view
pub async fn currency_view(State(state): State<Arc<AppState>>) -> Response {
    let currency = &state.config.currency;
    match state
        .client
        .fetch_latest(&currency.base, &currency.target)
        .await
    {
        Ok(latest) => Html(render_currency_view(&latest)).into_response(),
        Err(e) => {
            error!(error = %e, "Error fetching exchange rates");
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not retrieve exchange rates. Please try again later.",
            )
        }
    }
}

/// GET /currency-chart-page
///
/// 파일이 없으면 404, 형식 오류/필드 누락이면 500 에러 페이지를 반환합니다.
pub async fn currency_chart_page(State(state): State<Arc<AppState>>) -> Response {
    let window = state.config.window.page();

    let series = match state.store.load_window(window, state.today()).await {
        Ok(series) => series,
        Err(e) => {
            let (status, _) = load_error_status(&e);
            warn!(error = %e, status = status.as_u16(), "Failed to load currency data");
            return error_page(status, &e.to_string());
        }
    };

    match render_chart_page(&series, window) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render chart page");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render chart data.")
        }
    }
}

/// 페이지 라우터 생성.
pub fn pages_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/currency-view", get(currency_view))
        .route("/currency-chart-page", get(currency_chart_page))
}
