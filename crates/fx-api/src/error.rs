//! 통합 API 에러 응답 타입.
//!
//! JSON 엔드포인트는 모두 같은 에러 형식을 사용합니다:
//!
//! ```json
//! {
//!   "code": "DATA_NOT_FOUND",
//!   "message": "Currency data file 'USD_TO_KRW.json' not found.",
//!   "timestamp": 1738300800
//! }
//! ```

use axum::http::StatusCode;
use axum::Json;
use fx_collector::CollectorError;
use fx_data::{DataError, LoadError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 통합 API 에러 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "DATA_NOT_FOUND", "UPSTREAM_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 상태 코드와 에러 응답 쌍 생성.
pub fn api_error(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// 저장 파일 로드 오류의 상태 코드와 에러 코드.
///
/// - 파일 없음 → 404
/// - 형식 오류, 필드 누락, 읽기 실패 → 500
pub fn load_error_status(err: &LoadError) -> (StatusCode, &'static str) {
    match err {
        LoadError::NotFound(_) => (StatusCode::NOT_FOUND, "DATA_NOT_FOUND"),
        LoadError::Malformed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MALFORMED_DATA"),
        LoadError::MissingField { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "MISSING_FIELD"),
        LoadError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
    }
}

/// 저장 파일 로드 오류를 API 에러로 변환.
pub fn load_error(err: &LoadError) -> (StatusCode, Json<ApiErrorResponse>) {
    let (status, code) = load_error_status(err);
    api_error(status, code, err.to_string())
}

/// 외부 API 조회 오류를 API 에러로 변환.
///
/// 최신 환율 조회 실패는 500으로 응답합니다.
pub fn upstream_error(err: &DataError) -> (StatusCode, Json<ApiErrorResponse>) {
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "UPSTREAM_ERROR",
        format!("Could not retrieve exchange rates: {}", err),
    )
}

/// 갱신 오류를 API 에러로 변환.
///
/// - 외부 API 실패 또는 응답 형식 오류 → 502
/// - 잘못된 기간 → 400
/// - 저장 실패, 설정 오류 → 500
pub fn refresh_error(err: &CollectorError) -> (StatusCode, Json<ApiErrorResponse>) {
    let (status, code) = match err {
        e if e.is_invalid_input() => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        CollectorError::Fetch(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        CollectorError::Save(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SAVE_ERROR"),
        CollectorError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
    };
    api_error(status, code, err.to_string())
}
