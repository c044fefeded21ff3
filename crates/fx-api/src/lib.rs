//! 환율 조회 HTTP 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (최신 환율, 기간 히스토리, 갱신 트리거)
//! - 서버 렌더링 HTML 페이지 (최신 환율, 환율 차트)
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: 엔드포인트 및 라우터 구성
//! - [`pages`]: HTML 렌더링
//! - [`error`]: API 에러 응답 타입

pub mod error;
pub mod pages;
pub mod routes;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;
