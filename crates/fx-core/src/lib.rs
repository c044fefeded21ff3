//! # FX Core
//!
//! 환율 수집/조회 시스템의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! 이 크레이트는 워크스페이스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 통화 코드 및 환율 레코드/시계열
//! - 조회 기간(trailing window)
//! - 설정 관리
//! - 로깅 인프라
//! - 에러 타입

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
