//! 환율 히스토리 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 최근 기간 환율 차트 이미지 생성 (`plot`)
//! - 최근 기간 레코드 출력 (`show`)
//! - 최신 환율 조회 (`latest`)

pub mod commands;

pub use commands::*;
