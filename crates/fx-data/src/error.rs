//! 데이터 모듈 오류 타입.

use std::path::PathBuf;

use fx_core::CoreError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 외부 API 요청 실패 (네트워크, 타임아웃 등)
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 외부 API가 2xx가 아닌 상태 코드를 반환
    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// 응답 데이터가 기대한 형식이 아님
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 잘못된 입력 (예: 시작일 > 종료일)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 저장 파일 로드 실패
    #[error(transparent)]
    Load(#[from] LoadError),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정/도메인 오류
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DataError {
    /// 외부 API 측 실패인지 확인합니다.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::UpstreamStatus { .. })
    }
}

/// 저장 파일 로드 오류.
#[derive(Debug, Error)]
pub enum LoadError {
    /// 파일 없음
    #[error("Currency data file '{}' not found.", .0.display())]
    NotFound(PathBuf),

    /// JSON 파싱 실패 또는 필드 타입 불일치
    #[error("Malformed currency data: {0}")]
    Malformed(String),

    /// 레코드에 필수 필드 누락
    #[error("Missing expected key in JSON data: '{field}' (record #{index})")]
    MissingField { index: usize, field: &'static str },

    /// 그 외 읽기 실패
    #[error("Failed to read currency data: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
