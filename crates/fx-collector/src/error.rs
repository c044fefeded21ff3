//! 에러 타입 정의.

use fx_core::CoreError;
use fx_data::DataError;
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    /// 수집 실패 (외부 API, 응답 형식, 잘못된 기간)
    #[error("Fetch failed: {0}")]
    Fetch(#[source] DataError),

    /// 저장 파일 쓰기 실패
    #[error("Failed to save exchange rate history: {0}")]
    Save(#[source] DataError),
}

impl CollectorError {
    /// 외부 API 측 실패인지 확인합니다.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Fetch(e) if e.is_upstream())
    }

    /// 잘못된 입력으로 인한 실패인지 확인합니다.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Fetch(DataError::InvalidInput(_)))
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
