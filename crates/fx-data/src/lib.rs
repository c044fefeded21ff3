//! 환율 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - Frankfurter 환율 API 클라이언트 ([`provider`])
//! - 기간별 히스토리 수집기 (일별/일괄) ([`fetcher`])
//! - JSON 저장 파일 읽기/쓰기 ([`storage`])
//! - 저장 파일 검증 및 조회 기간 필터 ([`loader`])

pub mod error;
pub mod fetcher;
pub mod loader;
pub mod provider;
pub mod storage;

pub use error::{DataError, LoadError, Result};
pub use fetcher::{is_business_day, DailyFetchReport, FetchStats, HistoryFetcher};
pub use provider::frankfurter::{DailyRateResponse, FrankfurterClient, RangeRateResponse};
pub use storage::artifact::ArtifactStore;
