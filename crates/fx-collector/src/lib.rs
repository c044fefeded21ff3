//! Standalone exchange-rate collector.
//!
//! 이 crate는 API 서버와 독립적으로 환율 히스토리를 갱신하는 바이너리를 제공합니다:
//! - 일별 수집 후 저장 (`fetch-daily`)
//! - 기간 일괄 수집 후 저장 (`fetch-bulk`)
//! - 데몬 모드: 주기적 일괄 갱신 (`daemon`)
//!
//! 갱신 로직([`modules::refresh`])은 API 서버의 `POST /api/v1/refresh`에서도 사용합니다.

pub mod error;
pub mod modules;
pub mod stats;

pub use error::{CollectorError, Result};
pub use modules::{refresh_bulk, refresh_daily, RefreshMode};
pub use stats::CollectionStats;
