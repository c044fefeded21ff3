//! 갱신 통계 구조체.

use fx_data::FetchStats;
use serde::Serialize;
use std::time::Duration;

/// 갱신 작업 통계
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionStats {
    /// 요청 횟수 (일괄 수집은 1)
    pub requested: usize,
    /// 성공 횟수
    pub fetched: usize,
    /// 실패 횟수
    pub failed: usize,
    /// 주말이라 건너뛴 일수
    pub weekend_skipped: usize,
    /// 저장된 레코드 수
    pub records_saved: usize,
    /// 취소로 중단되었는지 여부
    pub cancelled: bool,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.requested == 0 {
            0.0
        } else {
            (self.fetched as f64 / self.requested as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            requested = self.requested,
            fetched = self.fetched,
            failed = self.failed,
            weekend_skipped = self.weekend_skipped,
            records_saved = self.records_saved,
            cancelled = self.cancelled,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "갱신 완료"
        );
    }
}

impl From<&FetchStats> for CollectionStats {
    fn from(stats: &FetchStats) -> Self {
        Self {
            requested: stats.requested,
            fetched: stats.fetched,
            failed: stats.failed,
            weekend_skipped: stats.weekend_skipped,
            records_saved: 0,
            cancelled: stats.cancelled,
            elapsed: stats.elapsed,
        }
    }
}
