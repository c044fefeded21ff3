//! 환율 히스토리 갱신 (수집 → 저장).
//!
//! 저장 파일은 매 갱신마다 통째로 덮어씁니다. 일별 수집에서 일부 일자가
//! 실패해도 나머지로 저장을 진행합니다.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use chrono::NaiveDate;
use fx_data::{ArtifactStore, HistoryFetcher};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{CollectorError, Result};
use crate::stats::CollectionStats;

/// 갱신 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// 영업일마다 한 번씩 요청
    Daily,
    /// 기간 전체를 한 번에 요청
    #[default]
    Bulk,
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Bulk => write!(f, "bulk"),
        }
    }
}

impl FromStr for RefreshMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "bulk" => Ok(Self::Bulk),
            other => Err(format!("unknown refresh mode: {}", other)),
        }
    }
}

/// 일별 수집 후 저장합니다.
///
/// 취소된 경우에도 그때까지 모은 레코드를 저장합니다.
pub async fn refresh_daily(
    fetcher: &HistoryFetcher,
    store: &ArtifactStore,
    from: NaiveDate,
    to: NaiveDate,
    cancel: &CancellationToken,
) -> Result<CollectionStats> {
    let started = Instant::now();
    let report = fetcher
        .fetch_daily(from, to, cancel)
        .await
        .map_err(CollectorError::Fetch)?;

    if !report.stats.failed_dates.is_empty() {
        warn!(
            failed = report.stats.failed,
            dates = ?report.stats.failed_dates,
            "Some dates could not be fetched"
        );
    }
    if report.series.is_empty() {
        warn!("No exchange rate data fetched, saving empty history");
    }

    save(store, &report.series).await?;

    let mut stats = CollectionStats::from(&report.stats);
    stats.records_saved = report.series.len();
    stats.elapsed = started.elapsed();
    Ok(stats)
}

/// 기간 일괄 수집 후 저장합니다.
///
/// 수집 자체가 실패하면 기존 파일은 그대로 둡니다.
pub async fn refresh_bulk(
    fetcher: &HistoryFetcher,
    store: &ArtifactStore,
    from: NaiveDate,
    to: Option<NaiveDate>,
) -> Result<CollectionStats> {
    let started = Instant::now();
    let series = fetcher
        .fetch_bulk(from, to)
        .await
        .map_err(CollectorError::Fetch)?;

    save(store, &series).await?;

    Ok(CollectionStats {
        requested: 1,
        fetched: 1,
        records_saved: series.len(),
        elapsed: started.elapsed(),
        ..Default::default()
    })
}

async fn save(store: &ArtifactStore, series: &fx_core::RateSeries) -> Result<()> {
    if let Err(e) = store.save(series).await {
        error!(path = %store.path().display(), error = %e, "Error saving data to file");
        return Err(CollectorError::Save(e));
    }
    info!(
        path = %store.path().display(),
        records = series.len(),
        "Exchange rate history refreshed"
    );
    Ok(())
}
