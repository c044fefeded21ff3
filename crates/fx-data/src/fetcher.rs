//! 기간별 환율 히스토리 수집기.
//!
//! 두 가지 수집 방식을 제공합니다:
//! - **일별 수집** ([`HistoryFetcher::fetch_daily`]): 영업일마다 한 번씩 요청
//! - **일괄 수집** ([`HistoryFetcher::fetch_bulk`]): 기간 전체를 한 번에 요청
//!
//! 일별 수집은 실패한 일자를 경고 후 건너뛰며 나머지 요청을 계속합니다.
//! 재시도나 백오프는 하지 않습니다. 요청 사이에는 설정된 딜레이를 두고,
//! 취소 토큰이 취소되면 그때까지 모은 결과를 반환합니다.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDate, Weekday};
use fx_core::{CurrencyCode, FxConfig, RateRecord, RateSeries};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};
use crate::provider::frankfurter::{FrankfurterClient, RangeRateResponse};

/// 토/일요일이 아니면 영업일로 간주합니다 (공휴일은 API가 처리).
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 일별 수집 통계.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchStats {
    /// 요청한 영업일 수
    pub requested: usize,
    /// 환율을 받은 요청 수
    pub fetched: usize,
    /// 실패한 요청 수 (네트워크, 상태 코드, 환율 누락)
    pub failed: usize,
    /// 주말이라 건너뛴 일수
    pub weekend_skipped: usize,
    /// 실패한 요청 일자
    pub failed_dates: Vec<NaiveDate>,
    /// 취소로 중단되었는지 여부
    pub cancelled: bool,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

/// 일별 수집 결과.
#[derive(Debug, Clone)]
pub struct DailyFetchReport {
    pub series: RateSeries,
    pub stats: FetchStats,
}

/// 환율 히스토리 수집기.
#[derive(Debug, Clone)]
pub struct HistoryFetcher {
    client: FrankfurterClient,
    base: CurrencyCode,
    target: CurrencyCode,
    /// 일별 수집 시 요청 간 딜레이
    request_delay: Duration,
}

impl HistoryFetcher {
    /// 클라이언트와 통화쌍으로 생성합니다 (딜레이 없음).
    pub fn new(client: FrankfurterClient, base: CurrencyCode, target: CurrencyCode) -> Self {
        Self {
            client,
            base,
            target,
            request_delay: Duration::ZERO,
        }
    }

    /// 전체 설정에서 생성합니다.
    pub fn from_config(config: &FxConfig) -> Result<Self> {
        let client = FrankfurterClient::from_config(&config.api)?;
        Ok(Self::new(
            client,
            config.currency.base.clone(),
            config.currency.target.clone(),
        )
        .with_request_delay(config.api.request_delay()))
    }

    /// 요청 간 딜레이를 설정합니다.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn target(&self) -> &CurrencyCode {
        &self.target
    }

    pub fn client(&self) -> &FrankfurterClient {
        &self.client
    }

    /// `[start, end]` 구간의 영업일마다 한 번씩 요청하여 시계열을 만듭니다.
    ///
    /// 실패한 일자는 경고 로그를 남기고 결과에서 빠지며, 통계에 기록됩니다.
    /// 레코드 일자는 API 응답의 `date`를 사용하므로 휴일 요청이 직전 영업일과
    /// 겹치면 하나로 합쳐집니다.
    pub async fn fetch_daily(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<DailyFetchReport> {
        if start > end {
            return Err(DataError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        info!(
            base = %self.base,
            target = %self.target,
            from = %start,
            to = %end,
            "Fetching exchange rate history day by day"
        );

        let started = Instant::now();
        let mut stats = FetchStats::default();
        let mut records = Vec::new();

        for date in start.iter_days().take_while(|d| *d <= end) {
            if !is_business_day(date) {
                stats.weekend_skipped += 1;
                continue;
            }

            if cancel.is_cancelled() {
                warn!(date = %date, "Daily fetch cancelled");
                stats.cancelled = true;
                break;
            }

            // 첫 요청 이후부터 딜레이 적용
            if stats.requested > 0 && !self.request_delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        warn!(date = %date, "Daily fetch cancelled");
                        stats.cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(self.request_delay) => {}
                }
            }

            stats.requested += 1;
            match self.client.fetch_day(date, &self.base, &self.target).await {
                Ok(response) => match response.rate_for(&self.target) {
                    Some(rate) => {
                        debug!(
                            date = %response.date,
                            rate = %rate,
                            "Fetched 1 {} = {} {}",
                            self.base,
                            rate,
                            self.target
                        );
                        stats.fetched += 1;
                        records.push(RateRecord::new(response.date, rate));
                    }
                    None => {
                        warn!(
                            date = %date,
                            target = %self.target,
                            "Could not retrieve rate for date, skipping"
                        );
                        stats.failed += 1;
                        stats.failed_dates.push(date);
                    }
                },
                Err(e) => {
                    warn!(date = %date, error = %e, "Error fetching rate, skipping");
                    stats.failed += 1;
                    stats.failed_dates.push(date);
                }
            }
        }

        stats.elapsed = started.elapsed();
        let series = RateSeries::new(self.base.clone(), self.target.clone(), records);

        info!(
            records = series.len(),
            requested = stats.requested,
            failed = stats.failed,
            cancelled = stats.cancelled,
            "Daily fetch finished"
        );

        Ok(DailyFetchReport { series, stats })
    }

    /// 기간 전체를 한 번에 요청하여 시계열을 만듭니다.
    ///
    /// `end`가 `None`이면 최신 일자까지 조회합니다.
    pub async fn fetch_bulk(&self, start: NaiveDate, end: Option<NaiveDate>) -> Result<RateSeries> {
        if let Some(end) = end {
            if start > end {
                return Err(DataError::InvalidInput(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }
        }

        info!(
            base = %self.base,
            target = %self.target,
            from = %start,
            to = ?end,
            "Fetching exchange rate history in one request"
        );

        let response = self
            .client
            .fetch_range(start, end, &self.base, &self.target)
            .await?;
        let series = normalize_range_response(response, &self.base)?;

        info!(records = series.len(), target = %series.target, "Bulk fetch finished");
        Ok(series)
    }
}

/// 기간 응답의 중첩 맵을 레코드 목록으로 평탄화합니다.
///
/// 대상 통화는 첫 번째 일자 항목의 통화 코드에서 추론하며, 해당 통화가 없는
/// 일자는 경고 후 건너뜁니다. 응답에 `base`가 없으면 `fallback_base`를 사용합니다.
pub fn normalize_range_response(
    response: RangeRateResponse,
    fallback_base: &CurrencyCode,
) -> Result<RateSeries> {
    let target_code = response
        .rates
        .values()
        .next()
        .and_then(|first| first.keys().next().cloned())
        .ok_or_else(|| {
            DataError::InvalidData(
                "Could not determine target currency from 'rates' field".to_string(),
            )
        })?;
    let target: CurrencyCode = target_code
        .parse()
        .map_err(|_| DataError::InvalidData(format!("Invalid currency code: {}", target_code)))?;

    let base = match response.base.as_deref() {
        Some(code) => code
            .parse()
            .map_err(|_| DataError::InvalidData(format!("Invalid currency code: {}", code)))?,
        None => fallback_base.clone(),
    };

    let records: Vec<RateRecord> = flatten_rates(&response.rates, &target_code)
        .into_iter()
        .map(|(date, rate)| RateRecord::new(date, rate))
        .collect();

    Ok(RateSeries::new(base, target, records))
}

fn flatten_rates(
    rates: &BTreeMap<NaiveDate, BTreeMap<String, Decimal>>,
    target: &str,
) -> Vec<(NaiveDate, Decimal)> {
    rates
        .iter()
        .filter_map(|(date, by_code)| match by_code.get(target) {
            Some(rate) => Some((*date, *rate)),
            None => {
                warn!(date = %date, target = target, "Missing rate for date, skipping entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn fetcher(server: &mockito::ServerGuard) -> HistoryFetcher {
        let client = FrankfurterClient::new(server.url(), Duration::from_secs(5)).unwrap();
        HistoryFetcher::new(client, CurrencyCode::usd(), CurrencyCode::krw())
    }

    async fn mock_day(
        server: &mut mockito::ServerGuard,
        day: &str,
        rate: &str,
    ) -> mockito::Mock {
        server
            .mock("GET", Matcher::Regex(format!("^/v1/{}", day)))
            .with_status(200)
            .with_body(format!(
                r#"{{"amount":1.0,"base":"USD","date":"{}","rates":{{"KRW":{}}}}}"#,
                day, rate
            ))
            .expect(1)
            .create_async()
            .await
    }

    #[test]
    fn test_is_business_day() {
        assert!(is_business_day(date("2025-01-03"))); // 금
        assert!(!is_business_day(date("2025-01-04"))); // 토
        assert!(!is_business_day(date("2025-01-05"))); // 일
        assert!(is_business_day(date("2025-01-06"))); // 월
    }

    #[tokio::test]
    async fn test_fetch_daily_skips_weekends() {
        let mut server = mockito::Server::new_async().await;
        let fri = mock_day(&mut server, "2025-01-03", "1465.2").await;
        let mon = mock_day(&mut server, "2025-01-06", "1460.0").await;

        let report = fetcher(&server)
            .fetch_daily(date("2025-01-03"), date("2025-01-06"), &CancellationToken::new())
            .await
            .unwrap();

        fri.assert_async().await;
        mon.assert_async().await;
        assert_eq!(report.stats.requested, 2);
        assert_eq!(report.stats.weekend_skipped, 2);
        let dates: Vec<_> = report.series.currency.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2025-01-03"), date("2025-01-06")]);
    }

    #[tokio::test]
    async fn test_fetch_daily_omits_failed_weekday() {
        let mut server = mockito::Server::new_async().await;
        let _mon = mock_day(&mut server, "2025-01-06", "1460.0").await;
        let _tue = server
            .mock("GET", Matcher::Regex("^/v1/2025-01-07".into()))
            .with_status(500)
            .create_async()
            .await;
        let _wed = mock_day(&mut server, "2025-01-08", "1455.5").await;

        let report = fetcher(&server)
            .fetch_daily(date("2025-01-06"), date("2025-01-08"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.stats.requested, 3);
        assert_eq!(report.stats.fetched, 2);
        assert_eq!(report.stats.failed, 1);
        assert_eq!(report.stats.failed_dates, vec![date("2025-01-07")]);
        assert_eq!(
            report.series.currency,
            vec![
                RateRecord::new(date("2025-01-06"), dec!(1460.0)),
                RateRecord::new(date("2025-01-08"), dec!(1455.5)),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_daily_missing_rate_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex("^/v1/2025-01-06".into()))
            .with_status(200)
            .with_body(r#"{"amount":1.0,"base":"USD","date":"2025-01-06","rates":{}}"#)
            .create_async()
            .await;

        let report = fetcher(&server)
            .fetch_daily(date("2025-01-06"), date("2025-01-06"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.series.is_empty());
        assert_eq!(report.stats.failed_dates, vec![date("2025-01-06")]);
    }

    #[tokio::test]
    async fn test_fetch_daily_holiday_collapses_to_previous_business_day() {
        let mut server = mockito::Server::new_async().await;
        let _dec31 = mock_day(&mut server, "2024-12-31", "1472.0").await;
        // 1월 1일 요청에 직전 영업일 값이 돌아옴
        let _jan1 = server
            .mock("GET", Matcher::Regex("^/v1/2025-01-01".into()))
            .with_status(200)
            .with_body(r#"{"amount":1.0,"base":"USD","date":"2024-12-31","rates":{"KRW":1472.0}}"#)
            .create_async()
            .await;

        let report = fetcher(&server)
            .fetch_daily(date("2024-12-31"), date("2025-01-01"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.stats.fetched, 2);
        assert_eq!(report.series.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_daily_cancelled_before_start() {
        let server = mockito::Server::new_async().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = fetcher(&server)
            .fetch_daily(date("2025-01-06"), date("2025-01-10"), &cancel)
            .await
            .unwrap();

        assert!(report.stats.cancelled);
        assert_eq!(report.stats.requested, 0);
        assert!(report.series.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_daily_rejects_inverted_range() {
        let server = mockito::Server::new_async().await;
        let err = fetcher(&server)
            .fetch_daily(date("2025-01-10"), date("2025-01-06"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_fetch_bulk() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex(r"^/v1/2025-01-02\.\.2025-01-03".into()))
            .with_status(200)
            .with_body(
                r#"{"base":"USD","rates":{"2025-01-02":{"KRW":1470.5},"2025-01-03":{"KRW":1465.2}}}"#,
            )
            .create_async()
            .await;

        let series = fetcher(&server)
            .fetch_bulk(date("2025-01-02"), Some(date("2025-01-03")))
            .await
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().currency, dec!(1465.2));
    }

    #[tokio::test]
    async fn test_fetch_bulk_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex(r"^/v1/2025-01-02\.\.".into()))
            .with_status(503)
            .create_async()
            .await;

        let err = fetcher(&server)
            .fetch_bulk(date("2025-01-02"), None)
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_normalize_infers_target() {
        let response: RangeRateResponse = serde_json::from_str(
            r#"{"base":"USD","rates":{"2025-01-02":{"KRW":1470.5}}}"#,
        )
        .unwrap();

        let series = normalize_range_response(response, &CurrencyCode::usd()).unwrap();

        assert_eq!(series.target, CurrencyCode::krw());
        assert_eq!(
            serde_json::to_value(&series.currency).unwrap(),
            serde_json::json!([{"date": "2025-01-02", "currency": 1470.5}])
        );
    }

    #[test]
    fn test_normalize_skips_entries_without_target() {
        let response: RangeRateResponse = serde_json::from_str(
            r#"{"rates":{"2025-01-02":{"KRW":1470.5},"2025-01-03":{"JPY":157.1},"2025-01-06":{"KRW":1460.0}}}"#,
        )
        .unwrap();

        let series = normalize_range_response(response, &CurrencyCode::usd()).unwrap();

        assert_eq!(series.base, CurrencyCode::usd());
        let dates: Vec<_> = series.currency.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2025-01-02"), date("2025-01-06")]);
    }

    #[test]
    fn test_normalize_empty_rates_is_invalid() {
        let response: RangeRateResponse =
            serde_json::from_str(r#"{"base":"USD","rates":{}}"#).unwrap();
        let err = normalize_range_response(response, &CurrencyCode::usd()).unwrap_err();
        assert!(matches!(err, DataError::InvalidData(_)));
    }
}
