//! Frankfurter 환율 API 클라이언트.
//!
//! ## 엔드포인트
//! - `/v1/{date}`: 특정 일자 환율 (휴일이면 직전 영업일 값과 그 일자를 반환)
//! - `/v1/{start}..{end}`: 기간 환율 (`end` 생략 시 최신까지)
//! - `/v1/latest`: 최신 환율
//!
//! 모든 요청에 `base`, `symbols` 쿼리 파라미터를 붙입니다.
//!
//! ## 사용 예시
//! ```rust,ignore
//! let client = FrankfurterClient::new("https://api.frankfurter.dev", Duration::from_secs(30))?;
//! let latest = client.fetch_latest(&CurrencyCode::usd(), &CurrencyCode::krw()).await?;
//! println!("1 USD = {} KRW", latest.rate);
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use fx_core::{CurrencyCode, LatestRate, RateApiConfig};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{DataError, Result};

/// 단일 일자 응답.
///
/// ```json
/// {"amount": 1.0, "base": "USD", "date": "2025-01-02", "rates": {"KRW": 1470.5}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DailyRateResponse {
    #[serde(default)]
    pub base: Option<String>,
    /// 실제 환율 기준 일자 (요청 일자와 다를 수 있음)
    pub date: NaiveDate,
    #[serde(default)]
    pub rates: BTreeMap<String, Decimal>,
}

impl DailyRateResponse {
    /// 대상 통화 환율.
    pub fn rate_for(&self, target: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(target.as_str()).copied()
    }
}

/// 기간 응답.
///
/// ```json
/// {"base": "USD", "start_date": "2025-01-02", "end_date": "2025-01-03",
///  "rates": {"2025-01-02": {"KRW": 1470.5}, "2025-01-03": {"KRW": 1465.2}}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RangeRateResponse {
    #[serde(default)]
    pub base: Option<String>,
    /// 일자 → (통화 코드 → 환율)
    #[serde(default)]
    pub rates: BTreeMap<NaiveDate, BTreeMap<String, Decimal>>,
}

/// Frankfurter API 클라이언트.
#[derive(Debug, Clone)]
pub struct FrankfurterClient {
    client: Client,
    base_url: String,
}

impl FrankfurterClient {
    /// 기본 URL과 타임아웃으로 생성합니다.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fx-watch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `[api]` 설정에서 생성합니다.
    pub fn from_config(config: &RateApiConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    /// API 기본 URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 특정 일자 환율 조회.
    ///
    /// `GET /v1/{date}?base={base}&symbols={target}`
    pub async fn fetch_day(
        &self,
        date: NaiveDate,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<DailyRateResponse> {
        let url = format!("{}/v1/{}", self.base_url, date.format("%Y-%m-%d"));
        self.get_json(&url, base, target).await
    }

    /// 기간 환율 조회.
    ///
    /// `GET /v1/{start}..{end}?base={base}&symbols={target}` (`end`가 없으면 최신까지)
    pub async fn fetch_range(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<RangeRateResponse> {
        let end = end.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        let url = format!(
            "{}/v1/{}..{}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end
        );
        self.get_json(&url, base, target).await
    }

    /// 최신 환율 조회.
    ///
    /// 응답에 대상 통화가 없으면 `InvalidData`를 반환합니다.
    pub async fn fetch_latest(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<LatestRate> {
        let url = format!("{}/v1/latest", self.base_url);
        let response: DailyRateResponse = self.get_json(&url, base, target).await?;

        let rate = response.rate_for(target).ok_or_else(|| {
            DataError::InvalidData(format!("'{}' rate missing from latest response", target))
        })?;

        let base = match response.base.as_deref() {
            Some(code) => code.parse()?,
            None => base.clone(),
        };

        Ok(LatestRate {
            base,
            target: target.clone(),
            date: response.date,
            rate,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        base: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<T> {
        debug!(url = %url, base = %base, target = %target, "Requesting Frankfurter API");

        let response = self
            .client
            .get(url)
            .query(&[("base", base.as_str()), ("symbols", target.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rust_decimal_macros::dec;

    fn client(server: &mockito::ServerGuard) -> FrankfurterClient {
        FrankfurterClient::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    fn pair_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("base".into(), "USD".into()),
            Matcher::UrlEncoded("symbols".into(), "KRW".into()),
        ])
    }

    #[tokio::test]
    async fn test_fetch_day_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex("^/v1/2025-01-02".into()))
            .match_query(pair_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"amount":1.0,"base":"USD","date":"2025-01-02","rates":{"KRW":1470.5}}"#)
            .create_async()
            .await;

        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let response = client(&server)
            .fetch_day(date, &CurrencyCode::usd(), &CurrencyCode::krw())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.date, date);
        assert_eq!(response.rate_for(&CurrencyCode::krw()), Some(dec!(1470.5)));
        assert_eq!(response.rate_for(&CurrencyCode::usd()), None);
    }

    #[tokio::test]
    async fn test_fetch_day_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex("^/v1/2025-01-02".into()))
            .with_status(500)
            .create_async()
            .await;

        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let err = client(&server)
            .fetch_day(date, &CurrencyCode::usd(), &CurrencyCode::krw())
            .await
            .unwrap_err();

        assert!(err.is_upstream());
        assert!(matches!(err, DataError::UpstreamStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_range_open_ended() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/v1/2025-01-02\.\.".into()))
            .match_query(pair_query())
            .with_status(200)
            .with_body(
                r#"{"base":"USD","rates":{"2025-01-03":{"KRW":1465.2},"2025-01-02":{"KRW":1470.5}}}"#,
            )
            .create_async()
            .await;

        let start = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let response = client(&server)
            .fetch_range(start, None, &CurrencyCode::usd(), &CurrencyCode::krw())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.base.as_deref(), Some("USD"));
        let first = response.rates.keys().next().copied();
        assert_eq!(first, Some(start));
    }

    #[tokio::test]
    async fn test_fetch_latest() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex("^/v1/latest".into()))
            .match_query(pair_query())
            .with_status(200)
            .with_body(r#"{"amount":1.0,"base":"USD","date":"2025-01-10","rates":{"KRW":1472.1}}"#)
            .create_async()
            .await;

        let latest = client(&server)
            .fetch_latest(&CurrencyCode::usd(), &CurrencyCode::krw())
            .await
            .unwrap();

        assert_eq!(latest.base, CurrencyCode::usd());
        assert_eq!(latest.target, CurrencyCode::krw());
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(latest.rate, dec!(1472.1));
    }

    #[tokio::test]
    async fn test_fetch_latest_missing_target_rate() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex("^/v1/latest".into()))
            .with_status(200)
            .with_body(r#"{"amount":1.0,"base":"USD","date":"2025-01-10","rates":{}}"#)
            .create_async()
            .await;

        let err = client(&server)
            .fetch_latest(&CurrencyCode::usd(), &CurrencyCode::krw())
            .await
            .unwrap_err();

        assert!(matches!(err, DataError::InvalidData(_)));
    }
}
