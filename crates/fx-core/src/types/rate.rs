//! 환율 레코드 및 시계열 타입.
//!
//! - `RateRecord` - 일자별 환율 한 건
//! - `RateSeries` - 저장 파일(artifact)과 1:1로 대응하는 전체 시계열
//! - `FilteredSeries` - 조회 기간으로 잘라낸 시계열 (차트/API 응답용)
//! - `LatestRate` - 최신 단일 환율

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::currency::CurrencyCode;

/// 일자별 환율 레코드.
///
/// JSON 표현: `{"date": "YYYY-MM-DD", "currency": 1470.5}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// 기준 일자
    pub date: NaiveDate,
    /// 환율 (1 기준통화당 대상통화)
    #[serde(with = "rust_decimal::serde::float")]
    pub currency: Decimal,
}

impl RateRecord {
    /// 새 레코드를 생성합니다.
    pub fn new(date: NaiveDate, currency: Decimal) -> Self {
        Self { date, currency }
    }
}

/// 환율 시계열.
///
/// 필드 이름은 저장 파일 형식(`base`, `target`, `currency`)을 그대로 따릅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSeries {
    /// 기준 통화
    pub base: CurrencyCode,
    /// 대상 통화
    pub target: CurrencyCode,
    /// 일자 오름차순 레코드
    pub currency: Vec<RateRecord>,
}

impl RateSeries {
    /// 레코드 목록을 정규화하여 시계열을 생성합니다.
    ///
    /// - 일자 오름차순 정렬
    /// - 같은 일자가 여러 번 나오면 마지막 값 사용
    /// - 0 이하의 환율은 경고 후 제외
    pub fn new(
        base: CurrencyCode,
        target: CurrencyCode,
        records: impl IntoIterator<Item = RateRecord>,
    ) -> Self {
        let mut by_date = BTreeMap::new();
        for record in records {
            if record.currency <= Decimal::ZERO {
                tracing::warn!(
                    date = %record.date,
                    rate = %record.currency,
                    "Dropping non-positive rate"
                );
                continue;
            }
            by_date.insert(record.date, record.currency);
        }

        Self {
            base,
            target,
            currency: by_date
                .into_iter()
                .map(|(date, currency)| RateRecord { date, currency })
                .collect(),
        }
    }

    /// 레코드 수.
    pub fn len(&self) -> usize {
        self.currency.len()
    }

    /// 레코드가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.currency.is_empty()
    }

    /// 가장 오래된 레코드.
    pub fn first(&self) -> Option<&RateRecord> {
        self.currency.first()
    }

    /// 가장 최근 레코드.
    pub fn last(&self) -> Option<&RateRecord> {
        self.currency.last()
    }

    /// `[from, to]` 구간(양 끝 포함)의 레코드만 남긴 시계열을 반환합니다.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> FilteredSeries {
        let records = self
            .currency
            .iter()
            .filter(|r| r.date >= from && r.date <= to)
            .cloned()
            .collect();

        FilteredSeries {
            base: self.base.clone(),
            target: self.target.clone(),
            from,
            to,
            records,
        }
    }
}

/// 조회 기간으로 필터링된 시계열.
///
/// 직렬화 형식: `{"base": .., "target": .., "filtered_data": [..]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredSeries {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    /// 기간 시작일 (포함)
    #[serde(skip)]
    pub from: NaiveDate,
    /// 기간 종료일 (포함)
    #[serde(skip)]
    pub to: NaiveDate,
    #[serde(rename = "filtered_data")]
    pub records: Vec<RateRecord>,
}

impl FilteredSeries {
    /// 기간 내 레코드가 없는지 확인합니다 (empty-result).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 레코드 수.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 기간 내 (최저, 최고) 환율.
    pub fn min_max(&self) -> Option<(Decimal, Decimal)> {
        let mut iter = self.records.iter().map(|r| r.currency);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// 최신 단일 환율.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRate {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    /// 환율 기준 일자
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
}
