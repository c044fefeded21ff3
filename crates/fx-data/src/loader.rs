//! 저장 파일 검증 및 조회 기간 필터.
//!
//! 저장 파일은 외부에서 편집될 수 있으므로 타입 역직렬화 대신
//! `serde_json::Value`를 단계적으로 검사하여 오류 종류를 구분합니다:
//!
//! | 상황 | 오류 |
//! |------|------|
//! | JSON 파싱 실패, `currency`가 배열이 아님, 값 타입 불일치 | [`LoadError::Malformed`] |
//! | 레코드에 `date` 또는 `currency` 누락 | [`LoadError::MissingField`] |
//!
//! 레코드가 하나도 없는 파일은 오류가 아니라 빈 시계열입니다.

use std::str::FromStr;

use chrono::NaiveDate;
use fx_core::{CurrencyCode, FilteredSeries, RateRecord, RateSeries, TrailingWindow};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::LoadError;

/// 저장 파일 바이트를 검증하여 시계열로 변환합니다.
///
/// `base`/`target`이 없으면 기본 통화쌍을 사용합니다.
pub fn parse_artifact(
    bytes: &[u8],
    default_base: &CurrencyCode,
    default_target: &CurrencyCode,
) -> Result<RateSeries, LoadError> {
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| LoadError::Malformed(format!("invalid JSON: {}", e)))?;

    let object = root
        .as_object()
        .ok_or_else(|| LoadError::Malformed("top-level value is not an object".to_string()))?;

    let base = currency_field(object.get("base"), "base", default_base)?;
    let target = currency_field(object.get("target"), "target", default_target)?;

    let entries = match object.get("currency") {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(LoadError::Malformed(
                "'currency' is not a list".to_string(),
            ))
        }
        None => {
            return Err(LoadError::Malformed(
                "'currency' key is missing".to_string(),
            ))
        }
    };

    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_record(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RateSeries::new(base, target, records))
}

/// 시계열에서 오늘 기준 조회 기간만 남깁니다.
pub fn filter_window(series: &RateSeries, window: TrailingWindow, today: NaiveDate) -> FilteredSeries {
    let (from, to) = window.bounds(today);
    series.between(from, to)
}

fn currency_field(
    value: Option<&Value>,
    name: &str,
    default: &CurrencyCode,
) -> Result<CurrencyCode, LoadError> {
    match value {
        None | Some(Value::Null) => Ok(default.clone()),
        Some(Value::String(code)) => code
            .parse()
            .map_err(|_| LoadError::Malformed(format!("'{}' is not a currency code: {}", name, code))),
        Some(other) => Err(LoadError::Malformed(format!(
            "'{}' must be a string, got {}",
            name, other
        ))),
    }
}

fn parse_record(index: usize, entry: &Value) -> Result<RateRecord, LoadError> {
    let object = entry.as_object().ok_or_else(|| {
        LoadError::Malformed(format!("record #{} is not an object", index))
    })?;

    let date = match object.get("date") {
        None | Some(Value::Null) => return Err(LoadError::MissingField { index, field: "date" }),
        Some(Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            LoadError::Malformed(format!("record #{} has unparseable date: {}", index, s))
        })?,
        Some(other) => {
            return Err(LoadError::Malformed(format!(
                "record #{} date must be a string, got {}",
                index, other
            )))
        }
    };

    let currency = match object.get("currency") {
        None | Some(Value::Null) => {
            return Err(LoadError::MissingField {
                index,
                field: "currency",
            })
        }
        Some(value) => parse_rate(value).ok_or_else(|| {
            LoadError::Malformed(format!("record #{} has non-numeric currency: {}", index, value))
        })?,
    };

    Ok(RateRecord::new(date, currency))
}

/// 숫자 또는 숫자 문자열을 환율로 변환합니다.
fn parse_rate(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}
