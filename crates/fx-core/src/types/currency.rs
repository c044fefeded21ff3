//! ISO 4217 통화 코드.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 3자리 대문자 통화 코드 (예: "USD", "KRW").
///
/// 파싱 시 대문자로 정규화되며, 영문 3자가 아니면 거부됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// 미국 달러.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    /// 대한민국 원.
    pub fn krw() -> Self {
        Self("KRW".to_string())
    }

    /// 코드 문자열 반환.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Self(code))
        } else {
            Err(CoreError::InvalidCurrency(s.to_string()))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let code: CurrencyCode = " krw ".parse().unwrap();
        assert_eq!(code, CurrencyCode::krw());
        assert_eq!(code.to_string(), "KRW");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!("US".parse::<CurrencyCode>().is_err());
        assert!("USDT".parse::<CurrencyCode>().is_err());
        assert!("U$D".parse::<CurrencyCode>().is_err());
        assert!("".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&CurrencyCode::usd()).unwrap();
        assert_eq!(json, "\"USD\"");

        let parsed: CurrencyCode = serde_json::from_str("\"jpy\"").unwrap();
        assert_eq!(parsed.as_str(), "JPY");
        assert!(serde_json::from_str::<CurrencyCode>("\"yen!\"").is_err());
    }
}
