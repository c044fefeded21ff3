//! 조회 기간 (오늘 기준 최근 N일).

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// 오늘 기준 최근 N일 구간 `[today - days, today]` (양 끝 포함).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingWindow {
    days: u32,
}

impl TrailingWindow {
    /// 최근 1년 (차트 이미지 기본값).
    pub const YEAR: Self = Self { days: 365 };

    /// 최근 60일 (차트 페이지 기본값).
    pub const SIXTY_DAYS: Self = Self { days: 60 };

    /// 허용되는 최대 일수 (약 100년).
    pub const MAX_DAYS: u32 = 36_500;

    pub fn new(days: u32) -> Self {
        Self { days }
    }

    /// 사용자 입력 일수를 검증하여 생성합니다. `1..=MAX_DAYS`만 허용.
    pub fn try_new(days: u32) -> CoreResult<Self> {
        if days == 0 || days > Self::MAX_DAYS {
            return Err(CoreError::InvalidInput(format!(
                "days must be between 1 and {}, got {}",
                Self::MAX_DAYS,
                days
            )));
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// 주어진 오늘 날짜 기준 (시작일, 종료일).
    ///
    /// 시작일이 표현 범위를 벗어나면 `NaiveDate::MIN`으로 고정됩니다.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let from = today
            .checked_sub_days(Days::new(u64::from(self.days)))
            .unwrap_or(NaiveDate::MIN);
        (from, today)
    }

    /// 차트 제목 등에 쓰이는 기간 이름.
    pub fn label(&self) -> String {
        match self.days {
            365 => "Last Year".to_string(),
            1 => "Last Day".to_string(),
            n => format!("Last {} Days", n),
        }
    }
}

impl Default for TrailingWindow {
    fn default() -> Self {
        Self::SIXTY_DAYS
    }
}
