//! 설정 관리.
//!
//! 기본값 → 설정 파일(TOML, 선택) → 환경 변수(`FX__SECTION__KEY`) 순서로
//! 덮어쓰며 설정을 로드합니다.
//!
//! ```toml
//! [currency]
//! base = "USD"
//! target = "KRW"
//!
//! [storage]
//! artifact_path = "USD_TO_KRW.json"
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::types::{CurrencyCode, TrailingWindow};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FxConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 통화쌍 설정
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// 저장 파일 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 조회 기간 설정
    #[serde(default)]
    pub window: WindowConfig,
    /// 환율 API 설정
    #[serde(default)]
    pub api: RateApiConfig,
    /// 수집기 설정
    #[serde(default)]
    pub collector: CollectorConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 정적 파일 디렉토리
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            static_dir: PathBuf::from("static"),
        }
    }
}

/// 통화쌍 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrencyConfig {
    /// 기준 통화
    pub base: CurrencyCode,
    /// 대상 통화
    pub target: CurrencyCode,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base: CurrencyCode::usd(),
            target: CurrencyCode::krw(),
        }
    }
}

/// 저장 파일 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// 환율 시계열 JSON 파일 경로
    pub artifact_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("USD_TO_KRW.json"),
        }
    }
}

/// 조회 기간 설정 (일 단위).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    /// 차트 페이지/원본 데이터 API 기본 기간
    pub window_days: u32,
    /// 차트 이미지 기본 기간
    pub plot_days: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_days: TrailingWindow::SIXTY_DAYS.days(),
            plot_days: TrailingWindow::YEAR.days(),
        }
    }
}

impl WindowConfig {
    /// 차트 페이지용 기간.
    pub fn page(&self) -> TrailingWindow {
        TrailingWindow::new(self.window_days)
    }

    /// 차트 이미지용 기간.
    pub fn plot(&self) -> TrailingWindow {
        TrailingWindow::new(self.plot_days)
    }
}

/// 환율 API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateApiConfig {
    /// API 기본 URL (경로 `/v1/...` 앞부분)
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 일별 수집 시 요청 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
}

impl Default for RateApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.frankfurter.dev".to_string(),
            timeout_secs: 30,
            request_delay_ms: 200,
        }
    }
}

impl RateApiConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 요청 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 수집기 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectorConfig {
    /// 수집 시작일 (시작일 미지정 시 사용)
    pub history_start: NaiveDate,
    /// 데몬 모드 실행 주기 (분 단위)
    pub interval_minutes: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            history_start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            interval_minutes: 24 * 60,
        }
    }
}

impl CollectorConfig {
    /// 데몬 실행 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl FxConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("server.host", defaults.server.host.clone())?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.static_dir", path_string(&defaults.server.static_dir))?
            .set_default("currency.base", defaults.currency.base.to_string())?
            .set_default("currency.target", defaults.currency.target.to_string())?
            .set_default(
                "storage.artifact_path",
                path_string(&defaults.storage.artifact_path),
            )?
            .set_default("window.window_days", i64::from(defaults.window.window_days))?
            .set_default("window.plot_days", i64::from(defaults.window.plot_days))?
            .set_default("api.base_url", defaults.api.base_url.clone())?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?
            .set_default("api.request_delay_ms", defaults.api.request_delay_ms)?
            .set_default(
                "collector.history_start",
                defaults.collector.history_start.to_string(),
            )?
            .set_default(
                "collector.interval_minutes",
                defaults.collector.interval_minutes,
            )?
            .set_default("logging.level", defaults.logging.level.clone())?
            .set_default("logging.format", defaults.logging.format.clone())?
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("FX")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 설정 값 검증.
    pub fn validate(&self) -> CoreResult<()> {
        if self.currency.base == self.currency.target {
            return Err(CoreError::Config(format!(
                "기준 통화와 대상 통화가 같습니다: {}",
                self.currency.base
            )));
        }
        for (key, days) in [
            ("window.window_days", self.window.window_days),
            ("window.plot_days", self.window.plot_days),
        ] {
            TrailingWindow::try_new(days)
                .map_err(|e| CoreError::Config(format!("{}: {}", key, e)))?;
        }
        if self.api.base_url.trim().is_empty() {
            return Err(CoreError::Config("api.base_url이 비어 있습니다".to_string()));
        }
        if self.collector.interval_minutes == 0 {
            return Err(CoreError::Config(
                "collector.interval_minutes는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
