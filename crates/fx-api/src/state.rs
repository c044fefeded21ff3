//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use fx_core::FxConfig;
use fx_data::{ArtifactStore, FrankfurterClient, HistoryFetcher};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 전체 설정
    pub config: Arc<FxConfig>,

    /// 최신 환율 조회용 클라이언트
    pub client: FrankfurterClient,

    /// 히스토리 수집기 (갱신 요청용)
    pub fetcher: HistoryFetcher,

    /// 저장 파일
    pub store: ArtifactStore,

    /// 갱신 실행 가드 - 동시에 하나의 갱신만 허용
    pub refresh_lock: Arc<Mutex<()>>,

    /// 서버 종료 토큰 (진행 중인 일별 갱신 중단용)
    pub shutdown: CancellationToken,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 설정으로부터 상태를 생성합니다.
    pub fn new(config: FxConfig) -> fx_data::Result<Self> {
        let fetcher = HistoryFetcher::from_config(&config)?;
        let store = ArtifactStore::from_config(&config);

        Ok(Self {
            client: fetcher.client().clone(),
            fetcher,
            store,
            config: Arc::new(config),
            refresh_lock: Arc::new(Mutex::new(())),
            shutdown: CancellationToken::new(),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 종료 토큰을 지정합니다.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 조회 기간 계산 기준일 (로컬 날짜).
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// 갱신이 진행 중인지 확인합니다.
    pub fn is_refreshing(&self) -> bool {
        self.refresh_lock.try_lock().is_err()
    }
}

/// 테스트용 상태 생성.
///
/// `api_base_url`은 mock 서버 주소, `dir`은 저장 파일을 둘 디렉토리입니다.
#[cfg(test)]
pub fn create_test_state(api_base_url: &str, dir: &std::path::Path) -> AppState {
    let mut config = FxConfig::default();
    config.api.base_url = api_base_url.to_string();
    config.api.timeout_secs = 5;
    config.api.request_delay_ms = 0;
    config.storage.artifact_path = dir.join("USD_TO_KRW.json");
    config.server.static_dir = dir.join("static");

    AppState::new(config).unwrap()
}
