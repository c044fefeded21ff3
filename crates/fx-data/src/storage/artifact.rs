//! JSON 저장 파일 (artifact).
//!
//! 형식:
//! ```json
//! {
//!   "base": "USD",
//!   "target": "KRW",
//!   "currency": [
//!     {"date": "2025-01-02", "currency": 1470.5}
//!   ]
//! }
//! ```
//!
//! 저장은 파일 전체를 덮어씁니다. 읽기와 쓰기가 겹치는 경우는 별도로 막지 않습니다.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use fx_core::{CurrencyCode, FilteredSeries, FxConfig, RateSeries, TrailingWindow};
use tracing::{debug, info};

use crate::error::{LoadError, Result};
use crate::loader::{filter_window, parse_artifact};

/// 환율 시계열 JSON 파일 저장소.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
    /// 파일에 통화쌍이 없을 때 사용할 기본값
    base: CurrencyCode,
    target: CurrencyCode,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>, base: CurrencyCode, target: CurrencyCode) -> Self {
        Self {
            path: path.into(),
            base,
            target,
        }
    }

    /// 전체 설정에서 생성합니다.
    pub fn from_config(config: &FxConfig) -> Self {
        Self::new(
            config.storage.artifact_path.clone(),
            config.currency.base.clone(),
            config.currency.target.clone(),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 파일 존재 여부.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// 시계열 전체를 파일에 씁니다 (2칸 들여쓰기).
    ///
    /// 상위 디렉토리가 없으면 생성합니다.
    pub async fn save(&self, series: &RateSeries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(series)?;
        tokio::fs::write(&self.path, bytes).await?;

        info!(
            path = %self.path.display(),
            records = series.len(),
            "Exchange rate history saved"
        );
        Ok(())
    }

    /// 파일을 읽어 검증된 시계열로 반환합니다.
    pub async fn load(&self) -> std::result::Result<RateSeries, LoadError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LoadError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(LoadError::Io(e)),
        };

        let series = parse_artifact(&bytes, &self.base, &self.target)?;
        debug!(path = %self.path.display(), records = series.len(), "Artifact loaded");
        Ok(series)
    }

    /// 파일을 읽어 조회 기간만 남긴 시계열을 반환합니다.
    pub async fn load_window(
        &self,
        window: TrailingWindow,
        today: NaiveDate,
    ) -> std::result::Result<FilteredSeries, LoadError> {
        let series = self.load().await?;
        Ok(filter_window(&series, window, today))
    }
}
