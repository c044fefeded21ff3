//! Standalone exchange-rate collector CLI.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use fx_collector::{refresh_bulk, refresh_daily, CollectorError};
use fx_core::{init_logging, FxConfig, LogConfig, DEFAULT_CONFIG_PATH};
use fx_data::{ArtifactStore, HistoryFetcher};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "fx-collector")]
#[command(about = "Exchange Rate History Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 로그 레벨 (trace, debug, info, warn, error). 설정 파일보다 우선
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 영업일마다 한 번씩 요청하여 히스토리 갱신
    FetchDaily {
        /// 시작일 (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// 종료일 (YYYY-MM-DD, 기본값: 오늘)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// 기간 전체를 한 번에 요청하여 히스토리 갱신
    FetchBulk {
        /// 시작일 (기본값: collector.history_start)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// 종료일 (기본값: 최신)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// 데몬 모드: 주기적으로 일괄 갱신 실행
    Daemon,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 설정 로드
    let config = FxConfig::load(&cli.config)?;

    // 로깅 초기화
    let mut log_config = LogConfig::from_settings(&config.logging);
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    init_logging(log_config)?;

    tracing::info!("FX Collector 시작");
    tracing::debug!(
        artifact = %config.storage.artifact_path.display(),
        api = %config.api.base_url,
        "설정 로드 완료"
    );

    let fetcher = HistoryFetcher::from_config(&config).map_err(CollectorError::Fetch)?;
    let store = ArtifactStore::from_config(&config);

    // Ctrl-C 시 진행 중인 일별 수집 중단
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("종료 신호 수신");
            signal_token.cancel();
        }
    });

    match cli.command {
        Commands::FetchDaily { from, to } => {
            let to = to.unwrap_or_else(|| Local::now().date_naive());
            let stats = refresh_daily(&fetcher, &store, from, to, &cancel).await?;
            stats.log_summary("일별 수집");
        }
        Commands::FetchBulk { from, to } => {
            let from = from.unwrap_or(config.collector.history_start);
            let stats = refresh_bulk(&fetcher, &store, from, to).await?;
            stats.log_summary("일괄 수집");
        }
        Commands::Daemon => {
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.collector.interval_minutes
            );

            let mut interval = tokio::time::interval(config.collector.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        tracing::info!("=== 갱신 실행 시작 ===");

                        match refresh_bulk(&fetcher, &store, config.collector.history_start, None).await {
                            Ok(stats) => {
                                stats.log_summary("일괄 수집");
                            }
                            Err(e) => {
                                tracing::error!("일괄 수집 실패: {}", e);
                            }
                        }

                        tracing::info!(
                            "=== 갱신 완료, 다음 실행: {}분 후 ===",
                            config.collector.interval_minutes
                        );
                    }
                }
            }
        }
    }

    tracing::info!("FX Collector 종료");

    Ok(())
}
