//! 환율 히스토리 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 최근 1년 차트 이미지 생성
//! fx plot -o usd_to_krw_chart.png --size 1400x700
//!
//! # 최근 60일 레코드 출력
//! fx show --days 60
//!
//! # 최신 환율
//! fx latest
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fx_cli::commands::{run_latest, run_plot, run_show, PlotArgs, ShowArgs};
use fx_core::{init_logging, FxConfig, LogConfig, DEFAULT_CONFIG_PATH};
use tracing::error;

#[derive(Parser)]
#[command(name = "fx")]
#[command(about = "Exchange rate history CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// 최근 기간 환율 차트 이미지 생성 (PNG)
    Plot(PlotArgs),

    /// 최근 기간 레코드 출력
    Show(ShowArgs),

    /// 최신 환율 조회
    Latest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = FxConfig::load(&cli.config)?;
    init_logging(LogConfig::from_settings(&config.logging))?;

    let result = match cli.command {
        Commands::Plot(args) => run_plot(&config, args).await.map(|path| {
            println!("Chart generated: {}", path.display());
        }),
        Commands::Show(args) => run_show(&config, args).await,
        Commands::Latest => run_latest(&config).await.map(|_| ()),
    };

    if let Err(ref e) = result {
        error!("{:#}", e);
    }
    result
}
