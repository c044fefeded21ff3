//! 최근 기간 레코드 출력 (`fx show`).

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, ValueEnum};
use fx_core::{FilteredSeries, FxConfig, TrailingWindow};
use fx_data::ArtifactStore;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// 표 형식
    #[default]
    Table,
    /// `{base, target, filtered_data}` JSON
    Json,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// 오늘 기준 최근 일수 (기본값: window.window_days)
    #[arg(short, long)]
    pub days: Option<u32>,

    /// 출력 형식
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

pub async fn run_show(config: &FxConfig, args: ShowArgs) -> Result<()> {
    let window = match args.days {
        Some(days) => TrailingWindow::try_new(days).context("Invalid --days")?,
        None => config.window.page(),
    };

    let store = ArtifactStore::from_config(config);
    let series = store
        .load_window(window, Local::now().date_naive())
        .await
        .with_context(|| format!("Failed to load '{}'", store.path().display()))?;

    match args.format {
        OutputFormat::Table => print!("{}", format_table(&series, window)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&series)?),
    }

    Ok(())
}

/// 표 형식 문자열.
pub fn format_table(series: &FilteredSeries, window: TrailingWindow) -> String {
    let mut out = format!(
        "{} to {} ({}: {} - {})\n",
        series.base,
        series.target,
        window.label(),
        series.from.format("%Y-%m-%d"),
        series.to.format("%Y-%m-%d")
    );

    if series.is_empty() {
        out.push_str("No data available for this period.\n");
        return out;
    }

    out.push_str(&format!("{:<12} {:>12}\n", "DATE", series.target.as_str()));
    out.push_str(&format!("{}\n", "-".repeat(25)));
    for record in &series.records {
        out.push_str(&format!(
            "{:<12} {:>12}\n",
            record.date.format("%Y-%m-%d").to_string(),
            record.currency.to_string()
        ));
    }

    if let Some((low, high)) = series.min_max() {
        out.push_str(&format!("{}\n", "-".repeat(25)));
        out.push_str(&format!(
            "records: {}, low: {}, high: {}\n",
            series.len(),
            low,
            high
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fx_core::{CurrencyCode, RateRecord, RateSeries};
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_format_table() {
        let series = RateSeries::new(
            CurrencyCode::usd(),
            CurrencyCode::krw(),
            vec![
                RateRecord::new(date("2025-01-02"), dec!(1470.5)),
                RateRecord::new(date("2025-01-03"), dec!(1465.2)),
            ],
        )
        .between(date("2024-11-11"), date("2025-01-10"));

        let table = format_table(&series, TrailingWindow::SIXTY_DAYS);

        assert!(table.starts_with("USD to KRW (Last 60 Days: 2024-11-11 - 2025-01-10)\n"));
        assert!(table.contains("2025-01-02         1470.5"));
        assert!(table.contains("records: 2, low: 1465.2, high: 1470.5"));
    }

    #[test]
    fn test_format_table_empty() {
        let series = RateSeries::new(CurrencyCode::usd(), CurrencyCode::krw(), vec![])
            .between(date("2024-11-11"), date("2025-01-10"));

        let table = format_table(&series, TrailingWindow::SIXTY_DAYS);
        assert!(table.contains("No data available"));
    }

    #[tokio::test]
    async fn test_run_show_rejects_oversized_days() {
        let args = ShowArgs {
            days: Some(4_000_000_000),
            format: OutputFormat::Json,
        };

        let err = run_show(&FxConfig::default(), args).await.unwrap_err();
        assert!(err.to_string().contains("--days"));
    }
}
