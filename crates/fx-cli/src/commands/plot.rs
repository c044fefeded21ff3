//! 환율 차트 이미지 생성 (`fx plot`).
//!
//! 저장 파일에서 최근 기간(기본 1년) 레코드를 읽어 PNG 라인 차트로 그립니다.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::Args;
use fx_core::{FilteredSeries, FxConfig, TrailingWindow};
use fx_data::ArtifactStore;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::path::{Path, PathBuf};
use tracing::info;

/// 라인 색상 (skyblue).
const LINE_COLOR: RGBColor = RGBColor(135, 206, 235);

#[derive(Debug, Args)]
pub struct PlotArgs {
    /// 출력 파일 경로 (기본값: {base}_to_{target}_chart.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 오늘 기준 최근 일수 (기본값: window.plot_days)
    #[arg(short, long)]
    pub days: Option<u32>,

    /// 이미지 크기 (WIDTHxHEIGHT)
    #[arg(long, default_value = "1400x700")]
    pub size: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("No data available for the period from {from} to {to}.")]
    NoData { from: NaiveDate, to: NaiveDate },
    #[error("Chart generation error: {0}")]
    ChartGeneration(String),
    #[error("Invalid size format: {0}. Expected format: WIDTHxHEIGHT")]
    InvalidSizeFormat(String),
}

/// 차트에 그릴 데이터와 라벨.
#[derive(Debug)]
pub struct ChartData {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub legend: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
    pub x_range: (DateTime<Utc>, DateTime<Utc>),
    pub y_range: (f64, f64),
}

impl ChartData {
    /// 기간 시계열에서 차트 데이터를 만듭니다. 레코드가 없으면 `NoData`.
    pub fn from_series(series: &FilteredSeries, window: TrailingWindow) -> Result<Self, ChartError> {
        if series.is_empty() {
            return Err(ChartError::NoData {
                from: series.from,
                to: series.to,
            });
        }

        let points: Vec<(DateTime<Utc>, f64)> = series
            .records
            .iter()
            .filter_map(|r| Some((to_datetime(r.date)?, r.currency.to_f64()?)))
            .collect();

        let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
        let y_range = calculate_value_range(&values)?;

        let x_range = match (to_datetime(series.from), to_datetime(series.to)) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(ChartError::ChartGeneration(
                    "Invalid time range".to_string(),
                ))
            }
        };

        let (base, target) = (&series.base, &series.target);
        Ok(Self {
            title: chart_title(series, window),
            x_desc: "Date".to_string(),
            y_desc: format!("Exchange Rate ({} / {})", target, base),
            legend: format!("{} to {} Rate", base, target),
            points,
            x_range,
            y_range,
        })
    }
}

pub async fn run_plot(config: &FxConfig, args: PlotArgs) -> Result<PathBuf> {
    let (width, height) = parse_size(&args.size)?;
    let window = match args.days {
        Some(days) => TrailingWindow::try_new(days).context("Invalid --days")?,
        None => config.window.plot(),
    };

    let store = ArtifactStore::from_config(config);
    let series = store
        .load_window(window, Local::now().date_naive())
        .await
        .with_context(|| format!("Failed to load '{}'", store.path().display()))?;

    let chart_data = ChartData::from_series(&series, window)?;

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&series));
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create output directory")?;
        }
    }

    generate_chart(&chart_data, &output_path, width, height)?;

    info!(
        path = %output_path.display(),
        points = chart_data.points.len(),
        "Chart generated"
    );
    Ok(output_path)
}

/// `{BASE} to {TARGET} Exchange Rate ({기간 이름}: {from} - {to})`
pub fn chart_title(series: &FilteredSeries, window: TrailingWindow) -> String {
    format!(
        "{} to {} Exchange Rate ({}: {} - {})",
        series.base,
        series.target,
        window.label(),
        series.from.format("%Y-%m-%d"),
        series.to.format("%Y-%m-%d")
    )
}

fn default_output_path(series: &FilteredSeries) -> PathBuf {
    PathBuf::from(format!(
        "{}_to_{}_chart.png",
        series.base.as_str().to_lowercase(),
        series.target.as_str().to_lowercase()
    ))
}

fn to_datetime(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

pub fn parse_size(size_str: &str) -> Result<(u32, u32), ChartError> {
    let parts: Vec<&str> = size_str.split('x').collect();
    if parts.len() != 2 {
        return Err(ChartError::InvalidSizeFormat(size_str.to_string()));
    }

    let width = parts[0]
        .parse::<u32>()
        .map_err(|_| ChartError::InvalidSizeFormat(size_str.to_string()))?;
    let height = parts[1]
        .parse::<u32>()
        .map_err(|_| ChartError::InvalidSizeFormat(size_str.to_string()))?;

    if width == 0 || height == 0 {
        return Err(ChartError::InvalidSizeFormat(size_str.to_string()));
    }

    Ok((width, height))
}

/// 값 범위에 10% 여백을 더합니다. 값이 모두 같으면 ±1.
pub fn calculate_value_range(values: &[f64]) -> Result<(f64, f64), ChartError> {
    let mut min_value = f64::INFINITY;
    let mut max_value = f64::NEG_INFINITY;

    for value in values {
        min_value = min_value.min(*value);
        max_value = max_value.max(*value);
    }

    if min_value == f64::INFINITY || max_value == f64::NEG_INFINITY {
        return Err(ChartError::ChartGeneration(
            "No valid data points found".to_string(),
        ));
    }

    let range = max_value - min_value;
    let padding = if range > 0.0 { range * 0.1 } else { 1.0 };

    Ok((min_value - padding, max_value + padding))
}

fn generate_chart(
    chart_data: &ChartData,
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<(), ChartError> {
    let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();

    root.fill(&WHITE)
        .map_err(|e| ChartError::ChartGeneration(format!("Failed to fill background: {}", e)))?;

    let (start_time, end_time) = chart_data.x_range;
    let (min_value, max_value) = chart_data.y_range;

    let mut chart = ChartBuilder::on(&root)
        .caption(&chart_data.title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(start_time..end_time, min_value..max_value)
        .map_err(|e| ChartError::ChartGeneration(format!("Failed to build chart: {}", e)))?;

    chart
        .configure_mesh()
        .x_desc(chart_data.x_desc.as_str())
        .y_desc(chart_data.y_desc.as_str())
        .x_labels(10)
        .x_label_formatter(&|x| x.format("%Y-%m-%d").to_string())
        .draw()
        .map_err(|e| ChartError::ChartGeneration(format!("Failed to configure mesh: {}", e)))?;

    chart
        .draw_series(LineSeries::new(
            chart_data.points.iter().map(|(time, value)| (*time, *value)),
            &LINE_COLOR,
        ))
        .map_err(|e| ChartError::ChartGeneration(format!("Failed to draw rate series: {}", e)))?
        .label(chart_data.legend.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE_COLOR));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .margin(10)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| ChartError::ChartGeneration(format!("Failed to draw legend: {}", e)))?;

    root.present()
        .map_err(|e| ChartError::ChartGeneration(format!("Failed to present chart: {}", e)))?;

    Ok(())
}
