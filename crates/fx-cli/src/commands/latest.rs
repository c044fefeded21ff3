//! 최신 환율 조회 (`fx latest`).

use anyhow::{Context, Result};
use fx_core::{FxConfig, LatestRate};
use fx_data::FrankfurterClient;

pub async fn run_latest(config: &FxConfig) -> Result<LatestRate> {
    let client = FrankfurterClient::from_config(&config.api)?;
    let latest = client
        .fetch_latest(&config.currency.base, &config.currency.target)
        .await
        .context("Could not retrieve exchange rates")?;

    println!(
        "{}: 1 {} = {} {}",
        latest.date.format("%Y-%m-%d"),
        latest.base,
        latest.rate,
        latest.target
    );
    Ok(latest)
}
