//! fetch → reduce → aggregate → rank.
//!
//! Only the fetch phase is concurrent. Each later stage starts after the
//! previous one has finished for every city.

use crate::cities::City;
use crate::errors::AppError;
use crate::models::CityForecast;
use crate::services::aggregator::{Aggregation, Aggregator};
use crate::services::fetcher::fetch_all;
use crate::services::reducer::{reduce_city, EvaluationWindow};
use crate::services::report::{build_table, rank, recommendation, RankedRow, ReportTable};
use crate::services::weather_api::WeatherClient;

/// Tunables for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub window: EvaluationWindow,
    pub expected_days: u32,
    pub fetch_concurrency: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct Report {
    pub aggregation: Aggregation,
    pub ranked: Vec<RankedRow>,
    pub table: ReportTable,
    pub recommendation: String,
    /// Cities whose fetch failed and were left out of the report.
    pub failed_cities: Vec<String>,
}

/// Reduce, aggregate and rank already-fetched forecasts.
///
/// Fails with `AppError::NoData` when no city has a single usable day.
pub async fn analyze(
    forecasts: &[CityForecast],
    settings: &PipelineSettings,
) -> Result<Report, AppError> {
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();

    let sent: usize = forecasts
        .iter()
        .map(|forecast| reduce_city(forecast, settings.window, &sender))
        .sum();
    drop(sender);

    let mut aggregator = Aggregator::new();
    let received = aggregator.drain(&mut receiver).await;
    tracing::info!(
        "Reduced {} cities to {} day statistics ({} aggregated)",
        forecasts.len(),
        sent,
        received
    );

    let aggregation = aggregator.finalize(settings.expected_days);
    if aggregation.is_empty() {
        return Err(AppError::NoData(format!(
            "none of {} fetched cities had a day with readings in the evaluation window",
            forecasts.len()
        )));
    }

    let ranked = rank(&aggregation);
    let table = build_table(&ranked);
    let recommendation = recommendation(&ranked)
        .ok_or_else(|| AppError::NoData("no city could be ranked".to_string()))?;

    Ok(Report {
        aggregation,
        ranked,
        table,
        recommendation,
        failed_cities: Vec::new(),
    })
}

/// Fetch every city, drop the failures, then analyze the rest.
pub async fn run(
    client: &WeatherClient,
    cities: &[City],
    settings: &PipelineSettings,
) -> Result<Report, AppError> {
    let outcomes = fetch_all(client, cities, settings.fetch_concurrency).await;

    let mut forecasts = Vec::with_capacity(outcomes.len());
    let mut failed_cities = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(forecast) => forecasts.push(forecast),
            Err(_) => failed_cities.push(outcome.city),
        }
    }

    if !failed_cities.is_empty() {
        tracing::warn!(
            "{} of {} cities excluded after fetch failures: {}",
            failed_cities.len(),
            cities.len(),
            failed_cities.join(", ")
        );
    }

    if forecasts.is_empty() {
        return Err(AppError::NoData(format!(
            "all {} city fetches failed",
            cities.len()
        )));
    }

    let mut report = analyze(&forecasts, settings).await?;
    report.failed_cities = failed_cities;
    Ok(report)
}
