// City Forecast Ranker v0.1
use std::fs::File;
use std::io::BufWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cities;
mod config;
mod errors;
mod helpers;
mod models;
mod services;

use config::AppConfig;
use errors::AppError;
use services::pipeline::{self, PipelineSettings};
use services::reducer::EvaluationWindow;
use services::report::write_csv;
use services::weather_api::WeatherClient;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "city_forecast_ranker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    if let Err(e) = run(&config).await {
        tracing::error!("Forecast analysis failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: &AppConfig) -> Result<(), AppError> {
    let client = WeatherClient::new(&config.api_url, &config.user_agent);
    let settings = PipelineSettings {
        window: EvaluationWindow::default(),
        expected_days: config.expected_days,
        fetch_concurrency: config.fetch_concurrency,
    };

    tracing::info!(
        "Fetching forecasts for {} cities ({} at a time)",
        config.cities.len(),
        config.fetch_concurrency
    );
    let report = pipeline::run(&client, &config.cities, &settings).await?;

    let file = File::create(&config.report_path)?;
    write_csv(&report.table, BufWriter::new(file))?;
    tracing::info!(
        "Report with {} cities written to {} ({} excluded)",
        report.ranked.len(),
        config.report_path,
        report.failed_cities.len()
    );

    for agg in report.aggregation.cities.values() {
        if agg.totals.days < config.expected_days as usize {
            tracing::warn!(
                "{} has {} of {} expected days, its averages are penalized",
                agg.city,
                agg.totals.days,
                config.expected_days
            );
        }
    }

    println!("{}", report.recommendation);
    tracing::info!("{}", report.recommendation);
    Ok(())
}
