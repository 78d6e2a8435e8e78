use crate::cities::{default_cities, parse_cities, City};

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL the per-city forecast documents live under.
    pub api_url: String,
    pub user_agent: String,
    /// Maximum number of forecast requests in flight.
    pub fetch_concurrency: usize,
    /// Divisor for seasonal averages: the number of forecast days expected per city.
    pub expected_days: u32,
    pub report_path: String,
    pub cities: Vec<City>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| "https://code.s3.yandex.net/async-module".to_string()),
            user_agent: std::env::var("WEATHER_USER_AGENT")
                .unwrap_or_else(|_| "CityForecastRanker/0.1".to_string()),
            fetch_concurrency: std::env::var("FETCH_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .expect("FETCH_CONCURRENCY must be a valid usize")
                .max(1),
            expected_days: std::env::var("EXPECTED_DAYS")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<u32>()
                .expect("EXPECTED_DAYS must be a valid u32")
                .max(1),
            report_path: std::env::var("REPORT_PATH").unwrap_or_else(|_| "result.csv".to_string()),
            cities: match std::env::var("CITIES") {
                Ok(raw) => parse_cities(&raw).expect("CITIES must look like NAME=id,NAME=id"),
                Err(_) => default_cities(),
            },
        }
    }
}
