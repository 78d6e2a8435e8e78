//! Forecast document client.
//!
//! Each city has a static JSON document at `{base_url}/{city_id}-response.json`
//! holding several days of hourly readings.

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::cities::City;
use crate::errors::AppError;
use crate::models::{CityForecast, Condition, DayForecast, HourlyReading};

/// Client for the forecast document API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

// --- JSON response types ---

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    geo_object: Option<GeoObject>,
    forecasts: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    province: Option<Province>,
}

#[derive(Debug, Deserialize)]
struct Province {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: NaiveDate,
    #[serde(default)]
    hours: Vec<ForecastHour>,
}

#[derive(Debug, Deserialize)]
struct ForecastHour {
    hour: RawHour,
    temp: i32,
    condition: Condition,
}

/// The provider sends `"hour": "7"`; plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawHour {
    Number(i64),
    Text(String),
}

impl RawHour {
    fn to_hour(&self) -> Result<u8, String> {
        let hour = match self {
            RawHour::Number(n) => *n,
            RawHour::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid hour '{}'", s))?,
        };
        u8::try_from(hour)
            .ok()
            .filter(|h| *h <= 23)
            .ok_or_else(|| format!("hour {} out of range", hour))
    }
}

impl WeatherClient {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Fetch and parse the forecast document for one city.
    pub async fn get_forecast(&self, city: &City) -> Result<CityForecast, AppError> {
        let url = format!("{}/{}-response.json", self.base_url, city.api_id);

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| AppError::ExternalService(format!("Invalid User-Agent: {}", e)))?,
        );

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("request for {} failed: {}", city.name, e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::UnknownCity(city.name.clone()));
        }

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "forecast API returned HTTP {} for {}",
                response.status(),
                city.name
            )));
        }

        let body: ForecastResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("forecast JSON parse error for {}: {}", city.name, e))
        })?;

        Ok(into_city_forecast(&city.name, body))
    }
}

/// Convert the wire document into the typed forecast.
///
/// A day with an unreadable hour is dropped on its own; the rest of the
/// city's days are kept.
fn into_city_forecast(city: &str, body: ForecastResponse) -> CityForecast {
    let province = body
        .geo_object
        .and_then(|g| g.province)
        .and_then(|p| p.name);

    let mut days = Vec::with_capacity(body.forecasts.len());
    for day in body.forecasts {
        let hours: Result<Vec<HourlyReading>, String> = day
            .hours
            .into_iter()
            .map(|h| {
                Ok(HourlyReading {
                    hour: h.hour.to_hour()?,
                    temperature: h.temp,
                    condition: h.condition,
                })
            })
            .collect();

        match hours {
            Ok(hours) => days.push(DayForecast {
                date: day.date,
                hours,
            }),
            Err(e) => tracing::warn!(
                "Malformed hour for city '{}' on {}: {}, date excluded",
                city,
                day.date,
                e
            ),
        }
    }

    CityForecast {
        city: city.to_string(),
        province,
        days,
    }
}
