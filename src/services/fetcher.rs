//! Concurrent per-city forecast fetching.
//!
//! Every city gets exactly one attempt. Requests run on a bounded pool
//! (`buffer_unordered`), a failing city never cancels its siblings, and the
//! call returns only once every city has either a forecast or an error.

use futures::stream::{self, StreamExt};

use crate::cities::City;
use crate::errors::AppError;
use crate::models::CityForecast;
use crate::services::weather_api::WeatherClient;

/// Result of the single fetch attempt for one city.
#[derive(Debug)]
pub struct FetchOutcome {
    pub city: String,
    pub result: Result<CityForecast, AppError>,
}

/// Fetch every city's forecast with at most `concurrency` requests in flight.
///
/// The returned outcomes are sorted by city name, so nothing downstream can
/// observe completion order.
pub async fn fetch_all(
    client: &WeatherClient,
    cities: &[City],
    concurrency: usize,
) -> Vec<FetchOutcome> {
    let mut outcomes: Vec<FetchOutcome> = stream::iter(cities.iter().cloned())
        .map(|city| {
            let client = client.clone();
            async move {
                let result = client.get_forecast(&city).await;
                match &result {
                    Ok(forecast) => tracing::info!(
                        "Fetched forecast for {} ({}, {} days)",
                        city.name,
                        forecast.province.as_deref().unwrap_or("unknown province"),
                        forecast.days.len()
                    ),
                    Err(e) => tracing::error!("Fetching forecast for {} failed: {}", city.name, e),
                }
                FetchOutcome {
                    city: city.name,
                    result,
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    outcomes.sort_by(|a, b| a.city.cmp(&b.city));
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn document(temp: i32) -> serde_json::Value {
        serde_json::json!({
            "forecasts": [
                { "date": "2022-05-26", "hours": [{ "hour": "12", "temp": temp, "condition": "clear" }] }
            ]
        })
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/paris-response.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document(20)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/roma-response.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document(25)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cairo-response.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = WeatherClient::new(&server.uri(), "test-agent");
        let cities = vec![
            City::new("ROMA", "roma"),
            City::new("CAIRO", "cairo"),
            City::new("PARIS", "paris"),
        ];

        let outcomes = fetch_all(&client, &cities, 2).await;

        let names: Vec<&str> = outcomes.iter().map(|o| o.city.as_str()).collect();
        assert_eq!(names, vec!["CAIRO", "PARIS", "ROMA"]);
        assert!(outcomes[0].result.is_err());
        assert!(outcomes[1].result.is_ok());
        assert!(outcomes[2].result.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_all_one_request_per_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = WeatherClient::new(&server.uri(), "test-agent");
        let cities = vec![
            City::new("A", "a"),
            City::new("B", "b"),
            City::new("C", "c"),
        ];

        // Zero is clamped to a pool of one.
        let outcomes = fetch_all(&client, &cities, 0).await;
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.result.is_err()));
    }

    #[tokio::test]
    async fn test_fetch_all_empty() {
        let client = WeatherClient::new("http://127.0.0.1:9", "test-agent");
        assert!(fetch_all(&client, &[], 4).await.is_empty());
    }
}
