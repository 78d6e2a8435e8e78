//! Per-day reduction of hourly readings.
//!
//! Only daytime hours count: an hour is in the evaluation window when
//! `min_hour < hour <= max_hour`. A day with no hour in the window produces
//! no `DayStat` at all.

use tokio::sync::mpsc::UnboundedSender;

use crate::errors::InsufficientData;
use crate::models::{CityForecast, Condition, DayForecast, DayStat};

/// Exclusive lower bound of the evaluation window.
pub const MIN_HOUR: u8 = 8;

/// Inclusive upper bound of the evaluation window.
pub const MAX_HOUR: u8 = 19;

/// Precipitation-free conditions.
pub const GOOD_WEATHER: &[Condition] = &[
    Condition::Clear,
    Condition::PartlyCloudy,
    Condition::Cloudy,
    Condition::Overcast,
];

/// Hour range whose readings count towards the daily statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationWindow {
    /// Exclusive
    pub min_hour: u8,
    /// Inclusive
    pub max_hour: u8,
}

impl Default for EvaluationWindow {
    fn default() -> Self {
        Self {
            min_hour: MIN_HOUR,
            max_hour: MAX_HOUR,
        }
    }
}

impl EvaluationWindow {
    pub fn contains(&self, hour: u8) -> bool {
        self.min_hour < hour && hour <= self.max_hour
    }
}

pub fn is_good_weather(condition: Condition) -> bool {
    GOOD_WEATHER.contains(&condition)
}

/// Reduce one city's day to its average window temperature and good-hour count.
pub fn reduce_day(
    city: &str,
    day: &DayForecast,
    window: EvaluationWindow,
) -> Result<DayStat, InsufficientData> {
    let mut temp_sum: i64 = 0;
    let mut count: u32 = 0;
    let mut good_hours: u32 = 0;

    for reading in day.hours.iter().filter(|r| window.contains(r.hour)) {
        temp_sum += i64::from(reading.temperature);
        count += 1;
        if is_good_weather(reading.condition) {
            good_hours += 1;
        }
    }

    if count == 0 {
        return Err(InsufficientData {
            city: city.to_string(),
            date: day.date,
        });
    }

    Ok(DayStat {
        city: city.to_string(),
        date: day.date,
        avg_temp: temp_sum as f64 / f64::from(count),
        good_hours,
    })
}

/// Reduce every day of a city's forecast and stream the results to the aggregator.
///
/// Excluded days are logged and skipped. Returns the number of `DayStat`s sent.
pub fn reduce_city(
    forecast: &CityForecast,
    window: EvaluationWindow,
    sender: &UnboundedSender<DayStat>,
) -> usize {
    let mut sent = 0;
    for day in &forecast.days {
        match reduce_day(&forecast.city, day, window) {
            Ok(stat) => {
                if sender.send(stat).is_err() {
                    tracing::error!(
                        "Aggregator channel closed while reducing {}",
                        forecast.city
                    );
                    break;
                }
                sent += 1;
            }
            Err(e) => tracing::warn!("{}, date excluded", e),
        }
    }
    tracing::debug!(
        "Reduced {}: {} of {} days kept",
        forecast.city,
        sent,
        forecast.days.len()
    );
    sent
}
