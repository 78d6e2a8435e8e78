use chrono::NaiveDate;
use serde::Deserialize;

/// Weather condition vocabulary of the forecast provider.
///
/// Matching is exact: `"Clear"` or `"clear "` deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Overcast,
    Drizzle,
    LightRain,
    Rain,
    ModerateRain,
    HeavyRain,
    ContinuousHeavyRain,
    Showers,
    WetSnow,
    LightSnow,
    Snow,
    SnowShowers,
    Hail,
    Thunderstorm,
    ThunderstormWithRain,
    ThunderstormWithHail,
    #[serde(other)]
    Unknown,
}

/// One hourly reading of a forecast day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyReading {
    /// Hour of day, 0–23
    pub hour: u8,
    pub temperature: i32,
    pub condition: Condition,
}

/// All hourly readings for one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub hours: Vec<HourlyReading>,
}

/// Parsed forecast for one city, as returned by the fetch step.
#[derive(Debug, Clone, PartialEq)]
pub struct CityForecast {
    /// Display name from the city table (not the provider's province name)
    pub city: String,
    /// Province name reported by the provider, for logging only
    pub province: Option<String>,
    pub days: Vec<DayForecast>,
}

/// Reduced statistics for one (city, date) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DayStat {
    pub city: String,
    pub date: NaiveDate,
    pub avg_temp: f64,
    pub good_hours: u32,
}
