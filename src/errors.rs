use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("No usable forecast data: {0}")]
    NoData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A city/date whose evaluation window holds no readings.
///
/// Not an `AppError`: the day is dropped and the run carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Not enough data for city '{city}' on {date}")]
pub struct InsufficientData {
    pub city: String,
    pub date: NaiveDate,
}
