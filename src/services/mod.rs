pub mod aggregator;
pub mod fetcher;
pub mod pipeline;
pub mod reducer;
pub mod report;
pub mod weather_api;
