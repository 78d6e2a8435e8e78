//! Ranking, report table and recommendation.
//!
//! Ranks are dense over score groups: three cities tied for first all get
//! rank 1 and the next group gets rank 2.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use crate::errors::AppError;
use crate::helpers::{count_to_decimal_1dp, f64_to_decimal_1dp};
use crate::services::aggregator::Aggregation;

pub const CITY_HEADER: &str = "City/day";
pub const AVERAGE_HEADER: &str = "Average";
pub const RATING_HEADER: &str = "Rating";
pub const TEMPERATURE_LABEL: &str = "Temperature, avg";
pub const GOOD_HOURS_LABEL: &str = "Good-weather hours";

/// One city's ranked figures, rounded for output.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub city: String,
    pub rank: u32,
    pub avg_temp: BTreeMap<NaiveDate, Decimal>,
    pub seasonal_avg_temp: Decimal,
    pub good_hours: BTreeMap<NaiveDate, Decimal>,
    pub seasonal_avg_good_hours: Decimal,
}

/// Rows ready for a tabular sink; `header` and every row have the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Order cities by score, highest first.
///
/// Cities in a tie share a rank and are listed by name.
pub fn rank(aggregation: &Aggregation) -> Vec<RankedRow> {
    let mut ranked = Vec::with_capacity(aggregation.cities.len());

    for (index, cities) in aggregation.ratings.values().rev().enumerate() {
        let rank = index as u32 + 1;
        for city in cities {
            let Some(agg) = aggregation.cities.get(city) else {
                tracing::warn!("Rated city {} has no aggregate, skipping", city);
                continue;
            };
            ranked.push(RankedRow {
                city: agg.city.clone(),
                rank,
                avg_temp: agg
                    .per_date
                    .iter()
                    .map(|(d, e)| (*d, f64_to_decimal_1dp(e.avg_temp)))
                    .collect(),
                seasonal_avg_temp: f64_to_decimal_1dp(agg.seasonal_avg_temp),
                good_hours: agg
                    .per_date
                    .iter()
                    .map(|(d, e)| (*d, count_to_decimal_1dp(e.good_hours)))
                    .collect(),
                seasonal_avg_good_hours: f64_to_decimal_1dp(agg.seasonal_avg_good_hours),
            });
        }
    }

    ranked
}

/// Build the report table: a temperature row and a good-hours row per city.
///
/// Date columns are the union of all cities' dates; a city without a date
/// gets an empty cell.
pub fn build_table(ranked: &[RankedRow]) -> ReportTable {
    let dates: BTreeSet<NaiveDate> = ranked
        .iter()
        .flat_map(|r| r.avg_temp.keys().copied())
        .collect();

    let mut header = vec![CITY_HEADER.to_string(), String::new()];
    header.extend(dates.iter().map(|d| d.format("%Y-%m-%d").to_string()));
    header.push(AVERAGE_HEADER.to_string());
    header.push(RATING_HEADER.to_string());

    let cells = |values: &BTreeMap<NaiveDate, Decimal>| -> Vec<String> {
        dates
            .iter()
            .map(|d| values.get(d).map(|v| v.to_string()).unwrap_or_default())
            .collect()
    };

    let mut rows = Vec::with_capacity(ranked.len() * 2);
    for row in ranked {
        let mut temp_row = vec![row.city.clone(), TEMPERATURE_LABEL.to_string()];
        temp_row.extend(cells(&row.avg_temp));
        temp_row.push(row.seasonal_avg_temp.to_string());
        temp_row.push(row.rank.to_string());
        rows.push(temp_row);

        let mut hours_row = vec![String::new(), GOOD_HOURS_LABEL.to_string()];
        hours_row.extend(cells(&row.good_hours));
        hours_row.push(row.seasonal_avg_good_hours.to_string());
        hours_row.push(String::new());
        rows.push(hours_row);
    }

    ReportTable { header, rows }
}

/// Every city with rank 1, in table order.
pub fn best_cities(ranked: &[RankedRow]) -> Vec<&str> {
    ranked
        .iter()
        .filter(|r| r.rank == 1)
        .map(|r| r.city.as_str())
        .collect()
}

/// Human-readable recommendation; `None` when nothing was ranked.
pub fn recommendation(ranked: &[RankedRow]) -> Option<String> {
    match best_cities(ranked).as_slice() {
        [] => None,
        [city] => Some(format!("Recommended city to visit: {}", city)),
        cities => Some(format!("Recommended cities to visit: {}", cities.join(", "))),
    }
}

/// Write the table as CSV.
pub fn write_csv<W: Write>(table: &ReportTable, writer: W) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.header)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
