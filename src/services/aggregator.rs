//! Cross-city grouping, seasonal averages and scoring.
//!
//! The aggregator is the single consumer of the `DayStat` channel. It is a
//! commutative fold keyed by (city, date): arrival order never changes the
//! finalized result.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::models::DayStat;

/// Statistics for one retained day of a city.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub avg_temp: f64,
    pub good_hours: u32,
}

/// Sums across all retained days of a city.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningTotals {
    pub avg_temp: f64,
    pub good_hours: u32,
    pub days: usize,
}

/// Finalized per-city result.
#[derive(Debug, Clone, PartialEq)]
pub struct CityAggregate {
    pub city: String,
    pub per_date: BTreeMap<NaiveDate, DayEntry>,
    pub totals: RunningTotals,
    pub seasonal_avg_temp: f64,
    pub seasonal_avg_good_hours: f64,
    pub score: i64,
}

/// Output of the aggregation stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    pub cities: BTreeMap<String, CityAggregate>,
    /// score → cities sharing it
    pub ratings: BTreeMap<i64, BTreeSet<String>>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

/// Absorbs binary representation error before flooring (`0.57 * 100.0` is `56.99999999999999`).
const SCORE_EPSILON: f64 = 1e-9;

/// Sortable rating: temperature dominates, good hours break near-ties.
pub fn score(seasonal_avg_temp: f64, seasonal_avg_good_hours: f64) -> i64 {
    (seasonal_avg_temp * 100.0 + seasonal_avg_good_hours + SCORE_EPSILON).floor() as i64
}

/// Accumulates `DayStat`s grouped by city.
#[derive(Debug, Default)]
pub struct Aggregator {
    cities: HashMap<String, BTreeMap<NaiveDate, DayEntry>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stat: DayStat) {
        let per_date = self.cities.entry(stat.city.clone()).or_default();
        let entry = DayEntry {
            avg_temp: stat.avg_temp,
            good_hours: stat.good_hours,
        };
        if per_date.insert(stat.date, entry).is_some() {
            tracing::warn!(
                "Duplicate statistics for {} on {}, keeping the latest",
                stat.city,
                stat.date
            );
        }
    }

    /// Consume the channel until every producer has dropped its sender.
    pub async fn drain(&mut self, receiver: &mut UnboundedReceiver<DayStat>) -> usize {
        let mut received = 0;
        while let Some(stat) = receiver.recv().await {
            self.push(stat);
            received += 1;
        }
        received
    }

    /// Compute seasonal averages and scores.
    ///
    /// Sums are divided by `expected_days`, not by the number of days a city
    /// actually has, so missing days pull a city's averages down.
    pub fn finalize(self, expected_days: u32) -> Aggregation {
        let divisor = f64::from(expected_days.max(1));
        let mut aggregation = Aggregation::default();

        for (city, per_date) in self.cities {
            // Summed in date order so the float result is independent of arrival order.
            let totals = per_date.values().fold(RunningTotals::default(), |acc, e| {
                RunningTotals {
                    avg_temp: acc.avg_temp + e.avg_temp,
                    good_hours: acc.good_hours + e.good_hours,
                    days: acc.days + 1,
                }
            });
            let seasonal_avg_temp = totals.avg_temp / divisor;
            let seasonal_avg_good_hours = f64::from(totals.good_hours) / divisor;
            let score = score(seasonal_avg_temp, seasonal_avg_good_hours);
            tracing::debug!(
                "{}: {} days, seasonal temp {:.2}, good hours {:.2}, score {}",
                city,
                totals.days,
                seasonal_avg_temp,
                seasonal_avg_good_hours,
                score
            );

            aggregation
                .ratings
                .entry(score)
                .or_default()
                .insert(city.clone());
            aggregation.cities.insert(
                city.clone(),
                CityAggregate {
                    city,
                    per_date,
                    totals,
                    seasonal_avg_temp,
                    seasonal_avg_good_hours,
                    score,
                },
            );
        }

        aggregation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(city: &str, day: u32, avg_temp: f64, good_hours: u32) -> DayStat {
        DayStat {
            city: city.to_string(),
            date: NaiveDate::from_ymd_opt(2022, 5, day).unwrap(),
            avg_temp,
            good_hours,
        }
    }

    fn aggregate(stats: &[DayStat], expected_days: u32) -> Aggregation {
        let mut aggregator = Aggregator::new();
        for s in stats {
            aggregator.push(s.clone());
        }
        aggregator.finalize(expected_days)
    }

    #[test]
    fn test_score() {
        assert_eq!(score(15.0, 2.0), 1502);
        assert_eq!(score(14.999, 0.5), 1500);
        // floor, not truncation
        assert_eq!(score(-0.5, 0.2), -50);
    }

    #[test]
    fn test_score_ignores_float_noise() {
        assert_eq!(score(0.57, 0.0), 57);
        assert_eq!(score(1.15, 0.0), 115);
        assert_eq!(score(15.0, 1.999), 1501);
    }

    #[test]
    fn test_seasonal_averages_use_fixed_divisor() {
        let result = aggregate(&[stat("A", 26, 10.0, 1), stat("A", 27, 20.0, 3)], 4);
        let a = &result.cities["A"];
        assert_eq!(a.totals.days, 2);
        assert_eq!(a.totals.good_hours, 4);
        assert_eq!(a.seasonal_avg_temp, 7.5);
        assert_eq!(a.seasonal_avg_good_hours, 1.0);
        assert_eq!(a.score, 751);
    }

    #[test]
    fn test_tie_is_preserved() {
        let result = aggregate(
            &[
                stat("A", 26, 10.0, 1),
                stat("A", 27, 20.0, 3),
                stat("B", 26, 15.0, 2),
                stat("B", 27, 15.0, 2),
            ],
            2,
        );
        assert_eq!(result.cities["A"].score, 1502);
        assert_eq!(result.cities["B"].score, 1502);
        assert_eq!(result.ratings.len(), 1);
        let tied: Vec<&str> = result.ratings[&1502].iter().map(String::as_str).collect();
        assert_eq!(tied, vec!["A", "B"]);
    }

    #[test]
    fn test_order_independent() {
        let stats = vec![
            stat("A", 26, 10.1, 1),
            stat("B", 26, 17.3, 4),
            stat("A", 27, 20.7, 3),
            stat("C", 28, 11.9, 0),
            stat("B", 27, 13.3, 2),
            stat("A", 28, 0.3, 5),
        ];
        let expected = aggregate(&stats, 3);

        let mut reversed = stats.clone();
        reversed.reverse();
        assert_eq!(aggregate(&reversed, 3), expected);

        for shift in 1..stats.len() {
            let mut rotated = stats.clone();
            rotated.rotate_left(shift);
            assert_eq!(aggregate(&rotated, 3), expected);
        }
    }

    #[test]
    fn test_duplicate_date_replaces_entry() {
        let result = aggregate(&[stat("A", 26, 10.0, 1), stat("A", 26, 12.0, 2)], 1);
        let a = &result.cities["A"];
        assert_eq!(a.per_date.len(), 1);
        assert_eq!(a.seasonal_avg_temp, 12.0);
    }

    #[test]
    fn test_drain_channel() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let producer = tx.clone();
        tx.send(stat("A", 26, 10.0, 1)).unwrap();
        producer.send(stat("B", 26, 12.0, 2)).unwrap();
        drop(tx);
        drop(producer);

        let mut aggregator = Aggregator::new();
        let received = tokio_test::block_on(aggregator.drain(&mut rx));
        assert_eq!(received, 2);

        let result = aggregator.finalize(1);
        assert_eq!(result.cities.len(), 2);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_empty_finalize() {
        let result = Aggregator::new().finalize(5);
        assert!(result.is_empty());
        assert!(result.ratings.is_empty());
    }
}
