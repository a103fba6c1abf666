use crate::bucket::{bucket_in, DayBuckets};
use crate::models::{DailyAverage, WeightEntry};
use chrono_tz::Tz;

pub fn aggregate(buckets: &DayBuckets) -> Vec<DailyAverage> {
    let mut series: Vec<DailyAverage> = buckets
        .iter()
        .filter(|(_, weights)| !weights.is_empty())
        .map(|(date, weights)| DailyAverage {
            calendar_date: date.clone(),
            average_weight: weights.iter().sum::<f64>() / weights.len() as f64,
            sample_count: weights.len(),
        })
        .collect();

    series.sort_by(|a, b| a.calendar_date.cmp(&b.calendar_date));
    series
}

pub fn daily_averages(entries: &[WeightEntry], tz: Tz) -> Vec<DailyAverage> {
    aggregate(&bucket_in(entries, tz))
}
