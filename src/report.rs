use crate::aggregate::daily_averages;
use crate::bucket::parse_timezone;
use crate::errors::EngineError;
use crate::models::{DailyAverage, GoalConfig, TrendSnapshot, WeightEntry};
use crate::range::RangeSpec;
use crate::trend::{compute_trend, current_weight};

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub series: Vec<DailyAverage>,
    pub trend: TrendSnapshot,
    pub current_weight: f64,
}

pub fn build_report(
    entries: &[WeightEntry],
    timezone: &str,
    goal: &GoalConfig,
    range: RangeSpec,
    now: i64,
) -> Result<Report, EngineError> {
    let tz = parse_timezone(timezone)?;
    let range = range.resolve(now);

    let in_range: Vec<WeightEntry> = entries
        .iter()
        .filter(|entry| range.contains(entry.recorded_at))
        .cloned()
        .collect();
    let series = daily_averages(&in_range, tz);

    let current = current_weight(&daily_averages(entries, tz), goal);
    let trend = compute_trend(entries, tz, goal, now, current);

    Ok(Report {
        series,
        trend,
        current_weight: current,
    })
}
