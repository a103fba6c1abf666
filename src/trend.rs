use crate::aggregate::daily_averages;
use crate::models::{DailyAverage, GoalConfig, TrendSnapshot, WeightEntry};
use crate::range::TimeRange;
use chrono_tz::Tz;

const SHORT_WINDOW_DAYS: i64 = 7;
const LONG_WINDOW_DAYS: i64 = 30;

pub fn current_weight(series: &[DailyAverage], goal: &GoalConfig) -> f64 {
    series
        .last()
        .map(|day| day.average_weight)
        .unwrap_or(goal.starting_weight)
}

pub fn compute_trend(
    entries: &[WeightEntry],
    tz: Tz,
    goal: &GoalConfig,
    now: i64,
    current_weight: f64,
) -> TrendSnapshot {
    let window = |days: i64| {
        let range = TimeRange::last_days(days, now);
        let inside: Vec<WeightEntry> = entries
            .iter()
            .filter(|entry| range.contains(entry.recorded_at))
            .cloned()
            .collect();
        daily_averages(&inside, tz)
    };

    let total_change = goal.starting_weight - current_weight;

    TrendSnapshot {
        change_7_day: window_change(&window(SHORT_WINDOW_DAYS), current_weight),
        change_30_day: window_change(&window(LONG_WINDOW_DAYS), current_weight),
        total_change,
        percent_to_goal: percent_to_goal(total_change, goal),
    }
}

pub fn window_change(window: &[DailyAverage], current_weight: f64) -> f64 {
    match window {
        [first, _, ..] => first.average_weight - current_weight,
        _ => 0.0,
    }
}

pub fn percent_to_goal(total_change: f64, goal: &GoalConfig) -> f64 {
    let distance = goal.starting_weight - goal.target_weight;
    if distance == 0.0 {
        return 0.0;
    }
    (total_change / distance * 100.0).clamp(0.0, 100.0)
}
