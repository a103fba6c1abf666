use crate::errors::EngineError;
use crate::models::WeightEntry;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use tracing::warn;

pub type DayBuckets = BTreeMap<String, Vec<f64>>;

pub fn parse_timezone(name: &str) -> Result<Tz, EngineError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

pub fn bucket(entries: &[WeightEntry], timezone: &str) -> Result<DayBuckets, EngineError> {
    let tz = parse_timezone(timezone)?;
    Ok(bucket_in(entries, tz))
}

pub fn bucket_in(entries: &[WeightEntry], tz: Tz) -> DayBuckets {
    let mut buckets = DayBuckets::new();
    for entry in entries {
        let Some(date) = local_date(entry.recorded_at, tz) else {
            warn!(entry_id = entry.id, recorded_at = entry.recorded_at, "timestamp out of range, skipping");
            continue;
        };
        buckets.entry(date_key(date)).or_default().push(entry.weight);
    }
    buckets
}

pub fn local_date(timestamp: i64, tz: Tz) -> Option<NaiveDate> {
    Some(local_datetime(timestamp, tz)?.date())
}

// `None` when either the instant or its wall-clock time falls outside chrono's range.
pub fn local_datetime(timestamp: i64, tz: Tz) -> Option<NaiveDateTime> {
    let utc = DateTime::from_timestamp(timestamp, 0)?;
    let offset = utc.with_timezone(&tz).offset().fix();
    utc.naive_utc().checked_add_offset(offset)
}

pub fn local_to_timestamp(local: NaiveDateTime, tz: Tz) -> Option<i64> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.timestamp())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
