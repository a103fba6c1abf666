use crate::bucket::{date_key, local_date, local_datetime};
use crate::models::{EntryView, WeightEntry};
use chrono_tz::Tz;

// Newest first. Changes are `earlier - this`, so positive means weight went down.
pub fn entry_history(entries: &[WeightEntry], tz: Tz, starting_weight: f64) -> Vec<EntryView> {
    let mut ordered: Vec<&WeightEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));

    ordered
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let local = local_datetime(entry.recorded_at, tz);
            EntryView {
                id: entry.id,
                weight: entry.weight,
                recorded_at: entry.recorded_at,
                date: local
                    .map(|dt| date_key(dt.date()))
                    .unwrap_or_default(),
                time: local
                    .map(|dt| dt.format("%H:%M").to_string())
                    .unwrap_or_default(),
                notes: entry.notes.clone(),
                change_from_start: starting_weight - entry.weight,
                change_from_previous: ordered
                    .get(index + 1)
                    .map(|previous| previous.weight - entry.weight),
            }
        })
        .collect()
}

pub fn has_entered_today(entries: &[WeightEntry], tz: Tz, now: i64) -> bool {
    let Some(today) = local_date(now, tz) else {
        return false;
    };
    entries
        .iter()
        .any(|entry| local_date(entry.recorded_at, tz) == Some(today))
}
