use crate::bucket::{local_datetime, local_to_timestamp, parse_timezone};
use crate::errors::AppError;
use crate::history::{entry_history, has_entered_today};
use crate::models::{
    AppData, ChartQuery, ChartResponse, CreatedResponse, DashboardResponse, EntryId, EntryRequest,
    EntryView, SettingsRequest, UserId, UserSettings, WeightEntry,
};
use crate::range::{Period, RangeSpec, TimeRange};
use crate::report::build_report;
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::info;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserSettings>, AppError> {
    let data = state.data.lock().await;
    let settings = user_settings(&data, user_id)?;
    Ok(Json(settings.clone()))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<SettingsRequest>,
) -> Result<Json<UserSettings>, AppError> {
    let display_name = payload.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::bad_request("display_name must not be empty"));
    }
    if !is_valid_weight(payload.starting_weight) || !is_valid_weight(payload.target_weight) {
        return Err(AppError::bad_request("weights must be positive numbers"));
    }
    parse_timezone(&payload.timezone)?;

    let settings = UserSettings {
        display_name: display_name.to_string(),
        timezone: payload.timezone.trim().to_string(),
        weight_unit: weight_unit(payload.weight_unit.as_deref())?,
        starting_weight: payload.starting_weight,
        target_weight: payload.target_weight,
    };

    let mut data = state.data.lock().await;
    let created = data.save_user(user_id, settings.clone(), now_timestamp());
    persist_data(&state.data_path, &data).await?;
    info!(user_id, created, timezone = %settings.timezone, "settings saved");

    Ok(Json(settings))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<EntryView>>, AppError> {
    let (settings, entries) = state.snapshot(user_id).await?;
    let tz = parse_timezone(&settings.timezone)?;
    Ok(Json(entry_history(&entries, tz, settings.starting_weight)))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<EntryRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let mut data = state.data.lock().await;
    let tz = parse_timezone(&user_settings(&data, user_id)?.timezone)?;
    let (weight, recorded_at, notes) = validate_entry(payload, tz, now_timestamp())?;

    let id = data.insert_entry(user_id, weight, recorded_at, notes);
    persist_data(&state.data_path, &data).await?;
    info!(user_id, entry_id = id, recorded_at, "entry added");

    Ok(Json(CreatedResponse { id }))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path((user_id, entry_id)): Path<(UserId, EntryId)>,
) -> Result<Json<WeightEntry>, AppError> {
    let data = state.data.lock().await;
    let entry = data
        .get_entry(user_id, entry_id)
        .cloned()
        .ok_or_else(|| entry_not_found(entry_id))?;
    Ok(Json(entry))
}

pub async fn edit_entry(
    State(state): State<AppState>,
    Path((user_id, entry_id)): Path<(UserId, EntryId)>,
    Json(payload): Json<EntryRequest>,
) -> Result<Json<WeightEntry>, AppError> {
    let mut data = state.data.lock().await;
    let tz = parse_timezone(&user_settings(&data, user_id)?.timezone)?;
    let (weight, recorded_at, notes) = validate_entry(payload, tz, now_timestamp())?;

    if !data.update_entry(user_id, entry_id, weight, recorded_at, notes) {
        return Err(entry_not_found(entry_id));
    }
    persist_data(&state.data_path, &data).await?;
    info!(user_id, entry_id, recorded_at, "entry updated");

    let updated = data
        .get_entry(user_id, entry_id)
        .cloned()
        .ok_or_else(|| entry_not_found(entry_id))?;
    Ok(Json(updated))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path((user_id, entry_id)): Path<(UserId, EntryId)>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    if !data.delete_entry(user_id, entry_id) {
        return Err(entry_not_found(entry_id));
    }
    persist_data(&state.data_path, &data).await?;
    info!(user_id, entry_id, "entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn chart(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    let now = now_timestamp();
    let range = chart_range(&query, now)?;

    let (settings, entries) = state.snapshot(user_id).await?;
    let report = build_report(&entries, &settings.timezone, &settings.goal(), range, now)?;

    Ok(Json(ChartResponse {
        data: report.series,
        target_weight: settings.target_weight,
        unit: settings.weight_unit,
    }))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<DashboardResponse>, AppError> {
    let now = now_timestamp();
    let (settings, entries) = state.snapshot(user_id).await?;
    let report = build_report(
        &entries,
        &settings.timezone,
        &settings.goal(),
        RangeSpec::Period(Period::All),
        now,
    )?;
    let tz = parse_timezone(&settings.timezone)?;

    Ok(Json(DashboardResponse {
        series: report.series,
        trend: report.trend,
        current_weight: report.current_weight,
        has_entered_today: has_entered_today(&entries, tz, now),
        target_weight: settings.target_weight,
        unit: settings.weight_unit,
    }))
}

fn user_settings(data: &AppData, user_id: UserId) -> Result<&UserSettings, AppError> {
    data.users
        .get(&user_id)
        .ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))
}

fn chart_range(query: &ChartQuery, now: i64) -> Result<RangeSpec, AppError> {
    match (query.start, query.end) {
        (Some(start), end) => Ok(RangeSpec::Explicit(TimeRange {
            start: Some(start),
            end: end.unwrap_or(now),
        })),
        (None, Some(_)) => Err(AppError::bad_request("end requires start")),
        (None, None) => Ok(RangeSpec::Period(Period::parse(
            query.period.as_deref().unwrap_or("week"),
        ))),
    }
}

fn weight_unit(unit: Option<&str>) -> Result<String, AppError> {
    match unit.map(str::trim) {
        None | Some("") | Some("kg") => Ok("kg".to_string()),
        Some("lbs") => Ok("lbs".to_string()),
        Some(other) => Err(AppError::bad_request(format!(
            "weight_unit must be 'kg' or 'lbs', got '{other}'"
        ))),
    }
}

fn validate_entry(
    payload: EntryRequest,
    tz: Tz,
    now: i64,
) -> Result<(f64, i64, Option<String>), AppError> {
    if !is_valid_weight(payload.weight) {
        return Err(AppError::bad_request("weight must be a positive number"));
    }

    let recorded_at = match (payload.recorded_at, payload.date) {
        (Some(timestamp), _) => {
            local_datetime(timestamp, tz)
                .ok_or_else(|| AppError::bad_request("recorded_at is out of range"))?;
            timestamp
        }
        (None, Some(date)) => local_timestamp(&date, payload.time.as_deref(), tz, now)?,
        (None, None) => now,
    };

    let notes = payload
        .notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty());

    Ok((payload.weight, recorded_at, notes))
}

fn local_timestamp(date: &str, time: Option<&str>, tz: Tz, now: i64) -> Result<i64, AppError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be YYYY-MM-DD"))?;
    let time = match time {
        Some(time) => NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map_err(|_| AppError::bad_request("time must be HH:MM"))?,
        None => local_datetime(now, tz)
            .and_then(|dt| NaiveTime::from_hms_opt(dt.hour(), dt.minute(), 0))
            .unwrap_or(NaiveTime::MIN),
    };

    local_to_timestamp(date.and_time(time), tz)
        .ok_or_else(|| AppError::bad_request("local time does not exist in this timezone"))
}

fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

fn entry_not_found(entry_id: EntryId) -> AppError {
    AppError::not_found(format!("entry {entry_id} not found"))
}

fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_717_243_200; // 2024-06-01T12:00:00Z

    fn request(weight: f64) -> EntryRequest {
        EntryRequest {
            weight,
            recorded_at: None,
            date: None,
            time: None,
            notes: None,
        }
    }

    #[test]
    fn local_date_and_time_use_the_user_zone() {
        let tz = parse_timezone("Asia/Tokyo").unwrap();
        let payload = EntryRequest {
            date: Some("2024-06-01".to_string()),
            time: Some("21:00".to_string()),
            notes: Some("  morning  ".to_string()),
            ..request(72.0)
        };
        let (_, recorded_at, notes) = validate_entry(payload, tz, NOW).unwrap();
        assert_eq!(recorded_at, NOW);
        assert_eq!(notes.as_deref(), Some("morning"));
    }

    #[test]
    fn missing_time_takes_current_local_minute() {
        let tz = parse_timezone("UTC").unwrap();
        let payload = EntryRequest {
            date: Some("2024-05-30".to_string()),
            ..request(72.0)
        };
        let (_, recorded_at, _) = validate_entry(payload, tz, NOW + 59).unwrap();
        assert_eq!(recorded_at, NOW - 2 * 86_400);
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let tz = parse_timezone("Europe/Berlin").unwrap();
        assert!(validate_entry(request(0.0), tz, NOW).is_err());
        assert!(validate_entry(request(f64::NAN), tz, NOW).is_err());

        let gap = EntryRequest {
            date: Some("2024-03-31".to_string()),
            time: Some("02:30".to_string()),
            ..request(70.0)
        };
        let err = validate_entry(gap, tz, NOW).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let garbled = EntryRequest {
            date: Some("31/03/2024".to_string()),
            ..request(70.0)
        };
        assert!(validate_entry(garbled, tz, NOW).is_err());
    }

    #[test]
    fn recorded_at_must_have_a_local_time() {
        let edge = chrono::DateTime::<Utc>::MAX_UTC.timestamp();
        let tokyo = parse_timezone("Asia/Tokyo").unwrap();
        let payload = EntryRequest {
            recorded_at: Some(edge),
            ..request(70.0)
        };
        let err = validate_entry(payload, tokyo, NOW).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let payload = EntryRequest {
            recorded_at: Some(NOW - 60),
            ..request(70.0)
        };
        assert_eq!(validate_entry(payload, tokyo, NOW).unwrap().1, NOW - 60);
    }

    #[test]
    fn chart_range_from_query() {
        let query = |period: Option<&str>, start: Option<i64>, end: Option<i64>| ChartQuery {
            period: period.map(str::to_string),
            start,
            end,
        };

        assert_eq!(
            chart_range(&query(None, Some(10), None), NOW).unwrap(),
            RangeSpec::Explicit(TimeRange { start: Some(10), end: NOW })
        );
        assert_eq!(
            chart_range(&query(Some("month"), Some(10), Some(20)), NOW).unwrap(),
            RangeSpec::Explicit(TimeRange { start: Some(10), end: 20 })
        );
        assert_eq!(
            chart_range(&query(Some("bogus"), None, None), NOW).unwrap(),
            RangeSpec::Period(Period::Week)
        );
        let err = chart_range(&query(None, None, Some(20)), NOW).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn only_kg_and_lbs_are_units() {
        assert_eq!(weight_unit(None).unwrap(), "kg");
        assert_eq!(weight_unit(Some(" lbs ")).unwrap(), "lbs");
        assert_eq!(weight_unit(Some("")).unwrap(), "kg");
        assert!(weight_unit(Some("stone")).is_err());
    }

    #[test]
    fn no_time_information_means_now() {
        let tz = parse_timezone("UTC").unwrap();
        let (weight, recorded_at, notes) = validate_entry(request(70.5), tz, NOW).unwrap();
        assert_eq!((weight, recorded_at, notes), (70.5, NOW, None));
    }
}
