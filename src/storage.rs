use crate::errors::AppError;
use crate::models::{AppData, EntryId, UserId, UserSettings, WeightEntry};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/weights.json"))
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

impl AppData {
    // A new user starts with their starting weight logged at `now`. Returns whether the user was new.
    pub fn save_user(&mut self, user_id: UserId, settings: UserSettings, now: i64) -> bool {
        let starting_weight = settings.starting_weight;
        let created = self.users.insert(user_id, settings).is_none();
        if created {
            self.insert_entry(user_id, starting_weight, now, None);
        }
        created
    }

    pub fn query_entries(&self, user_id: UserId, bounds: Option<(i64, i64)>) -> Vec<WeightEntry> {
        let mut entries: Vec<WeightEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .filter(|entry| match bounds {
                Some((start, end)) => entry.recorded_at >= start && entry.recorded_at <= end,
                None => true,
            })
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        entries
    }

    pub fn get_entry(&self, user_id: UserId, id: EntryId) -> Option<&WeightEntry> {
        self.entries
            .iter()
            .find(|entry| entry.id == id && entry.user_id == user_id)
    }

    pub fn insert_entry(
        &mut self,
        user_id: UserId,
        weight: f64,
        recorded_at: i64,
        notes: Option<String>,
    ) -> EntryId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push(WeightEntry {
            id,
            user_id,
            weight,
            recorded_at,
            notes,
        });
        id
    }

    pub fn update_entry(
        &mut self,
        user_id: UserId,
        id: EntryId,
        weight: f64,
        recorded_at: i64,
        notes: Option<String>,
    ) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id && entry.user_id == user_id)
        else {
            return false;
        };
        entry.weight = weight;
        entry.recorded_at = recorded_at;
        entry.notes = notes;
        true
    }

    pub fn delete_entry(&mut self, user_id: UserId, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !(entry.id == id && entry.user_id == user_id));
        self.entries.len() != before
    }
}
