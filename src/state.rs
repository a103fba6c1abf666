use crate::errors::AppError;
use crate::models::{AppData, UserId, UserSettings, WeightEntry};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn snapshot(&self, user_id: UserId) -> Result<(UserSettings, Vec<WeightEntry>), AppError> {
        let data = self.data.lock().await;
        let settings = data
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))?;
        Ok((settings, data.query_entries(user_id, None)))
    }
}
