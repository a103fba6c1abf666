use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type UserId = u64;
pub type EntryId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub weight: f64,
    pub recorded_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAverage {
    #[serde(rename = "date")]
    pub calendar_date: String,
    #[serde(rename = "weight")]
    pub average_weight: f64,
    #[serde(rename = "count")]
    pub sample_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub starting_weight: f64,
    pub target_weight: f64,
}

// Positive means the weight went down (`earlier - current`), whatever the goal direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub change_7_day: f64,
    pub change_30_day: f64,
    pub total_change: f64,
    pub percent_to_goal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub display_name: String,
    pub timezone: String,
    #[serde(default = "default_unit")]
    pub weight_unit: String,
    pub starting_weight: f64,
    pub target_weight: f64,
}

impl UserSettings {
    pub fn goal(&self) -> GoalConfig {
        GoalConfig {
            starting_weight: self.starting_weight,
            target_weight: self.target_weight,
        }
    }
}

fn default_unit() -> String {
    "kg".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub users: BTreeMap<UserId, UserSettings>,
    #[serde(default)]
    pub entries: Vec<WeightEntry>,
    #[serde(default = "first_id")]
    pub next_id: EntryId,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            entries: Vec::new(),
            next_id: first_id(),
        }
    }
}

fn first_id() -> EntryId {
    1
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub display_name: String,
    pub timezone: String,
    pub weight_unit: Option<String>,
    pub starting_weight: f64,
    pub target_weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub weight: f64,
    pub recorded_at: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub period: Option<String>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChartResponse {
    pub data: Vec<DailyAverage>,
    pub target_weight: f64,
    pub unit: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub series: Vec<DailyAverage>,
    pub trend: TrendSnapshot,
    pub current_weight: f64,
    pub has_entered_today: bool,
    pub target_weight: f64,
    pub unit: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: EntryId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    pub id: EntryId,
    pub weight: f64,
    pub recorded_at: i64,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
    pub change_from_start: f64,
    pub change_from_previous: Option<f64>,
}
