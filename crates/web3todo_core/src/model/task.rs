use serde::{Deserialize, Serialize};

/// A to-do item with a staked wei value.
///
/// Dates are calendar days (`YYYY-MM-DD`); `wei_value` is kept as the decimal
/// string the caller supplied so magnitudes beyond 64 bits survive untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_date: String,
    #[serde(default)]
    pub completed_date: Option<String>,
    pub wei_value: String,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}
