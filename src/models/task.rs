use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Oneshot,
    Recurring,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oneshot => "oneshot",
            Self::Recurring => "recurring",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "oneshot" => Some(Self::Oneshot),
            "recurring" => Some(Self::Recurring),
            _ => None,
        }
    }
}

/// A planned piece of work on a weekly board. `workload` counts half-day
/// units (2 units = 1 day); conversion to days happens only at display time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub notes: Option<String>,
    pub resource_id: i64,
    pub client_id: i64,
    pub deadline: Option<NaiveDate>,
    pub workload: i64,
    pub estimated_days: i64,
    pub task_type: TaskType,
    pub is_completed: bool,
    pub is_archived: bool,
    pub week_number: u32,
    pub year: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// Logged workload expressed in days.
    pub fn workload_days(&self) -> f64 {
        self.workload as f64 / 2.0
    }
}

/// Fields for creating a task. Workload, estimate and type take the board
/// defaults when the caller leaves them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub name: String,
    pub notes: Option<String>,
    pub resource_id: i64,
    pub client_id: i64,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub workload: i64,
    #[serde(default)]
    pub estimated_days: i64,
    #[serde(default = "default_task_type")]
    pub task_type: TaskType,
    pub week_number: u32,
    pub year: i32,
}

fn default_task_type() -> TaskType {
    TaskType::Oneshot
}

impl TaskInput {
    /// Input that recreates the given task (identity dropped; the store
    /// assigns a fresh id).
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            notes: task.notes.clone(),
            resource_id: task.resource_id,
            client_id: task.client_id,
            deadline: task.deadline,
            workload: task.workload,
            estimated_days: task.estimated_days,
            task_type: task.task_type,
            week_number: task.week_number,
            year: task.year,
        }
    }
}

/// Partial update: only `Some` fields are written. `notes` and `deadline`
/// are doubly optional so they can be cleared explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub notes: Option<Option<String>>,
    pub resource_id: Option<i64>,
    pub client_id: Option<i64>,
    pub deadline: Option<Option<NaiveDate>>,
    pub workload: Option<i64>,
    pub estimated_days: Option<i64>,
    pub task_type: Option<TaskType>,
    pub is_completed: Option<bool>,
    pub is_archived: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.notes.is_none()
            && self.resource_id.is_none()
            && self.client_id.is_none()
            && self.deadline.is_none()
            && self.workload.is_none()
            && self.estimated_days.is_none()
            && self.task_type.is_none()
            && self.is_completed.is_none()
            && self.is_archived.is_none()
    }

    /// Patch that restores every mutable field of the given snapshot, used
    /// when replaying an update from the action log.
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: Some(task.name.clone()),
            notes: Some(task.notes.clone()),
            resource_id: Some(task.resource_id),
            client_id: Some(task.client_id),
            deadline: Some(task.deadline),
            workload: Some(task.workload),
            estimated_days: Some(task.estimated_days),
            task_type: Some(task.task_type),
            is_completed: Some(task.is_completed),
            is_archived: Some(task.is_archived),
        }
    }
}
