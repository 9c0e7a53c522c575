//! Task entity model — the row shape of the remote `tasks` table plus the
//! two input variants the gateway accepts.
//!
//! The server owns identity and time: `id`, `created_at`, and `updated_at`
//! are assigned on insert/update and the client never fabricates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    /// The other status — used by the status-toggle control.
    pub fn toggle(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// One row of the remote task table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Stored as SQL NULL when absent — never as an empty string.
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── Input variants ──────────────────────────────────────────────────────────

/// Insert payload. Serializes exactly what the table INSERT expects:
/// trimmed title, NULL for an absent/empty description, and a status that
/// defaults to `pending` when unspecified.
#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl CreateTaskInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The JSON row body for the INSERT.
    pub fn to_row(&self) -> serde_json::Value {
        serde_json::json!({
            "title": self.title.trim(),
            "description": normalize_description(self.description.as_deref()),
            "status": self.status.unwrap_or(TaskStatus::Pending),
        })
    }
}

/// Partial patch. A field that is `None` is omitted from the payload
/// entirely, so the server leaves it unchanged; `description: Some("")`
/// clears the column to NULL.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl UpdateTaskInput {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// The JSON patch body for the UPDATE — only supplied fields appear.
    pub fn to_patch(&self) -> serde_json::Value {
        let mut patch = serde_json::Map::new();
        if let Some(title) = &self.title {
            patch.insert("title".into(), serde_json::json!(title.trim()));
        }
        if let Some(description) = &self.description {
            patch.insert(
                "description".into(),
                serde_json::json!(normalize_description(Some(description))),
            );
        }
        if let Some(status) = self.status {
            patch.insert("status".into(), serde_json::json!(status));
        }
        serde_json::Value::Object(patch)
    }
}

/// Trim and collapse empty to `None` (stored as NULL, not "").
fn normalize_description(description: Option<&str>) -> Option<String> {
    let trimmed = description?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_row_trims_and_defaults_status() {
        let row = CreateTaskInput::new("  Buy milk  ").to_row();
        assert_eq!(row["title"], "Buy milk");
        assert_eq!(row["description"], serde_json::Value::Null);
        assert_eq!(row["status"], "pending");
    }

    #[test]
    fn create_row_empty_description_becomes_null() {
        let row = CreateTaskInput::new("x").with_description("   ").to_row();
        assert_eq!(row["description"], serde_json::Value::Null);
    }

    #[test]
    fn update_patch_omits_absent_fields() {
        let patch = UpdateTaskInput::status(TaskStatus::Completed).to_patch();
        let obj = patch.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["status"], "completed");
    }

    #[test]
    fn update_patch_empty_description_clears_to_null() {
        let patch = UpdateTaskInput {
            description: Some("".into()),
            ..Default::default()
        }
        .to_patch();
        assert_eq!(patch["description"], serde_json::Value::Null);
    }

    #[test]
    fn status_round_trips_lowercase() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "title": "Write report",
            "description": null,
            "status": "pending",
            "created_at": "2026-01-02T03:04:05Z",
            "updated_at": "2026-01-02T03:04:05Z",
        }))
        .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.description.is_none());
        assert_eq!(task.status.toggle(), TaskStatus::Completed);
    }
}
