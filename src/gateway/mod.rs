//! Remote task gateway — the boundary abstraction over the hosted task
//! table's CRUD operations.
//!
//! Four operations, each a single attempt: list, create, update, delete.
//! There are no retries at this layer; a failure is surfaced as-is and the
//! caller decides what to do with it (the UI shows the message and leaves
//! retry to the user).

pub mod rest;

pub use rest::RestGateway;

use async_trait::async_trait;

use crate::task::{CreateTaskInput, Task, UpdateTaskInput};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A failed remote operation. `Display` is the human-readable message the
/// UI surfaces verbatim in a notice or the initial-load failure screen.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The request never completed (connect failure, timeout, bad TLS…).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered and said no (constraint violation, unknown id…).
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl RemoteError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        RemoteError::Rejected {
            status,
            message: message.into(),
        }
    }
}

// ─── Gateway trait ───────────────────────────────────────────────────────────

/// CRUD contract of the remote task table. The production implementation is
/// [`RestGateway`]; tests substitute an in-memory double.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// All tasks, ordered by `created_at` descending.
    async fn list(&self) -> Result<Vec<Task>, RemoteError>;

    /// Insert one task; the server assigns id and timestamps and returns
    /// the complete row.
    async fn create(&self, input: CreateTaskInput) -> Result<Task, RemoteError>;

    /// Patch the supplied fields of an existing task and return the updated
    /// row. Unknown id is a rejection.
    async fn update(&self, id: &str, input: UpdateTaskInput) -> Result<Task, RemoteError>;

    /// Hard delete — no tombstone. Unknown id is a rejection.
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
}
