//! Derived view state — filtered task lists and aggregate counts.
//!
//! Everything here is recomputed from the cached collection on demand and
//! never stored independently.

use crate::task::{Task, TaskStatus};

// ─── Filter ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] =
        [StatusFilter::All, StatusFilter::Pending, StatusFilter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }

    /// Next filter in display order, wrapping — the Tab control in the UI.
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == TaskStatus::Pending,
            StatusFilter::Completed => status == TaskStatus::Completed,
        }
    }

    /// Count shown next to this filter's label.
    pub fn count(self, counts: &TaskCounts) -> usize {
        match self {
            StatusFilter::All => counts.all,
            StatusFilter::Pending => counts.pending,
            StatusFilter::Completed => counts.completed,
        }
    }
}

/// Restrict `tasks` to the filter, preserving collection order.
pub fn filtered<'a>(tasks: &'a [Task], filter: StatusFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filter.matches(t.status)).collect()
}

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Aggregate counts for the stats panel and filter bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
}

impl TaskCounts {
    pub fn of(tasks: &[Task]) -> Self {
        let pending = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .count();
        Self {
            all: tasks.len(),
            pending,
            completed: tasks.len() - pending,
        }
    }
}
