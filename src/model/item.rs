// File: src/model/item.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Maximum accepted task text length, in characters.
pub const MAX_TEXT_LEN: usize = 300;

fn fresh_uid() -> String {
    Uuid::new_v4().to_string()
}

// --- IDENTITY ---

/// Task identity, tagged by origin.
///
/// A task minted on this device carries a provisional `Local` id until a
/// backing store confirms the record and hands back its canonical id; the
/// store and journal rewrite the identity in place at that point, so
/// in-flight operations keyed on the provisional id are never orphaned.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", content = "value", rename_all = "lowercase")]
pub enum TaskId {
    Local(String),
    Remote(String),
}

impl TaskId {
    pub fn new_local() -> Self {
        Self::Local(fresh_uid())
    }

    /// The opaque identifier value, regardless of origin.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Local(s) | Self::Remote(s) => s,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- REPEAT RULES ---

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Repeat {
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Repeat::None)
    }
}

// --- TASK ---

/// A pending task in the active collection.
///
/// `completed` is `false` for every task sitting in the active list; it
/// flips to `true` only inside the history snapshot taken at completion
/// time. `due_date` doubles as the recurrence anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub repeat: Repeat,
}

impl Task {
    /// New pending task with a freshly minted local id. The caller is
    /// responsible for text validation; see `TaskStore::add_task`.
    pub fn new(text: impl Into<String>, due_date: NaiveDate, repeat: Repeat) -> Self {
        Self {
            id: TaskId::new_local(),
            text: text.into(),
            completed: false,
            due_date,
            repeat,
        }
    }
}

// --- HISTORY ---

/// Immutable record of one completion: a snapshot of the task as it was the
/// instant it was completed, plus the local day it happened on.
///
/// `id` is the originating task's identity (kept so an undo can restore the
/// task); `history_id` identifies this record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub history_id: String,
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// The anchor the task had when completed, before any advance.
    pub due_date: NaiveDate,
    pub repeat: Repeat,
    /// Local calendar day the completion occurred on.
    pub completed_at: NaiveDate,
}

impl HistoryEntry {
    /// Snapshot `task` at the moment of completion.
    pub fn snapshot(task: &Task, completed_at: NaiveDate) -> Self {
        Self {
            history_id: fresh_uid(),
            id: task.id.clone(),
            text: task.text.clone(),
            completed: true,
            due_date: task.due_date,
            repeat: task.repeat,
            completed_at,
        }
    }

    /// Rebuild the pending task this entry was taken from, exactly as it was
    /// before the completion (same id, `completed` back to `false`).
    pub fn restore_task(&self) -> Task {
        Task {
            id: self.id.clone(),
            text: self.text.clone(),
            completed: false,
            due_date: self.due_date,
            repeat: self.repeat,
        }
    }
}
