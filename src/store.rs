// File: src/store.rs
//! The in-memory task collection and its append-only completion history.
//!
//! Invariant: a recurring task always has exactly one pending instance in
//! the active list. Completing it snapshots the instance into history and
//! advances its anchor in place; it is never duplicated and never removed
//! except by an explicit delete-all.
use crate::error::AppError;
use crate::model::{HistoryEntry, MAX_TEXT_LEN, RecurrenceEngine, Repeat, Task, TaskId};
use chrono::NaiveDate;

/// How much of a task a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    /// The task and all of its future occurrences.
    All,
    /// Only the next pending occurrence of a recurring task; the anchor
    /// skips forward and no history is recorded. Ignored (treated as `All`)
    /// for non-recurring tasks.
    Occurrence,
}

/// Both collections are order-preserving: tasks append on creation, history
/// appends on completion. Projections read "newest first" as reverse
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    history: Vec<HistoryEntry>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Validates and normalizes task text: trimmed, non-empty, at most
    /// `MAX_TEXT_LEN` characters. The trimmed form is what gets stored.
    fn validate_text(text: &str) -> Result<String, AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("task text is empty".to_string()));
        }
        let len = trimmed.chars().count();
        if len > MAX_TEXT_LEN {
            return Err(AppError::Validation(format!(
                "task text is {len} characters, limit is {MAX_TEXT_LEN}"
            )));
        }
        Ok(trimmed.to_string())
    }

    // --- Mutations ---

    /// Append a new pending task with a freshly minted id.
    pub fn add_task(
        &mut self,
        text: &str,
        due_date: NaiveDate,
        repeat: Repeat,
    ) -> Result<Task, AppError> {
        let text = Self::validate_text(text)?;
        let task = Task::new(text, due_date, repeat);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Complete the task with `id` on the local day `today`.
    ///
    /// Snapshots the task into history first, then removes it (one-off) or
    /// advances its anchor in place (recurring). Unknown ids are a silent
    /// no-op returning `None` — completing twice cannot double-record.
    pub fn complete_task(&mut self, id: &TaskId, today: NaiveDate) -> Option<HistoryEntry> {
        let idx = self.tasks.iter().position(|t| &t.id == id)?;
        if self.tasks[idx].completed {
            return None;
        }

        let entry = HistoryEntry::snapshot(&self.tasks[idx], today);
        self.history.push(entry.clone());

        let repeat = self.tasks[idx].repeat;
        if repeat.is_recurring() {
            let task = &mut self.tasks[idx];
            task.due_date = RecurrenceEngine::next_anchor(task.due_date, repeat);
            task.completed = false;
        } else {
            self.tasks.remove(idx);
        }
        Some(entry)
    }

    /// Undo one completion: drop the history entry and restore the task to
    /// its exact pre-completion state.
    ///
    /// One-off tasks are re-inserted as pending; recurring tasks have their
    /// live instance overwritten with the snapshot (reversing the anchor
    /// advance), or re-inserted if the instance was deleted meanwhile.
    pub fn uncomplete(&mut self, history_id: &str) -> Option<Task> {
        let idx = self.history.iter().position(|h| h.history_id == history_id)?;
        let entry = self.history.remove(idx);
        let restored = entry.restore_task();

        if entry.repeat.is_recurring()
            && let Some(existing) = self.tasks.iter_mut().find(|t| t.id == entry.id)
        {
            *existing = restored.clone();
            return Some(restored);
        }

        self.tasks.push(restored.clone());
        Some(restored)
    }

    /// Update text, due date and repeat rule in place. Does not touch
    /// `completed` or the history log. Unknown ids are a silent `Ok(None)`.
    pub fn edit_task(
        &mut self,
        id: &TaskId,
        text: &str,
        due_date: NaiveDate,
        repeat: Repeat,
    ) -> Result<Option<Task>, AppError> {
        let text = Self::validate_text(text)?;
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            return Ok(None);
        };
        task.text = text;
        task.due_date = due_date;
        task.repeat = repeat;
        Ok(Some(task.clone()))
    }

    /// Delete a task. `Occurrence` scope skips a recurring task's next
    /// pending occurrence by advancing the anchor from the task's own due
    /// date, leaving no history record. Non-recurring tasks are always
    /// removed outright, whatever the scope.
    pub fn delete_task(&mut self, id: &TaskId, scope: DeleteScope) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| &t.id == id)?;
        let repeat = self.tasks[idx].repeat;

        if scope == DeleteScope::Occurrence && repeat.is_recurring() {
            let task = &mut self.tasks[idx];
            task.due_date = RecurrenceEngine::next_anchor(task.due_date, repeat);
            return Some(task.clone());
        }
        Some(self.tasks.remove(idx))
    }

    /// Clear both collections. Irreversible.
    pub fn reset(&mut self) {
        self.tasks.clear();
        self.history.clear();
    }

    // --- Snapshot plumbing ---

    /// Replace the whole state with an authoritative snapshot (startup load
    /// or a remote-originated change). Last writer wins at collection
    /// granularity; no field-level merging.
    pub fn replace_all(&mut self, tasks: Vec<Task>, history: Vec<HistoryEntry>) {
        self.tasks = tasks;
        self.history = history;
    }

    /// Rewrite a provisional id to the canonical one a backing store
    /// assigned, across the active list and every history reference.
    /// Returns whether anything was rewritten.
    pub fn promote_id(&mut self, from: &TaskId, to: &TaskId) -> bool {
        let mut touched = false;
        for task in &mut self.tasks {
            if &task.id == from {
                task.id = to.clone();
                touched = true;
            }
        }
        for entry in &mut self.history {
            if &entry.id == from {
                entry.id = to.clone();
                touched = true;
            }
        }
        touched
    }
}
