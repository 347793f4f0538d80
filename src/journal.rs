/*
 * src/journal.rs
 *
 * Durable record of mutations that have not yet been confirmed persisted.
 *
 * Every mutation is appended here before the persistence attempt, so a
 * crash or a failed save never loses the user's intent; a confirmed save
 * clears the queue. All public IO functions take a `&dyn AppContext`;
 * there are no hidden globals.
 */
use crate::context::AppContext;
use crate::model::{Task, TaskId};
use crate::storage::LocalStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Action {
    Create(Task),
    Update(Task),
    Delete(TaskId),
}

impl Action {
    pub fn task_id(&self) -> &TaskId {
        match self {
            Action::Create(t) | Action::Update(t) => &t.id,
            Action::Delete(id) => id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Journal {
    pub queue: Vec<Action>,
}

impl Journal {
    pub fn get_path(ctx: &dyn AppContext) -> Option<PathBuf> {
        ctx.get_journal_path()
    }

    /// Internal helper: load journal structure from a path without locking.
    fn load_internal(path: &PathBuf) -> Self {
        if path.exists()
            && let Ok(content) = fs::read_to_string(path)
            && let Ok(journal) = serde_json::from_str(&content)
        {
            return journal;
        }
        Self::default()
    }

    /// Load the journal from disk using the provided context.
    pub fn load(ctx: &dyn AppContext) -> Self {
        if let Some(path) = Self::get_path(ctx) {
            if !path.exists() {
                return Self::default();
            }
            return LocalStorage::with_lock(&path, || Ok(Self::load_internal(&path)))
                .unwrap_or_default();
        }
        Self::default()
    }

    /// Modify the journal by applying a closure to the queue, persisting
    /// the result atomically under the file lock.
    pub fn modify<F>(ctx: &dyn AppContext, f: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Action>),
    {
        if let Some(path) = Self::get_path(ctx) {
            LocalStorage::with_lock(&path, || {
                let mut journal = Self::load_internal(&path);
                f(&mut journal.queue);
                let json = serde_json::to_string_pretty(&journal)?;
                LocalStorage::atomic_write(&path, json)?;
                Ok(())
            })?;
        }
        Ok(())
    }

    /// Push a new action into the journal.
    pub fn push(ctx: &dyn AppContext, action: Action) -> Result<()> {
        Self::modify(ctx, |queue| queue.push(action))
    }

    /// Drop everything; called after a confirmed save.
    pub fn clear(ctx: &dyn AppContext) -> Result<()> {
        Self::modify(ctx, |queue| queue.clear())
    }

    /// Rewrite a provisional task id to its server-assigned replacement in
    /// every queued action.
    pub fn promote(ctx: &dyn AppContext, from: &TaskId, to: &TaskId) -> Result<()> {
        Self::modify(ctx, |queue| {
            for action in queue.iter_mut() {
                match action {
                    Action::Create(t) | Action::Update(t) => {
                        if &t.id == from {
                            t.id = to.clone();
                        }
                    }
                    Action::Delete(id) => {
                        if id == from {
                            *id = to.clone();
                        }
                    }
                }
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Compact the journal by merging redundant operations on the same id:
    /// Create+Update collapses into Create, Update+Update keeps the last,
    /// Create+Delete cancels out, Update+Delete keeps the Delete.
    pub fn compact(&mut self) {
        let mut id_map: HashMap<TaskId, usize> = HashMap::new();
        let mut compacted: Vec<Option<Action>> = Vec::new();

        for action in self.queue.drain(..) {
            let id = action.task_id().clone();

            let mut merged = false;
            if let Some(&idx) = id_map.get(&id)
                && let Some(prev) = &compacted[idx]
            {
                match (prev, &action) {
                    (Action::Create(_), Action::Update(t)) => {
                        compacted[idx] = Some(Action::Create(t.clone()));
                        merged = true;
                    }
                    (Action::Update(_), Action::Update(t)) => {
                        compacted[idx] = Some(Action::Update(t.clone()));
                        merged = true;
                    }
                    (Action::Create(_), Action::Delete(_)) => {
                        compacted[idx] = None;
                        id_map.remove(&id);
                        merged = true;
                    }
                    (Action::Update(_), Action::Delete(del_id)) => {
                        compacted[idx] = Some(Action::Delete(del_id.clone()));
                        merged = true;
                    }
                    _ => {}
                }
            }

            if !merged {
                compacted.push(Some(action));
                id_map.insert(id, compacted.len() - 1);
            }
        }

        self.queue = compacted.into_iter().flatten().collect();
    }
}
