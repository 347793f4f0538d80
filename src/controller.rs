// File: src/controller.rs
//! Central logic controller for task operations.
//!
//! This is the single mutation path: every UI layer delegates here. Each
//! operation applies to the in-memory store immediately (optimistic), is
//! recorded in the durable journal, and then a persist of the full snapshot
//! is dispatched in the background without blocking the caller. A failed
//! persist leaves state and journal intact and flips the status flag to
//! `Error`; the next mutation retries the flush. There is no timer-driven
//! retry loop.
use crate::calendar;
use crate::context::AppContext;
use crate::error::AppError;
use crate::journal::{Action, Journal};
use crate::model::{HistoryEntry, Repeat, Task, TaskId};
use crate::store::{DeleteScope, TaskStore};
use crate::sync::{StateSnapshot, SyncBackend, SyncStatus};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

#[derive(Clone)]
pub struct TaskController {
    pub store: Arc<Mutex<TaskStore>>,
    backend: Arc<dyn SyncBackend>,
    ctx: Arc<dyn AppContext>,
    status_tx: watch::Sender<SyncStatus>,
    // Held so the channel stays open while no UI is watching.
    status_rx: watch::Receiver<SyncStatus>,
}

impl TaskController {
    pub fn new(backend: Arc<dyn SyncBackend>, ctx: Arc<dyn AppContext>) -> Self {
        let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);
        Self {
            store: Arc::new(Mutex::new(TaskStore::new())),
            backend,
            ctx,
            status_tx,
            status_rx,
        }
    }

    /// Watch the persistence status for a UI indicator.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status_rx.clone()
    }

    /// Load the initial state from the backend. Called once at startup.
    pub async fn load_initial(&self) -> anyhow::Result<()> {
        let snapshot = self.backend.load_state()?;
        self.store
            .lock()
            .await
            .replace_all(snapshot.tasks, snapshot.history);
        Ok(())
    }

    // --- Mutations (optimistic; persistence dispatched in the background) ---

    /// Create a task due on `due_date`. Returns its provisional id.
    pub async fn add_task(
        &self,
        text: &str,
        due_date: NaiveDate,
        repeat: Repeat,
    ) -> Result<TaskId, AppError> {
        let task = self.store.lock().await.add_task(text, due_date, repeat)?;
        self.record(Action::Create(task.clone()));
        self.dispatch_persist();
        Ok(task.id)
    }

    /// Complete a task as of today. Unknown ids are a silent no-op.
    pub async fn complete_task(&self, id: &TaskId) -> Option<HistoryEntry> {
        let mut store = self.store.lock().await;
        let entry = store.complete_task(id, calendar::today())?;

        // The live task either advanced in place or is gone.
        match store.get(id) {
            Some(task) => self.record(Action::Update(task.clone())),
            None => self.record(Action::Delete(id.clone())),
        }
        drop(store);

        self.dispatch_persist();
        Some(entry)
    }

    /// Undo a completion, restoring the task's pre-completion state.
    pub async fn uncomplete(&self, history_id: &str) -> Option<Task> {
        let restored = self.store.lock().await.uncomplete(history_id)?;
        self.record(Action::Update(restored.clone()));
        self.dispatch_persist();
        Some(restored)
    }

    /// Edit text/date/repeat in place. Unknown ids are a silent `Ok(None)`.
    pub async fn edit_task(
        &self,
        id: &TaskId,
        text: &str,
        due_date: NaiveDate,
        repeat: Repeat,
    ) -> Result<Option<Task>, AppError> {
        let updated = self
            .store
            .lock()
            .await
            .edit_task(id, text, due_date, repeat)?;
        if let Some(task) = &updated {
            self.record(Action::Update(task.clone()));
            self.dispatch_persist();
        }
        Ok(updated)
    }

    /// Delete a task or skip one occurrence of a recurring task.
    pub async fn delete_task(&self, id: &TaskId, scope: DeleteScope) -> Option<Task> {
        let mut store = self.store.lock().await;
        let deleted = store.delete_task(id, scope)?;

        match store.get(id) {
            // Occurrence skip: the task is still present, anchor advanced.
            Some(task) => self.record(Action::Update(task.clone())),
            None => self.record(Action::Delete(id.clone())),
        }
        drop(store);

        self.dispatch_persist();
        Some(deleted)
    }

    /// Clear all tasks and history. Irreversible.
    pub async fn reset(&self) {
        self.store.lock().await.reset();
        if let Err(e) = Journal::clear(self.ctx.as_ref()) {
            log::warn!("failed to clear journal on reset: {e}");
        }
        self.dispatch_persist();
    }

    // --- Persistence plumbing ---

    fn record(&self, action: Action) {
        if let Err(e) = Journal::push(self.ctx.as_ref(), action) {
            log::warn!("failed to journal action: {e}");
        }
    }

    /// Fire-and-forget persist of the current snapshot. The caller returns
    /// immediately; the outcome lands on the status channel.
    fn dispatch_persist(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.persist().await;
        });
    }

    /// Persist the full snapshot and reconcile ids the backend assigned.
    /// Public so callers without a runtime-spawned task (tests, shutdown
    /// paths) can flush synchronously.
    pub async fn persist(&self) -> Result<(), AppError> {
        let _ = self.status_tx.send(SyncStatus::Saving);

        let snapshot = {
            let store = self.store.lock().await;
            StateSnapshot {
                tasks: store.tasks().to_vec(),
                history: store.history().to_vec(),
            }
        };

        match self.backend.save_state(&snapshot) {
            Ok(receipt) => {
                let mut store = self.store.lock().await;
                for (from, to) in &receipt.assigned_ids {
                    store.promote_id(from, to);
                    if let Err(e) = Journal::promote(self.ctx.as_ref(), from, to) {
                        log::warn!("failed to promote id {from} in journal: {e}");
                    }
                }
                drop(store);

                if let Err(e) = Journal::clear(self.ctx.as_ref()) {
                    log::warn!("failed to clear journal after save: {e}");
                }
                let _ = self.status_tx.send(SyncStatus::Synced);
                Ok(())
            }
            Err(e) => {
                // Optimistic state stays; the journal keeps the intent for
                // the retry triggered by the next mutation.
                log::warn!("save failed, keeping local state: {e}");
                let _ = self.status_tx.send(SyncStatus::Error);
                Err(AppError::Sync(e.to_string()))
            }
        }
    }

    /// Apply a remote-originated snapshot: the entire local state is
    /// replaced, last writer wins.
    pub async fn apply_remote_snapshot(&self, snapshot: StateSnapshot) {
        self.store
            .lock()
            .await
            .replace_all(snapshot.tasks, snapshot.history);
        let _ = self.status_tx.send(SyncStatus::Synced);
    }

    /// Forward the backend's change feed into the store. Returns `false`
    /// when the backend has no feed.
    pub fn spawn_remote_listener(&self) -> bool {
        let Some(mut rx) = self.backend.subscribe() else {
            return false;
        };
        let this = self.clone();
        tokio::spawn(async move {
            while let Some(snapshot) = rx.recv().await {
                this.apply_remote_snapshot(snapshot).await;
            }
        });
        true
    }
}
