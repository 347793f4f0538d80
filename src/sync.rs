// File: src/sync.rs
//! Boundary between the core and whatever persists its state.
//!
//! The core only ever sees this trait: load once at startup, save the full
//! snapshot after every mutation, and optionally receive out-of-band
//! snapshots when another device changes the backing store. A concrete
//! remote service lives entirely behind an implementation of `SyncBackend`.
use crate::context::AppContext;
use crate::model::{HistoryEntry, Task, TaskId};
use crate::storage::LocalStorage;
use anyhow::Result;
use std::sync::Arc;
use strum::Display;
use tokio::sync::mpsc;

/// The whole persisted state, moved as one unit. Remote-originated changes
/// replace the local state at this granularity — last writer wins, no
/// field-level merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSnapshot {
    pub tasks: Vec<Task>,
    pub history: Vec<HistoryEntry>,
}

/// What a backend reports after a successful save.
#[derive(Debug, Clone, Default)]
pub struct SaveReceipt {
    /// Ids the backend re-keyed while persisting: provisional local id ->
    /// canonical id it assigned. The caller must apply these to its store
    /// and journal so in-flight references keep resolving.
    pub assigned_ids: Vec<(TaskId, TaskId)>,
}

/// Persistence status surfaced to UI layers. A failed save never rolls
/// back in-memory state; it only lands here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Saving,
    Synced,
    Error,
}

pub trait SyncBackend: Send + Sync {
    /// Called once at startup; an empty backend returns empty collections.
    fn load_state(&self) -> Result<StateSnapshot>;

    /// Persist the full snapshot. Fire-and-forget from the core's point of
    /// view; failures surface as `SyncStatus::Error`, never as a rollback.
    fn save_state(&self, snapshot: &StateSnapshot) -> Result<SaveReceipt>;

    /// Out-of-band snapshots from another device or session. `None` when
    /// the backend has no change feed (the local file backend, for one).
    fn subscribe(&self) -> Option<mpsc::Receiver<StateSnapshot>> {
        None
    }
}

/// Backend over the on-disk document: the default when no remote service is
/// configured. Ids never change on save, and there is no change feed.
pub struct LocalBackend {
    ctx: Arc<dyn AppContext>,
}

impl LocalBackend {
    pub fn new(ctx: Arc<dyn AppContext>) -> Self {
        Self { ctx }
    }
}

impl SyncBackend for LocalBackend {
    fn load_state(&self) -> Result<StateSnapshot> {
        let (tasks, history) = LocalStorage::load(self.ctx.as_ref())?;
        Ok(StateSnapshot { tasks, history })
    }

    fn save_state(&self, snapshot: &StateSnapshot) -> Result<SaveReceipt> {
        LocalStorage::save(self.ctx.as_ref(), &snapshot.tasks, &snapshot.history)?;
        Ok(SaveReceipt::default())
    }
}
