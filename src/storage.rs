// File: src/storage.rs
// Manages the local on-disk task/history document.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the Task or HistoryEntry serialization format require
// incrementing LOCAL_STORAGE_VERSION below to prevent data corruption.
use crate::context::AppContext;
use crate::model::{HistoryEntry, Task};
use anyhow::Result;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

// Version history:
// - v1: {version, tasks, history} envelope with tagged TaskId
const LOCAL_STORAGE_VERSION: u32 = 1;

/// Wrapper struct for versioned local storage.
#[derive(Serialize, Deserialize)]
struct LocalStorageData {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// Tracks whether the last load succeeded per document path. Saving over a
/// file we could not read would destroy whatever is in it, so saves are
/// refused until a load for that path succeeds.
static LOAD_STATE_MAP: OnceLock<Mutex<HashMap<PathBuf, bool>>> = OnceLock::new();

fn set_load_state(path: &Path, ok: bool) {
    let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
    map.lock().unwrap().insert(path.to_path_buf(), ok);
}

fn load_succeeded(path: &Path) -> bool {
    let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
    *map.lock().unwrap().get(path).unwrap_or(&true)
}

pub struct LocalStorage;

impl LocalStorage {
    /// Sidecar lock file path for a document.
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Run `f` while holding an exclusive advisory lock on a sidecar file,
    /// serializing access across processes.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: write to a .tmp file then rename over the target.
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Load the task/history document. A missing file is an empty state,
    /// not an error. An unreadable file marks the path dirty so that later
    /// saves are refused.
    pub fn load(ctx: &dyn AppContext) -> Result<(Vec<Task>, Vec<HistoryEntry>)> {
        let Some(path) = ctx.get_tasks_path() else {
            anyhow::bail!("could not determine tasks path");
        };
        if !path.exists() {
            set_load_state(&path, true);
            return Ok((vec![], vec![]));
        }

        let result = Self::with_lock(&path, || {
            let json = fs::read_to_string(&path)?;

            if let Ok(data) = serde_json::from_str::<LocalStorageData>(&json) {
                if data.version > LOCAL_STORAGE_VERSION {
                    anyhow::bail!(
                        "tasks file is version {} but this build reads up to {}",
                        data.version,
                        LOCAL_STORAGE_VERSION
                    );
                }
                return Ok((data.tasks, data.history));
            }

            // Unversioned legacy form: a bare task array with no history.
            if let Ok(tasks) = serde_json::from_str::<Vec<Task>>(&json) {
                log::info!("migrating {} to v{}", path.display(), LOCAL_STORAGE_VERSION);
                return Ok((tasks, vec![]));
            }

            anyhow::bail!("tasks file at {} is not readable", path.display())
        });

        set_load_state(&path, result.is_ok());
        result
    }

    /// Persist the task/history document. Refuses to run when the last load
    /// of this path failed, to avoid clobbering data we never read.
    pub fn save(ctx: &dyn AppContext, tasks: &[Task], history: &[HistoryEntry]) -> Result<()> {
        let Some(path) = ctx.get_tasks_path() else {
            anyhow::bail!("could not determine tasks path");
        };
        if !load_succeeded(&path) {
            log::warn!(
                "refusing to save {}: last load failed, existing data preserved",
                path.display()
            );
            anyhow::bail!("refusing to save over unreadable tasks file");
        }

        Self::with_lock(&path, || {
            let data = LocalStorageData {
                version: LOCAL_STORAGE_VERSION,
                tasks: tasks.to_vec(),
                history: history.to_vec(),
            };
            let json = serde_json::to_string_pretty(&data)?;
            Self::atomic_write(&path, json)?;
            Ok(())
        })
    }
}
