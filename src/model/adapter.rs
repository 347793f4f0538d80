// File: src/model/adapter.rs
//! Maps loosely-typed rows from a backing store into the typed model.
//!
//! Remote stores (and old local snapshots) hand back JSON whose fields may
//! be missing, numeric where a string is expected, or plain wrong. Every
//! coercion happens here, once; rows that do not survive validation are
//! quarantined with a reason instead of leaking half-typed data into the
//! store.
use crate::calendar;
use crate::model::item::{HistoryEntry, MAX_TEXT_LEN, Repeat, Task, TaskId};
use serde_json::Value;
use std::str::FromStr;

/// Outcome of mapping one batch of raw rows.
#[derive(Debug, Default)]
pub struct RowReport {
    pub tasks: Vec<Task>,
    pub history: Vec<HistoryEntry>,
    /// Rows that failed validation, with the reason they were rejected.
    pub quarantined: Vec<(Value, String)>,
}

impl RowReport {
    pub fn is_clean(&self) -> bool {
        self.quarantined.is_empty()
    }
}

/// Map raw task and history rows into the typed model.
pub fn map_rows(task_rows: &[Value], history_rows: &[Value]) -> RowReport {
    let mut report = RowReport::default();

    for row in task_rows {
        match task_from_row(row) {
            Ok(task) => report.tasks.push(task),
            Err(reason) => report.quarantined.push((row.clone(), reason)),
        }
    }
    for row in history_rows {
        match history_from_row(row) {
            Ok(entry) => report.history.push(entry),
            Err(reason) => report.quarantined.push((row.clone(), reason)),
        }
    }

    if !report.quarantined.is_empty() {
        log::warn!(
            "quarantined {} malformed row(s) during import",
            report.quarantined.len()
        );
    }

    report
}

/// Coerce a single raw row into a `Task`.
pub fn task_from_row(row: &Value) -> Result<Task, String> {
    Ok(Task {
        id: id_field(row, "id")?,
        text: text_field(row)?,
        completed: row.get("completed").and_then(Value::as_bool).unwrap_or(false),
        due_date: date_field(row, "dueDate")?,
        repeat: repeat_field(row)?,
    })
}

/// Coerce a single raw row into a `HistoryEntry`.
pub fn history_from_row(row: &Value) -> Result<HistoryEntry, String> {
    let history_id = match row.get("historyId") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err("missing or empty historyId".to_string()),
    };

    Ok(HistoryEntry {
        history_id,
        id: id_field(row, "id")?,
        text: text_field(row)?,
        completed: row.get("completed").and_then(Value::as_bool).unwrap_or(true),
        due_date: date_field(row, "dueDate")?,
        repeat: repeat_field(row)?,
        completed_at: date_field(row, "completedAt")?,
    })
}

// --- Field coercions ---

/// Ids arrive as strings, as bare numbers (legacy millisecond ids), or as
/// the tagged `{origin, value}` object this crate writes itself.
fn id_field(row: &Value, key: &str) -> Result<TaskId, String> {
    match row.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(TaskId::Remote(s.clone())),
        Some(Value::Number(n)) => Ok(TaskId::Remote(n.to_string())),
        Some(tagged @ Value::Object(_)) => serde_json::from_value::<TaskId>(tagged.clone())
            .map_err(|e| format!("unrecognized id shape: {e}")),
        _ => Err(format!("missing or empty {key}")),
    }
}

fn text_field(row: &Value) -> Result<String, String> {
    let raw = row
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing text".to_string())?;
    let text = raw.trim();
    if text.is_empty() {
        return Err("empty text".to_string());
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(format!("text exceeds {MAX_TEXT_LEN} characters"));
    }
    Ok(text.to_string())
}

fn date_field(row: &Value, key: &str) -> Result<chrono::NaiveDate, String> {
    let raw = row
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing {key}"))?;
    calendar::parse_date(raw).ok_or_else(|| format!("invalid {key} '{raw}'"))
}

/// A missing repeat field means a non-recurring task (rows written before
/// repeat rules existed); an unrecognized value is rejected.
fn repeat_field(row: &Value) -> Result<Repeat, String> {
    match row.get("repeat") {
        None | Some(Value::Null) => Ok(Repeat::None),
        Some(Value::String(s)) => {
            Repeat::from_str(s).map_err(|_| format!("unknown repeat rule '{s}'"))
        }
        Some(other) => Err(format!("repeat is not a string: {other}")),
    }
}
