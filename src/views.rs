// File: src/views.rs
//! Pure projections over store state: the day list, the 7-day upcoming
//! list, the grouped completion history and the totals for the stats
//! screen. Nothing in this module mutates anything.
use crate::model::{HistoryEntry, RecurrenceEngine, Repeat, Task};
use chrono::NaiveDate;

/// Days ahead of today covered by the upcoming view (today+1 ..= today+6).
pub const UPCOMING_HORIZON_DAYS: i64 = 6;

/// One row of the day view.
#[derive(Debug, Clone, PartialEq)]
pub enum DayRow {
    /// A task still to be done on the selected day. `overdue` marks items
    /// carried forward from an earlier due date (today view only).
    Pending { task: Task, overdue: bool },
    /// A completion recorded earlier on the selected day.
    Done { entry: HistoryEntry },
}

impl DayRow {
    pub fn is_pending(&self) -> bool {
        matches!(self, DayRow::Pending { .. })
    }
}

/// One row of the upcoming view.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingRow {
    /// The occurrence date this row stands for.
    pub date: NaiveDate,
    pub task: Task,
    /// Daily tasks get a single representative row instead of one per day.
    pub daily: bool,
}

/// Totals shown on the stats screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub active: usize,
    pub completed: usize,
}

impl Stats {
    /// Share of completed items over everything ever tracked, 0..=100.
    pub fn progress_percent(&self) -> u8 {
        let total = self.active + self.completed;
        if total == 0 {
            return 0;
        }
        ((self.completed * 100 + total / 2) / total) as u8
    }
}

/// Tasks due on `selected`, plus — when `selected` is today — overdue
/// carry-forwards and the completions already recorded today.
///
/// Ordering: pending rows before done rows; pending ascending by due date
/// (overdue first) with newer tasks first on equal dates; done rows newest
/// first.
pub fn day_view(
    tasks: &[Task],
    history: &[HistoryEntry],
    selected: NaiveDate,
    today: NaiveDate,
) -> Vec<DayRow> {
    let is_today = selected == today;

    // Reverse insertion order gives newest-first; the stable sort below
    // keeps that as the tie-break within a due date.
    let mut pending: Vec<&Task> = tasks
        .iter()
        .rev()
        .filter(|t| !t.completed)
        .filter(|t| {
            RecurrenceEngine::is_occurrence(t.due_date, t.repeat, selected)
                || (is_today && t.due_date < today)
        })
        .collect();
    pending.sort_by_key(|t| t.due_date);

    let mut rows: Vec<DayRow> = pending
        .into_iter()
        .map(|t| DayRow::Pending {
            task: t.clone(),
            overdue: is_today && t.due_date < today,
        })
        .collect();

    if is_today {
        rows.extend(
            history
                .iter()
                .rev()
                .filter(|h| h.completed_at == today)
                .map(|h| DayRow::Done { entry: h.clone() }),
        );
    }

    rows
}

/// Occurrences strictly after `today` through `today + 6`, one row per
/// occurrence date — except daily tasks, which contribute one representative
/// row flagged `daily`. Overdue tasks are excluded; they belong to the day
/// view's carry-forward clause.
///
/// Rows are sorted by occurrence date ascending, newer tasks first within a
/// date.
pub fn upcoming_view(tasks: &[Task], today: NaiveDate) -> Vec<UpcomingRow> {
    let horizon = crate::calendar::add_days(today, UPCOMING_HORIZON_DAYS);
    let mut rows: Vec<UpcomingRow> = Vec::new();

    for task in tasks.iter().rev() {
        if task.completed || task.due_date < today {
            continue;
        }
        match task.repeat {
            Repeat::Daily => {
                // First occurrence inside the window stands in for the rest.
                let first = task.due_date.max(crate::calendar::add_days(today, 1));
                if first <= horizon {
                    rows.push(UpcomingRow {
                        date: first,
                        task: task.clone(),
                        daily: true,
                    });
                }
            }
            _ => {
                let mut date = crate::calendar::add_days(today, 1);
                while date <= horizon {
                    if RecurrenceEngine::is_occurrence(task.due_date, task.repeat, date) {
                        rows.push(UpcomingRow {
                            date,
                            task: task.clone(),
                            daily: false,
                        });
                    }
                    date = crate::calendar::add_days(date, 1);
                }
            }
        }
    }

    rows.sort_by_key(|r| r.date);
    rows
}

/// History grouped by completion day: groups descending by date, entries
/// within a group newest first.
pub fn history_view(history: &[HistoryEntry]) -> Vec<(NaiveDate, Vec<HistoryEntry>)> {
    let mut groups: Vec<(NaiveDate, Vec<HistoryEntry>)> = Vec::new();

    for entry in history.iter().rev() {
        match groups.iter_mut().find(|(day, _)| *day == entry.completed_at) {
            Some((_, entries)) => entries.push(entry.clone()),
            None => groups.push((entry.completed_at, vec![entry.clone()])),
        }
    }

    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups
}

/// Counts for the stats screen: everything still pending vs. everything
/// ever completed.
pub fn stats(tasks: &[Task], history: &[HistoryEntry]) -> Stats {
    Stats {
        active: tasks.iter().filter(|t| !t.completed).count(),
        completed: history.len(),
    }
}
