// File: src/model/recurrence.rs
use crate::calendar;
use crate::model::item::Repeat;
use chrono::{Datelike, NaiveDate};

/// Pure occurrence arithmetic over `(anchor, repeat, candidate)` triples.
///
/// The anchor is a task's `due_date`; it only moves when a completion (or a
/// skip-one delete) consumes the current occurrence.
pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Is `candidate` a day on which a task anchored at `anchor` is due?
    ///
    /// Monthly rules match on day-of-month and never clamp: a month without
    /// the anchor's day (day 31 in April, day 30 in February) simply has no
    /// occurrence.
    pub fn is_occurrence(anchor: NaiveDate, repeat: Repeat, candidate: NaiveDate) -> bool {
        match repeat {
            Repeat::None => candidate == anchor,
            Repeat::Daily => candidate >= anchor,
            Repeat::Weekly => {
                candidate >= anchor && calendar::days_between(anchor, candidate) % 7 == 0
            }
            Repeat::Monthly => candidate >= anchor && candidate.day() == anchor.day(),
        }
    }

    /// The anchor a task moves to once its current occurrence is consumed.
    ///
    /// Monthly advances clamp into short months (Jan 31 -> Feb 28/29), so
    /// the anchor of a month-end task drifts to the clamped day and stays
    /// there. Never called for `Repeat::None` by the store; kept total by
    /// returning the anchor unchanged.
    pub fn next_anchor(anchor: NaiveDate, repeat: Repeat) -> NaiveDate {
        match repeat {
            Repeat::None => anchor,
            Repeat::Daily => calendar::add_days(anchor, 1),
            Repeat::Weekly => calendar::add_days(anchor, 7),
            Repeat::Monthly => calendar::add_months(anchor, 1),
        }
    }
}
