// File: src/focus.rs
//! Focus-session state machine (pomodoro-style work/break cycles).
//!
//! Pure logic: the session advances only when the caller feeds it seconds
//! via `tick()`. No timers, threads or IO live here — whatever drives the
//! UI clock drives this.
use crate::config::FocusConfig;
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FocusKind {
    Pomodoro,
    Short,
    Deep,
}

impl FocusKind {
    fn work_secs(&self, cfg: &FocusConfig) -> u32 {
        let mins = match self {
            FocusKind::Pomodoro => cfg.pomodoro_mins,
            FocusKind::Short => cfg.short_sprint_mins,
            FocusKind::Deep => cfg.deep_work_mins,
        };
        mins * 60
    }
}

/// Emitted by `tick()` when a phase boundary is crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    /// The work phase finished; the session is now on a break.
    BreakStarted,
    /// The break finished; the session is back to work.
    WorkStarted,
}

#[derive(Debug, Clone)]
pub struct FocusSession {
    pub kind: FocusKind,
    pub on_break: bool,
    pub elapsed_secs: u32,
    pub distractions: u32,
    work_secs: u32,
    break_secs: u32,
}

impl FocusSession {
    pub fn start(kind: FocusKind, cfg: &FocusConfig) -> Self {
        Self {
            kind,
            on_break: false,
            elapsed_secs: 0,
            distractions: 0,
            work_secs: kind.work_secs(cfg),
            break_secs: cfg.break_mins * 60,
        }
    }

    fn phase_secs(&self) -> u32 {
        if self.on_break { self.break_secs } else { self.work_secs }
    }

    /// Advance the session by one second. Returns the phase transition if
    /// this second crossed a boundary.
    pub fn tick(&mut self) -> Option<FocusEvent> {
        self.elapsed_secs += 1;
        if self.elapsed_secs < self.phase_secs() {
            return None;
        }
        self.elapsed_secs = 0;
        self.on_break = !self.on_break;
        Some(if self.on_break {
            FocusEvent::BreakStarted
        } else {
            FocusEvent::WorkStarted
        })
    }

    pub fn record_distraction(&mut self) {
        self.distractions += 1;
    }

    pub fn remaining_secs(&self) -> u32 {
        self.phase_secs().saturating_sub(self.elapsed_secs)
    }

    /// Elapsed phase time as `M:SS`, the way the timer screen shows it.
    pub fn format_clock(&self) -> String {
        let mins = self.elapsed_secs / 60;
        let secs = self.elapsed_secs % 60;
        format!("{}:{:02}", mins, secs)
    }
}
