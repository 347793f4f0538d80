// File: tests/logic_recurrence.rs
use chrono::NaiveDate;
use hecho::calendar;
use hecho::model::{RecurrenceEngine, Repeat};

fn d(s: &str) -> NaiveDate {
    calendar::parse_date(s).unwrap()
}

#[test]
fn test_none_matches_only_the_anchor() {
    let anchor = d("2024-03-01");
    assert!(RecurrenceEngine::is_occurrence(anchor, Repeat::None, anchor));
    assert!(!RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::None,
        d("2024-03-02")
    ));
    assert!(!RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::None,
        d("2024-02-29")
    ));
}

#[test]
fn test_daily_matches_anchor_and_everything_after() {
    let anchor = d("2024-06-01");
    assert!(RecurrenceEngine::is_occurrence(anchor, Repeat::Daily, anchor));
    assert!(RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Daily,
        d("2024-06-02")
    ));
    assert!(RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Daily,
        d("2025-01-15")
    ));
    assert!(!RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Daily,
        d("2024-05-31")
    ));
}

#[test]
fn test_weekly_matches_exact_week_multiples() {
    let anchor = d("2024-07-01"); // Monday
    for (date, expected) in [
        ("2024-07-01", true),
        ("2024-07-08", true),
        ("2024-07-15", true),
        ("2024-09-23", true), // 12 weeks out
        ("2024-07-02", false),
        ("2024-07-07", false),
        ("2024-06-24", false), // a week before the anchor
    ] {
        assert_eq!(
            RecurrenceEngine::is_occurrence(anchor, Repeat::Weekly, d(date)),
            expected,
            "weekly membership for {date}"
        );
    }

    // Membership is exactly "non-negative multiple of 7 days".
    for offset in 0..60 {
        let candidate = calendar::add_days(anchor, offset);
        assert_eq!(
            RecurrenceEngine::is_occurrence(anchor, Repeat::Weekly, candidate),
            offset % 7 == 0
        );
    }
}

#[test]
fn test_monthly_matches_same_day_of_month() {
    let anchor = d("2024-05-15");
    assert!(RecurrenceEngine::is_occurrence(anchor, Repeat::Monthly, anchor));
    assert!(RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Monthly,
        d("2024-06-15")
    ));
    assert!(RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Monthly,
        d("2025-02-15")
    ));
    assert!(!RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Monthly,
        d("2024-06-14")
    ));
    assert!(!RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Monthly,
        d("2024-04-15") // before the anchor
    ));
}

#[test]
fn test_monthly_day_31_skips_short_months() {
    // A month without the anchor's day produces no occurrence at all; the
    // membership test never clamps.
    let anchor = d("2024-01-31");
    assert!(!RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Monthly,
        d("2024-02-29")
    ));
    assert!(!RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Monthly,
        d("2024-04-30")
    ));
    assert!(RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Monthly,
        d("2024-03-31")
    ));
    assert!(RecurrenceEngine::is_occurrence(
        anchor,
        Repeat::Monthly,
        d("2024-05-31")
    ));
}

#[test]
fn test_next_anchor_daily_and_weekly() {
    assert_eq!(
        RecurrenceEngine::next_anchor(d("2024-06-30"), Repeat::Daily),
        d("2024-07-01")
    );
    assert_eq!(
        RecurrenceEngine::next_anchor(d("2024-12-31"), Repeat::Daily),
        d("2025-01-01")
    );
    assert_eq!(
        RecurrenceEngine::next_anchor(d("2024-07-01"), Repeat::Weekly),
        d("2024-07-08")
    );
}

#[test]
fn test_next_anchor_monthly_clamps_month_end() {
    // Jan 31 advances to the last valid day of February, leap-aware.
    assert_eq!(
        RecurrenceEngine::next_anchor(d("2024-01-31"), Repeat::Monthly),
        d("2024-02-29")
    );
    assert_eq!(
        RecurrenceEngine::next_anchor(d("2023-01-31"), Repeat::Monthly),
        d("2023-02-28")
    );
    assert_eq!(
        RecurrenceEngine::next_anchor(d("2024-03-31"), Repeat::Monthly),
        d("2024-04-30")
    );
    // The clamp rule always lands on that month's final day.
    let next = RecurrenceEngine::next_anchor(d("2024-01-31"), Repeat::Monthly);
    assert_eq!(next.to_string(), format!("2024-02-{}", calendar::days_in_month(next)));
}

#[test]
fn test_advance_always_lands_on_an_occurrence() {
    // For mid-month anchors the engine's own advance is always a member of
    // the series it advances.
    for (date, repeat) in [
        ("2024-06-01", Repeat::Daily),
        ("2024-06-01", Repeat::Weekly),
        ("2024-06-15", Repeat::Monthly),
        ("2024-11-30", Repeat::Daily),
        ("2023-02-28", Repeat::Monthly),
    ] {
        let anchor = d(date);
        let next = RecurrenceEngine::next_anchor(anchor, repeat);
        assert!(
            RecurrenceEngine::is_occurrence(anchor, repeat, next),
            "advance from {date} ({repeat}) landed off-series at {next}"
        );
    }
}

#[test]
fn test_repeated_monthly_advance_stays_on_clamped_day() {
    // Once clamped from the 31st to Feb 29, the anchor keeps the new day.
    let mut anchor = d("2024-01-31");
    anchor = RecurrenceEngine::next_anchor(anchor, Repeat::Monthly);
    assert_eq!(anchor, d("2024-02-29"));
    anchor = RecurrenceEngine::next_anchor(anchor, Repeat::Monthly);
    assert_eq!(anchor, d("2024-03-29"));
    anchor = RecurrenceEngine::next_anchor(anchor, Repeat::Monthly);
    assert_eq!(anchor, d("2024-04-29"));
}
