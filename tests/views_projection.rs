// File: tests/views_projection.rs
use chrono::NaiveDate;
use hecho::calendar;
use hecho::model::Repeat;
use hecho::store::TaskStore;
use hecho::views::{self, DayRow};

fn d(s: &str) -> NaiveDate {
    calendar::parse_date(s).unwrap()
}

fn pending_texts(rows: &[DayRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| match r {
            DayRow::Pending { task, .. } => Some(task.text.clone()),
            DayRow::Done { .. } => None,
        })
        .collect()
}

#[test]
fn test_day_view_shows_tasks_due_on_selected_date() {
    let mut store = TaskStore::new();
    store.add_task("Today", d("2024-03-05"), Repeat::None).unwrap();
    store.add_task("Tomorrow", d("2024-03-06"), Repeat::None).unwrap();

    let rows = views::day_view(store.tasks(), store.history(), d("2024-03-05"), d("2024-03-05"));
    assert_eq!(pending_texts(&rows), vec!["Today"]);
}

#[test]
fn test_day_view_projects_recurring_occurrences() {
    let mut store = TaskStore::new();
    store.add_task("Weekly", d("2024-07-01"), Repeat::Weekly).unwrap();
    store.add_task("Monthly", d("2024-07-08"), Repeat::Monthly).unwrap();

    // Viewing a future date: the weekly occurrence lands there, the monthly
    // anchor does too.
    let rows = views::day_view(store.tasks(), store.history(), d("2024-07-08"), d("2024-07-01"));
    let texts = pending_texts(&rows);
    assert!(texts.contains(&"Weekly".to_string()));
    assert!(texts.contains(&"Monthly".to_string()));

    // A non-occurrence day shows neither.
    let rows = views::day_view(store.tasks(), store.history(), d("2024-07-05"), d("2024-07-01"));
    assert!(rows.is_empty());
}

#[test]
fn test_day_view_surfaces_overdue_only_on_today() {
    // A one-off task due in the past carries forward into today's view,
    // flagged overdue.
    let mut store = TaskStore::new();
    store.add_task("Late", d("2024-03-01"), Repeat::None).unwrap();

    let today = d("2024-03-05");
    let rows = views::day_view(store.tasks(), store.history(), today, today);
    assert_eq!(rows.len(), 1);
    assert!(matches!(&rows[0], DayRow::Pending { task, overdue: true } if task.text == "Late"));

    // The same task does not leak into other selected days.
    let rows = views::day_view(store.tasks(), store.history(), d("2024-03-06"), today);
    assert!(rows.is_empty());
}

#[test]
fn test_day_view_appends_todays_completions() {
    let mut store = TaskStore::new();
    let keep = store.add_task("Still open", d("2024-03-05"), Repeat::None).unwrap();
    let done = store.add_task("Done already", d("2024-03-05"), Repeat::None).unwrap();
    store.complete_task(&done.id, d("2024-03-05")).unwrap();

    let today = d("2024-03-05");
    let rows = views::day_view(store.tasks(), store.history(), today, today);
    assert_eq!(rows.len(), 2);
    // Pending before completed.
    assert!(matches!(&rows[0], DayRow::Pending { task, overdue: false } if task.id == keep.id));
    assert!(matches!(&rows[1], DayRow::Done { entry } if entry.text == "Done already"));

    // Yesterday's completions do not show on another day's view.
    let rows = views::day_view(store.tasks(), store.history(), d("2024-03-06"), d("2024-03-06"));
    assert!(rows.iter().all(DayRow::is_pending));
}

#[test]
fn test_day_view_sorts_overdue_first_then_newest() {
    let mut store = TaskStore::new();
    store.add_task("Older overdue", d("2024-03-01"), Repeat::None).unwrap();
    store.add_task("Newer overdue", d("2024-03-01"), Repeat::None).unwrap();
    store.add_task("Due today", d("2024-03-05"), Repeat::None).unwrap();

    let today = d("2024-03-05");
    let rows = views::day_view(store.tasks(), store.history(), today, today);
    assert_eq!(
        pending_texts(&rows),
        vec!["Newer overdue", "Older overdue", "Due today"]
    );
}

#[test]
fn test_upcoming_excludes_today_and_overdue() {
    let mut store = TaskStore::new();
    store.add_task("Overdue", d("2024-06-01"), Repeat::None).unwrap();
    store.add_task("Today", d("2024-06-02"), Repeat::None).unwrap();
    store.add_task("Tomorrow", d("2024-06-03"), Repeat::None).unwrap();
    store.add_task("In six days", d("2024-06-08"), Repeat::None).unwrap();
    store.add_task("In seven days", d("2024-06-09"), Repeat::None).unwrap();

    let rows = views::upcoming_view(store.tasks(), d("2024-06-02"));
    let texts: Vec<_> = rows.iter().map(|r| r.task.text.clone()).collect();
    assert_eq!(texts, vec!["Tomorrow", "In six days"]);
}

#[test]
fn test_upcoming_collapses_daily_to_one_row() {
    let mut store = TaskStore::new();
    store.add_task("Stretch", d("2024-06-01"), Repeat::Daily).unwrap();

    let rows = views::upcoming_view(store.tasks(), d("2024-06-02"));
    assert_eq!(rows.len(), 1);
    assert!(rows[0].daily);
    assert_eq!(rows[0].date, d("2024-06-03"));
}

#[test]
fn test_upcoming_daily_anchored_in_the_window_starts_there() {
    let mut store = TaskStore::new();
    store.add_task("Starts Friday", d("2024-06-07"), Repeat::Daily).unwrap();

    let rows = views::upcoming_view(store.tasks(), d("2024-06-03"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, d("2024-06-07"));
    assert!(rows[0].daily);
}

#[test]
fn test_upcoming_projects_weekly_within_window() {
    let mut store = TaskStore::new();
    store.add_task("Review", d("2024-07-01"), Repeat::Weekly).unwrap();

    // Today is the anchor day; the next occurrence is exactly 7 days out,
    // outside the (today, today+6] window.
    let rows = views::upcoming_view(store.tasks(), d("2024-07-01"));
    assert!(rows.is_empty());

    // A day later, July 8 falls inside the window.
    let rows = views::upcoming_view(store.tasks(), d("2024-07-02"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, d("2024-07-08"));
    assert!(!rows[0].daily);
}

#[test]
fn test_upcoming_sorts_by_date_then_newest() {
    let mut store = TaskStore::new();
    store.add_task("A", d("2024-06-05"), Repeat::None).unwrap();
    store.add_task("B", d("2024-06-04"), Repeat::None).unwrap();
    store.add_task("C", d("2024-06-05"), Repeat::None).unwrap();

    let rows = views::upcoming_view(store.tasks(), d("2024-06-02"));
    let texts: Vec<_> = rows.iter().map(|r| r.task.text.clone()).collect();
    assert_eq!(texts, vec!["B", "C", "A"]);
}

#[test]
fn test_history_groups_by_day_newest_first() {
    let mut store = TaskStore::new();
    let t1 = store.add_task("First", d("2024-06-01"), Repeat::None).unwrap();
    let t2 = store.add_task("Second", d("2024-06-01"), Repeat::None).unwrap();
    let t3 = store.add_task("Third", d("2024-06-02"), Repeat::None).unwrap();
    store.complete_task(&t1.id, d("2024-06-01")).unwrap();
    store.complete_task(&t2.id, d("2024-06-01")).unwrap();
    store.complete_task(&t3.id, d("2024-06-02")).unwrap();

    let groups = views::history_view(store.history());
    assert_eq!(groups.len(), 2);

    // Groups descending by day.
    assert_eq!(groups[0].0, d("2024-06-02"));
    assert_eq!(groups[1].0, d("2024-06-01"));

    // Within a day, most recent completion first.
    let day_one: Vec<_> = groups[1].1.iter().map(|e| e.text.clone()).collect();
    assert_eq!(day_one, vec!["Second", "First"]);
}

#[test]
fn test_stats_counts_and_percent() {
    let mut store = TaskStore::new();
    let a = store.add_task("A", d("2024-06-01"), Repeat::None).unwrap();
    store.add_task("B", d("2024-06-01"), Repeat::None).unwrap();
    store.add_task("C", d("2024-06-01"), Repeat::None).unwrap();
    store.complete_task(&a.id, d("2024-06-01")).unwrap();

    let stats = views::stats(store.tasks(), store.history());
    assert_eq!(stats.active, 2);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.progress_percent(), 33);

    let empty = views::stats(&[], &[]);
    assert_eq!(empty.progress_percent(), 0);
}
