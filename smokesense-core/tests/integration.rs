//! Integration tests for the log store and analytics pipeline
//!
//! These tests write logs through a file-backed [`Database`] and check the
//! views computed from what comes back out.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use smokesense_core::analytics::{
    AnalyticsSnapshot, Archetype, BudgetStatus, Insights, RecoveryTracker,
};
use smokesense_core::config::AnalyticsConfig;
use smokesense_core::db::{Database, LogChange, LogFilter};
use smokesense_core::types::{Activity, Location, Mood, Profile, SmokeLog};
use tempfile::TempDir;

const USER: &str = "tester";

fn tz() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
}

fn local(d: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
    tz().with_ymd_and_hms(2025, 7, d, h, m, 0).unwrap()
}

fn log_at(ts: DateTime<FixedOffset>) -> SmokeLog {
    SmokeLog::new(USER, ts.with_timezone(&Utc))
}

fn open_db(dir: &TempDir) -> Database {
    let db = Database::open(&dir.path().join("data.db")).expect("open should succeed");
    db.migrate().expect("migrate should succeed");
    db
}

fn snapshot(db: &Database, now: &DateTime<FixedOffset>) -> AnalyticsSnapshot {
    let logs = db.list_logs(USER, &LogFilter::default()).unwrap();
    let profile = db.get_profile(USER).unwrap();
    AnalyticsSnapshot::compute(&logs, profile.as_ref(), &AnalyticsConfig::default(), now)
}

// ============================================
// Store -> views
// ============================================

#[test]
fn test_logs_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let db = open_db(&dir);
        db.insert_log(&log_at(local(3, 9, 0)).with_mood(Mood::Bored))
            .unwrap();
    }

    let db = open_db(&dir);
    let logs = db.list_logs(USER, &LogFilter::default()).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].mood, Some(Mood::Bored));
}

#[test]
fn test_stress_pattern_end_to_end() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);

    let mut profile = Profile::new(USER);
    profile.daily_budget = Some(4);
    profile.unit_price = Some(18.0);
    db.save_profile(&profile).unwrap();

    for d in 1..=6 {
        db.insert_log(
            &log_at(local(d, 10, 0))
                .with_mood(Mood::Stressed)
                .with_activity(Activity::Work)
                .with_location(Location::Work),
        )
        .unwrap();
        db.insert_log(&log_at(local(d, 15, 0)).with_mood(Mood::Happy))
            .unwrap();
    }

    let now = local(6, 18, 0);
    let snap = snapshot(&db, &now);

    assert_eq!(snap.dashboard.today_count, 2);
    assert_eq!(snap.dashboard.week_total, 12);
    assert!(matches!(snap.dashboard.budget, BudgetStatus::Under { remaining: 2, .. }));
    assert_eq!(snap.dashboard.days_within_budget, Some(6));

    assert_eq!(snap.stats.total, 12);
    assert_eq!(snap.stats.peak_hour, 10);
    assert!((snap.stats.spend.total_spent - 12.0 * 18.0).abs() < 1e-9);

    let report = snap.insights.report().expect("insights should be unlocked");
    assert_eq!(report.archetype, Archetype::StressReliever);
    assert_eq!(report.main_trigger, Some("Stressed"));
    assert!((report.daily_average - 2.0).abs() < 1e-9);
}

#[test]
fn test_reset_today_uses_local_midnight() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);

    // 00:15 local on the 10th is still the 9th in UTC
    db.insert_log(&log_at(local(10, 0, 15))).unwrap();
    db.insert_log(&log_at(local(9, 23, 50))).unwrap();

    let now = local(10, 12, 0);
    assert_eq!(snapshot(&db, &now).dashboard.today_count, 1);

    let midnight = tz()
        .from_local_datetime(&now.date_naive().and_hms_opt(0, 0, 0).unwrap())
        .unwrap();
    let removed = db
        .delete_logs_since(USER, midnight.with_timezone(&Utc))
        .unwrap();
    assert_eq!(removed, 1);

    let snap = snapshot(&db, &now);
    assert_eq!(snap.dashboard.today_count, 0);
    assert_eq!(snap.dashboard.week_total, 1);
}

// ============================================
// Change notifications
// ============================================

#[test]
fn test_recompute_on_change() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);
    let changes = db.subscribe();

    let now = local(20, 21, 0);
    let mut tracker = RecoveryTracker::default();
    let mut previous = snapshot(&db, &now);
    assert!(matches!(previous.insights, Insights::NotEnoughData { logged: 0, .. }));

    for i in 0..5 {
        let log = log_at(now - Duration::hours(i + 1));
        db.insert_log(&log).unwrap();

        let change = changes.try_recv().expect("insert should notify");
        assert_eq!(change.user_id(), USER);
        if let Some(ts) = log.occurred_at() {
            tracker.on_log(ts);
        }

        let next = snapshot(&db, &now);
        assert_ne!(next, previous);
        previous = next;
    }

    assert!(previous.insights.report().is_some());
    // The first insert is the latest log, an hour before now
    assert_eq!(
        tracker.status(now.with_timezone(&Utc)),
        previous.dashboard.recovery
    );

    db.delete_all_logs(USER).unwrap();
    assert_eq!(
        changes.try_recv().unwrap(),
        LogChange::Deleted {
            user_id: USER.to_string(),
            count: 5
        }
    );
    tracker.clear();

    let cleared = snapshot(&db, &now);
    assert!(cleared.dashboard.recovery.is_none());
    assert_eq!(tracker.status(now.with_timezone(&Utc)), None);
}
