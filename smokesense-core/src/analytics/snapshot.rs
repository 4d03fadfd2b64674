//! Point-in-time bundle of every view.
//!
//! Nothing is cached between snapshots. After a [`crate::db::LogChange`]
//! the caller computes a fresh snapshot and compares it with the previous
//! one to decide whether anything needs redrawing.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::dashboard::DashboardStats;
use super::insights::Insights;
use super::stats::StatsReport;
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::types::{Profile, SmokeLog};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub dashboard: DashboardStats,
    pub stats: StatsReport,
    pub insights: Insights,
}

impl AnalyticsSnapshot {
    /// Compute all views from the user's full log history.
    pub fn compute<Tz: TimeZone>(
        events: &[SmokeLog],
        profile: Option<&Profile>,
        settings: &AnalyticsConfig,
        now: &DateTime<Tz>,
    ) -> Self {
        Self {
            dashboard: DashboardStats::compute(events, profile, settings, now),
            stats: StatsReport::compute(events, profile, settings, now),
            insights: Insights::compute(events, &now.timezone()),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};

    #[test]
    fn test_snapshot_changes_only_with_logs() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let now = tz.with_ymd_and_hms(2025, 4, 2, 12, 0, 0).unwrap();
        let settings = AnalyticsConfig::default();

        let mut events: Vec<SmokeLog> = (1..=4)
            .map(|h| SmokeLog::new("u1", (now - Duration::hours(h)).with_timezone(&Utc)))
            .collect();
        let before = AnalyticsSnapshot::compute(&events, None, &settings, &now);
        assert_eq!(before, AnalyticsSnapshot::compute(&events, None, &settings, &now));
        assert!(matches!(before.insights, Insights::NotEnoughData { logged: 4, .. }));

        events.push(SmokeLog::new("u1", now.with_timezone(&Utc)));
        let after = AnalyticsSnapshot::compute(&events, None, &settings, &now);
        assert_ne!(before, after);
        assert_eq!(after.dashboard.today_count, 5);
        assert!(after.insights.report().is_some());
    }

    #[test]
    fn test_snapshot_json() {
        let now = Utc::now();
        let snapshot = AnalyticsSnapshot::compute(&[], None, &AnalyticsConfig::default(), &now);
        let json = snapshot.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["insights"]["status"], "not_enough_data");
        assert_eq!(value["dashboard"]["budget"]["state"], "unset");
        assert_eq!(value["stats"]["series"]["buckets"].as_array().unwrap().len(), 30);
    }
}
