//! Dashboard analytics.
//!
//! Today's counter, the seven-day trend, quick weekly stats and the
//! recovery timeline, all computed from the user's recent logs.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::Serialize;

use super::budget::{days_within_budget, BudgetStatus};
use super::bucketing::{weekly_trend, WeeklyTrend, WEEK_DAYS};
use super::projection::SpendSummary;
use super::recovery::{RecoveryStatus, RecoveryTracker};
use crate::config::AnalyticsConfig;
use crate::format::greeting;
use crate::types::{
    effective_budget, effective_unit_price, latest_log_time, Phase, Profile, SmokeLog,
};

/// Name used in the greeting when the profile has none.
const FALLBACK_NAME: &str = "there";

/// How many of today's logs the dashboard lists.
pub const RECENT_LOGS_LIMIT: usize = 5;

/// Dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// e.g. "Good evening, Sam"
    pub greeting: String,
    pub phase: Phase,
    pub phase_tagline: &'static str,

    // Today
    /// Logs on today's local calendar day
    pub today_count: u32,
    pub last_logged_at: Option<DateTime<Utc>>,
    pub budget: BudgetStatus,
    /// Today's latest logs, newest first
    pub recent_today: Vec<SmokeLog>,

    // Week
    pub trend: WeeklyTrend,
    pub week_total: u32,
    /// `week_total / 7`
    pub week_daily_average: f64,
    pub weekly_spend: f64,
    /// Monthly cost at this week's rate
    pub monthly_projection: f64,
    /// Hours spent smoking this week
    pub weekly_hours: f64,
    /// Days of the week within budget, when a budget is set
    pub days_within_budget: Option<usize>,

    /// Recovery since the last log, `None` before the first log
    pub recovery: Option<RecoveryStatus>,
}

impl DashboardStats {
    /// Compute the dashboard from logs covering at least the last seven days.
    pub fn compute<Tz: TimeZone>(
        events: &[SmokeLog],
        profile: Option<&Profile>,
        settings: &AnalyticsConfig,
        now: &DateTime<Tz>,
    ) -> Self {
        let trend = weekly_trend(events, now);
        let week_total = trend.series.total();
        let today_count = trend.today;

        let budget = effective_budget(profile);
        let price = effective_unit_price(profile, settings.default_unit_price);
        let spend = SpendSummary::compute(week_total, WEEK_DAYS, price, settings.minutes_per_unit);

        let last_logged_at = latest_log_time(events);
        let recovery = RecoveryTracker::new(last_logged_at).status(now.with_timezone(&Utc));

        let phase = profile.map(|p| p.phase).unwrap_or_default();
        let name = profile
            .and_then(|p| p.display_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(FALLBACK_NAME);

        Self {
            greeting: greeting(now.hour() as u8, name),
            phase,
            phase_tagline: phase.tagline(),
            today_count,
            last_logged_at,
            budget: BudgetStatus::evaluate(today_count, budget),
            recent_today: recent_today(events, now),
            days_within_budget: budget.map(|b| days_within_budget(&trend.series, b)),
            week_total,
            week_daily_average: spend.daily_average,
            weekly_spend: spend.total_spent,
            monthly_projection: spend.monthly_projection,
            weekly_hours: spend.hours_spent(),
            trend,
            recovery,
        }
    }
}

/// Up to [`RECENT_LOGS_LIMIT`] logs from `now`'s local day, newest first.
fn recent_today<Tz: TimeZone>(events: &[SmokeLog], now: &DateTime<Tz>) -> Vec<SmokeLog> {
    let today = now.date_naive();
    let tz = now.timezone();
    let mut todays: Vec<_> = events
        .iter()
        .filter_map(|log| log.occurred_at().map(|ts| (ts, log)))
        .filter(|(ts, _)| ts.with_timezone(&tz).date_naive() == today)
        .collect();
    todays.sort_by(|a, b| b.0.cmp(&a.0));
    todays
        .into_iter()
        .take(RECENT_LOGS_LIMIT)
        .map(|(_, log)| log.clone())
        .collect()
}
