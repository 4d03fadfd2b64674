//! Analytics module for smokesense
//!
//! Pure functions over slices of [`SmokeLog`](crate::types::SmokeLog):
//! - Daily series, hourly histogram and weekly trend
//! - Mood / activity / location breakdowns
//! - Savings and time projections
//! - Health-recovery milestones
//! - Archetype classification
//! - Dashboard, stats and insights views
//!
//! Every function takes the reference time explicitly, so results depend
//! only on their inputs. None of them fail: thin data yields a sentinel
//! value and out-of-range inputs are clamped.

pub mod archetype;
pub mod breakdown;
pub mod budget;
pub mod bucketing;
pub mod dashboard;
pub mod insights;
pub mod projection;
pub mod recovery;
pub mod snapshot;
pub mod stats;

pub use archetype::{classify, Archetype, Classification};
pub use breakdown::{
    breakdown, BreakdownSet, CategoryCount, CategoryValue, Dimension, MIN_EVENTS_FOR_INSIGHTS,
};
pub use budget::{days_within_budget, BudgetStatus};
pub use bucketing::{
    all_time_series, daily_series, hourly_histogram, weekly_trend, DailyBucket, DailySeries,
    HourlyHistogram, TrendDirection, WeeklyTrend, WEEK_DAYS,
};
pub use dashboard::DashboardStats;
pub use insights::{InsightReport, Insights, Tip, TipKind};
pub use projection::{
    project, project_with, projection_baseline, reward_equivalents, Projection, Reward,
    SpendSummary,
};
pub use recovery::{
    current_milestone, elapsed_minutes, milestone_states, Milestone, MilestoneState,
    RecoveryStatus, RecoveryTracker, MILESTONES,
};
pub use snapshot::AnalyticsSnapshot;
pub use stats::StatsReport;
