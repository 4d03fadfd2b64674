//! Windowed statistics for the stats view.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::breakdown::{breakdown, CategoryCount, Dimension};
use super::bucketing::{daily_series, hourly_histogram, DailyBucket, DailySeries, HourlyHistogram};
use super::projection::{projection_baseline, reward_equivalents, Reward, SpendSummary};
use crate::config::AnalyticsConfig;
use crate::types::{effective_unit_price, Profile, SmokeLog};

/// Moods listed in the stats view.
const TOP_MOODS: usize = 5;

/// Overview of the last `window_days` local days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub window_days: u32,
    pub series: DailySeries,
    /// Logs inside the window
    pub total: u32,
    /// `total / window_days`
    pub daily_average: f64,
    /// Day with the fewest logs (earliest on ties)
    pub best_day: Option<DailyBucket>,
    /// Day with the most logs (earliest on ties)
    pub peak_day: Option<DailyBucket>,
    pub hourly: HourlyHistogram,
    pub peak_hour: u8,
    pub top_moods: Vec<CategoryCount>,
    pub spend: SpendSummary,
    /// Purchases the yearly spend would cover
    pub rewards: Vec<&'static Reward>,
    /// Starting point for the projection slider
    pub projection_baseline: f64,
}

impl StatsReport {
    /// Compute the report for `events` as seen at `now`.
    pub fn compute<Tz: TimeZone>(
        events: &[SmokeLog],
        profile: Option<&Profile>,
        settings: &AnalyticsConfig,
        now: &DateTime<Tz>,
    ) -> Self {
        let window_days = settings.stats_window_days;
        let series = daily_series(events, window_days, now);
        let total = series.total();

        // Only logs that landed in a bucket feed the histogram and moods
        let in_window: Vec<SmokeLog> = match (series.buckets.first(), series.buckets.last()) {
            (Some(first), Some(last)) => {
                let tz = now.timezone();
                events
                    .iter()
                    .filter(|log| {
                        log.occurred_at().is_some_and(|ts| {
                            let day = ts.with_timezone(&tz).date_naive();
                            day >= first.day && day <= last.day
                        })
                    })
                    .cloned()
                    .collect()
            }
            _ => Vec::new(),
        };

        let hourly = hourly_histogram(&in_window, &now.timezone());
        let mut top_moods = breakdown(&in_window, Dimension::Mood);
        top_moods.truncate(TOP_MOODS);

        let price = effective_unit_price(profile, settings.default_unit_price);
        let spend = SpendSummary::compute(total, window_days, price, settings.minutes_per_unit);
        let daily_average = spend.daily_average;

        tracing::debug!(window_days, total, daily_average, "Computed stats report");

        Self {
            window_days,
            total,
            daily_average,
            best_day: min_first(&series),
            peak_day: max_first(&series),
            peak_hour: hourly.peak_hour(),
            hourly,
            top_moods,
            rewards: reward_equivalents(spend.yearly_projection),
            projection_baseline: projection_baseline(daily_average),
            spend,
            series,
        }
    }
}

fn min_first(series: &DailySeries) -> Option<DailyBucket> {
    series
        .buckets
        .iter()
        .copied()
        .reduce(|best, b| if b.count < best.count { b } else { best })
}

fn max_first(series: &DailySeries) -> Option<DailyBucket> {
    series
        .buckets
        .iter()
        .copied()
        .reduce(|peak, b| if b.count > peak.count { b } else { peak })
}
