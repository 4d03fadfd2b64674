//! Time bucketing for chart series.
//!
//! Every function here takes the reference "now" explicitly and reads the
//! viewer's time zone from it, so the same inputs always produce the same
//! buckets. "Today" is always the local calendar day of `now`.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Timelike};
use serde::Serialize;

use crate::types::SmokeLog;

/// Window used by the dashboard trend.
pub const WEEK_DAYS: u32 = 7;

/// Number of logs on one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    /// Local calendar date
    pub day: NaiveDate,
    pub count: u32,
}

/// Consecutive daily buckets, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub buckets: Vec<DailyBucket>,
}

impl DailySeries {
    /// Number of logs across all buckets.
    pub fn total(&self) -> u32 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Mean logs per bucket (0 for an empty series).
    pub fn average(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.total() as f64 / self.buckets.len() as f64
        }
    }

    /// Highest single-day count.
    pub fn max_count(&self) -> u32 {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Lowest single-day count.
    pub fn min_count(&self) -> u32 {
        self.buckets.iter().map(|b| b.count).min().unwrap_or(0)
    }

    /// Bucket for the most recent day.
    pub fn today(&self) -> Option<&DailyBucket> {
        self.buckets.last()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Local calendar date of a log, or `None` if its timestamp is malformed.
fn local_date<Tz: TimeZone>(log: &SmokeLog, tz: &Tz) -> Option<NaiveDate> {
    log.occurred_at()
        .map(|ts| ts.with_timezone(tz).date_naive())
}

/// Build the series covering `first..=last` from pre-computed local dates.
fn fill_series(first: NaiveDate, last: NaiveDate, dates: &[NaiveDate]) -> DailySeries {
    let span = (last - first).num_days();
    if span < 0 {
        return DailySeries::default();
    }

    let mut buckets: Vec<DailyBucket> = (0..=span as u64)
        .filter_map(|offset| first.checked_add_days(Days::new(offset)))
        .map(|day| DailyBucket { day, count: 0 })
        .collect();

    for date in dates {
        let offset = (*date - first).num_days();
        if offset < 0 {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(offset as usize) {
            bucket.count += 1;
        }
    }

    DailySeries { buckets }
}

/// Collect valid local dates, logging how many logs were skipped.
fn valid_local_dates<Tz: TimeZone>(events: &[SmokeLog], tz: &Tz) -> Vec<NaiveDate> {
    let dates: Vec<NaiveDate> = events.iter().filter_map(|log| local_date(log, tz)).collect();
    let skipped = events.len() - dates.len();
    if skipped > 0 {
        tracing::warn!(skipped, "Ignoring logs with malformed timestamps");
    }
    dates
}

/// Count logs per local calendar day over the `window_days` days ending today.
///
/// Returns exactly `window_days` buckets, oldest first. Logs outside the
/// window or with malformed timestamps are ignored.
pub fn daily_series<Tz: TimeZone>(
    events: &[SmokeLog],
    window_days: u32,
    now: &DateTime<Tz>,
) -> DailySeries {
    if window_days == 0 {
        return DailySeries::default();
    }

    let tz = now.timezone();
    let today = now.date_naive();
    let Some(first) = today.checked_sub_days(Days::new(u64::from(window_days - 1))) else {
        return DailySeries::default();
    };

    fill_series(first, today, &valid_local_dates(events, &tz))
}

/// Count logs per day from the oldest valid log through today.
pub fn all_time_series<Tz: TimeZone>(events: &[SmokeLog], now: &DateTime<Tz>) -> DailySeries {
    let tz = now.timezone();
    let today = now.date_naive();
    let dates = valid_local_dates(events, &tz);
    let first = dates.iter().min().copied().unwrap_or(today).min(today);

    fill_series(first, today, &dates)
}

/// Log counts by local hour of day (0-23), across all dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyHistogram {
    pub counts: [u32; 24],
}

impl Default for HourlyHistogram {
    fn default() -> Self {
        Self { counts: [0; 24] }
    }
}

impl HourlyHistogram {
    /// Hour with the most logs; ties go to the earliest hour.
    pub fn peak_hour(&self) -> u8 {
        let mut peak = 0usize;
        for (hour, &count) in self.counts.iter().enumerate() {
            if count > self.counts[peak] {
                peak = hour;
            }
        }
        peak as u8
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Largest hourly count, at least 1 so it can be used as a divisor.
    pub fn scale_max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0).max(1)
    }
}

/// Count logs by local hour of day.
pub fn hourly_histogram<Tz: TimeZone>(events: &[SmokeLog], tz: &Tz) -> HourlyHistogram {
    let mut histogram = HourlyHistogram::default();
    for ts in events.iter().filter_map(SmokeLog::occurred_at) {
        let hour = ts.with_timezone(tz).hour() as usize;
        histogram.counts[hour] += 1;
    }
    histogram
}

/// Today's count compared with the weekly average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum TrendDirection {
    Above { pct: f64 },
    Below { pct: f64 },
    AtAverage,
}

impl TrendDirection {
    /// Compare `today` with `average`.
    pub fn compare(today: u32, average: f64) -> Self {
        let today = today as f64;
        if average <= 0.0 || (today - average).abs() < f64::EPSILON {
            TrendDirection::AtAverage
        } else if today > average {
            TrendDirection::Above {
                pct: (today - average) / average * 100.0,
            }
        } else {
            TrendDirection::Below {
                pct: (average - today) / average * 100.0,
            }
        }
    }

    /// Format for display (e.g., "↑ 40% above average").
    pub fn display(&self) -> String {
        match self {
            TrendDirection::Above { pct } => format!("↑ {:.0}% above average", pct),
            TrendDirection::Below { pct } => format!("↓ {:.0}% below average", pct),
            TrendDirection::AtAverage => "At your weekly average".to_string(),
        }
    }
}

/// Seven-day trend for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTrend {
    pub series: DailySeries,
    pub average: f64,
    pub today: u32,
    pub direction: TrendDirection,
}

/// Build the seven-day trend ending today.
pub fn weekly_trend<Tz: TimeZone>(events: &[SmokeLog], now: &DateTime<Tz>) -> WeeklyTrend {
    let series = daily_series(events, WEEK_DAYS, now);
    let average = series.average();
    let today = series.today().map_or(0, |b| b.count);

    WeeklyTrend {
        direction: TrendDirection::compare(today, average),
        series,
        average,
        today,
    }
}
