//! Insights view: dominant patterns, archetype and tips.

use std::collections::HashSet;

use chrono::TimeZone;
use serde::Serialize;

use super::archetype::{classify, Archetype};
use super::breakdown::{BreakdownSet, CategoryCount, MIN_EVENTS_FOR_INSIGHTS};
use super::bucketing::hourly_histogram;
use crate::format::format_hour;
use crate::types::SmokeLog;

/// Kind of tip, so renderers can pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipKind {
    Breathing,
    PeakHour,
    Friction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    pub kind: TipKind,
    pub text: String,
}

/// Everything shown once enough logs exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub total_logs: usize,
    pub top_mood: Option<CategoryCount>,
    pub top_activity: Option<CategoryCount>,
    pub top_location: Option<CategoryCount>,
    /// Local hour with the most logs
    pub peak_hour: u8,
    /// Logs per distinct local day that has logs
    pub daily_average: f64,
    pub archetype: Archetype,
    /// Label of the top mood, else of the top activity
    pub main_trigger: Option<&'static str>,
    pub tips: Vec<Tip>,
}

/// Insights, or how far the user is from unlocking them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Insights {
    NotEnoughData { logged: usize, required: usize },
    Ready(InsightReport),
}

impl Insights {
    /// Build insights from all of a user's logs, bucketed in `tz`.
    pub fn compute<Tz: TimeZone>(events: &[SmokeLog], tz: &Tz) -> Self {
        let breakdowns = BreakdownSet::compute(events);
        let peak_hour = hourly_histogram(events, tz).peak_hour();

        let Some(archetype) = classify(&breakdowns, peak_hour).archetype() else {
            return Insights::NotEnoughData {
                logged: events.len(),
                required: MIN_EVENTS_FOR_INSIGHTS,
            };
        };

        let top_mood = breakdowns.mood.first().copied();
        let top_activity = breakdowns.activity.first().copied();
        let top_location = breakdowns.location.first().copied();
        let main_trigger = top_mood.or(top_activity).map(|row| row.value.label());

        Insights::Ready(InsightReport {
            total_logs: events.len(),
            top_mood,
            top_activity,
            top_location,
            peak_hour,
            daily_average: daily_average(events, tz),
            archetype,
            main_trigger,
            tips: tips(top_mood, peak_hour),
        })
    }

    /// Fraction of the logs needed to unlock insights, in [0, 1].
    pub fn unlock_progress(&self) -> f64 {
        match self {
            Insights::NotEnoughData { logged, required } => {
                (*logged as f64 / *required as f64).min(1.0)
            }
            Insights::Ready(_) => 1.0,
        }
    }

    pub fn report(&self) -> Option<&InsightReport> {
        match self {
            Insights::Ready(report) => Some(report),
            Insights::NotEnoughData { .. } => None,
        }
    }
}

fn daily_average<Tz: TimeZone>(events: &[SmokeLog], tz: &Tz) -> f64 {
    let dates: Vec<_> = events
        .iter()
        .filter_map(SmokeLog::occurred_at)
        .map(|ts| ts.with_timezone(tz).date_naive())
        .collect();
    let days: HashSet<_> = dates.iter().collect();
    dates.len() as f64 / days.len().max(1) as f64
}

const FRICTION_TIP: &str =
    "Consider leaving your cigarettes in a harder-to-reach place to break the automatic habit.";

fn tips(top_mood: Option<CategoryCount>, peak_hour: u8) -> Vec<Tip> {
    let mut tips = Vec::with_capacity(3);
    if let Some(mood) = top_mood {
        tips.push(Tip {
            kind: TipKind::Breathing,
            text: format!(
                "Since {} is a trigger, try a 1-minute breathing exercise when you feel it coming.",
                mood.value.label()
            ),
        });
    }
    tips.push(Tip {
        kind: TipKind::PeakHour,
        text: format!(
            "Be extra vigilant around {}. Plan a distraction for this time.",
            format_hour(peak_hour)
        ),
    });
    tips.push(Tip {
        kind: TipKind::Friction,
        text: FRICTION_TIP.to_string(),
    });
    tips
}
