//! Health-recovery timeline.
//!
//! Recovery is measured from the most recent log. A new log moves the
//! anchor and the timeline starts over at the first milestone; nothing is
//! carried across anchors.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A physiological recovery milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub id: &'static str,
    /// Minutes without a cigarette needed to reach this milestone
    pub threshold_minutes: i64,
    pub title: &'static str,
    pub description: &'static str,
}

/// Milestones, ascending by threshold.
pub static MILESTONES: [Milestone; 6] = [
    Milestone {
        id: "20min",
        threshold_minutes: 20,
        title: "Pulse Rate Normalizes",
        description: "Your heart rate and blood pressure drop.",
    },
    Milestone {
        id: "8hr",
        threshold_minutes: 8 * 60,
        title: "Oxygen Levels Return",
        description: "Carbon monoxide levels drop to half. Oxygen returns to normal.",
    },
    Milestone {
        id: "24hr",
        threshold_minutes: 24 * 60,
        title: "Heart Attack Risk Drops",
        description: "Your risk of heart attack begins to decrease.",
    },
    Milestone {
        id: "48hr",
        threshold_minutes: 48 * 60,
        title: "Senses Sharpen",
        description: "Nerve endings start regrowing. Smell and taste improve.",
    },
    Milestone {
        id: "72hr",
        threshold_minutes: 72 * 60,
        title: "Breathing Eases",
        description: "Bronchial tubes relax. Energy increases.",
    },
    Milestone {
        id: "2wk",
        threshold_minutes: 14 * 24 * 60,
        title: "Circulation Improves",
        description: "Walking and running become easier.",
    },
];

/// Where the user currently is on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RecoveryStatus {
    /// Working towards `milestone`
    InProgress {
        /// Position of the milestone in [`MILESTONES`]
        index: usize,
        milestone: &'static Milestone,
        elapsed_minutes: i64,
        /// Fraction of the way from the previous threshold, in [0, 1]
        progress: f64,
    },
    /// Every milestone has been reached
    AllAchieved { elapsed_minutes: i64 },
}

impl RecoveryStatus {
    /// Progress towards the active milestone; 1.0 once all are achieved.
    pub fn progress(&self) -> f64 {
        match self {
            RecoveryStatus::InProgress { progress, .. } => *progress,
            RecoveryStatus::AllAchieved { .. } => 1.0,
        }
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress() * 100.0
    }

    pub fn active_milestone(&self) -> Option<&'static Milestone> {
        match self {
            RecoveryStatus::InProgress { milestone, .. } => Some(milestone),
            RecoveryStatus::AllAchieved { .. } => None,
        }
    }

    pub fn elapsed_minutes(&self) -> i64 {
        match self {
            RecoveryStatus::InProgress {
                elapsed_minutes, ..
            }
            | RecoveryStatus::AllAchieved { elapsed_minutes } => *elapsed_minutes,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, RecoveryStatus::AllAchieved { .. })
    }
}

/// Find the active milestone after `elapsed_minutes` without smoking.
///
/// The active milestone is the first one whose threshold exceeds the
/// elapsed time. Negative elapsed time is treated as zero.
pub fn current_milestone(elapsed_minutes: i64) -> RecoveryStatus {
    let elapsed = elapsed_minutes.max(0);

    let Some(index) = MILESTONES
        .iter()
        .position(|m| elapsed < m.threshold_minutes)
    else {
        return RecoveryStatus::AllAchieved {
            elapsed_minutes: elapsed,
        };
    };

    let milestone = &MILESTONES[index];
    let previous = if index == 0 {
        0
    } else {
        MILESTONES[index - 1].threshold_minutes
    };
    let span = (milestone.threshold_minutes - previous) as f64;
    let progress = ((elapsed - previous) as f64 / span).clamp(0.0, 1.0);

    RecoveryStatus::InProgress {
        index,
        milestone,
        elapsed_minutes: elapsed,
        progress,
    }
}

/// Whole minutes from `last` to `now`, truncated and never negative.
pub fn elapsed_minutes(last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(last).num_minutes().max(0)
}

/// One row of the milestone list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneState {
    pub milestone: &'static Milestone,
    pub unlocked: bool,
    pub active: bool,
}

/// Unlocked/active flags for every milestone.
pub fn milestone_states(elapsed_minutes: i64) -> Vec<MilestoneState> {
    let status = current_milestone(elapsed_minutes);
    let active_index = match status {
        RecoveryStatus::InProgress { index, .. } => Some(index),
        RecoveryStatus::AllAchieved { .. } => None,
    };
    let elapsed = status.elapsed_minutes();

    MILESTONES
        .iter()
        .enumerate()
        .map(|(i, milestone)| MilestoneState {
            milestone,
            unlocked: elapsed >= milestone.threshold_minutes,
            active: active_index == Some(i),
        })
        .collect()
}

/// Tracks the "last log" anchor the timeline is measured from.
#[derive(Debug, Clone, Default)]
pub struct RecoveryTracker {
    anchor: Option<DateTime<Utc>>,
}

impl RecoveryTracker {
    pub fn new(anchor: Option<DateTime<Utc>>) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> Option<DateTime<Utc>> {
        self.anchor
    }

    /// Record a new log. A later log restarts the timeline immediately.
    pub fn on_log(&mut self, at: DateTime<Utc>) {
        if self.anchor.map_or(true, |current| at >= current) {
            tracing::debug!(anchor = %at, "Recovery timeline re-anchored");
            self.anchor = Some(at);
        }
    }

    /// Forget the anchor, e.g. after every log was deleted.
    pub fn clear(&mut self) {
        self.anchor = None;
    }

    /// Status at `now`, or `None` if nothing has been logged.
    pub fn status(&self, now: DateTime<Utc>) -> Option<RecoveryStatus> {
        self.anchor
            .map(|anchor| current_milestone(elapsed_minutes(anchor, now)))
    }
}
