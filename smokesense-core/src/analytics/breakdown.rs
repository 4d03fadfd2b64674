//! Categorical breakdowns over mood, activity and location.

use serde::Serialize;

use crate::types::{Activity, Category, Location, Mood, SmokeLog};

/// Logs required before breakdowns and archetypes are shown.
pub const MIN_EVENTS_FOR_INSIGHTS: usize = 5;

/// A categorical field of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Mood,
    Activity,
    Location,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Mood => "mood",
            Dimension::Activity => "activity",
            Dimension::Location => "location",
        }
    }
}

impl std::str::FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mood" => Ok(Dimension::Mood),
            "activity" => Ok(Dimension::Activity),
            "location" => Ok(Dimension::Location),
            _ => Err(format!("unknown dimension: {}", s)),
        }
    }
}

/// A value from any of the three catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum CategoryValue {
    Mood(Mood),
    Activity(Activity),
    Location(Location),
}

impl CategoryValue {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryValue::Mood(m) => m.label(),
            CategoryValue::Activity(a) => a.label(),
            CategoryValue::Location(l) => l.label(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryValue::Mood(m) => m.as_str(),
            CategoryValue::Activity(a) => a.as_str(),
            CategoryValue::Location(l) => l.as_str(),
        }
    }
}

/// One row of a ranked breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryCount {
    pub value: CategoryValue,
    pub count: u32,
    /// Share of all input logs, including logs without this field
    pub percentage: f64,
}

/// Count one dimension in catalog order, then rank.
fn rank<C: Category>(
    events: &[SmokeLog],
    extract: impl Fn(&SmokeLog) -> Option<C>,
    wrap: impl Fn(C) -> CategoryValue,
) -> Vec<CategoryCount> {
    let total = events.len();
    let mut counts = vec![0u32; C::ALL.len()];
    for value in events.iter().filter_map(&extract) {
        if let Some(slot) = counts.get_mut(value.catalog_index()) {
            *slot += 1;
        }
    }

    let mut ranked: Vec<CategoryCount> = C::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(value, count)| CategoryCount {
            value: wrap(*value),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();

    // Stable sort keeps catalog order among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Rank the values of `dimension` by how often they were logged.
///
/// Returns an empty list when fewer than [`MIN_EVENTS_FOR_INSIGHTS`] logs
/// are supplied.
pub fn breakdown(events: &[SmokeLog], dimension: Dimension) -> Vec<CategoryCount> {
    if events.len() < MIN_EVENTS_FOR_INSIGHTS {
        return Vec::new();
    }

    match dimension {
        Dimension::Mood => rank(events, |log| log.mood, CategoryValue::Mood),
        Dimension::Activity => rank(events, |log| log.activity, CategoryValue::Activity),
        Dimension::Location => rank(events, |log| log.location, CategoryValue::Location),
    }
}

/// All three breakdowns for one set of logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BreakdownSet {
    /// Number of logs the breakdowns were computed from
    pub total_events: usize,
    pub mood: Vec<CategoryCount>,
    pub activity: Vec<CategoryCount>,
    pub location: Vec<CategoryCount>,
}

impl BreakdownSet {
    pub fn compute(events: &[SmokeLog]) -> Self {
        Self {
            total_events: events.len(),
            mood: breakdown(events, Dimension::Mood),
            activity: breakdown(events, Dimension::Activity),
            location: breakdown(events, Dimension::Location),
        }
    }

    pub fn get(&self, dimension: Dimension) -> &[CategoryCount] {
        match dimension {
            Dimension::Mood => &self.mood,
            Dimension::Activity => &self.activity,
            Dimension::Location => &self.location,
        }
    }

    pub fn top_mood(&self) -> Option<(Mood, u32)> {
        self.mood.first().and_then(|row| match row.value {
            CategoryValue::Mood(m) => Some((m, row.count)),
            _ => None,
        })
    }

    pub fn top_activity(&self) -> Option<(Activity, u32)> {
        self.activity.first().and_then(|row| match row.value {
            CategoryValue::Activity(a) => Some((a, row.count)),
            _ => None,
        })
    }

    pub fn top_location(&self) -> Option<(Location, u32)> {
        self.location.first().and_then(|row| match row.value {
            CategoryValue::Location(l) => Some((l, row.count)),
            _ => None,
        })
    }
}
