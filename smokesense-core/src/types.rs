//! Core domain types for smokesense
//!
//! These types represent the records the log store hands to the analytics
//! engine, plus the fixed catalogs used to tag each log.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Log** | One recorded cigarette ([`SmokeLog`]) |
//! | **Profile** | Per-user settings: phase, budget, unit price, disguise ([`Profile`]) |
//! | **Dimension** | A categorical field of a log: mood, activity or location |
//! | **Catalog** | The fixed, ordered list of known values for a dimension |
//!
//! Catalog order matters: it is the tie-break order for every ranked
//! breakdown, so it must never depend on the order logs were recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit price used when the profile is missing or has no usable price.
pub const DEFAULT_UNIT_PRICE: f64 = 15.0;

/// Disguise name used until the user picks one.
pub const DEFAULT_DISGUISE_NAME: &str = "Notes";

// ============================================
// Catalogs
// ============================================

/// A categorical value with a fixed catalog.
///
/// Implemented by [`Mood`], [`Activity`] and [`Location`].
pub trait Category: Copy + PartialEq + 'static {
    /// All known values, in catalog order.
    const ALL: &'static [Self];

    /// Identifier used in storage.
    fn as_str(&self) -> &'static str;

    /// Human-readable label.
    fn label(&self) -> &'static str;

    /// Position in the catalog, used for deterministic tie-breaking.
    fn catalog_index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|value| value == self)
            .unwrap_or(Self::ALL.len())
    }
}

/// How the user felt when they smoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Stressed,
    Anxious,
    Bored,
    Social,
    Relaxed,
    Happy,
    Tired,
    Focused,
}

impl Mood {
    /// Display colour used by chart front-ends.
    pub fn color(&self) -> &'static str {
        match self {
            Mood::Stressed => "#ef4444",
            Mood::Anxious => "#f97316",
            Mood::Bored => "#eab308",
            Mood::Social => "#22c55e",
            Mood::Relaxed => "#06b6d4",
            Mood::Happy => "#8b5cf6",
            Mood::Tired => "#6366f1",
            Mood::Focused => "#ec4899",
        }
    }
}

impl Category for Mood {
    const ALL: &'static [Self] = &[
        Mood::Stressed,
        Mood::Anxious,
        Mood::Bored,
        Mood::Social,
        Mood::Relaxed,
        Mood::Happy,
        Mood::Tired,
        Mood::Focused,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Mood::Stressed => "stressed",
            Mood::Anxious => "anxious",
            Mood::Bored => "bored",
            Mood::Social => "social",
            Mood::Relaxed => "relaxed",
            Mood::Happy => "happy",
            Mood::Tired => "tired",
            Mood::Focused => "focused",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Mood::Stressed => "Stressed",
            Mood::Anxious => "Anxious",
            Mood::Bored => "Bored",
            Mood::Social => "Social",
            Mood::Relaxed => "Relaxed",
            Mood::Happy => "Happy",
            Mood::Tired => "Tired",
            Mood::Focused => "Focused",
        }
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str() == s)
            .ok_or_else(|| format!("unknown mood: {}", s))
    }
}

/// What the user was doing when they smoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Work,
    Break,
    Meal,
    Coffee,
    Driving,
    Walking,
    Socializing,
    Phone,
    Wakeup,
    Bedtime,
}

impl Category for Activity {
    const ALL: &'static [Self] = &[
        Activity::Work,
        Activity::Break,
        Activity::Meal,
        Activity::Coffee,
        Activity::Driving,
        Activity::Walking,
        Activity::Socializing,
        Activity::Phone,
        Activity::Wakeup,
        Activity::Bedtime,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Activity::Work => "work",
            Activity::Break => "break",
            Activity::Meal => "meal",
            Activity::Coffee => "coffee",
            Activity::Driving => "driving",
            Activity::Walking => "walking",
            Activity::Socializing => "socializing",
            Activity::Phone => "phone",
            Activity::Wakeup => "wakeup",
            Activity::Bedtime => "bedtime",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Activity::Work => "Working",
            Activity::Break => "On Break",
            Activity::Meal => "After Meal",
            Activity::Coffee => "With Coffee",
            Activity::Driving => "Driving",
            Activity::Walking => "Walking",
            Activity::Socializing => "Socializing",
            Activity::Phone => "On Phone",
            Activity::Wakeup => "Just Woke Up",
            Activity::Bedtime => "Before Bed",
        }
    }
}

impl std::str::FromStr for Activity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Activity::ALL
            .iter()
            .copied()
            .find(|activity| activity.as_str() == s)
            .ok_or_else(|| format!("unknown activity: {}", s))
    }
}

/// Where the user was when they smoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Home,
    Work,
    Outside,
    Car,
    Bar,
    Friend,
    Other,
}

impl Category for Location {
    const ALL: &'static [Self] = &[
        Location::Home,
        Location::Work,
        Location::Outside,
        Location::Car,
        Location::Bar,
        Location::Friend,
        Location::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Location::Home => "home",
            Location::Work => "work",
            Location::Outside => "outside",
            Location::Car => "car",
            Location::Bar => "bar",
            Location::Friend => "friend",
            Location::Other => "other",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Location::Home => "Home",
            Location::Work => "Work",
            Location::Outside => "Outside",
            Location::Car => "Car",
            Location::Bar => "Bar/Restaurant",
            Location::Friend => "Friend's Place",
            Location::Other => "Other",
        }
    }
}

impl std::str::FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .iter()
            .copied()
            .find(|location| location.as_str() == s)
            .ok_or_else(|| format!("unknown location: {}", s))
    }
}

// ============================================
// Logs
// ============================================

/// One recorded cigarette.
///
/// `logged_at` is kept exactly as the store returned it (RFC 3339 text).
/// Time-based analytics call [`SmokeLog::occurred_at`] and skip logs whose
/// timestamp does not parse, so one bad row never aborts a computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokeLog {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owner of this log
    pub user_id: String,
    /// When the cigarette was smoked, as RFC 3339 text
    pub logged_at: String,
    pub mood: Option<Mood>,
    pub activity: Option<Activity>,
    pub location: Option<Location>,
    /// Whether the user waited out a delay timer first
    pub was_delayed: bool,
    /// Length of that delay in seconds
    pub delay_seconds: Option<i64>,
    pub notes: Option<String>,
}

impl SmokeLog {
    /// Create a log for `user_id` at `at` with a fresh identifier and no tags.
    pub fn new(user_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            logged_at: at.to_rfc3339(),
            mood: None,
            activity: None,
            location: None,
            was_delayed: false,
            delay_seconds: None,
            notes: None,
        }
    }

    /// Parsed timestamp, or `None` if `logged_at` is malformed.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.logged_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Mark the log as having been preceded by a delay of `seconds`.
    pub fn with_delay(mut self, seconds: i64) -> Self {
        self.was_delayed = true;
        self.delay_seconds = Some(seconds.max(0));
        self
    }

    /// Whole minutes of delay, for delayed logs only.
    pub fn delay_minutes(&self) -> Option<i64> {
        self.was_delayed
            .then(|| self.delay_seconds.unwrap_or(0).max(0) / 60)
    }
}

/// Timestamp of the most recent log with a valid timestamp.
pub fn latest_log_time(logs: &[SmokeLog]) -> Option<DateTime<Utc>> {
    logs.iter().filter_map(SmokeLog::occurred_at).max()
}

// ============================================
// Profile
// ============================================

/// Stage of the user's journey.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Awareness,
    Control,
    Reduction,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Awareness => "awareness",
            Phase::Control => "control",
            Phase::Reduction => "reduction",
        }
    }

    /// One-line encouragement shown under the greeting.
    pub fn tagline(&self) -> &'static str {
        match self {
            Phase::Awareness => "You're building awareness of your habits",
            Phase::Control => "You're taking control of your choices",
            Phase::Reduction => "You're on your reduction journey",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awareness" => Ok(Phase::Awareness),
            "control" => Ok(Phase::Control),
            "reduction" => Ok(Phase::Reduction),
            _ => Err(format!("unknown phase: {}", s)),
        }
    }
}

/// Per-user settings. One per user, never removed by resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub display_name: Option<String>,
    pub phase: Phase,
    /// Daily cigarette budget; `None` disables budget displays
    pub daily_budget: Option<u32>,
    /// Price of one cigarette
    pub unit_price: Option<f64>,
    /// Personal reason to cut down
    pub motivation_text: Option<String>,
    /// Reference to a motivating image
    pub motivation_image: Option<String>,
    /// Show the app under a neutral name
    pub disguise_enabled: bool,
    pub disguise_name: String,
}

impl Profile {
    /// A fresh profile with no budget or price set.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            phase: Phase::default(),
            daily_budget: None,
            unit_price: None,
            motivation_text: None,
            motivation_image: None,
            disguise_enabled: false,
            disguise_name: DEFAULT_DISGUISE_NAME.to_string(),
        }
    }

    /// Configured budget, treating zero as unset.
    pub fn budget(&self) -> Option<u32> {
        self.daily_budget.filter(|&budget| budget > 0)
    }

    /// Configured price, or `fallback` when missing or not positive.
    pub fn unit_price_or(&self, fallback: f64) -> f64 {
        self.unit_price
            .filter(|price| price.is_finite() && *price > 0.0)
            .unwrap_or(fallback)
    }
}

/// Unit price for an optional profile, falling back to `fallback`.
pub fn effective_unit_price(profile: Option<&Profile>, fallback: f64) -> f64 {
    profile.map_or(fallback, |p| p.unit_price_or(fallback))
}

/// Daily budget for an optional profile.
pub fn effective_budget(profile: Option<&Profile>) -> Option<u32> {
    profile.and_then(Profile::budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_catalog_round_trip_identifiers() {
        for mood in Mood::ALL {
            assert_eq!(mood.as_str().parse::<Mood>().unwrap(), *mood);
        }
        assert_eq!("bar".parse::<Location>().unwrap(), Location::Bar);
        assert!("gym".parse::<Activity>().is_err());
    }

    #[test]
    fn test_catalog_index_follows_declaration_order() {
        assert_eq!(Mood::Stressed.catalog_index(), 0);
        assert_eq!(Mood::Focused.catalog_index(), 7);
        assert_eq!(Activity::Bedtime.catalog_index(), 9);
        assert_eq!(Location::Other.catalog_index(), 6);
    }

    #[test]
    fn test_occurred_at_parses_and_rejects() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let log = SmokeLog::new("u1", at);
        assert_eq!(log.occurred_at(), Some(at));

        let broken = SmokeLog {
            logged_at: "yesterday-ish".to_string(),
            ..log
        };
        assert_eq!(broken.occurred_at(), None);
    }

    #[test]
    fn test_latest_log_time_skips_malformed() {
        let early = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut broken = SmokeLog::new("u1", late);
        broken.logged_at = "not a time".to_string();
        let logs = vec![SmokeLog::new("u1", early), broken, SmokeLog::new("u1", late)];
        assert_eq!(latest_log_time(&logs), Some(late));
        assert_eq!(latest_log_time(&[]), None);
    }

    #[test]
    fn test_profile_defaults() {
        let mut profile = Profile::new("u1");
        assert_eq!(profile.phase, Phase::Awareness);
        assert_eq!(profile.disguise_name, "Notes");
        assert_eq!(profile.budget(), None);
        assert_eq!(profile.unit_price_or(DEFAULT_UNIT_PRICE), 15.0);

        profile.daily_budget = Some(0);
        profile.unit_price = Some(0.0);
        assert_eq!(profile.budget(), None);
        assert_eq!(profile.unit_price_or(DEFAULT_UNIT_PRICE), 15.0);

        profile.daily_budget = Some(8);
        profile.unit_price = Some(18.0);
        assert_eq!(effective_budget(Some(&profile)), Some(8));
        assert_eq!(effective_unit_price(Some(&profile), DEFAULT_UNIT_PRICE), 18.0);
        assert_eq!(effective_unit_price(None, DEFAULT_UNIT_PRICE), 15.0);
        assert_eq!(effective_budget(None), None);
    }

    #[test]
    fn test_with_delay_marks_log() {
        let log = SmokeLog::new("u1", Utc::now()).with_delay(120);
        assert!(log.was_delayed);
        assert_eq!(log.delay_seconds, Some(120));
        assert_eq!(log.delay_minutes(), Some(2));
        assert_eq!(SmokeLog::new("u1", Utc::now()).delay_minutes(), None);
    }
}
