//! Archetype classification for Insights
//!
//! Assigns a smoker "archetype" from the dominant mood, activity, location
//! and peak hour. Rules are checked in a fixed order and the first match
//! wins: coping with mood is treated as the strongest signal, then social
//! and driving context, then time of day, then work.

use serde::Serialize;

use super::breakdown::{BreakdownSet, MIN_EVENTS_FOR_INSIGHTS};
use crate::types::{Activity, Location, Mood};

/// Smoker archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Top mood is stressed or anxious
    StressReliever,
    /// Social activity or bars dominate
    Socialite,
    /// Driving or the car dominates
    HighwayCruiser,
    /// Peak hour is before 5am or after 9pm
    NightOwl,
    /// Work is the top activity
    Workhorse,
    /// No stronger signal
    HabitualSmoker,
}

impl Archetype {
    /// Get the display name for this archetype.
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::StressReliever => "The Stress Reliever",
            Archetype::Socialite => "The Socialite",
            Archetype::HighwayCruiser => "The Highway Cruiser",
            Archetype::NightOwl => "The Night Owl",
            Archetype::Workhorse => "The Workhorse",
            Archetype::HabitualSmoker => "The Habitual Smoker",
        }
    }

    /// Get the description for this archetype.
    pub fn description(&self) -> &'static str {
        match self {
            Archetype::StressReliever => {
                "You mostly use smoking as a way to cope with pressure or anxiety."
            }
            Archetype::Socialite => "Your habits are strongly linked to being around others.",
            Archetype::HighwayCruiser => "Driving is a major trigger for you.",
            Archetype::NightOwl => "You tend to smoke more during the quiet hours of the night.",
            Archetype::Workhorse => "Work breaks are your primary smoking ritual.",
            Archetype::HabitualSmoker => "Your smoking connects deeply to your daily routine.",
        }
    }

    /// Get an emoji for this archetype.
    pub fn emoji(&self) -> &'static str {
        match self {
            Archetype::StressReliever => "🧠",
            Archetype::Socialite => "✨",
            Archetype::HighwayCruiser => "🚗",
            Archetype::NightOwl => "🦉",
            Archetype::Workhorse => "💼",
            Archetype::HabitualSmoker => "🕰️",
        }
    }
}

/// Result of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    /// Not enough logs to say anything
    InsufficientData { logged: usize, required: usize },
    Archetype { archetype: Archetype },
}

impl Classification {
    pub fn archetype(&self) -> Option<Archetype> {
        match self {
            Classification::Archetype { archetype } => Some(*archetype),
            Classification::InsufficientData { .. } => None,
        }
    }
}

/// Classify the dominant pattern from ranked breakdowns and the peak hour.
pub fn classify(breakdowns: &BreakdownSet, peak_hour: u8) -> Classification {
    if breakdowns.total_events < MIN_EVENTS_FOR_INSIGHTS {
        return Classification::InsufficientData {
            logged: breakdowns.total_events,
            required: MIN_EVENTS_FOR_INSIGHTS,
        };
    }

    let mood = breakdowns.top_mood().map(|(m, _)| m);
    let activity = breakdowns.top_activity().map(|(a, _)| a);
    let location = breakdowns.top_location().map(|(l, _)| l);

    let archetype = if matches!(mood, Some(Mood::Stressed | Mood::Anxious)) {
        Archetype::StressReliever
    } else if matches!(activity, Some(Activity::Socializing | Activity::Phone))
        || location == Some(Location::Bar)
    {
        Archetype::Socialite
    } else if activity == Some(Activity::Driving) || location == Some(Location::Car) {
        Archetype::HighwayCruiser
    } else if !(5..=21).contains(&peak_hour) {
        Archetype::NightOwl
    } else if activity == Some(Activity::Work) {
        Archetype::Workhorse
    } else {
        Archetype::HabitualSmoker
    };

    Classification::Archetype { archetype }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SmokeLog;
    use chrono::Utc;

    fn logs(n: usize, tag: impl Fn(SmokeLog) -> SmokeLog) -> Vec<SmokeLog> {
        (0..n).map(|_| tag(SmokeLog::new("u1", Utc::now()))).collect()
    }

    fn classify_logs(events: &[SmokeLog], peak_hour: u8) -> Classification {
        classify(&BreakdownSet::compute(events), peak_hour)
    }

    #[test]
    fn test_insufficient_data() {
        let events = logs(4, |l| l.with_mood(Mood::Stressed));
        assert_eq!(
            classify_logs(&events, 12),
            Classification::InsufficientData {
                logged: 4,
                required: 5
            }
        );
        assert_eq!(classify_logs(&[], 2).archetype(), None);
    }

    #[test]
    fn test_stress_short_circuits_everything() {
        let events = logs(5, |l| {
            l.with_mood(Mood::Stressed)
                .with_activity(Activity::Socializing)
                .with_location(Location::Car)
        });
        assert_eq!(
            classify_logs(&events, 23).archetype(),
            Some(Archetype::StressReliever)
        );

        let anxious = logs(5, |l| l.with_mood(Mood::Anxious));
        assert_eq!(
            classify_logs(&anxious, 12).archetype(),
            Some(Archetype::StressReliever)
        );
    }

    #[test]
    fn test_socialite_from_activity_or_bar() {
        let phone = logs(5, |l| l.with_mood(Mood::Happy).with_activity(Activity::Phone));
        assert_eq!(classify_logs(&phone, 12).archetype(), Some(Archetype::Socialite));

        let bar = logs(5, |l| l.with_activity(Activity::Driving).with_location(Location::Bar));
        assert_eq!(classify_logs(&bar, 12).archetype(), Some(Archetype::Socialite));
    }

    #[test]
    fn test_highway_cruiser() {
        let events = logs(5, |l| l.with_location(Location::Car));
        assert_eq!(
            classify_logs(&events, 2).archetype(),
            Some(Archetype::HighwayCruiser)
        );
    }

    #[test]
    fn test_night_owl_boundaries() {
        let events = logs(5, |l| l.with_activity(Activity::Work));
        assert_eq!(classify_logs(&events, 4).archetype(), Some(Archetype::NightOwl));
        assert_eq!(classify_logs(&events, 22).archetype(), Some(Archetype::NightOwl));
        assert_eq!(classify_logs(&events, 5).archetype(), Some(Archetype::Workhorse));
        assert_eq!(classify_logs(&events, 21).archetype(), Some(Archetype::Workhorse));
    }

    #[test]
    fn test_habitual_default() {
        let events = logs(5, |l| l.with_mood(Mood::Bored).with_activity(Activity::Coffee));
        assert_eq!(
            classify_logs(&events, 10).archetype(),
            Some(Archetype::HabitualSmoker)
        );
    }

    #[test]
    fn test_archetype_display() {
        assert_eq!(Archetype::NightOwl.name(), "The Night Owl");
        assert_eq!(Archetype::NightOwl.emoji(), "🦉");
    }
}
