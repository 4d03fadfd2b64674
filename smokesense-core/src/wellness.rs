//! Craving-shield rituals and daily quotes.
//!
//! Both catalogs are static. Selection is a pure function of time so the
//! same minute (or day) always gives the same pick.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

/// A short activity to ride out a craving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ritual {
    pub id: &'static str,
    pub title: &'static str,
    pub action: &'static str,
    pub duration_minutes: u32,
}

pub static RITUALS: [Ritual; 6] = [
    Ritual {
        id: "hydrate",
        title: "Hydrate",
        action: "Drink a full glass of cold water slowly.",
        duration_minutes: 1,
    },
    Ritual {
        id: "breathe",
        title: "Breathe",
        action: "Take 10 deep breaths. Inhale for 4s, hold for 4s, exhale for 4s.",
        duration_minutes: 2,
    },
    Ritual {
        id: "move",
        title: "Move",
        action: "Do 10 jumping jacks or a quick stretch.",
        duration_minutes: 2,
    },
    Ritual {
        id: "play",
        title: "Play",
        action: "Play a quick mobile game or solve a puzzle.",
        duration_minutes: 5,
    },
    Ritual {
        id: "visualize",
        title: "Visualize",
        action: "Close your eyes and visualize your \"Why\".",
        duration_minutes: 1,
    },
    Ritual {
        id: "swap",
        title: "Swap",
        action: "Make a cup of herbal tea or chew some gum.",
        duration_minutes: 5,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

const fn quote(text: &'static str, author: &'static str) -> Quote {
    Quote { text, author }
}

pub static QUOTES: [Quote; 15] = [
    quote("It always seems impossible until it is done.", "Nelson Mandela"),
    quote("The secret of getting ahead is getting started.", "Mark Twain"),
    quote("Don't watch the clock; do what it does. Keep going.", "Sam Levenson"),
    quote("Believe you can and you're halfway there.", "Theodore Roosevelt"),
    quote(
        "Start where you are. Use what you have. Do what you can.",
        "Arthur Ashe",
    ),
    quote(
        "You differ from a great tree. A tree takes many years to become strong. \
         You can become strong in a moment.",
        "Unknown",
    ),
    quote("Your recovered health is the greatest wealth.", "Unknown"),
    quote("Every cigarette you don't smoke is a victory.", "SmokeSense"),
    quote(
        "Healing is a matter of time, but it is sometimes also a matter of opportunity.",
        "Hippocrates",
    ),
    quote("The comeback is always stronger than the setback.", "Unknown"),
    quote("It's never too late to be what you might have been.", "George Eliot"),
    quote(
        "Strength does not come from physical capacity. It comes from an indomitable will.",
        "Mahatma Gandhi",
    ),
    quote("Fall seven times and stand up eight.", "Japanese Proverb"),
    quote("Small steps every day add up to big results.", "Unknown"),
    quote("Focus on progress, not perfection.", "Bill Phillips"),
];

/// Ritual for the minute containing `at`. Consecutive minutes rotate
/// through the catalog.
pub fn suggest_ritual(at: DateTime<Utc>) -> &'static Ritual {
    let minute = at.timestamp().div_euclid(60);
    &RITUALS[minute.rem_euclid(RITUALS.len() as i64) as usize]
}

/// Quote for a calendar day.
pub fn quote_of_the_day(day: NaiveDate) -> &'static Quote {
    let index = i64::from(day.num_days_from_ce()).rem_euclid(QUOTES.len() as i64);
    &QUOTES[index as usize]
}
