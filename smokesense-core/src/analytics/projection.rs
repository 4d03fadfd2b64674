//! Money and time projections.
//!
//! Figures are returned unrounded; rounding is left to whoever renders
//! them. The only rounding applied here is the whole-cigarette reduction
//! target.

use serde::Serialize;

/// Average minutes spent on one cigarette.
pub const DEFAULT_MINUTES_PER_UNIT: f64 = 7.0;

/// Baseline used when the observed daily average rounds to zero.
pub const DEFAULT_DAILY_AVERAGE: f64 = 10.0;

const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Savings from cutting intake by a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    /// Current cigarettes per day (sanitized)
    pub current_daily_average: f64,
    /// Reduction applied, in [0, 100]
    pub reduction_percent: f64,
    /// Price of one cigarette (sanitized)
    pub unit_price: f64,
    /// Whole cigarettes per day after the reduction
    pub target_daily: f64,
    /// Cigarettes avoided per day
    pub avoided_daily: f64,
    pub daily_savings: f64,
    pub monthly_savings: f64,
    pub yearly_savings: f64,
    pub five_year_savings: f64,
    pub minutes_saved_daily: f64,
    pub hours_saved_yearly: f64,
    pub days_saved_yearly: f64,
}

impl Projection {
    /// Whether the scenario is quitting outright.
    pub fn is_quit(&self) -> bool {
        self.reduction_percent >= 100.0
    }
}

/// Replace NaN and negatives with zero.
fn non_negative(field: &'static str, value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        tracing::debug!(field, value, "Clamping invalid projection input to 0");
        0.0
    } else {
        value
    }
}

/// Project savings with the default minutes per cigarette.
pub fn project(current_daily_average: f64, reduction_percent: f64, unit_price: f64) -> Projection {
    project_with(
        current_daily_average,
        reduction_percent,
        unit_price,
        DEFAULT_MINUTES_PER_UNIT,
    )
}

/// Project savings from reducing `current_daily_average` by `reduction_percent`.
///
/// Out-of-range inputs are clamped rather than rejected, so every output
/// is non-negative.
pub fn project_with(
    current_daily_average: f64,
    reduction_percent: f64,
    unit_price: f64,
    minutes_per_unit: f64,
) -> Projection {
    let average = non_negative("current_daily_average", current_daily_average);
    let price = non_negative("unit_price", unit_price);
    let minutes = non_negative("minutes_per_unit", minutes_per_unit);
    let percent = non_negative("reduction_percent", reduction_percent);
    if percent > 100.0 {
        tracing::debug!(reduction_percent, "Clamping reduction to 100%");
    }
    let percent = percent.min(100.0);

    let target = (average * (1.0 - percent / 100.0)).round();
    // Rounding the target up can exceed a fractional average
    let avoided = (average - target).max(0.0);

    let daily_savings = avoided * price;
    let yearly_savings = daily_savings * DAYS_PER_YEAR;
    let minutes_saved_daily = avoided * minutes;
    let hours_saved_yearly = minutes_saved_daily * DAYS_PER_YEAR / 60.0;

    Projection {
        current_daily_average: average,
        reduction_percent: percent,
        unit_price: price,
        target_daily: target,
        avoided_daily: avoided,
        daily_savings,
        monthly_savings: daily_savings * DAYS_PER_MONTH,
        yearly_savings,
        five_year_savings: yearly_savings * 5.0,
        minutes_saved_daily,
        hours_saved_yearly,
        days_saved_yearly: hours_saved_yearly / 24.0,
    }
}

/// Baseline for the projection slider from an observed daily average.
pub fn projection_baseline(observed_daily_average: f64) -> f64 {
    let rounded = non_negative("observed_daily_average", observed_daily_average).round();
    if rounded == 0.0 {
        DEFAULT_DAILY_AVERAGE
    } else {
        rounded
    }
}

/// What was spent over a window and what that rate costs going forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpendSummary {
    pub window_days: u32,
    pub count: u32,
    pub unit_price: f64,
    pub total_spent: f64,
    pub daily_average: f64,
    pub monthly_projection: f64,
    pub yearly_projection: f64,
    pub minutes_spent: f64,
}

impl SpendSummary {
    pub fn compute(count: u32, window_days: u32, unit_price: f64, minutes_per_unit: f64) -> Self {
        let price = non_negative("unit_price", unit_price);
        let daily_average = if window_days == 0 {
            0.0
        } else {
            count as f64 / window_days as f64
        };

        Self {
            window_days,
            count,
            unit_price: price,
            total_spent: count as f64 * price,
            daily_average,
            monthly_projection: daily_average * DAYS_PER_MONTH * price,
            yearly_projection: daily_average * DAYS_PER_YEAR * price,
            minutes_spent: count as f64 * non_negative("minutes_per_unit", minutes_per_unit),
        }
    }

    pub fn hours_spent(&self) -> f64 {
        self.minutes_spent / 60.0
    }
}

/// Something the money could buy instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reward {
    pub threshold: f64,
    pub emoji: &'static str,
    pub description: &'static str,
}

const fn reward(threshold: f64, emoji: &'static str, description: &'static str) -> Reward {
    Reward {
        threshold,
        emoji,
        description,
    }
}

/// Purchase ideas, ascending by threshold.
pub static REWARD_CATALOG: &[Reward] = &[
    reward(150.0, "🍫", "A giant chocolate bar"),
    reward(300.0, "🎬", "A month of streaming"),
    reward(500.0, "🎥", "Movie ticket & popcorn"),
    reward(750.0, "🍕", "A fancy pizza dinner"),
    reward(1_000.0, "📚", "A bestseller hardback"),
    reward(1_500.0, "🔊", "Bluetooth speaker"),
    reward(2_000.0, "👕", "A branded t-shirt"),
    reward(3_000.0, "👟", "New running shoes"),
    reward(4_000.0, "🎮", "A video game"),
    reward(5_000.0, "🎧", "Premium earbuds"),
    reward(7_500.0, "⌚", "A smart fitness watch"),
    reward(10_000.0, "📱", "A budget tablet"),
    reward(15_000.0, "📱", "A mid-range smartphone"),
    reward(25_000.0, "🏨", "A luxury weekend getaway"),
    reward(30_000.0, "🏖️", "A beach trip"),
    reward(40_000.0, "🎮", "Latest gaming console"),
    reward(50_000.0, "💻", "A new laptop"),
    reward(75_000.0, "🛵", "An electric scooter"),
    reward(100_000.0, "✈️", "International trip"),
];

/// Consolation entry when nothing in the catalog is affordable.
pub static FALLBACK_REWARD: Reward = Reward {
    threshold: 0.0,
    emoji: "☕",
    description: "A nice coffee",
};

/// Rewards affordable with `amount`, cheapest first.
pub fn reward_equivalents(amount: f64) -> Vec<&'static Reward> {
    let affordable: Vec<&'static Reward> = REWARD_CATALOG
        .iter()
        .filter(|reward| amount >= reward.threshold)
        .collect();
    if affordable.is_empty() {
        vec![&FALLBACK_REWARD]
    } else {
        affordable
    }
}
