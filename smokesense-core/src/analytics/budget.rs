//! Daily budget evaluation.

use serde::Serialize;

use super::bucketing::DailySeries;

/// Share of the budget at which the counter starts warning.
const NEAR_THRESHOLD: f64 = 0.8;

/// Today's count measured against the daily budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BudgetStatus {
    /// No budget configured
    Unset,
    Under { remaining: u32, fill_percent: f64 },
    /// At least 80% of the budget used
    Near { remaining: u32, fill_percent: f64 },
    At,
    Over { by: u32 },
}

impl BudgetStatus {
    /// Classify `count` against `budget`. A budget of zero is treated as unset.
    pub fn evaluate(count: u32, budget: Option<u32>) -> Self {
        let Some(budget) = budget.filter(|&b| b > 0) else {
            return BudgetStatus::Unset;
        };

        if count > budget {
            return BudgetStatus::Over { by: count - budget };
        }
        if count == budget {
            return BudgetStatus::At;
        }

        let remaining = budget - count;
        let fill_percent = count as f64 / budget as f64 * 100.0;
        if count as f64 >= budget as f64 * NEAR_THRESHOLD {
            BudgetStatus::Near {
                remaining,
                fill_percent,
            }
        } else {
            BudgetStatus::Under {
                remaining,
                fill_percent,
            }
        }
    }

    /// How full the budget bar is, capped at 100.
    pub fn fill_percent(&self) -> f64 {
        match self {
            BudgetStatus::Unset => 0.0,
            BudgetStatus::Under { fill_percent, .. } | BudgetStatus::Near { fill_percent, .. } => {
                fill_percent.min(100.0)
            }
            BudgetStatus::At | BudgetStatus::Over { .. } => 100.0,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self, BudgetStatus::Over { .. })
    }

    /// Short status line for the counter, `None` without a budget.
    pub fn message(&self) -> Option<String> {
        match self {
            BudgetStatus::Unset => None,
            BudgetStatus::Under { remaining, .. } => Some(format!("{} left today", remaining)),
            BudgetStatus::Near { remaining, .. } => {
                Some(format!("Careful, only {} left today", remaining))
            }
            BudgetStatus::At => Some("Daily budget reached".to_string()),
            BudgetStatus::Over { by } => Some(format!("{} over budget", by)),
        }
    }
}

/// Number of logged days in `series` whose count stayed within `budget`.
///
/// Days without any logs are not counted.
pub fn days_within_budget(series: &DailySeries, budget: u32) -> usize {
    series
        .buckets
        .iter()
        .filter(|bucket| bucket.count > 0 && bucket.count <= budget)
        .count()
}
