//! Stockout risk classification and reorder recommendation.
//!
//! Pure, deterministic mapping from (current stock, predicted demand) to a
//! risk tier and a reorder quantity. No randomness, no I/O.

use serde::{Deserialize, Serialize};

/// Days-until-stockout reported when predicted demand is effectively zero,
/// and the cap for very long horizons. Both read as "not at risk".
pub const STOCKOUT_SENTINEL_DAYS: u32 = 999;

/// Risk tier for an item, ordered by severity (`Critical` highest).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Days of predicted demand to reorder for this tier.
    pub fn reorder_factor(self) -> f64 {
        match self {
            RiskLevel::Critical => 14.0,
            RiskLevel::High => 7.0,
            RiskLevel::Medium => 3.0,
            RiskLevel::Low => 0.0,
        }
    }

    fn from_days_until_stockout(days: u32) -> Self {
        match days {
            0..=1 => RiskLevel::Critical,
            2..=7 => RiskLevel::High,
            8..=30 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Output of [`assess`]: horizon to stockout, tier, and recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockoutAssessment {
    pub days_until_stockout: u32,
    pub risk: RiskLevel,
    /// Units to replenish; zero for low-risk items.
    pub reorder_quantity: u32,
}

/// Classify stockout risk for one item.
///
/// Demand is clamped at zero first. With positive demand the horizon is
/// `floor(stock / demand)`, capped at [`STOCKOUT_SENTINEL_DAYS`]; with
/// (effectively) zero demand the sentinel itself is reported. The reorder
/// quantity covers the tier's factor in days of demand, rounded to whole
/// units.
pub fn assess(current_stock: f64, predicted_demand: f64) -> StockoutAssessment {
    let demand = predicted_demand.max(0.0);
    let stock = current_stock.max(0.0);

    let days_until_stockout = if demand > f64::EPSILON {
        let days = (stock / demand).floor();
        if days >= f64::from(STOCKOUT_SENTINEL_DAYS) {
            STOCKOUT_SENTINEL_DAYS
        } else {
            days as u32
        }
    } else {
        STOCKOUT_SENTINEL_DAYS
    };

    let risk = RiskLevel::from_days_until_stockout(days_until_stockout);
    let reorder_quantity = (demand * risk.reorder_factor()).round() as u32;

    StockoutAssessment {
        days_until_stockout,
        risk,
        reorder_quantity,
    }
}
