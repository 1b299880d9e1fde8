use serde::{Deserialize, Serialize};

/// Risk classification of the portfolio.
///
/// Only two tiers are produced; there is no "High" classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
        }
    }
}

/// Projection of a holding for the best/worst performer slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformer {
    pub symbol: String,
    pub name: String,
    pub gain_percent: f64,
}

/// Portfolio-wide key metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of holding values
    pub total_value: f64,

    /// Sum of quantity × average price
    pub total_invested: f64,

    /// total_value - total_invested
    pub total_gain_loss: f64,

    /// (total_gain_loss / total_invested) * 100
    pub total_gain_loss_percent: f64,

    pub holdings_count: usize,

    pub top_performer: TopPerformer,
    pub worst_performer: TopPerformer,

    /// Distinct-sector heuristic in [0, 10]
    pub diversification_score: f64,

    pub risk_level: RiskLevel,
}
