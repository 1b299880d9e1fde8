use std::cmp::Ordering;
use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::summary::{RiskLevel, Summary, TopPerformer};
use crate::rounding::round_dp;

/// Number of distinct sectors considered fully diversified.
pub const DIVERSIFICATION_TARGET_SECTORS: f64 = 8.0;

/// Upper bound of the diversification score.
pub const MAX_DIVERSIFICATION_SCORE: f64 = 10.0;

/// Total return (percent) above which the portfolio is classed as Moderate risk.
pub const MODERATE_RISK_THRESHOLD: f64 = 15.0;

/// Synthesizes the portfolio-level summary from enriched holdings.
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Compute totals, best/worst performers, diversification and risk.
    ///
    /// `total_value` sums the holdings' `value` as supplied, so it can differ
    /// from Σ quantity × current price when the source precomputed it.
    pub fn summarize(&self, holdings: &[Holding]) -> Result<Summary, CoreError> {
        let (top, worst) = Self::performers(holdings)?;

        let total_invested: f64 = holdings.iter().map(Holding::invested).sum();
        let total_value: f64 = holdings.iter().map(|h| h.value).sum();
        let total_gain_loss = total_value - total_invested;
        let total_gain_loss_percent = if total_invested > 0.0 {
            round_dp(total_gain_loss / total_invested * 100.0, 2)
        } else {
            0.0
        };

        Ok(Summary {
            total_value: round_dp(total_value, 2),
            total_invested: round_dp(total_invested, 2),
            total_gain_loss: round_dp(total_gain_loss, 2),
            total_gain_loss_percent,
            holdings_count: holdings.len(),
            top_performer: top,
            worst_performer: worst,
            diversification_score: Self::diversification_score(holdings),
            risk_level: Self::risk_level(total_gain_loss_percent),
        })
    }

    /// Best and worst holdings by gain percentage.
    ///
    /// Ties resolve to source order: among equal gains (`-0.0` equals `0.0`)
    /// the earlier holding ranks higher. A single holding is both best and worst.
    pub fn performers(holdings: &[Holding]) -> Result<(TopPerformer, TopPerformer), CoreError> {
        let mut ranked: Vec<&Holding> = holdings.iter().collect();
        ranked.sort_by(|a, b| {
            b.gain_loss_percent
                .partial_cmp(&a.gain_loss_percent)
                .unwrap_or(Ordering::Equal)
        });

        match (ranked.first(), ranked.last()) {
            (Some(top), Some(worst)) => Ok((Self::project(top), Self::project(worst))),
            _ => Err(CoreError::EmptyPortfolio),
        }
    }

    /// `min(10, round(10 × distinct sectors / 8, 1))`
    pub fn diversification_score(holdings: &[Holding]) -> f64 {
        let unique_sectors = holdings
            .iter()
            .map(|h| h.sector.as_str())
            .collect::<HashSet<_>>()
            .len();
        let score = round_dp(
            unique_sectors as f64 / DIVERSIFICATION_TARGET_SECTORS * MAX_DIVERSIFICATION_SCORE,
            1,
        );
        score.min(MAX_DIVERSIFICATION_SCORE)
    }

    /// Moderate strictly above the threshold, Low otherwise.
    pub fn risk_level(total_gain_loss_percent: f64) -> RiskLevel {
        if total_gain_loss_percent > MODERATE_RISK_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    fn project(holding: &Holding) -> TopPerformer {
        TopPerformer {
            symbol: holding.symbol.clone(),
            name: holding.name.clone(),
            gain_percent: holding.gain_loss_percent,
        }
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}
