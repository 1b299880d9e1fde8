use serde::{Deserialize, Serialize};

use super::field::RawField;
use crate::errors::CoreError;

/// Market-capitalization tier of a listed company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketCapTier {
    Large,
    Mid,
    Small,
}

impl std::fmt::Display for MarketCapTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketCapTier::Large => write!(f, "Large"),
            MarketCapTier::Mid => write!(f, "Mid"),
            MarketCapTier::Small => write!(f, "Small"),
        }
    }
}

impl std::str::FromStr for MarketCapTier {
    type Err = CoreError;

    /// Accepts "Large", "large", and the spreadsheet spelling "Large Cap".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = trimmed
            .strip_suffix(" Cap")
            .or_else(|| trimmed.strip_suffix(" cap"))
            .unwrap_or(trimmed)
            .trim();
        match base.to_ascii_lowercase().as_str() {
            "large" => Ok(MarketCapTier::Large),
            "mid" => Ok(MarketCapTier::Mid),
            "small" => Ok(MarketCapTier::Small),
            _ => Err(CoreError::MalformedRecord(format!(
                "unknown market cap tier '{s}'"
            ))),
        }
    }
}

/// A holding record as it appears in the snapshot source.
///
/// Every field is optional and loosely typed here so that a record missing
/// or mistyping one of them fails the views that read holdings, not the
/// whole load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHolding {
    pub symbol: Option<RawField<String>>,
    pub name: Option<RawField<String>>,
    pub quantity: Option<RawField<u64>>,
    pub avg_price: Option<RawField<f64>>,
    pub current_price: Option<RawField<f64>>,
    pub sector: Option<RawField<String>>,
    pub market_cap: Option<RawField<String>>,

    /// Listing exchange (e.g. "NSE"). Carried through from the import, unused by analytics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<RawField<String>>,

    /// Precomputed current value; preferred over `quantity * current_price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawField<f64>>,

    /// Precomputed cost basis. Analytics always recompute it from quantity and average price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invested: Option<RawField<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain_loss: Option<RawField<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain_loss_percent: Option<RawField<f64>>,
}

/// One equity position, as served by the holdings view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Ticker symbol (e.g., "INFY")
    pub symbol: String,

    /// Company display name
    pub name: String,

    /// Number of shares held
    pub quantity: u64,

    /// Average acquisition price per share
    pub avg_price: f64,

    /// Latest market price per share
    pub current_price: f64,

    /// Free-text sector label (e.g., "Technology")
    pub sector: String,

    pub market_cap: MarketCapTier,

    /// Current market value of the position
    pub value: f64,

    /// Absolute gain/loss against cost basis
    pub gain_loss: f64,

    /// Gain/loss as a percentage of cost basis
    pub gain_loss_percent: f64,
}

impl Holding {
    /// Cost basis of the position: quantity × average price.
    pub fn invested(&self) -> f64 {
        self.quantity as f64 * self.avg_price
    }
}
