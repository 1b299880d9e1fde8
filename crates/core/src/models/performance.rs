use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field::RawField;

/// Series name of the portfolio value in `Performance::returns`.
pub const PORTFOLIO_SERIES: &str = "portfolio";
/// Series name of the benchmark index.
pub const BENCHMARK_SERIES: &str = "nifty50";
/// Series name of the commodity reference.
pub const COMMODITY_SERIES: &str = "gold";

/// One row of the historical performance sheet, as stored in the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPerformancePoint {
    /// ISO date, `YYYY-MM-DD`
    pub date: Option<RawField<String>>,
    pub portfolio: Option<RawField<f64>>,
    pub nifty50: Option<RawField<f64>>,
    pub gold: Option<RawField<f64>>,

    // Per-period returns from the source sheet; the analytics derive their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_return: Option<RawField<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nifty_return: Option<RawField<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold_return: Option<RawField<f64>>,
}

/// A dated value triple on the common timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,

    /// Total portfolio value
    pub portfolio: f64,

    /// Nifty 50 index level
    pub nifty50: f64,

    /// Gold price reference
    pub gold: f64,
}

/// Trailing returns of one value series, in percent.
///
/// Windows are positional: "1 month" is the last data point against the one
/// before it, "3 months" against the fourth from last, "1 year" against the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Returns {
    #[serde(rename = "1month")]
    pub one_month: f64,

    #[serde(rename = "3months")]
    pub three_months: f64,

    #[serde(rename = "1year")]
    pub one_year: f64,
}

/// The performance view: the timeline and per-series returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub timeline: Vec<TimelinePoint>,
    pub returns: BTreeMap<String, Returns>,
}
