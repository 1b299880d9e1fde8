use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field::RawField;

/// A precomputed sector breakdown row, as produced by the spreadsheet import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSectorAllocation {
    pub sector: Option<RawField<String>>,
    pub value: Option<RawField<f64>>,
    pub percentage: Option<RawField<f64>>,
    /// Absent means 0
    pub holdings_count: Option<RawField<u32>>,
}

/// A precomputed market-cap breakdown row, as produced by the spreadsheet import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMarketCapAllocation {
    pub market_cap: Option<RawField<String>>,
    pub value: Option<RawField<f64>>,
    pub percentage: Option<RawField<f64>>,
    /// Absent means 0
    pub holdings_count: Option<RawField<u32>>,
}

/// Aggregate over one category of holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationItem {
    /// Summed market value of the category
    pub value: f64,

    /// Share of the portfolio's total value (0–100)
    pub percentage: f64,

    /// Number of holdings in the category
    pub count: u32,
}

/// Portfolio value broken down by sector and by market-cap tier.
///
/// Keys are category names. Maps are ordered so repeated renders of the
/// same snapshot serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub by_sector: BTreeMap<String, AllocationItem>,
    pub by_market_cap: BTreeMap<String, AllocationItem>,
}
