use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::allocation::{
    Allocation, AllocationItem, RawMarketCapAllocation, RawSectorAllocation,
};
use crate::models::field::FieldReader;
use crate::models::holding::Holding;
use crate::models::snapshot::RawSnapshot;
use crate::rounding::round_dp;

/// Where the allocation breakdown comes from for one computation.
///
/// Decided once per call from the shape of the snapshot.
#[derive(Debug, Clone, Copy)]
pub enum AllocationSource<'a> {
    /// Both breakdown sheets were imported; use them verbatim.
    Precomputed {
        by_sector: &'a [RawSectorAllocation],
        by_market_cap: &'a [RawMarketCapAllocation],
    },
    /// At least one sheet is empty; group the holdings instead.
    Derived,
}

impl<'a> AllocationSource<'a> {
    pub fn select(snapshot: &'a RawSnapshot) -> Self {
        if !snapshot.sector_allocation.is_empty() && !snapshot.market_cap_allocation.is_empty() {
            AllocationSource::Precomputed {
                by_sector: &snapshot.sector_allocation,
                by_market_cap: &snapshot.market_cap_allocation,
            }
        } else {
            AllocationSource::Derived
        }
    }
}

/// Computes the sector and market-cap breakdowns of portfolio value.
pub struct AllocationService;

impl AllocationService {
    pub fn new() -> Self {
        Self
    }

    /// Build the allocation view for a snapshot.
    ///
    /// `holdings` is only consulted on the derived path; callers may pass the
    /// enricher's output lazily through [`AllocationService::aggregate_with`].
    pub fn aggregate(
        &self,
        snapshot: &RawSnapshot,
        holdings: &[Holding],
    ) -> Result<Allocation, CoreError> {
        self.aggregate_with(snapshot, || Ok(holdings.to_vec()))
    }

    /// Like [`aggregate`](Self::aggregate), but only produces the holdings
    /// when the derived path needs them.
    pub fn aggregate_with<F>(
        &self,
        snapshot: &RawSnapshot,
        holdings: F,
    ) -> Result<Allocation, CoreError>
    where
        F: FnOnce() -> Result<Vec<Holding>, CoreError>,
    {
        match AllocationSource::select(snapshot) {
            AllocationSource::Precomputed {
                by_sector,
                by_market_cap,
            } => {
                log::debug!(
                    "Using precomputed allocation ({} sectors, {} market-cap tiers)",
                    by_sector.len(),
                    by_market_cap.len()
                );
                self.from_precomputed(by_sector, by_market_cap)
            }
            AllocationSource::Derived => {
                let holdings = holdings()?;
                log::debug!("Deriving allocation from {} holdings", holdings.len());
                Ok(self.from_holdings(&holdings))
            }
        }
    }

    /// Copy the imported breakdowns, rounding value and percentage to 2 places.
    ///
    /// Percentages are taken as supplied; they are not renormalized against
    /// the holdings total. A missing `holdingsCount` counts as 0.
    pub fn from_precomputed(
        &self,
        by_sector: &[RawSectorAllocation],
        by_market_cap: &[RawMarketCapAllocation],
    ) -> Result<Allocation, CoreError> {
        let mut allocation = Allocation::default();

        for (idx, row) in by_sector.iter().enumerate() {
            let fields = FieldReader::new("sector allocation", idx);
            let sector = fields.required("sector", &row.sector)?;
            let item = precomputed_item(
                fields.required("value", &row.value)?,
                fields.required("percentage", &row.percentage)?,
                fields.whole_number("holdingsCount", &row.holdings_count)?,
            );
            allocation.by_sector.insert(sector, item);
        }

        for (idx, row) in by_market_cap.iter().enumerate() {
            let fields = FieldReader::new("market cap allocation", idx);
            let tier = fields.required("marketCap", &row.market_cap)?;
            let item = precomputed_item(
                fields.required("value", &row.value)?,
                fields.required("percentage", &row.percentage)?,
                fields.whole_number("holdingsCount", &row.holdings_count)?,
            );
            allocation.by_market_cap.insert(tier, item);
        }

        Ok(allocation)
    }

    /// Group holdings by sector and by market-cap tier.
    ///
    /// Percentages are against the total over ALL holdings. A category with
    /// no holdings does not appear.
    pub fn from_holdings(&self, holdings: &[Holding]) -> Allocation {
        let total_value: f64 = holdings.iter().map(|h| h.value).sum();

        let mut by_sector: BTreeMap<String, (f64, u32)> = BTreeMap::new();
        let mut by_market_cap: BTreeMap<String, (f64, u32)> = BTreeMap::new();

        for holding in holdings {
            let sector = by_sector.entry(holding.sector.clone()).or_insert((0.0, 0));
            sector.0 += holding.value;
            sector.1 += 1;

            let tier = by_market_cap
                .entry(holding.market_cap.to_string())
                .or_insert((0.0, 0));
            tier.0 += holding.value;
            tier.1 += 1;
        }

        Allocation {
            by_sector: Self::finish_groups(by_sector, total_value),
            by_market_cap: Self::finish_groups(by_market_cap, total_value),
        }
    }

    fn finish_groups(
        groups: BTreeMap<String, (f64, u32)>,
        total_value: f64,
    ) -> BTreeMap<String, AllocationItem> {
        groups
            .into_iter()
            .map(|(key, (value, count))| {
                let percentage = if total_value > 0.0 {
                    round_dp(value / total_value * 100.0, 2)
                } else {
                    0.0
                };
                let item = AllocationItem {
                    value: round_dp(value, 2),
                    percentage,
                    count,
                };
                (key, item)
            })
            .collect()
    }
}

impl Default for AllocationService {
    fn default() -> Self {
        Self::new()
    }
}

fn precomputed_item(value: f64, percentage: f64, count: Option<u32>) -> AllocationItem {
    AllocationItem {
        value: round_dp(value, 2),
        percentage: round_dp(percentage, 2),
        count: count.unwrap_or(0),
    }
}
