use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::field::FieldReader;
use crate::models::performance::{
    Performance, RawPerformancePoint, Returns, TimelinePoint, BENCHMARK_SERIES,
    COMMODITY_SERIES, PORTFOLIO_SERIES,
};
use crate::rounding::round_dp;

/// Look-back, in data points, of the short window.
const SHORT_LOOKBACK: usize = 1;
/// Look-back, in data points, of the medium window.
const MEDIUM_LOOKBACK: usize = 3;

/// Builds the performance view: the dated timeline and trailing returns of
/// the portfolio, benchmark and commodity series.
pub struct PerformanceService;

impl PerformanceService {
    pub fn new() -> Self {
        Self
    }

    /// Parse the raw performance rows into a timeline and compute returns
    /// for each tracked series.
    ///
    /// Rows are kept in source order, which the import writes ascending by
    /// date; return windows are positional over that order. Missing dates
    /// are not filled in.
    pub fn build_performance(
        &self,
        points: &[RawPerformancePoint],
    ) -> Result<Performance, CoreError> {
        let timeline = points
            .iter()
            .enumerate()
            .map(|(idx, raw)| Self::timeline_point(idx, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let portfolio: Vec<f64> = timeline.iter().map(|p| p.portfolio).collect();
        let nifty50: Vec<f64> = timeline.iter().map(|p| p.nifty50).collect();
        let gold: Vec<f64> = timeline.iter().map(|p| p.gold).collect();

        let mut returns = BTreeMap::new();
        returns.insert(PORTFOLIO_SERIES.to_string(), self.compute_returns(&portfolio));
        returns.insert(BENCHMARK_SERIES.to_string(), self.compute_returns(&nifty50));
        returns.insert(COMMODITY_SERIES.to_string(), self.compute_returns(&gold));

        Ok(Performance { timeline, returns })
    }

    /// Trailing percentage returns of a value series, rounded to 2 places.
    ///
    /// Each figure is 0 when its look-back point does not exist or is 0.
    /// With fewer than 2 points all three are 0.
    pub fn compute_returns(&self, series: &[f64]) -> Returns {
        let n = series.len();
        if n < 2 {
            return Returns::default();
        }

        let last = series[n - 1];
        let change_from = |base_idx: Option<usize>| -> f64 {
            match base_idx.map(|i| series[i]) {
                Some(base) if base != 0.0 => round_dp((last - base) / base * 100.0, 2),
                _ => 0.0,
            }
        };

        Returns {
            one_month: change_from(n.checked_sub(SHORT_LOOKBACK + 1)),
            three_months: change_from(n.checked_sub(MEDIUM_LOOKBACK + 1)),
            one_year: change_from(Some(0)),
        }
    }

    fn timeline_point(idx: usize, raw: &RawPerformancePoint) -> Result<TimelinePoint, CoreError> {
        let fields = FieldReader::new("performance point", idx);

        let date_str: String = fields.required("date", &raw.date)?;
        let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
            CoreError::MalformedRecord(format!(
                "performance point #{idx} has invalid date '{date_str}': {e}"
            ))
        })?;

        Ok(TimelinePoint {
            date,
            portfolio: fields.required("portfolio", &raw.portfolio)?,
            nifty50: fields.required("nifty50", &raw.nifty50)?,
            gold: fields.required("gold", &raw.gold)?,
        })
    }
}

impl Default for PerformanceService {
    fn default() -> Self {
        Self::new()
    }
}
