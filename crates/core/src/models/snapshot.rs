use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::allocation::{RawMarketCapAllocation, RawSectorAllocation};
use super::holding::RawHolding;
use super::performance::RawPerformancePoint;
use crate::rounding::round_dp;

/// Provenance of a snapshot, written by the spreadsheet import.
///
/// Informational only. Values that do not parse are dropped rather than
/// failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// When the import ran
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub imported_at: Option<NaiveDateTime>,

    /// Spreadsheet (or "fallback_data") the snapshot came from
    #[serde(default, deserialize_with = "lenient_text")]
    pub source_file: Option<String>,

    /// Import format version
    #[serde(default, deserialize_with = "lenient_text")]
    pub version: Option<String>,
}

/// ISO 8601 with or without a UTC offset; an offset is dropped, keeping local time.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(|s| {
        s.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|t| t.naive_local()))
    }))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Some(v.to_string()),
        _ => None,
    })
}

/// The whole dataset the analytics read from. Replaced wholesale on reload,
/// never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub metadata: SnapshotMetadata,

    #[serde(default)]
    pub holdings: Vec<RawHolding>,

    /// Ordered ascending by date
    #[serde(default)]
    pub historical_performance: Vec<RawPerformancePoint>,

    #[serde(default)]
    pub sector_allocation: Vec<RawSectorAllocation>,

    #[serde(default)]
    pub market_cap_allocation: Vec<RawMarketCapAllocation>,
}

impl RawSnapshot {
    /// Built-in dataset served when the backing source cannot be read.
    ///
    /// Five large-cap NSE holdings with precomputed values, and twelve
    /// monthly performance points. No precomputed allocation, so the
    /// allocation view derives its breakdown from the holdings.
    pub fn fallback() -> Self {
        Self {
            metadata: SnapshotMetadata {
                imported_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0)),
                source_file: Some("fallback_data".to_string()),
                version: Some("1.0".to_string()),
            },
            holdings: vec![
                fallback_holding(
                    ("RELIANCE", "Reliance Industries Ltd", "Energy"),
                    50, 2450.0, 2680.5, 11525.0, 9.41,
                ),
                fallback_holding(
                    ("INFY", "Infosys Limited", "Technology"),
                    100, 1800.0, 2010.75, 21075.0, 11.71,
                ),
                fallback_holding(
                    ("TCS", "Tata Consultancy Services", "Technology"),
                    75, 3200.0, 3450.25, 18768.75, 7.82,
                ),
                fallback_holding(
                    ("HDFCBANK", "HDFC Bank Limited", "Banking"),
                    80, 1650.0, 1580.3, -5576.0, -4.22,
                ),
                fallback_holding(
                    ("ICICIBANK", "ICICI Bank Limited", "Banking"),
                    60, 1100.0, 1235.8, 8148.0, 12.35,
                ),
            ],
            historical_performance: [
                ("2024-01-01", 1_500_000.0, 21000.0, 62000.0),
                ("2024-02-01", 1_520_000.0, 21300.0, 61800.0),
                ("2024-03-01", 1_540_000.0, 22100.0, 64500.0),
                ("2024-04-01", 1_580_000.0, 22800.0, 66200.0),
                ("2024-05-01", 1_620_000.0, 23200.0, 68000.0),
                ("2024-06-01", 1_650_000.0, 23500.0, 68500.0),
                ("2024-07-01", 1_680_000.0, 24100.0, 69800.0),
                ("2024-08-01", 1_720_000.0, 24800.0, 70200.0),
                ("2024-09-01", 1_750_000.0, 25200.0, 71500.0),
                ("2024-10-01", 1_780_000.0, 25600.0, 72800.0),
                ("2024-11-01", 1_820_000.0, 26100.0, 74000.0),
                ("2024-12-01", 1_850_000.0, 26500.0, 75200.0),
            ]
            .into_iter()
            .map(|(date, portfolio, nifty50, gold)| RawPerformancePoint {
                date: Some(date.to_string().into()),
                portfolio: Some(portfolio.into()),
                nifty50: Some(nifty50.into()),
                gold: Some(gold.into()),
                ..Default::default()
            })
            .collect(),
            sector_allocation: Vec::new(),
            market_cap_allocation: Vec::new(),
        }
    }

    /// Whether this is the built-in fallback rather than data read from a source.
    pub fn is_fallback(&self) -> bool {
        self.metadata.source_file.as_deref() == Some("fallback_data")
    }
}

fn fallback_holding(
    (symbol, name, sector): (&str, &str, &str),
    quantity: u64,
    avg_price: f64,
    current_price: f64,
    gain_loss: f64,
    gain_loss_percent: f64,
) -> RawHolding {
    RawHolding {
        symbol: Some(symbol.to_string().into()),
        name: Some(name.to_string().into()),
        quantity: Some(quantity.into()),
        avg_price: Some(avg_price.into()),
        current_price: Some(current_price.into()),
        sector: Some(sector.to_string().into()),
        market_cap: Some("Large".to_string().into()),
        exchange: Some("NSE".to_string().into()),
        value: Some(round_dp(quantity as f64 * current_price, 2).into()),
        invested: Some(round_dp(quantity as f64 * avg_price, 2).into()),
        gain_loss: Some(gain_loss.into()),
        gain_loss_percent: Some(gain_loss_percent.into()),
    }
}
