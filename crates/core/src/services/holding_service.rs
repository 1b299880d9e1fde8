use crate::errors::CoreError;
use crate::models::field::FieldReader;
use crate::models::holding::{Holding, RawHolding};

/// Turns raw snapshot holdings into the canonical `Holding` view.
///
/// Pure business logic, no I/O. Precomputed figures from the import are
/// trusted as-is; only `value` is derived when missing.
pub struct HoldingService;

impl HoldingService {
    pub fn new() -> Self {
        Self
    }

    /// Enrich every raw record, in source order.
    ///
    /// - `value` defaults to `quantity * current_price`
    /// - `gain_loss` and `gain_loss_percent` default to 0 (not recomputed)
    ///
    /// Fails with `MalformedRecord` on the first record missing an identity
    /// or pricing field, holding a field of the wrong type, or carrying an
    /// unknown market-cap tier. A whole-valued float quantity such as `50.0`
    /// is accepted.
    pub fn enrich(&self, raw_holdings: &[RawHolding]) -> Result<Vec<Holding>, CoreError> {
        raw_holdings
            .iter()
            .enumerate()
            .map(|(idx, raw)| Self::enrich_one(idx, raw))
            .collect()
    }

    fn enrich_one(idx: usize, raw: &RawHolding) -> Result<Holding, CoreError> {
        let fields = FieldReader::new("holding", idx);

        let symbol = fields.required("symbol", &raw.symbol)?;
        let name = fields.required("name", &raw.name)?;
        let quantity = fields
            .whole_number("quantity", &raw.quantity)?
            .ok_or_else(|| CoreError::missing_field("holding", idx, "quantity"))?;
        let avg_price = fields.required("avgPrice", &raw.avg_price)?;
        let current_price = fields.required("currentPrice", &raw.current_price)?;
        let sector = fields.required("sector", &raw.sector)?;
        let raw_cap: String = fields.required("marketCap", &raw.market_cap)?;
        let market_cap = raw_cap.parse().map_err(|_| {
            CoreError::MalformedRecord(format!(
                "holding #{idx} ({symbol}) has unknown market cap tier '{raw_cap}'"
            ))
        })?;
        let value = fields.optional("value", &raw.value)?;
        let gain_loss = fields.optional("gainLoss", &raw.gain_loss)?;
        let gain_loss_percent = fields.optional("gainLossPercent", &raw.gain_loss_percent)?;

        Ok(Holding {
            value: value.unwrap_or(quantity as f64 * current_price),
            gain_loss: gain_loss.unwrap_or(0.0),
            gain_loss_percent: gain_loss_percent.unwrap_or(0.0),
            symbol,
            name,
            quantity,
            avg_price,
            current_price,
            sector,
            market_cap,
        })
    }
}

impl Default for HoldingService {
    fn default() -> Self {
        Self::new()
    }
}
