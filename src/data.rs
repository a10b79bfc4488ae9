use serde::Serialize;

/// One spot price observation, built fresh on every poll.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricePoint {
    /// Price exactly as the upstream API spelled it.
    pub value: String,
    pub asset_symbol: String,
    pub quote_currency: String,
    /// Unix seconds, taken when the payload was transformed.
    pub captured_at: f64,
}
