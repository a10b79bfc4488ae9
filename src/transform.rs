use crate::data::PricePoint;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("spot price payload has no `{0}`")]
    MissingField(&'static str),
    #[error("spot price payload field `{0}` is not a string")]
    NotAString(&'static str),
}

/// The payload is fully read before the clock is, so a lookup failure never
/// touches the clock.
pub fn transform(payload: &Value) -> Result<PricePoint, TransformError> {
    let fields = SpotFields::read(payload)?;
    Ok(fields.stamp(Utc::now()))
}

struct SpotFields<'a> {
    amount: &'a str,
    base: &'a str,
    currency: &'a str,
}

impl<'a> SpotFields<'a> {
    fn read(payload: &'a Value) -> Result<Self, TransformError> {
        Ok(Self {
            amount: lookup_str(payload, "amount", "data.amount")?,
            base: lookup_str(payload, "base", "data.base")?,
            currency: lookup_str(payload, "currency", "data.currency")?,
        })
    }

    fn stamp(self, now: DateTime<Utc>) -> PricePoint {
        PricePoint {
            value: self.amount.to_string(),
            asset_symbol: self.base.to_string(),
            quote_currency: self.currency.to_string(),
            captured_at: now.timestamp_micros() as f64 / 1_000_000.0,
        }
    }
}

fn lookup_str<'a>(
    payload: &'a Value,
    key: &str,
    path: &'static str,
) -> Result<&'a str, TransformError> {
    payload
        .get("data")
        .and_then(|data| data.get(key))
        .ok_or(TransformError::MissingField(path))?
        .as_str()
        .ok_or(TransformError::NotAString(path))
}
