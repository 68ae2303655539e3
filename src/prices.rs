//! Prices

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Deserialize;

/// A numeric value as supplied by a caller, before coercion.
///
/// Catalog APIs send prices as strings (`"49.99"`) while form inputs produce numbers, so both
/// shapes are accepted and coerced when a command is applied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// A JSON/YAML number.
    Number(f64),

    /// A string holding a number, e.g. `"49.99"`.
    Text(String),
}

impl NumericInput {
    /// Parses the input as a decimal, returning `None` when it is not a finite number.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) if value.is_finite() => Decimal::from_str(&value.to_string()).ok(),
            Self::Number(_) => None,
            Self::Text(text) => parse_decimal(text),
        }
    }

    /// Coerces the input to a unit price.
    ///
    /// Unparseable and negative values become zero.
    pub fn to_price(&self) -> Decimal {
        self.to_decimal()
            .filter(|price| !price.is_sign_negative())
            .map_or(Decimal::ZERO, |price| price.normalize())
    }

    /// Coerces the input to a quantity.
    ///
    /// Unparseable, negative, fractional and out-of-range values become zero.
    pub fn to_quantity(&self) -> u32 {
        self.to_decimal()
            .filter(|quantity| quantity.fract().is_zero())
            .and_then(|quantity| quantity.to_u32())
            .unwrap_or(0)
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_err| Decimal::from_scientific(trimmed))
        .ok()
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for NumericInput {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for NumericInput {
    fn from(value: Decimal) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Serde adapter writing decimals as JSON numbers.
///
/// The number is written and read as its exact decimal text, so every `Decimal` survives a round
/// trip through the persisted JSON, including values with more digits than an `f64` holds.
pub(crate) mod as_number {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
    use serde_json::value::RawValue;

    pub(crate) fn serialize<S: Serializer>(
        value: &Decimal,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(value.normalize().to_string()).map_err(ser::Error::custom)?;

        raw.serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Decimal, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get();

        if text.starts_with('"') {
            return Err(de::Error::custom(format!(
                "expected a decimal number, got {text}"
            )));
        }

        super::parse_decimal(text)
            .ok_or_else(|| de::Error::custom(format!("expected a decimal number, got {text}")))
    }
}
