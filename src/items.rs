//! Items

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::prices::NumericInput;

/// A variant held in the cart, together with the quantity selected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    variant_id: String,
    product_id: String,
    product_title: String,
    variant_title: String,
    #[serde(with = "crate::prices::as_number")]
    price: Decimal,
    quantity: u32,
}

impl LineItem {
    /// Creates a line item from an add request whose price and quantity are already coerced.
    pub(crate) fn from_new(item: &NewLineItem, price: Decimal, quantity: u32) -> Self {
        Self {
            variant_id: item.variant_id.clone(),
            product_id: item.product_id.clone(),
            product_title: item.product_title.clone(),
            variant_title: item.variant_title.clone(),
            price,
            quantity,
        }
    }

    /// Returns the variant identifier, the line's key.
    pub fn variant_id(&self) -> &str {
        &self.variant_id
    }

    /// Returns the parent product identifier.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Returns the product title.
    pub fn product_title(&self) -> &str {
        &self.product_title
    }

    /// Returns the variant title, e.g. `"Red / M"`.
    pub fn variant_title(&self) -> &str {
        &self.variant_title
    }

    /// Returns the unit price recorded when the line was created.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the number of units held.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `price * quantity`.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// Returns the line total as money in the given currency, rounded to its minor unit.
    pub fn line_total_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        to_money(self.line_total(), currency)
    }

    /// Grows the quantity, stopping at `u32::MAX`. Returns the units actually added.
    pub(crate) fn increase_quantity(&mut self, quantity: u32) -> u32 {
        let previous = self.quantity;

        self.quantity = previous.saturating_add(quantity);

        self.quantity - previous
    }
}

/// Add-to-cart request as dispatched by the view layer.
///
/// Price and quantity are kept as supplied and only coerced when the command is applied.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    /// Variant identifier.
    pub variant_id: String,

    /// Parent product identifier.
    pub product_id: String,

    /// Product title, for display.
    #[serde(default)]
    pub product_title: String,

    /// Variant title, for display.
    #[serde(default)]
    pub variant_title: String,

    /// Unit price, a number or a numeric string.
    pub price: NumericInput,

    /// Units to add, a number or a numeric string.
    pub quantity: NumericInput,
}

impl NewLineItem {
    /// Creates an add request with empty titles.
    pub fn new(
        variant_id: impl Into<String>,
        product_id: impl Into<String>,
        price: impl Into<NumericInput>,
        quantity: impl Into<NumericInput>,
    ) -> Self {
        Self {
            variant_id: variant_id.into(),
            product_id: product_id.into(),
            product_title: String::new(),
            variant_title: String::new(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    /// Sets the display titles.
    #[must_use]
    pub fn titled(
        mut self,
        product_title: impl Into<String>,
        variant_title: impl Into<String>,
    ) -> Self {
        self.product_title = product_title.into();
        self.variant_title = variant_title.into();
        self
    }
}

/// Converts a decimal amount to money in minor units, rounding half away from zero.
///
/// Amounts beyond the `i64` minor unit range saturate.
pub(crate) fn to_money(amount: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_i64())
        .unwrap_or(if amount.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });

    Money::from_minor(minor_units, currency)
}
