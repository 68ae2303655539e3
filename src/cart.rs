//! Cart
//!
//! The cart aggregate and the reducer that applies [`CartCommand`]s to it. Applying a command
//! never fails and performs no I/O; persistence is layered on top by [`crate::store::CartStore`].

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    commands::{CartCommand, Change, RepeatAddPricing},
    items::{LineItem, NewLineItem, to_money},
};

/// Structural problems found in a cart read back from storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Two lines share a variant identifier.
    #[error("variant {0} appears more than once")]
    DuplicateVariant(String),

    /// A line has an empty variant identifier.
    #[error("line {0} has an empty variant id")]
    EmptyVariant(usize),

    /// A line holds zero units.
    #[error("variant {0} has zero quantity")]
    ZeroQuantity(String),

    /// A line has a negative unit price.
    #[error("variant {0} has a negative price")]
    NegativePrice(String),

    /// The stored total quantity disagrees with the lines (stored, computed).
    #[error("total quantity is {0}, but lines hold {1}")]
    QuantityMismatch(u64, u64),
}

/// The cart aggregate: line items in insertion order plus running totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,
    total_quantity: u64,
    #[serde(with = "crate::prices::as_number")]
    total_amount: Decimal,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a cart from stored parts without checking them; see [`Cart::validate`].
    pub(crate) fn from_parts(
        items: Vec<LineItem>,
        total_quantity: u64,
        total_amount: Decimal,
    ) -> Self {
        Self {
            items,
            total_quantity,
            total_amount,
        }
    }

    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterates over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Looks up the line for a variant.
    pub fn get(&self, variant_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.variant_id() == variant_id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Running total amount.
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Running total amount as money, rounded to minor units.
    pub fn total_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        to_money(self.total_amount, currency)
    }

    /// Sum of `price * quantity` over the lines, independent of the running total.
    pub fn line_totals(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Applies a command.
    pub fn apply(&mut self, command: &CartCommand, pricing: RepeatAddPricing) -> Change {
        match command {
            CartCommand::Add(item) => self.add(item, pricing),
            CartCommand::Remove { variant_id } => self.remove(variant_id),
            CartCommand::Clear => self.clear(),
        }
    }

    /// Adds units of a variant.
    ///
    /// An existing line keeps its price and titles and only grows in quantity. The running total
    /// accrues `price * quantity` using the price selected by `pricing`. A blank variant id, or a
    /// quantity that coerces to zero, leaves the cart untouched.
    ///
    /// A line's quantity stops at `u32::MAX`; only the units actually added are accrued.
    pub fn add(&mut self, item: &NewLineItem, pricing: RepeatAddPricing) -> Change {
        if item.variant_id.trim().is_empty() {
            debug!(product_id = %item.product_id, "ignoring add without a variant id");

            return Change::Unchanged;
        }

        let quantity = item.quantity.to_quantity();

        if quantity == 0 {
            debug!(
                variant_id = %item.variant_id,
                quantity = %item.quantity,
                "ignoring add with no units"
            );

            return Change::Unchanged;
        }

        let price = item.price.to_price();

        let (accrual_price, added) = match self
            .items
            .iter_mut()
            .find(|line| line.variant_id() == item.variant_id)
        {
            Some(line) => {
                let added = line.increase_quantity(quantity);

                let accrual_price = match pricing {
                    RepeatAddPricing::Incoming => price,
                    RepeatAddPricing::Stored => line.price(),
                };

                (accrual_price, added)
            }
            None => {
                self.items.push(LineItem::from_new(item, price, quantity));

                (price, quantity)
            }
        };

        if added == 0 {
            debug!(variant_id = %item.variant_id, "line already holds the maximum quantity");

            return Change::Unchanged;
        }

        self.total_quantity = self.total_quantity.saturating_add(u64::from(added));
        self.total_amount = self
            .total_amount
            .saturating_add(accrual_price.saturating_mul(Decimal::from(added)));

        Change::Changed
    }

    /// Removes the whole line for a variant. Unknown variants are ignored.
    pub fn remove(&mut self, variant_id: &str) -> Change {
        let Some(index) = self
            .items
            .iter()
            .position(|item| item.variant_id() == variant_id)
        else {
            return Change::Unchanged;
        };

        let line = self.items.remove(index);

        self.total_quantity = self
            .total_quantity
            .saturating_sub(u64::from(line.quantity()));
        self.total_amount = self.total_amount.saturating_sub(line.line_total());

        Change::Changed
    }

    /// Empties the cart.
    pub fn clear(&mut self) -> Change {
        let change = if *self == Self::default() {
            Change::Unchanged
        } else {
            Change::Changed
        };

        self.items.clear();
        self.total_quantity = 0;
        self.total_amount = Decimal::ZERO;

        change
    }

    /// Checks the structural invariants of a cart read from outside the reducer.
    ///
    /// The running amount is not checked against the lines, since repeat adds at a different
    /// price legitimately make them diverge.
    ///
    /// # Errors
    ///
    /// Returns the first [`CartError`] found.
    pub fn validate(&self) -> Result<(), CartError> {
        let mut seen = FxHashSet::default();

        for (index, item) in self.items.iter().enumerate() {
            if item.variant_id().trim().is_empty() {
                return Err(CartError::EmptyVariant(index));
            }

            if !seen.insert(item.variant_id()) {
                return Err(CartError::DuplicateVariant(item.variant_id().to_string()));
            }

            if item.quantity() == 0 {
                return Err(CartError::ZeroQuantity(item.variant_id().to_string()));
            }

            if item.price().is_sign_negative() {
                return Err(CartError::NegativePrice(item.variant_id().to_string()));
            }
        }

        let computed = self
            .items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum::<u64>();

        if computed != self.total_quantity {
            return Err(CartError::QuantityMismatch(self.total_quantity, computed));
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
