//! Cart commands

use serde::Deserialize;

use crate::items::NewLineItem;

/// A cart mutation dispatched by the view layer.
///
/// Serialized with a `type` tag next to the command's fields:
///
/// ```yaml
/// - { type: add, variantId: v1, productId: p1, price: "49.99", quantity: 2 }
/// - { type: remove, variantId: v1 }
/// - { type: clear }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartCommand {
    /// Add units of a variant, merging with an existing line for the same variant.
    Add(NewLineItem),

    /// Remove the whole line for a variant.
    Remove {
        /// Variant whose line is dropped
        #[serde(rename = "variantId")]
        variant_id: String,
    },

    /// Empty the cart.
    Clear,
}

impl CartCommand {
    /// Builds a remove command.
    pub fn remove(variant_id: impl Into<String>) -> Self {
        Self::Remove {
            variant_id: variant_id.into(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove { .. } => "remove",
            Self::Clear => "clear",
        }
    }
}

impl From<NewLineItem> for CartCommand {
    fn from(item: NewLineItem) -> Self {
        Self::Add(item)
    }
}

/// Which unit price a repeat add of an existing variant accrues into the cart total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RepeatAddPricing {
    /// Accrue with the price carried by the incoming command.
    ///
    /// The stored line keeps its original price, so after a repeat add at a different price the
    /// total amount no longer equals the sum of the line totals.
    #[default]
    Incoming,

    /// Accrue with the price already stored on the line.
    Stored,
}

/// Whether applying a command changed the cart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    /// The cart was modified.
    Changed,

    /// The command had no effect.
    Unchanged,
}

impl Change {
    /// Returns `true` if the cart was modified.
    pub fn is_changed(self) -> bool {
        self == Self::Changed
    }
}
