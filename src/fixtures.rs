//! Fixtures
//!
//! Cart scenarios described in YAML: a sequence of commands and the cart expected afterwards.
//!
//! ```yaml
//! name: Remove after mixed adds
//! commands:
//!   - { type: add, variantId: v1, productId: p1, price: "49.99", quantity: 2 }
//!   - { type: remove, variantId: v1 }
//! expect:
//!   items: []
//!   totalQuantity: 0
//!   totalAmount: 0
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::Cart,
    commands::{CartCommand, RepeatAddPricing},
    items::LineItem,
    prices::NumericInput,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {path}: {source}")]
    Io {
        /// Fixture path
        path: PathBuf,

        /// Underlying error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The cart produced by the scenario differs from the expectation.
    #[error("Scenario {scenario:?} expected {field} to be {expected}, got {actual}")]
    Mismatch {
        /// Scenario name
        scenario: String,

        /// Which part of the cart differed
        field: &'static str,

        /// Expected value
        expected: String,

        /// Actual value
        actual: String,
    },
}

/// Expected cart after a scenario has run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectation {
    /// Variant ids in cart order, when checked.
    #[serde(default)]
    pub items: Option<Vec<ExpectedLine>>,

    /// Expected total quantity.
    pub total_quantity: u64,

    /// Expected total amount.
    pub total_amount: NumericInput,
}

/// Expected line, identified by variant.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedLine {
    /// Variant id.
    pub variant_id: String,

    /// Expected quantity.
    pub quantity: u32,
}

/// A named sequence of cart commands.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,

    /// Price policy for repeat adds
    #[serde(default)]
    pub pricing: RepeatAddPricing,

    /// Commands in dispatch order
    pub commands: Vec<CartCommand>,

    /// Expected cart, if checked
    #[serde(default)]
    pub expect: Option<Expectation>,
}

impl Scenario {
    /// Parses a scenario from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the document is not a scenario.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Reads a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads `./fixtures/scenarios/{name}.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_file(PathBuf::from("./fixtures/scenarios").join(format!("{name}.yml")))
    }

    /// Applies the commands to an empty cart.
    pub fn run(&self) -> Cart {
        let mut cart = Cart::new();

        self.apply_to(&mut cart);

        cart
    }

    /// Applies the commands to an existing cart.
    pub fn apply_to(&self, cart: &mut Cart) {
        for command in &self.commands {
            cart.apply(command, self.pricing);
        }
    }

    /// Checks a cart against the expectation, if any.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Mismatch`] for the first differing field.
    pub fn check(&self, cart: &Cart) -> Result<(), FixtureError> {
        let Some(expect) = &self.expect else {
            return Ok(());
        };

        if let Some(lines) = &expect.items {
            let actual: Vec<ExpectedLine> = cart.iter().map(ExpectedLine::from).collect();

            if &actual != lines {
                return Err(self.mismatch("items", format!("{lines:?}"), format!("{actual:?}")));
            }
        }

        if cart.total_quantity() != expect.total_quantity {
            return Err(self.mismatch(
                "totalQuantity",
                expect.total_quantity.to_string(),
                cart.total_quantity().to_string(),
            ));
        }

        if expect.total_amount.to_decimal() != Some(cart.total_amount()) {
            return Err(self.mismatch(
                "totalAmount",
                expect.total_amount.to_string(),
                cart.total_amount().to_string(),
            ));
        }

        Ok(())
    }

    fn mismatch(&self, field: &'static str, expected: String, actual: String) -> FixtureError {
        FixtureError::Mismatch {
            scenario: self.name.clone(),
            field,
            expected,
            actual,
        }
    }
}

impl From<&LineItem> for ExpectedLine {
    fn from(item: &LineItem) -> Self {
        Self {
            variant_id: item.variant_id().to_string(),
            quantity: item.quantity(),
        }
    }
}
