//! Cart Repository
//!
//! Encodes the cart as JSON under a namespace key in a [`Storage`] backend.
//!
//! Records left behind by the storefront's browser client are read as well. That client keeps the
//! cart under `persist:cart` with every top-level field JSON-encoded a second time:
//!
//! ```json
//! {"cartItems":"[{\"variantId\":1001,\"price\":4999,\"quantity\":2}]","totalQuantity":"2","totalAmount":"9998","_persist":"{\"version\":-1,\"rehydrated\":true}"}
//! ```

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError},
    catalog::CatalogId,
    items::{LineItem, NewLineItem},
    prices::NumericInput,
    storage::{Storage, StorageError},
};

/// Default namespace key the cart is stored under.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Key the storefront's browser client stores its cart under.
pub const BROWSER_CART_KEY: &str = "persist:cart";

/// Errors raised while persisting the cart.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The cart could not be encoded.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),

    /// The storage backend rejected the write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reasons a stored value could not be turned back into a cart.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The value is not a cart document.
    #[error("stored cart is not valid JSON for a cart: {0}")]
    Json(#[from] serde_json::Error),

    /// A browser client record holds a total that is not a number.
    #[error("browser cart record has a malformed {field}: {value:?}")]
    BrowserField {
        /// Field name
        field: &'static str,

        /// Raw field value
        value: String,
    },

    /// The value parsed but breaks a cart invariant.
    #[error("stored cart is inconsistent: {0}")]
    Invalid(#[from] CartError),
}

/// Loads and saves the cart under a fixed key.
#[derive(Debug)]
pub struct CartRepository<S> {
    storage: S,
    key: String,
}

impl<S: Storage> CartRepository<S> {
    /// Creates a repository storing the cart under `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Returns the namespace key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the repository, returning the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Reads the stored cart.
    ///
    /// Returns `None` when nothing is stored, or when the stored value cannot be read, parsed or
    /// validated. Failures are logged and never propagated.
    pub fn load(&self) -> Option<Cart> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no stored cart");

                return None;
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read stored cart");

                return None;
            }
        };

        match decode(&raw) {
            Ok(cart) => {
                debug!(
                    key = %self.key,
                    lines = cart.len(),
                    total_quantity = cart.total_quantity(),
                    "loaded stored cart"
                );

                Some(cart)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding stored cart");

                None
            }
        }
    }

    /// Writes the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if encoding or the storage write fails.
    pub fn save(&mut self, cart: &Cart) -> Result<(), PersistError> {
        let encoded = encode(cart)?;

        self.storage.set(&self.key, &encoded)?;

        Ok(())
    }

    /// Deletes the stored cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the storage write fails.
    pub fn delete(&mut self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}

/// Encodes a cart in the persisted JSON layout.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(cart)
}

/// Decodes and validates a cart from the persisted JSON layout.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the value is not a complete, consistent cart.
pub fn decode(raw: &str) -> Result<Cart, DecodeError> {
    let cart = match serde_json::from_str::<Cart>(raw) {
        Ok(cart) => cart,
        Err(err) => match serde_json::from_str::<BrowserRecord>(raw) {
            Ok(record) => record.into_cart()?,
            Err(_) => return Err(err.into()),
        },
    };

    cart.validate()?;

    Ok(cart)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowserRecord {
    cart_items: String,
    total_quantity: String,
    total_amount: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowserLine {
    variant_id: CatalogId,
    product_id: CatalogId,
    #[serde(default)]
    product_title: String,
    #[serde(default)]
    variant_title: String,
    price: NumericInput,
    quantity: NumericInput,
}

impl BrowserRecord {
    fn into_cart(self) -> Result<Cart, DecodeError> {
        let lines: Vec<BrowserLine> = serde_json::from_str(&self.cart_items)?;

        let items = lines
            .into_iter()
            .map(|line| {
                let item = NewLineItem {
                    variant_id: line.variant_id.to_string(),
                    product_id: line.product_id.to_string(),
                    product_title: line.product_title,
                    variant_title: line.variant_title,
                    price: line.price,
                    quantity: line.quantity,
                };

                LineItem::from_new(&item, item.price.to_price(), item.quantity.to_quantity())
            })
            .collect();

        let total_quantity =
            self.total_quantity
                .trim()
                .parse::<u64>()
                .map_err(|_err| DecodeError::BrowserField {
                    field: "totalQuantity",
                    value: self.total_quantity.clone(),
                })?;

        let total_amount = NumericInput::from(self.total_amount.as_str())
            .to_decimal()
            .ok_or_else(|| DecodeError::BrowserField {
                field: "totalAmount",
                value: self.total_amount.clone(),
            })?;

        Ok(Cart::from_parts(items, total_quantity, total_amount))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{commands::RepeatAddPricing, storage::MemoryStorage};

    use super::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();

        cart.add(
            &NewLineItem::new("v1", "p1", "49.99", 2).titled("Bag A", "Red / M"),
            RepeatAddPricing::Incoming,
        );
        cart.add(
            &NewLineItem::new("v2", "p2", 19.5, 1).titled("Bag B", "Blue / L"),
            RepeatAddPricing::Incoming,
        );

        cart
    }

    #[test]
    fn untouched_storage_loads_nothing() {
        let repository = CartRepository::new(MemoryStorage::new(), DEFAULT_CART_KEY);

        assert_eq!(repository.load(), None);
    }

    #[test]
    fn save_then_load_round_trips() -> TestResult {
        let mut repository = CartRepository::new(MemoryStorage::new(), DEFAULT_CART_KEY);
        let cart = sample_cart();

        repository.save(&cart)?;

        assert_eq!(repository.load(), Some(cart));

        Ok(())
    }

    #[test]
    fn encodes_prices_as_numbers() -> TestResult {
        let encoded = encode(&sample_cart())?;
        let value: serde_json::Value = serde_json::from_str(&encoded)?;

        assert_eq!(value["totalQuantity"], 3);
        assert_eq!(value["totalAmount"], 119.48);
        assert_eq!(value["items"][0]["variantId"], "v1");
        assert_eq!(value["items"][0]["price"], 49.99);
        assert_eq!(value["items"][1]["quantity"], 1);

        Ok(())
    }

    #[test]
    fn corrupt_values_load_nothing() {
        let cases = [
            "",
            "{",
            "null",
            "{}",
            r#"{"items":[]}"#,
            r#"{"items":[{"variantId":"v1"}],"totalQuantity":1,"totalAmount":1}"#,
            r#"{"items":[{"variantId":"v1","productId":"p1","productTitle":"","variantTitle":"","price":1,"quantity":0}],"totalQuantity":0,"totalAmount":0}"#,
        ];

        for raw in cases {
            let repository =
                CartRepository::new(MemoryStorage::with_entry(DEFAULT_CART_KEY, raw), "cart");

            assert_eq!(repository.load(), None, "expected {raw:?} to be discarded");
        }
    }

    const BROWSER_RECORD: &str = r#"{"cartItems":"[{\"variantId\":44012345,\"productId\":8011,\"productTitle\":\"Voyager Hardside\",\"variantTitle\":\"Cabin / Black\",\"price\":4999,\"quantity\":2},{\"variantId\":44012399,\"productId\":8044,\"productTitle\":\"Luggage Tag\",\"variantTitle\":\"Red\",\"price\":149.5,\"quantity\":1}]","totalQuantity":"3","totalAmount":"10147.5","_persist":"{\"version\":-1,\"rehydrated\":true}"}"#;

    #[test]
    fn loads_browser_client_record() -> TestResult {
        let repository = CartRepository::new(
            MemoryStorage::with_entry(BROWSER_CART_KEY, BROWSER_RECORD),
            BROWSER_CART_KEY,
        );

        let cart = repository.load().ok_or("record was discarded")?;

        let ids: Vec<&str> = cart.iter().map(LineItem::variant_id).collect();

        assert_eq!(ids, ["44012345", "44012399"]);
        assert_eq!(cart.get("44012345").map(LineItem::product_id), Some("8011"));
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_amount(), Decimal::new(101_475, 1));

        Ok(())
    }

    #[test]
    fn browser_record_is_rewritten_in_current_layout() -> TestResult {
        let cart = decode(BROWSER_RECORD)?;

        assert_eq!(decode(&encode(&cart)?)?, cart);

        Ok(())
    }

    #[test]
    fn empty_browser_record_loads_empty_cart() -> TestResult {
        let cart = decode(
            r#"{"cartItems":"[]","totalQuantity":"0","totalAmount":"0","_persist":"{\"version\":-1,\"rehydrated\":true}"}"#,
        )?;

        assert_eq!(cart, Cart::new());

        Ok(())
    }

    #[test]
    fn inconsistent_browser_records_are_rejected() {
        let bad_total = decode(
            r#"{"cartItems":"[]","totalQuantity":"two","totalAmount":"0"}"#,
        );

        assert!(
            matches!(bad_total, Err(DecodeError::BrowserField { field: "totalQuantity", .. })),
            "got {bad_total:?}"
        );

        let mismatched = decode(
            r#"{"cartItems":"[{\"variantId\":1,\"productId\":2,\"price\":10,\"quantity\":2}]","totalQuantity":"5","totalAmount":"20"}"#,
        );

        assert!(
            matches!(mismatched, Err(DecodeError::Invalid(CartError::QuantityMismatch(5, 2)))),
            "got {mismatched:?}"
        );
    }

    #[test]
    fn high_precision_amounts_survive_a_round_trip() -> TestResult {
        let mut repository = CartRepository::new(MemoryStorage::new(), DEFAULT_CART_KEY);
        let mut cart = Cart::new();

        cart.add(
            &NewLineItem::new("v1", "p1", "0.12345678901234567891", 3),
            RepeatAddPricing::Incoming,
        );
        cart.add(
            &NewLineItem::new("v2", "p2", "79228162514264337593543950335", 1),
            RepeatAddPricing::Incoming,
        );

        repository.save(&cart)?;

        assert_eq!(repository.load(), Some(cart));

        Ok(())
    }

    #[test]
    fn delete_removes_stored_cart() -> TestResult {
        let mut repository = CartRepository::new(MemoryStorage::new(), "cart");

        repository.save(&sample_cart())?;
        repository.delete()?;

        assert_eq!(repository.load(), None);

        Ok(())
    }
}
