//! Catalog
//!
//! Product records as served by the storefront's product API, and the translation of a chosen
//! variant into an add-to-cart request.

use std::fmt;

use serde::Deserialize;

use crate::{items::NewLineItem, prices::NumericInput};

/// Identifier as sent by the product API, either numeric or textual.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CatalogId {
    /// Numeric identifier.
    Number(u64),

    /// Textual identifier.
    Text(String),
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Product detail response, `{ "product": { ... } }`.
#[derive(Clone, Debug, Deserialize)]
pub struct ProductResponse {
    /// The product.
    pub product: CatalogProduct,
}

/// A product with its purchasable variants.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogProduct {
    /// Product identifier.
    pub id: CatalogId,

    /// Product title.
    pub title: String,

    /// Purchasable variants.
    #[serde(default)]
    pub variants: Vec<CatalogVariant>,
}

/// A size/colour configuration of a product.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogVariant {
    /// Variant identifier.
    pub id: CatalogId,

    /// Variant title, e.g. `"Cabin / Black"`.
    #[serde(default)]
    pub title: String,

    /// Unit price, usually a numeric string.
    pub price: NumericInput,

    /// First option value (size).
    #[serde(default)]
    pub option1: Option<String>,

    /// Second option value (colour).
    #[serde(default)]
    pub option2: Option<String>,
}

impl CatalogVariant {
    /// Title shown in the cart: the variant title, or the option values joined with `" / "`.
    pub fn display_title(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }

        [self.option1.as_deref(), self.option2.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

impl CatalogProduct {
    /// The options preselected when the product is first shown: those of the first variant.
    pub fn default_selection(&self) -> Option<(Option<&str>, Option<&str>)> {
        self.variants
            .first()
            .map(|variant| (variant.option1.as_deref(), variant.option2.as_deref()))
    }

    /// Finds the variant matching both option values.
    pub fn select_variant(&self, option1: &str, option2: &str) -> Option<&CatalogVariant> {
        self.variants.iter().find(|variant| {
            variant.option1.as_deref() == Some(option1) && variant.option2.as_deref() == Some(option2)
        })
    }

    /// Finds a variant by identifier.
    pub fn variant(&self, id: &str) -> Option<&CatalogVariant> {
        self.variants
            .iter()
            .find(|variant| variant.id.to_string() == id)
    }

    /// Builds the add-to-cart request for `quantity` units of `variant`.
    pub fn line_item(&self, variant: &CatalogVariant, quantity: u32) -> NewLineItem {
        NewLineItem {
            variant_id: variant.id.to_string(),
            product_id: self.id.to_string(),
            product_title: self.title.clone(),
            variant_title: variant.display_title(),
            price: variant.price.clone(),
            quantity: NumericInput::from(quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const RESPONSE: &str = r#"{
        "product": {
            "id": 7712,
            "title": "Voyager Hardside",
            "images": [{"src": "https://cdn.example/voyager.jpg"}],
            "variants": [
                {"id": 1001, "title": "Cabin / Black", "price": "4999.00", "option1": "Cabin", "option2": "Black", "compare_at_price": "6999.00"},
                {"id": 1002, "title": "", "price": "5999.00", "option1": "Medium", "option2": "Teal"}
            ]
        }
    }"#;

    fn product() -> TestResult<CatalogProduct> {
        Ok(serde_json::from_str::<ProductResponse>(RESPONSE)?.product)
    }

    #[test]
    fn selects_variant_by_options() -> TestResult {
        let product = product()?;

        let variant = product
            .select_variant("Medium", "Teal")
            .ok_or("missing variant")?;

        assert_eq!(variant.id, CatalogId::Number(1002));
        assert!(product.select_variant("Cabin", "Teal").is_none());

        Ok(())
    }

    #[test]
    fn default_selection_uses_first_variant() -> TestResult {
        let product = product()?;

        assert_eq!(
            product.default_selection(),
            Some((Some("Cabin"), Some("Black")))
        );

        Ok(())
    }

    #[test]
    fn display_title_falls_back_to_options() -> TestResult {
        let product = product()?;
        let variant = product.variant("1002").ok_or("missing variant")?;

        assert_eq!(variant.display_title(), "Medium / Teal");

        Ok(())
    }

    #[test]
    fn builds_line_item_for_variant() -> TestResult {
        let product = product()?;
        let variant = product.variant("1001").ok_or("missing variant")?;

        let item = product.line_item(variant, 2);

        assert_eq!(
            item,
            NewLineItem::new("1001", "7712", "4999.00", 2).titled("Voyager Hardside", "Cabin / Black")
        );

        Ok(())
    }

    #[test]
    fn textual_ids_are_kept() -> TestResult {
        let product: CatalogProduct = serde_json::from_str(
            r#"{"id":"gid://shopify/Product/1","title":"Duffel","variants":[{"id":"v-1","price":12.5}]}"#,
        )?;

        assert_eq!(product.id.to_string(), "gid://shopify/Product/1");
        assert!(product.variant("v-1").is_some());

        Ok(())
    }
}
