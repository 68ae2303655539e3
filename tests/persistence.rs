//! Integration tests for carts persisted to disk and hydrated across store instances.

use rust_decimal::Decimal;
use tempfile::TempDir;
use testresult::TestResult;

use valise::prelude::*;

fn suitcase(quantity: u32) -> NewLineItem {
    NewLineItem::new("cabin-black", "voyager", "4999.00", quantity)
        .titled("Voyager Hardside", "Cabin / Black")
}

fn tag(quantity: u32) -> NewLineItem {
    NewLineItem::new("tag-red", "tags", 149.5, quantity).titled("Luggage Tag", "Red")
}

#[test]
fn cart_survives_reopening_the_store() -> TestResult {
    let dir = TempDir::new()?;

    let mut store = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());

    store.add_to_cart(suitcase(1))?;
    store.add_to_cart(tag(2))?;

    let before = store.snapshot();

    let reopened = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());

    assert_eq!(reopened.cart(), &before);
    assert_eq!(reopened.cart().total_quantity(), 3);
    assert_eq!(reopened.cart().total_amount(), Decimal::new(5298, 0));

    Ok(())
}

#[test]
fn untouched_directory_opens_empty() -> TestResult {
    let dir = TempDir::new()?;

    let store = CartStore::open(
        FileStorage::new(dir.path().join("never-created")),
        StoreOptions::default(),
    );

    assert_eq!(store.cart(), &Cart::new());

    Ok(())
}

#[test]
fn corrupt_file_opens_empty_and_is_replaced_on_next_command() -> TestResult {
    let dir = TempDir::new()?;
    let storage = FileStorage::new(dir.path());

    std::fs::write(storage.path_for(DEFAULT_CART_KEY)?, "{\"items\": [")?;

    let mut store = CartStore::open(storage, StoreOptions::default());

    assert_eq!(store.cart(), &Cart::new());

    store.add_to_cart(tag(1))?;

    let reopened = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());

    assert_eq!(reopened.cart().total_quantity(), 1);

    Ok(())
}

#[test]
fn carts_under_different_keys_are_independent() -> TestResult {
    let dir = TempDir::new()?;

    let luggage = StoreOptions {
        key: "luggage".to_string(),
        ..StoreOptions::default()
    };

    let mut first = CartStore::open(FileStorage::new(dir.path()), luggage.clone());
    first.add_to_cart(suitcase(1))?;

    let other = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());
    let again = CartStore::open(FileStorage::new(dir.path()), luggage);

    assert!(other.cart().is_empty());
    assert_eq!(again.cart().total_quantity(), 1);

    Ok(())
}

#[test]
fn commands_before_hydration_are_merged_into_stored_cart() -> TestResult {
    let dir = TempDir::new()?;

    let mut earlier = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());
    earlier.add_to_cart(suitcase(1))?;

    let mut store = CartStore::pending(FileStorage::new(dir.path()), StoreOptions::default());

    store.add_to_cart(tag(2))?;

    assert!(!store.is_hydrated());
    assert_eq!(store.cart().total_quantity(), 2);

    store.hydrate_from_storage()?;

    assert!(store.is_hydrated());

    let ids: Vec<&str> = store.cart().iter().map(LineItem::variant_id).collect();

    assert_eq!(ids, ["cabin-black", "tag-red"]);
    assert_eq!(store.cart().total_quantity(), 3);

    let reopened = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());

    assert_eq!(reopened.cart(), store.cart());

    Ok(())
}

#[test]
fn clear_persists_an_empty_cart() -> TestResult {
    let dir = TempDir::new()?;

    let mut store = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());

    store.add_to_cart(suitcase(2))?;
    store.clear_cart()?;

    let raw = std::fs::read_to_string(
        FileStorage::new(dir.path()).path_for(DEFAULT_CART_KEY)?,
    )?;

    let value: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(value["items"], serde_json::json!([]));
    assert_eq!(value["totalQuantity"], 0);
    assert_eq!(value["totalAmount"], 0.0);

    Ok(())
}

#[test]
fn catalog_selection_flows_into_the_cart() -> TestResult {
    let response: ProductResponse = serde_json::from_str(
        r#"{"product":{"id":7712,"title":"Voyager Hardside","variants":[
            {"id":1001,"title":"Cabin / Black","price":"4999.00","option1":"Cabin","option2":"Black"},
            {"id":1002,"title":"Medium / Teal","price":"5999.00","option1":"Medium","option2":"Teal"}
        ]}}"#,
    )?;

    let product = response.product;
    let variant = product
        .select_variant("Medium", "Teal")
        .ok_or("missing variant")?;

    let mut store = CartStore::open(MemoryStorage::new(), StoreOptions::default());

    store.add_to_cart(product.line_item(variant, 2))?;

    let line = store.cart().get("1002").ok_or("missing line")?;

    assert_eq!(line.product_id(), "7712");
    assert_eq!(line.variant_title(), "Medium / Teal");
    assert_eq!(store.cart().total_amount(), Decimal::new(11998, 0));

    Ok(())
}

#[test]
fn malformed_adds_never_cost_the_stored_cart() -> TestResult {
    let dir = TempDir::new()?;

    let mut store = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());

    store.add_to_cart(suitcase(1))?;
    store.add_to_cart(NewLineItem::new("", "ghost", "10", 1))?;
    store.add_to_cart(NewLineItem::new("tag-red", "tags", "1", "4294967295"))?;
    store.add_to_cart(tag(5))?;
    store.add_to_cart(NewLineItem::new("strap", "straps", "0.12345678901234567891", 3))?;

    let reopened = CartStore::open(FileStorage::new(dir.path()), StoreOptions::default());

    assert_eq!(reopened.cart(), store.cart());
    assert_eq!(reopened.cart().len(), 3);
    assert_eq!(
        reopened.cart().total_quantity(),
        1 + u64::from(u32::MAX) + 3
    );

    Ok(())
}
