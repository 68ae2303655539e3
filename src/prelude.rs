//! Valise prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    catalog::{CatalogId, CatalogProduct, CatalogVariant, ProductResponse},
    commands::{CartCommand, Change, RepeatAddPricing},
    items::{LineItem, NewLineItem},
    prices::NumericInput,
    repository::{BROWSER_CART_KEY, CartRepository, DEFAULT_CART_KEY, DecodeError, PersistError},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    store::{CartStore, StoreOptions},
};
