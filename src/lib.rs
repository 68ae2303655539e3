//! Valise
//!
//! Valise is the cart state engine behind a luggage storefront. It keeps the shopping cart's line
//! items and totals consistent as add, remove and clear commands arrive, and mirrors every change
//! into durable key-value storage so the cart survives restarts.
//!
//! ```
//! use valise::prelude::*;
//!
//! let mut store = CartStore::open(MemoryStorage::new(), StoreOptions::default());
//!
//! store.add_to_cart(NewLineItem::new("v1", "p1", "49.99", 2))?;
//! store.add_to_cart(NewLineItem::new("v2", "p2", 19.5, 1))?;
//! store.remove_from_cart("v1")?;
//!
//! assert_eq!(store.cart().total_quantity(), 1);
//! # Ok::<(), PersistError>(())
//! ```

pub mod cart;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod prices;
pub mod repository;
pub mod storage;
pub mod store;
pub mod summary;
