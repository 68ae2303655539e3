//! Cart Store
//!
//! Owns the cart for the lifetime of a session: hydrates it from storage once, applies commands
//! through the pure reducer and writes every post-command cart back to storage.
//!
//! A store created with [`CartStore::pending`] accepts commands before the stored cart has been
//! read. Those commands are applied to an empty cart for display, queued, and replayed in order on
//! top of the stored cart when [`CartStore::hydrate`] is called. Nothing is written to storage
//! until hydration has happened, so the stored cart is never overwritten by the pre-hydration view.

use tracing::{debug, warn};

use crate::{
    cart::Cart,
    commands::{CartCommand, Change, RepeatAddPricing},
    items::NewLineItem,
    repository::{CartRepository, DEFAULT_CART_KEY, PersistError},
    storage::Storage,
};

/// Store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Namespace key the cart is stored under.
    pub key: String,

    /// Price used to accrue repeat adds into the total.
    pub pricing: RepeatAddPricing,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_CART_KEY.to_string(),
            pricing: RepeatAddPricing::default(),
        }
    }
}

/// The cart, its persistence, and the command surface exposed to the view layer.
#[derive(Debug)]
pub struct CartStore<S> {
    repository: CartRepository<S>,
    cart: Cart,
    pricing: RepeatAddPricing,
    queued: Option<Vec<CartCommand>>,
}

impl<S: Storage> CartStore<S> {
    /// Opens the store, hydrating the cart from storage.
    ///
    /// A missing or unreadable stored cart yields an empty cart.
    pub fn open(storage: S, options: StoreOptions) -> Self {
        let repository = CartRepository::new(storage, options.key);
        let cart = repository.load().unwrap_or_default();

        Self {
            repository,
            cart,
            pricing: options.pricing,
            queued: None,
        }
    }

    /// Creates a store whose stored cart has not been read yet.
    ///
    /// Call [`CartStore::hydrate`] or [`CartStore::hydrate_from_storage`] once the stored cart is
    /// available.
    pub fn pending(storage: S, options: StoreOptions) -> Self {
        Self {
            repository: CartRepository::new(storage, options.key),
            cart: Cart::new(),
            pricing: options.pricing,
            queued: Some(Vec::new()),
        }
    }

    /// Returns `true` once the stored cart has been merged in.
    pub fn is_hydrated(&self) -> bool {
        self.queued.is_none()
    }

    /// Reads the stored cart and hydrates from it.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if replayed commands could not be written back.
    pub fn hydrate_from_storage(&mut self) -> Result<(), PersistError> {
        if self.is_hydrated() {
            debug!("cart already hydrated; skipping storage read");

            return Ok(());
        }

        let loaded = self.repository.load();

        self.hydrate(loaded)
    }

    /// Hydrates from a cart loaded elsewhere, replaying commands dispatched in the meantime.
    ///
    /// `None` or an inconsistent cart hydrates as empty. Calls after the first are ignored. When
    /// commands were replayed the merged cart is saved once.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the merged cart could not be written. The merged cart is
    /// still kept in memory.
    pub fn hydrate(&mut self, loaded: Option<Cart>) -> Result<(), PersistError> {
        let Some(queued) = self.queued.take() else {
            debug!("ignoring late hydration; cart already hydrated");

            return Ok(());
        };

        let mut cart = match loaded {
            Some(cart) => match cart.validate() {
                Ok(()) => cart,
                Err(err) => {
                    warn!(error = %err, "discarding inconsistent cart during hydration");

                    Cart::new()
                }
            },
            None => Cart::new(),
        };

        for command in &queued {
            cart.apply(command, self.pricing);
        }

        debug!(
            replayed = queued.len(),
            lines = cart.len(),
            total_quantity = cart.total_quantity(),
            "hydrated cart"
        );

        self.cart = cart;

        if queued.is_empty() {
            return Ok(());
        }

        self.persist()
    }

    /// Applies a command and writes the resulting cart to storage.
    ///
    /// Before hydration the command is queued for replay and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the write fails. The command has still been applied.
    pub fn dispatch(&mut self, command: CartCommand) -> Result<Change, PersistError> {
        let change = self.cart.apply(&command, self.pricing);

        debug!(
            command = command.name(),
            changed = change.is_changed(),
            total_quantity = self.cart.total_quantity(),
            total_amount = %self.cart.total_amount(),
            "applied cart command"
        );

        if let Some(queued) = self.queued.as_mut() {
            queued.push(command);

            return Ok(change);
        }

        self.persist()?;

        Ok(change)
    }

    /// Adds units of a variant.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn add_to_cart(&mut self, item: NewLineItem) -> Result<Change, PersistError> {
        self.dispatch(CartCommand::Add(item))
    }

    /// Removes the line for a variant.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn remove_from_cart(&mut self, variant_id: &str) -> Result<Change, PersistError> {
        self.dispatch(CartCommand::remove(variant_id))
    }

    /// Empties the cart.
    ///
    /// # Errors
    ///
    /// See [`CartStore::dispatch`].
    pub fn clear_cart(&mut self) -> Result<Change, PersistError> {
        self.dispatch(CartCommand::Clear)
    }

    /// Returns the current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Returns a copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    /// Returns the repository the cart is persisted through.
    pub fn repository(&self) -> &CartRepository<S> {
        &self.repository
    }

    /// Consumes the store, returning the storage backend.
    pub fn into_storage(self) -> S {
        self.repository.into_storage()
    }

    fn persist(&mut self) -> Result<(), PersistError> {
        self.repository.save(&self.cart).inspect_err(|err| {
            warn!(key = self.repository.key(), error = %err, "failed to save cart");
        })
    }
}
