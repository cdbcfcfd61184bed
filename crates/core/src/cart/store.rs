//! Cart aggregation engine.

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use super::{CartLine, CartSnapshot, SnapshotStore};
use crate::types::{CurrencyCode, Price};

/// A persisted collection of cart lines.
///
/// Every mutation updates the in-memory snapshot and then writes it to the
/// backing [`SnapshotStore`]. A failed write never fails the mutation: it is
/// logged at `warn` level and the cart stays in memory for the rest of its
/// lifetime (see [`CartStore::is_degraded`]).
///
/// The cart assumes a single writer. Two carts opened on the same store do
/// not coordinate; the last write wins.
#[derive(Debug)]
pub struct CartStore<S: SnapshotStore> {
    snapshot: CartSnapshot,
    store: S,
    degraded: bool,
}

impl<S: SnapshotStore> CartStore<S> {
    /// Open a cart, hydrating it once from `store`.
    ///
    /// An unreadable snapshot is logged and the cart starts empty.
    #[instrument(skip_all)]
    pub fn open(store: S) -> Self {
        let snapshot = match store.load() {
            Ok(Some(snapshot)) => {
                debug!(lines = snapshot.lines.len(), "Hydrated cart snapshot");
                snapshot
            }
            Ok(None) => CartSnapshot::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart snapshot, starting empty");
                CartSnapshot::default()
            }
        };

        Self {
            snapshot,
            store,
            degraded: false,
        }
    }

    /// Add a line, merging into an existing line with the same key.
    ///
    /// A merged line keeps its position and fields; only its quantity grows.
    /// Quantities below 1 are clamped to 1.
    pub fn add_item(&mut self, mut line: CartLine) {
        line.quantity = line.quantity.max(1);

        match self.position(line.identity_key.as_str()) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                debug!(key = %line.identity_key, quantity = existing.quantity, "Merged cart line");
            }
            None => {
                debug!(key = %line.identity_key, quantity = line.quantity, "Added cart line");
                self.snapshot.lines.push(line);
            }
        }

        self.commit();
    }

    /// Raise a line's quantity by one. Unknown keys are ignored.
    pub fn increment_quantity(&mut self, key: &str) {
        if let Some(line) = self.position(key) {
            line.quantity = line.quantity.saturating_add(1);
        }
        self.commit();
    }

    /// Lower a line's quantity by one, never below 1. Unknown keys are ignored.
    ///
    /// Use [`CartStore::remove_item`] to delete a line.
    pub fn decrement_quantity(&mut self, key: &str) {
        if let Some(line) = self.position(key) {
            line.quantity = line.quantity.saturating_sub(1).max(1);
        }
        self.commit();
    }

    /// Set a line's quantity exactly; 0 removes the line. Unknown keys are ignored.
    pub fn set_quantity(&mut self, key: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(key);
            return;
        }
        if let Some(line) = self.position(key) {
            line.quantity = quantity;
        }
        self.commit();
    }

    /// Delete a line. Unknown keys are ignored.
    pub fn remove_item(&mut self, key: &str) {
        let before = self.snapshot.lines.len();
        self.snapshot
            .lines
            .retain(|l| l.identity_key.as_str() != key);
        if self.snapshot.lines.len() != before {
            debug!(key, "Removed cart line");
        }
        self.commit();
    }

    /// Empty the cart, e.g. after a successful checkout.
    pub fn clear_cart(&mut self) {
        self.snapshot.lines.clear();
        debug!("Cleared cart");
        self.commit();
    }

    /// Sum of `unit_price * quantity` over all lines, in exact decimal.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.snapshot.lines.iter().map(CartLine::line_total).sum()
    }

    /// [`CartStore::total`] as a price in `currency_code`.
    #[must_use]
    pub fn subtotal(&self, currency_code: CurrencyCode) -> Price {
        Price::new(self.total(), currency_code)
    }

    /// Sum of quantities, e.g. for a cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.snapshot
            .lines
            .iter()
            .map(|l| u64::from(l.quantity))
            .sum()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.snapshot.lines
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CartLine> {
        self.snapshot
            .lines
            .iter()
            .find(|l| l.identity_key.as_str() == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.lines.is_empty()
    }

    #[must_use]
    pub const fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    /// Whether a failed write has switched the cart to memory-only mode.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn position(&mut self, key: &str) -> Option<&mut CartLine> {
        self.snapshot
            .lines
            .iter_mut()
            .find(|l| l.identity_key.as_str() == key)
    }

    fn commit(&mut self) {
        if self.degraded {
            return;
        }
        if let Err(e) = self.store.save(&self.snapshot) {
            warn!(error = %e, "Failed to persist cart snapshot, continuing in memory");
            self.degraded = true;
        }
    }
}
