//! Shopping cart state.
//!
//! - [`CartStore`] - lines with merge-on-add, quantity bounds and totals
//! - [`SnapshotStore`] - where the cart is persisted after every mutation

pub mod line;
pub mod persist;
pub mod store;

pub use line::{CartLine, CartSnapshot};
pub use persist::{CART_STORE_NAME, JsonFileStore, MemoryStore, PersistError, SnapshotStore};
pub use store::CartStore;
