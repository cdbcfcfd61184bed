//! Storekit Core - catalog and cart library.
//!
//! This crate holds the data-shaping logic shared by the storefront and the
//! admin panel:
//! - category hierarchy building for tree editors and navigation
//! - attribute facet resolution for variant pickers
//! - cart aggregation with a persisted snapshot
//!
//! # Architecture
//!
//! The core consumes plain records from the data layer and returns plain
//! records. Fetching, caching and rendering live elsewhere. The only I/O is
//! the cart's snapshot write, which goes through the [`cart::SnapshotStore`]
//! trait.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, line keys, slugs and prices
//! - [`catalog`] - Category trees and attribute facets
//! - [`cart`] - Cart lines, snapshots and persistence

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use types::*;
