//! Core types for Storekit.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod option;
pub mod price;
pub mod slug;

pub use id::*;
pub use option::SelectedOption;
pub use price::{CurrencyCode, Price};
pub use slug::{Slug, SlugError};
