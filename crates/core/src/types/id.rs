//! Newtype identifiers for catalog and cart entities.
//!
//! Use the `define_id!` macro to create type-safe integer ID wrappers that
//! prevent accidentally mixing IDs from different entity types.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::SelectedOption;

/// Macro to define a type-safe integer ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use storekit_core::define_id;
/// define_id!(BrandId);
/// define_id!(WarehouseId);
///
/// let brand = BrandId::new(1);
/// let warehouse = WarehouseId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: BrandId = warehouse;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(CategoryId);

/// Deduplication key of a cart line.
///
/// Two additions with the same key merge into one line. By default the key is
/// the product or variant id; [`LineKey::for_variant`] derives a key that also
/// distinguishes the selected options.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(String);

impl LineKey {
    /// Create a key from any string-like product or variant id.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive a key from a product id and the options chosen for it.
    ///
    /// Options are sorted by name so the same selection made in a different
    /// order yields the same key. Option names and values are percent-encoded
    /// and `%`/`?` are escaped in the product id, so distinct selections never
    /// share a key. With no options this is the (escaped) product id.
    ///
    /// ```
    /// use storekit_core::{LineKey, SelectedOption};
    ///
    /// let key = LineKey::for_variant(
    ///     "tee",
    ///     &[SelectedOption::new("Size", "M"), SelectedOption::new("Color", "Red")],
    /// );
    /// assert_eq!(key.as_str(), "tee?Color=Red&Size=M");
    /// assert_eq!(LineKey::for_variant("tee", &[]).as_str(), "tee");
    ///
    /// let spaced = LineKey::for_variant("tee", &[SelectedOption::new("Size", "10 cm")]);
    /// assert_eq!(spaced.as_str(), "tee?Size=10%20cm");
    /// ```
    #[must_use]
    pub fn for_variant(product_id: &str, options: &[SelectedOption]) -> Self {
        // The first `?` of a key always separates the product id.
        let product_id = product_id.replace('%', "%25").replace('?', "%3F");
        if options.is_empty() {
            return Self(product_id);
        }

        let mut pairs: Vec<&SelectedOption> = options.iter().collect();
        pairs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.value.cmp(&b.value)));

        let suffix = pairs
            .iter()
            .map(|o| {
                format!(
                    "{}={}",
                    urlencoding::encode(&o.name),
                    urlencoding::encode(&o.value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        Self(format!("{product_id}?{suffix}"))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for LineKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl AsRef<str> for LineKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
