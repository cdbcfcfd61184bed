//! Product option choices carried on cart lines.

use serde::{Deserialize, Serialize};

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "10 cm").
    pub value: String,
}

impl SelectedOption {
    /// Create a new selected option.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
