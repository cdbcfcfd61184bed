//! Cart line and snapshot records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{LineKey, SelectedOption};

/// One aggregated entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Deduplication key; additions with an equal key merge.
    pub identity_key: LineKey,
    /// Display title of the product or variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub unit_price: Decimal,
    /// Always at least 1 once stored in a cart.
    pub quantity: u32,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

impl CartLine {
    /// Create a line without title or options.
    #[must_use]
    pub fn new(identity_key: impl Into<LineKey>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            identity_key: identity_key.into(),
            title: None,
            unit_price,
            quantity,
            selected_options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<SelectedOption>) -> Self {
        self.selected_options = options;
        self
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The full ordered state of a cart, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    #[must_use]
    pub const fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Repair a snapshot read from storage.
    ///
    /// Zero quantities become 1, and a key that appears more than once is
    /// merged into its first occurrence with the quantities summed.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut lines: Vec<CartLine> = Vec::with_capacity(self.lines.len());
        for mut line in self.lines {
            line.quantity = line.quantity.max(1);
            match lines
                .iter_mut()
                .find(|l| l.identity_key == line.identity_key)
            {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => lines.push(line),
            }
        }
        Self { lines }
    }
}
