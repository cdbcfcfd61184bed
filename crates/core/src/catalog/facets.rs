//! Attribute facet resolver.
//!
//! Groups a product's raw attribute values into named facets for variant and
//! option pickers, and tracks one chosen value per facet.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::SelectedOption;

/// One attribute value attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValueRecord {
    /// Facet this value belongs to (e.g., "Color").
    pub attribute_name: String,
    /// Unit appended to the value when present (e.g., "cm").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub raw_value: String,
    /// Swatch color for color pickers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl AttributeValueRecord {
    /// The user-facing value: `"{raw_value} {unit}"` when a non-empty unit is
    /// present, otherwise the raw value unchanged.
    #[must_use]
    pub fn display_value(&self) -> String {
        match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{} {unit}", self.raw_value),
            _ => self.raw_value.clone(),
        }
    }
}

/// A selectable entry in a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetItem {
    pub display_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A named group of selectable values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub items: Vec<FacetItem>,
}

impl Facet {
    /// Whether `display_value` is one of this facet's items.
    #[must_use]
    pub fn contains(&self, display_value: &str) -> bool {
        self.items.iter().any(|i| i.display_value == display_value)
    }
}

/// Group attribute values into facets.
///
/// Returns `None` when `values` is absent or empty so callers can skip the
/// facet section entirely. Facets appear in order of first appearance; items
/// keep input order and are not deduplicated.
///
/// ```
/// use storekit_core::catalog::{AttributeValueRecord, resolve_facets};
///
/// let values = vec![AttributeValueRecord {
///     attribute_name: "Size".to_string(),
///     unit: Some("cm".to_string()),
///     raw_value: "10".to_string(),
///     color: None,
/// }];
///
/// let facets = resolve_facets(Some(&values)).unwrap();
/// assert_eq!(facets[0].items[0].display_value, "10 cm");
/// assert!(resolve_facets(Some(&[])).is_none());
/// assert!(resolve_facets(None).is_none());
/// ```
#[must_use]
pub fn resolve_facets(values: Option<&[AttributeValueRecord]>) -> Option<Vec<Facet>> {
    let values = values.filter(|v| !v.is_empty())?;

    let mut facets: Vec<Facet> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for value in values {
        let item = FacetItem {
            display_value: value.display_value(),
            color: value.color.clone(),
        };

        let slot = *position
            .entry(value.attribute_name.as_str())
            .or_insert_with(|| {
                facets.push(Facet {
                    name: value.attribute_name.clone(),
                    items: Vec::new(),
                });
                facets.len() - 1
            });

        if let Some(facet) = facets.get_mut(slot) {
            facet.items.push(item);
        }
    }

    Some(facets)
}

/// One chosen display value per facet name.
///
/// Updates are pure: [`SelectionState::select`] and
/// [`SelectionState::deselect`] return a new state. Values are not checked
/// against the product's facets; use [`Facet::contains`] when that matters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState(BTreeMap<String, String>);

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// New state with `facet_name` mapped to `display_value`, replacing any
    /// earlier choice for that facet.
    #[must_use]
    pub fn select(&self, facet_name: &str, display_value: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(facet_name.to_owned(), display_value.to_owned());
        Self(next)
    }

    /// New state without a choice for `facet_name`.
    #[must_use]
    pub fn deselect(&self, facet_name: &str) -> Self {
        let mut next = self.0.clone();
        next.remove(facet_name);
        Self(next)
    }

    #[must_use]
    pub fn get(&self, facet_name: &str) -> Option<&str> {
        self.0.get(facet_name).map(String::as_str)
    }

    #[must_use]
    pub fn is_selected(&self, facet_name: &str, display_value: &str) -> bool {
        self.get(facet_name) == Some(display_value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Choices ordered by facet name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Forget every choice, e.g. when the picker switches products.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// The selection as cart line options, ordered by facet name.
    #[must_use]
    pub fn as_selected_options(&self) -> Vec<SelectedOption> {
        self.iter()
            .map(|(name, value)| SelectedOption::new(name, value))
            .collect()
    }
}
