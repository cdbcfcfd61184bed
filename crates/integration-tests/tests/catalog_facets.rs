//! Integration tests for the attribute facet resolver.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use storekit_core::catalog::{AttributeValueRecord, SelectionState, resolve_facets};
use storekit_core::{LineKey, SelectedOption};
use storekit_integration_tests::attributes;

#[test]
fn test_fixture_facets() {
    let values = attributes().unwrap();
    let facets = resolve_facets(Some(&values)).unwrap();

    let names: Vec<&str> = facets.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Color", "Size", "Material"]);

    let colors: Vec<(&str, Option<&str>)> = facets[0]
        .items
        .iter()
        .map(|i| (i.display_value.as_str(), i.color.as_deref()))
        .collect();
    assert_eq!(
        colors,
        vec![("Red", Some("#d32f2f")), ("Blue", Some("#1976d2"))]
    );

    let sizes: Vec<&str> = facets[1]
        .items
        .iter()
        .map(|i| i.display_value.as_str())
        .collect();
    assert_eq!(sizes, vec!["10 cm", "12 cm"]);
    assert_eq!(facets[2].items[0].display_value, "Cotton");
}

#[test]
fn test_absent_attributes_suppress_section() {
    let missing: Option<Vec<AttributeValueRecord>> = None;
    assert!(resolve_facets(missing.as_deref()).is_none());
    assert!(resolve_facets(Some(&[])).is_none());
}

#[test]
fn test_facet_json_omits_missing_color() {
    let values = attributes().unwrap();
    let facets = resolve_facets(Some(&values)).unwrap();
    let json = serde_json::to_value(&facets).unwrap();

    assert_eq!(json[0]["items"][0]["displayValue"], "Red");
    assert_eq!(json[0]["items"][0]["color"], "#d32f2f");
    assert!(json[1]["items"][0].get("color").is_none());
}

#[test]
fn test_picker_session_to_cart_key() {
    let values = attributes().unwrap();
    let facets = resolve_facets(Some(&values)).unwrap();

    let mut state = SelectionState::new();
    for facet in &facets {
        state = state.select(&facet.name, &facet.items[0].display_value);
    }
    state = state.select("Color", "Blue");

    assert_eq!(state.get("Color"), Some("Blue"));
    assert_eq!(state.len(), 3);

    let key = LineKey::for_variant("tee", &state.as_selected_options());
    assert_eq!(key.as_str(), "tee?Color=Blue&Material=Cotton&Size=10%20cm");
    assert_eq!(
        state.as_selected_options()[0],
        SelectedOption::new("Color", "Blue")
    );

    // Switching products resets the picker.
    state.clear();
    assert!(state.is_empty());
}

#[test]
fn test_selection_roundtrips_as_map() {
    let state = SelectionState::new().select("Size", "10 cm");
    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(json, r#"{"Size":"10 cm"}"#);

    let back: SelectionState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}
