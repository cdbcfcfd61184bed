//! Cart commands backed by a JSON snapshot file.
//!
//! # Usage
//!
//! ```bash
//! # Add two medium red tees at 19.99
//! storekit cart add tee 19.99 --qty 2 --option Size=M --option Color=Red
//!
//! # Adjust and inspect
//! storekit cart increment "tee?Color=Red&Size=M"
//! storekit cart set cap 3
//! storekit cart show --json
//!
//! # After checkout
//! storekit cart clear
//! ```
//!
//! The snapshot lives at `<STOREKIT_DATA_DIR>/<STOREKIT_CART_STORE>.json`.

use rust_decimal::Decimal;
use serde::Serialize;
use storekit_core::cart::{CartLine, CartStore, JsonFileStore};
use storekit_core::{CurrencyCode, LineKey, Price, SelectedOption};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{emit_json, emit_lines};

/// A cart mutation requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Show,
    Add {
        product_id: String,
        unit_price: Decimal,
        quantity: u32,
        title: Option<String>,
        options: Vec<SelectedOption>,
    },
    Increment(String),
    Decrement(String),
    Set(String, u32),
    Remove(String),
    Clear,
}

#[derive(Serialize)]
struct CartOutput<'a> {
    lines: &'a [CartLine],
    item_count: u64,
    total: String,
    persisted: bool,
}

/// Apply `action` to the cart stored under `config` and print the result.
pub fn run(config: &CliConfig, action: CartAction, json: bool) -> Result<(), CliError> {
    let store = JsonFileStore::new(&config.data_dir, &config.cart_store);
    tracing::debug!(path = %store.path().display(), "Opening cart");

    let mut cart = CartStore::open(store);
    apply(&mut cart, action);

    if cart.is_degraded() {
        tracing::warn!("Cart changes were not saved");
    }

    if json {
        return emit_json(&CartOutput {
            lines: cart.lines(),
            item_count: cart.item_count(),
            total: cart.total().to_string(),
            persisted: !cart.is_degraded(),
        });
    }

    emit_lines(summary(&cart, config.currency))
}

fn apply(cart: &mut CartStore<JsonFileStore>, action: CartAction) {
    match action {
        CartAction::Show => {}
        CartAction::Add {
            product_id,
            unit_price,
            quantity,
            title,
            options,
        } => {
            let key = LineKey::for_variant(&product_id, &options);
            let mut line = CartLine::new(key, unit_price, quantity).with_options(options);
            line.title = title;
            cart.add_item(line);
        }
        CartAction::Increment(key) => cart.increment_quantity(&key),
        CartAction::Decrement(key) => cart.decrement_quantity(&key),
        CartAction::Set(key, quantity) => cart.set_quantity(&key, quantity),
        CartAction::Remove(key) => cart.remove_item(&key),
        CartAction::Clear => cart.clear_cart(),
    }
}

fn summary(cart: &CartStore<JsonFileStore>, currency: CurrencyCode) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| {
            let title = line.title.as_deref().unwrap_or(line.identity_key.as_str());
            format!(
                "{:>3} x {title} [{}] @ {} = {}",
                line.quantity,
                line.identity_key,
                Price::new(line.unit_price, currency).display(),
                Price::new(line.line_total(), currency).display(),
            )
        })
        .collect();

    lines.push(format!(
        "{} items, subtotal {}",
        cart.item_count(),
        cart.subtotal(currency).display()
    ));
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> CliConfig {
        CliConfig {
            data_dir: dir.to_path_buf(),
            ..CliConfig::default()
        }
    }

    fn open(config: &CliConfig) -> CartStore<JsonFileStore> {
        CartStore::open(JsonFileStore::new(&config.data_dir, &config.cart_store))
    }

    #[test]
    fn test_add_with_options_uses_variant_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        run(
            &config,
            CartAction::Add {
                product_id: "tee".to_string(),
                unit_price: Decimal::new(1999, 2),
                quantity: 2,
                title: Some("Tee".to_string()),
                options: vec![SelectedOption::new("Size", "M")],
            },
            false,
        )
        .unwrap();

        let cart = open(&config);
        assert_eq!(cart.lines()[0].identity_key.as_str(), "tee?Size=M");
        assert_eq!(cart.total(), Decimal::new(3998, 2));
    }

    #[test]
    fn test_actions_persist_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let add = |id: &str| CartAction::Add {
            product_id: id.to_string(),
            unit_price: Decimal::ONE,
            quantity: 1,
            title: None,
            options: Vec::new(),
        };

        run(&config, add("a"), false).unwrap();
        run(&config, add("b"), false).unwrap();
        run(&config, CartAction::Increment("a".to_string()), false).unwrap();
        run(&config, CartAction::Remove("b".to_string()), false).unwrap();

        let cart = open(&config);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("a").unwrap().quantity, 2);

        run(&config, CartAction::Clear, false).unwrap();
        assert!(open(&config).is_empty());
    }

    #[test]
    fn test_summary_formats_prices() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let mut cart = open(&config);
        cart.add_item(CartLine::new("p1", Decimal::new(1050, 2), 2).with_title("Mug"));

        let lines = summary(&cart, CurrencyCode::USD);
        assert_eq!(lines[0], "  2 x Mug [p1] @ $10.50 = $21.00");
        assert_eq!(lines[1], "2 items, subtotal $21.00");
    }
}
