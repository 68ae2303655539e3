//! Cart Summary
//!
//! Renders the cart as a table followed by its totals, the way the storefront's cart page shows it.

use std::io;

use rusty_money::iso::Currency;
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, items::to_money};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Writing to the output failed.
    #[error("failed to write cart summary: {0}")]
    Io(#[from] io::Error),
}

/// Writes the cart table and totals to `out`.
///
/// # Errors
///
/// Returns [`SummaryError::Io`] if the output cannot be written.
pub fn write_cart(
    mut out: impl io::Write,
    cart: &Cart,
    currency: &'static Currency,
) -> Result<(), SummaryError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
    } else {
        writeln!(out, "\n{}", line_table(cart, currency))?;
    }

    writeln!(out, "{}", totals_table(cart, currency))?;

    Ok(())
}

fn line_table(cart: &Cart, currency: &'static Currency) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Variant", "Qty", "Unit Price", "Line Total"]);

    for (idx, item) in cart.iter().enumerate() {
        builder.push_record([
            format!("#{}", idx + 1),
            item.product_title().to_string(),
            item.variant_title().to_string(),
            item.quantity().to_string(),
            to_money(item.price(), currency).to_string(),
            item.line_total_money(currency).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    table
}

/// Totals as a borderless two-column table, so labels and amounts line up without padding by hand.
fn totals_table(cart: &Cart, currency: &'static Currency) -> Table {
    let mut builder = Builder::default();

    builder.push_record([
        String::from("Total Items:"),
        cart.total_quantity().to_string(),
    ]);
    builder.push_record([
        String::from("Total Price:"),
        cart.total_money(currency).to_string(),
    ]);

    let mut table = builder.build();

    table.with(Style::blank());
    table.modify(Columns::new(0..2), Alignment::right());
    table.modify(Rows::new(1..2), Color::BOLD);

    table
}
