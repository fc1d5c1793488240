//! Order line selection and totals.
//!
//! All arithmetic is checked. Amounts must also fit the store's signed
//! integer columns.

use thiserror::Error;

use crate::domain::orders::data::OrderLine;

/// A quantity or amount does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order amount overflow")]
pub struct AmountOverflow;

/// Lines that will become order items.
///
/// Zero quantities are dropped. Repeated products are merged into their first
/// line by summing quantities, so each product appears once and the first
/// selection order is kept.
///
/// # Errors
///
/// Returns [`AmountOverflow`] when merged quantities overflow.
pub fn selected_lines(lines: &[OrderLine]) -> Result<Vec<OrderLine>, AmountOverflow> {
    let mut selected: Vec<OrderLine> = Vec::with_capacity(lines.len());

    for line in lines.iter().filter(|line| line.quantity > 0) {
        match selected.iter_mut().find(|s| s.product == line.product) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(AmountOverflow)?;
            }
            None => selected.push(*line),
        }
    }

    Ok(selected)
}

/// `quantity * unit_price`.
///
/// # Errors
///
/// Returns [`AmountOverflow`] when the product does not fit.
pub fn line_subtotal(quantity: u32, unit_price: u64) -> Result<u64, AmountOverflow> {
    unit_price
        .checked_mul(u64::from(quantity))
        .filter(|subtotal| fits_store(*subtotal))
        .ok_or(AmountOverflow)
}

/// Running totals of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    /// Sum of subtotals.
    pub total_value: u64,
    /// Sum of quantities.
    pub product_count: u64,
}

impl OrderTotals {
    /// Add one item.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] when either total would overflow; the totals
    /// are left unchanged in that case.
    pub fn add(&mut self, quantity: u32, subtotal: u64) -> Result<(), AmountOverflow> {
        let total_value = self
            .total_value
            .checked_add(subtotal)
            .filter(|total| fits_store(*total))
            .ok_or(AmountOverflow)?;

        let product_count = self
            .product_count
            .checked_add(u64::from(quantity))
            .ok_or(AmountOverflow)?;

        self.total_value = total_value;
        self.product_count = product_count;

        Ok(())
    }
}

fn fits_store(amount: u64) -> bool {
    i64::try_from(amount).is_ok()
}
