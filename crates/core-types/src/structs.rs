use crate::enums::Action;
use chrono::{NaiveDate, NaiveDateTime};

/// The columns every transaction file must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "timestamp",
    "ticker",
    "action",
    "quantity",
    "price",
    "trader_id",
];

/// One row exactly as it was read from the source file. Nothing about it is
/// guaranteed; a field missing from a short row is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub timestamp: String,
    pub ticker: String,
    pub action: String,
    pub quantity: String,
    pub price: String,
    pub trader_id: String,
}

/// A validated, normalized brokerage transaction.
///
/// Every instance in a cleaned table has a strictly positive `quantity` and
/// `price`, non-empty upper-cased `ticker` and `trader_id`, and the two derived
/// fields consistent with the rest of the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub ticker: String,
    pub action: Action,
    pub quantity: f64,
    pub price: f64,
    pub trader_id: String,
    /// Notional value, `quantity * price`.
    pub total_value: f64,
    /// Calendar date of `timestamp`.
    pub date: NaiveDate,
}

impl Transaction {
    /// Builds a transaction from already-validated parts, deriving
    /// `total_value` and `date`.
    pub fn new(
        timestamp: NaiveDateTime,
        ticker: String,
        action: Action,
        quantity: f64,
        price: f64,
        trader_id: String,
    ) -> Self {
        Self {
            timestamp,
            ticker,
            action,
            quantity,
            price,
            trader_id,
            total_value: quantity * price,
            date: timestamp.date(),
        }
    }
}
