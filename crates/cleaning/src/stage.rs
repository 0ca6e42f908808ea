use crate::validator::{
    is_strictly_positive, normalize_text, parse_action, parse_numeric, parse_timestamp,
};
use chrono::NaiveDateTime;
use core_types::{Action, RawRecord, Transaction};

/// Per-step drop counts from one cleaning pass.
///
/// The counts are attributed in step order (missing values, then action, then
/// positivity), so a row failing several rules is counted once, at the first
/// rule it fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub dropped_missing: usize,
    pub dropped_invalid_action: usize,
    pub dropped_non_positive: usize,
    pub retained: usize,
}

impl CleaningReport {
    pub fn total_dropped(&self) -> usize {
        self.dropped_missing + self.dropped_invalid_action + self.dropped_non_positive
    }
}

/// The cleaned table together with the report describing how it was derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningOutcome {
    pub transactions: Vec<Transaction>,
    pub report: CleaningReport,
}

/// A raw row after timestamp parsing, text normalization and numeric coercion.
/// `None` marks a missing or invalid value.
#[derive(Debug)]
struct Candidate {
    timestamp: Option<NaiveDateTime>,
    ticker: Option<String>,
    action: Option<String>,
    quantity: Option<f64>,
    price: Option<f64>,
    trader_id: Option<String>,
}

/// A row whose critical fields are all present, action not yet checked.
#[derive(Debug)]
struct Complete {
    timestamp: NaiveDateTime,
    ticker: String,
    action: String,
    quantity: f64,
    price: f64,
    trader_id: String,
}

impl Candidate {
    fn from_raw(raw: &RawRecord) -> Self {
        Self {
            timestamp: parse_timestamp(&raw.timestamp),
            ticker: normalize_text(&raw.ticker),
            action: normalize_text(&raw.action),
            quantity: parse_numeric(&raw.quantity),
            price: parse_numeric(&raw.price),
            trader_id: normalize_text(&raw.trader_id),
        }
    }

    fn into_complete(self) -> Option<Complete> {
        Some(Complete {
            timestamp: self.timestamp?,
            ticker: self.ticker?,
            action: self.action?,
            quantity: self.quantity?,
            price: self.price?,
            trader_id: self.trader_id?,
        })
    }
}

/// Runs the full cleaning pass over a raw table.
///
/// Row-level defects never fail the call: offending rows are dropped and
/// counted. The result is sorted by timestamp with a stable sort, so rows
/// sharing a timestamp keep their input order.
pub fn clean_records(records: &[RawRecord]) -> CleaningOutcome {
    let input_rows = records.len();

    let complete: Vec<Complete> = records
        .iter()
        .map(Candidate::from_raw)
        .filter_map(Candidate::into_complete)
        .collect();
    let dropped_missing = input_rows - complete.len();
    if dropped_missing > 0 {
        tracing::warn!("Dropped {} rows with missing critical values", dropped_missing);
    }

    let before_action = complete.len();
    let with_action: Vec<(Complete, Action)> = complete
        .into_iter()
        .filter_map(|row| parse_action(&row.action).map(|action| (row, action)))
        .collect();
    let dropped_invalid_action = before_action - with_action.len();
    if dropped_invalid_action > 0 {
        tracing::warn!("Removed {} rows with invalid actions", dropped_invalid_action);
    }

    let before_positive = with_action.len();
    let mut transactions: Vec<Transaction> = with_action
        .into_iter()
        .filter(|(row, _)| is_strictly_positive(row.quantity) && is_strictly_positive(row.price))
        .map(|(row, action)| {
            Transaction::new(
                row.timestamp,
                row.ticker,
                action,
                row.quantity,
                row.price,
                row.trader_id,
            )
        })
        .collect();
    let dropped_non_positive = before_positive - transactions.len();
    if dropped_non_positive > 0 {
        tracing::warn!(
            "Removed {} rows with non-positive quantity/price",
            dropped_non_positive
        );
    }

    transactions.sort_by_key(|tx| tx.timestamp);

    let report = CleaningReport {
        input_rows,
        dropped_missing,
        dropped_invalid_action,
        dropped_non_positive,
        retained: transactions.len(),
    };
    tracing::info!("Data cleaned. Final count: {} transactions", report.retained);

    CleaningOutcome {
        transactions,
        report,
    }
}
