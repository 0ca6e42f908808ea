use crate::error::PipelineError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core_types::Transaction;

/// Layouts tried, in order, for a time-range bound that carries a time of day.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; they resolve to midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parses a query bound leniently: a range of common date-time layouts, or a
/// bare date meaning midnight of that day.
///
/// Transaction timestamps carry no zone, so a bound with a UTC offset (RFC 3339
/// `Z` or `+hh:mm`) cannot be compared with them and is rejected.
pub fn parse_time_bound(raw: &str) -> Result<NaiveDateTime, PipelineError> {
    let input = raw.trim();

    if DateTime::parse_from_rfc3339(input).is_ok() {
        return Err(PipelineError::Parse(raw.to_string()));
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Ok(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| PipelineError::Parse(raw.to_string()))
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Read-only lookups over a cleaned, timestamp-sorted table. Every result
/// preserves the table's timestamp order.
#[derive(Debug, Clone, Copy)]
pub struct TransactionQuery<'a> {
    transactions: &'a [Transaction],
}

impl<'a> TransactionQuery<'a> {
    /// `transactions` must be sorted by timestamp; only a cleaned table is.
    pub(crate) fn new(transactions: &'a [Transaction]) -> Self {
        debug_assert!(
            transactions.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            "query table must be sorted by timestamp"
        );
        Self { transactions }
    }

    /// Case-insensitive exact match on the ticker.
    pub fn by_ticker(&self, ticker: &str) -> Vec<&'a Transaction> {
        let wanted = normalize_key(ticker);
        self.transactions
            .iter()
            .filter(|tx| tx.ticker == wanted)
            .collect()
    }

    /// Case-insensitive exact match on the trader id.
    pub fn by_trader(&self, trader_id: &str) -> Vec<&'a Transaction> {
        let wanted = normalize_key(trader_id);
        self.transactions
            .iter()
            .filter(|tx| tx.trader_id == wanted)
            .collect()
    }

    /// Transactions with `start <= timestamp <= end`. A bound that cannot be
    /// parsed is an error, never an empty result.
    pub fn by_time_range(&self, start: &str, end: &str) -> Result<Vec<&'a Transaction>, PipelineError> {
        let start = parse_time_bound(start)?;
        let end = parse_time_bound(end)?;
        if start > end {
            return Ok(Vec::new());
        }

        let lower = self.transactions.partition_point(|tx| tx.timestamp < start);
        let upper = self.transactions.partition_point(|tx| tx.timestamp <= end);
        Ok(self.transactions[lower..upper].iter().collect())
    }
}
