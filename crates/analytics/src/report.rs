use chrono::{NaiveDate, NaiveDateTime};
use core_types::Action;

/// Earliest and latest timestamp in a cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerVolume {
    pub ticker: String,
    pub volume: f64,
}

/// Share balance for one ticker: BUY quantity minus SELL quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct NetPosition {
    pub ticker: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraderActivity {
    pub trader_id: String,
    pub transaction_count: usize,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCount {
    pub action: Action,
    pub count: usize,
}

/// The fixed set of aggregates computed from one cleaned table.
///
/// Every series is ordered: `volume_by_ticker` and `net_position` descending by
/// value, `trader_activity` descending by transaction count, `action_counts`
/// descending by count, `daily_volume` ascending by date. Equal values keep the
/// order in which their key first appears in the cleaned table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsBundle {
    pub total_transactions: usize,
    pub total_volume: f64,
    pub unique_tickers: usize,
    pub unique_traders: usize,
    /// `None` when the cleaned table is empty.
    pub date_range: Option<DateRange>,
    pub volume_by_ticker: Vec<TickerVolume>,
    pub net_position: Vec<NetPosition>,
    pub trader_activity: Vec<TraderActivity>,
    pub daily_volume: Vec<DailyVolume>,
    pub action_counts: Vec<ActionCount>,
}

impl AnalyticsBundle {
    /// Creates an empty bundle, which is also the result for an empty table.
    pub fn new() -> Self {
        Self {
            total_transactions: 0,
            total_volume: 0.0,
            unique_tickers: 0,
            unique_traders: 0,
            date_range: None,
            volume_by_ticker: Vec::new(),
            net_position: Vec::new(),
            trader_activity: Vec::new(),
            daily_volume: Vec::new(),
            action_counts: Vec::new(),
        }
    }

    pub fn volume_for(&self, ticker: &str) -> Option<f64> {
        self.volume_by_ticker
            .iter()
            .find(|entry| entry.ticker == ticker)
            .map(|entry| entry.volume)
    }

    pub fn net_position_for(&self, ticker: &str) -> Option<f64> {
        self.net_position
            .iter()
            .find(|entry| entry.ticker == ticker)
            .map(|entry| entry.quantity)
    }

    pub fn count_for(&self, action: Action) -> usize {
        self.action_counts
            .iter()
            .find(|entry| entry.action == action)
            .map_or(0, |entry| entry.count)
    }
}

impl Default for AnalyticsBundle {
    fn default() -> Self {
        Self::new()
    }
}
