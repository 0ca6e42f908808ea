use crate::report::{
    ActionCount, AnalyticsBundle, DailyVolume, DateRange, NetPosition, TickerVolume,
    TraderActivity,
};
use chrono::NaiveDate;
use core_types::{Action, Transaction};
use std::collections::HashMap;
use std::hash::Hash;

/// Accumulates one value per key while remembering the order in which keys
/// were first seen. That order is the tie-break for every sorted series.
struct FirstSeen<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Hash + Eq + Clone, V: Default> FirstSeen<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &K) -> &mut V {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.entries.push((key.clone(), V::default()));
                self.index.insert(key.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[slot].1
    }

    fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

#[derive(Default)]
struct TraderTotals {
    count: usize,
    value: f64,
}

#[derive(Default)]
struct SideTotals {
    bought: f64,
    sold: f64,
}

/// A stateless calculator for deriving the analytics bundle from a cleaned
/// transaction table.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the bundle.
    ///
    /// The input is expected to be a cleaned table (sorted by timestamp); the
    /// first-seen tie-break follows whatever order it is given in. An empty
    /// table yields `AnalyticsBundle::new()`.
    pub fn calculate(&self, transactions: &[Transaction]) -> AnalyticsBundle {
        let mut report = AnalyticsBundle::new();

        if transactions.is_empty() {
            return report;
        }

        self.calculate_totals(transactions, &mut report);
        self.calculate_ticker_metrics(transactions, &mut report);
        self.calculate_trader_activity(transactions, &mut report);
        self.calculate_daily_volume(transactions, &mut report);
        self.calculate_action_counts(transactions, &mut report);

        tracing::info!(
            transactions = report.total_transactions,
            tickers = report.unique_tickers,
            traders = report.unique_traders,
            "Analytics calculated successfully"
        );
        report
    }

    fn calculate_totals(&self, transactions: &[Transaction], report: &mut AnalyticsBundle) {
        report.total_transactions = transactions.len();
        report.total_volume = transactions.iter().map(|tx| tx.total_value).sum();

        let start = transactions.iter().map(|tx| tx.timestamp).min();
        let end = transactions.iter().map(|tx| tx.timestamp).max();
        report.date_range = start.zip(end).map(|(start, end)| DateRange { start, end });
    }

    /// Volume and net position per ticker. A ticker seen on one side only
    /// counts zero for the other.
    fn calculate_ticker_metrics(&self, transactions: &[Transaction], report: &mut AnalyticsBundle) {
        let mut volumes: FirstSeen<String, f64> = FirstSeen::new();
        let mut sides: FirstSeen<String, SideTotals> = FirstSeen::new();

        for tx in transactions {
            *volumes.entry(&tx.ticker) += tx.total_value;
            let side = sides.entry(&tx.ticker);
            match tx.action {
                Action::Buy => side.bought += tx.quantity,
                Action::Sell => side.sold += tx.quantity,
            }
        }

        let mut volume_by_ticker: Vec<TickerVolume> = volumes
            .into_entries()
            .into_iter()
            .map(|(ticker, volume)| TickerVolume { ticker, volume })
            .collect();
        volume_by_ticker.sort_by(|a, b| b.volume.total_cmp(&a.volume));

        let mut net_position: Vec<NetPosition> = sides
            .into_entries()
            .into_iter()
            .map(|(ticker, side)| NetPosition {
                ticker,
                quantity: side.bought - side.sold,
            })
            .collect();
        net_position.sort_by(|a, b| b.quantity.total_cmp(&a.quantity));

        report.unique_tickers = volume_by_ticker.len();
        report.volume_by_ticker = volume_by_ticker;
        report.net_position = net_position;
    }

    fn calculate_trader_activity(&self, transactions: &[Transaction], report: &mut AnalyticsBundle) {
        let mut traders: FirstSeen<String, TraderTotals> = FirstSeen::new();
        for tx in transactions {
            let totals = traders.entry(&tx.trader_id);
            totals.count += 1;
            totals.value += tx.total_value;
        }

        let mut trader_activity: Vec<TraderActivity> = traders
            .into_entries()
            .into_iter()
            .map(|(trader_id, totals)| TraderActivity {
                trader_id,
                transaction_count: totals.count,
                total_value: totals.value,
            })
            .collect();
        trader_activity.sort_by(|a, b| b.transaction_count.cmp(&a.transaction_count));

        report.unique_traders = trader_activity.len();
        report.trader_activity = trader_activity;
    }

    fn calculate_daily_volume(&self, transactions: &[Transaction], report: &mut AnalyticsBundle) {
        let mut days: FirstSeen<NaiveDate, f64> = FirstSeen::new();
        for tx in transactions {
            *days.entry(&tx.date) += tx.total_value;
        }

        let mut daily_volume: Vec<DailyVolume> = days
            .into_entries()
            .into_iter()
            .map(|(date, volume)| DailyVolume { date, volume })
            .collect();
        daily_volume.sort_by_key(|entry| entry.date);

        report.daily_volume = daily_volume;
    }

    /// Only actions that occur are listed.
    fn calculate_action_counts(&self, transactions: &[Transaction], report: &mut AnalyticsBundle) {
        let mut actions: FirstSeen<Action, usize> = FirstSeen::new();
        for tx in transactions {
            *actions.entry(&tx.action) += 1;
        }

        let mut action_counts: Vec<ActionCount> = actions
            .into_entries()
            .into_iter()
            .map(|(action, count)| ActionCount { action, count })
            .collect();
        action_counts.sort_by(|a, b| b.count.cmp(&a.count));

        report.action_counts = action_counts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    const EPSILON: f64 = 1e-9;

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn tx(at: &str, ticker: &str, action: Action, qty: f64, price: f64, trader: &str) -> Transaction {
        Transaction::new(ts(at), ticker.into(), action, qty, price, trader.into())
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("2024-01-01 09:00:00", "MSFT", Action::Buy, 5.0, 200.0, "T2"),
            tx("2024-01-01 10:00:00", "AAPL", Action::Buy, 10.0, 100.0, "T1"),
            tx("2024-01-01 11:00:00", "AAPL", Action::Sell, 4.0, 110.0, "T1"),
            tx("2024-01-02 09:30:00", "TSLA", Action::Sell, 3.0, 250.0, "T3"),
            tx("2024-01-03 15:00:00", "MSFT", Action::Buy, 1.0, 210.0, "T1"),
        ]
    }

    #[test]
    fn two_row_scenario() {
        let rows = vec![
            tx("2024-01-01 10:00:00", "AAPL", Action::Buy, 10.0, 100.0, "T1"),
            tx("2024-01-01 11:00:00", "AAPL", Action::Sell, 4.0, 110.0, "T1"),
        ];
        let report = AnalyticsEngine::new().calculate(&rows);

        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.volume_for("AAPL"), Some(1440.0));
        assert_eq!(report.net_position_for("AAPL"), Some(6.0));
        assert_eq!(report.unique_tickers, 1);
        assert_eq!(report.unique_traders, 1);
        assert_eq!(
            report.date_range,
            Some(DateRange {
                start: ts("2024-01-01 10:00:00"),
                end: ts("2024-01-01 11:00:00"),
            })
        );
    }

    #[test]
    fn ticker_volumes_sum_to_total_volume() {
        let report = AnalyticsEngine::new().calculate(&sample());
        let summed: f64 = report.volume_by_ticker.iter().map(|e| e.volume).sum();

        assert!((summed - report.total_volume).abs() < EPSILON);
        assert!((report.total_volume - 3400.0).abs() < EPSILON);
    }

    #[test]
    fn net_position_zero_fills_one_sided_tickers() {
        let report = AnalyticsEngine::new().calculate(&sample());

        assert_eq!(report.net_position_for("MSFT"), Some(6.0));
        assert_eq!(report.net_position_for("AAPL"), Some(6.0));
        assert_eq!(report.net_position_for("TSLA"), Some(-3.0));

        let order: Vec<&str> = report.net_position.iter().map(|e| e.ticker.as_str()).collect();
        // MSFT and AAPL tie at 6; MSFT appears first in the table.
        assert_eq!(order, vec!["MSFT", "AAPL", "TSLA"]);
    }

    #[test]
    fn volume_by_ticker_is_descending() {
        let report = AnalyticsEngine::new().calculate(&sample());
        let order: Vec<&str> = report.volume_by_ticker.iter().map(|e| e.ticker.as_str()).collect();

        // MSFT 1210, AAPL 1440, TSLA 750
        assert_eq!(order, vec!["AAPL", "MSFT", "TSLA"]);
    }

    #[test]
    fn trader_activity_counts_and_sums() {
        let report = AnalyticsEngine::new().calculate(&sample());
        let first = &report.trader_activity[0];

        assert_eq!(first.trader_id, "T1");
        assert_eq!(first.transaction_count, 3);
        assert!((first.total_value - 1650.0).abs() < EPSILON);

        let rest: Vec<&str> = report.trader_activity[1..]
            .iter()
            .map(|e| e.trader_id.as_str())
            .collect();
        assert_eq!(rest, vec!["T2", "T3"]);
    }

    #[test]
    fn daily_volume_is_ascending_by_date() {
        let report = AnalyticsEngine::new().calculate(&sample());
        let days: Vec<(String, f64)> = report
            .daily_volume
            .iter()
            .map(|e| (e.date.to_string(), e.volume))
            .collect();

        assert_eq!(
            days,
            vec![
                ("2024-01-01".to_string(), 2440.0),
                ("2024-01-02".to_string(), 750.0),
                ("2024-01-03".to_string(), 210.0),
            ]
        );
    }

    #[test]
    fn action_counts_sum_to_total() {
        let report = AnalyticsEngine::new().calculate(&sample());
        let total: usize = report.action_counts.iter().map(|e| e.count).sum();

        assert_eq!(total, report.total_transactions);
        assert_eq!(report.action_counts[0].action, Action::Buy);
        assert_eq!(report.count_for(Action::Buy), 3);
        assert_eq!(report.count_for(Action::Sell), 2);
    }

    #[test]
    fn only_present_actions_are_listed() {
        let rows = vec![tx("2024-01-01 10:00:00", "AAPL", Action::Sell, 1.0, 1.0, "T1")];
        let report = AnalyticsEngine::new().calculate(&rows);

        assert_eq!(report.action_counts.len(), 1);
        assert_eq!(report.count_for(Action::Buy), 0);
        assert_eq!(report.net_position_for("AAPL"), Some(-1.0));
    }

    #[test]
    fn empty_table_has_no_date_range() {
        let report = AnalyticsEngine::new().calculate(&[]);

        assert_eq!(report, AnalyticsBundle::new());
        assert!(report.date_range.is_none());
    }

    #[test]
    fn calculation_is_repeatable() {
        let rows = sample();
        let engine = AnalyticsEngine::new();
        assert_eq!(engine.calculate(&rows), engine.calculate(&rows));
    }
}
