use crate::report::AnalyticsBundle;
use core_types::Action;
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

/// High-level, display-ready figures derived from an analytics bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_transactions: usize,
    /// Total notional formatted as currency, e.g. `$1,440.00`.
    pub total_volume: String,
    pub unique_tickers: usize,
    pub unique_traders: usize,
    /// `"<start> to <end>"`, or `N/A` for an empty table.
    pub date_range: String,
    pub top_ticker_by_volume: String,
    pub most_active_trader: String,
}

impl SummaryStats {
    pub fn from_bundle(bundle: &AnalyticsBundle) -> Self {
        let date_range = bundle.date_range.map_or_else(
            || NOT_AVAILABLE.to_string(),
            |range| format!("{} to {}", range.start, range.end),
        );

        Self {
            total_transactions: bundle.total_transactions,
            total_volume: format_currency(bundle.total_volume, 2),
            unique_tickers: bundle.unique_tickers,
            unique_traders: bundle.unique_traders,
            date_range,
            top_ticker_by_volume: bundle
                .volume_by_ticker
                .first()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |e| e.ticker.clone()),
            most_active_trader: bundle
                .trader_activity
                .first()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |e| e.trader_id.clone()),
        }
    }
}

/// Builds a compact, multi-line description of the bundle for insight
/// generators. Only aggregates are included, never individual transactions.
pub fn prompt_summary(bundle: &AnalyticsBundle, top_n: usize) -> String {
    let mut lines = vec![
        format!(
            "- Total transactions: {}",
            group_thousands(&bundle.total_transactions.to_string())
        ),
        format!("- Total notional: {}", format_currency(bundle.total_volume, 2)),
        format!("- Unique tickers: {}", bundle.unique_tickers),
        format!("- Unique traders: {}", bundle.unique_traders),
    ];

    if let Some(range) = bundle.date_range {
        lines.push(format!("- Date range: {} to {}", range.start, range.end));
    }

    if !bundle.volume_by_ticker.is_empty() {
        let top: Vec<String> = bundle
            .volume_by_ticker
            .iter()
            .take(top_n)
            .map(|e| format!("{}={}", e.ticker, format_currency(e.volume, 0)))
            .collect();
        lines.push(format!("- Top tickers by volume: {}", top.join(", ")));
    }

    lines.push(format!(
        "- BUY/SELL counts: BUY={}, SELL={}",
        bundle.count_for(Action::Buy),
        bundle.count_for(Action::Sell)
    ));

    if let Some(trader) = bundle.trader_activity.first() {
        lines.push(format!(
            "- Most active trader: {} (tx={}, notional={})",
            trader.trader_id,
            group_thousands(&trader.transaction_count.to_string()),
            format_currency(trader.total_value, 0)
        ));
    }

    lines.join("\n")
}

/// Formats an amount as dollars with thousands separators.
pub fn format_currency(amount: f64, decimals: usize) -> String {
    if !amount.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let fixed = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}${}.{fraction}", group_thousands(whole)),
        None => format!("{sign}${}", group_thousands(whole)),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
