//! JSON export of an `AnalyticsBundle` for reporting and insight-generation
//! consumers.
//!
//! The document is an object with exactly the bundle's keys. Series are
//! emitted as objects whose key order is the bundle order, timestamps and dates
//! as ISO-8601 text, and non-finite floats as `null`.

use crate::error::AnalyticsError;
use crate::report::AnalyticsBundle;
use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

const ISO_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

/// Serializes the bundle as pretty-printed JSON.
pub fn to_json(bundle: &AnalyticsBundle) -> Result<String, AnalyticsError> {
    Ok(serde_json::to_string_pretty(&BundleView(bundle))?)
}

/// Converts the bundle into a `serde_json::Value` for callers that embed it in
/// a larger document. Object keys keep the same order as `to_json`.
pub fn to_value(bundle: &AnalyticsBundle) -> Result<serde_json::Value, AnalyticsError> {
    Ok(serde_json::to_value(BundleView(bundle))?)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn iso_timestamp(ts: NaiveDateTime) -> String {
    ts.format(ISO_TIMESTAMP).to_string()
}

/// An ordered sequence of key/value pairs written as a JSON object.
struct Pairs<V>(Vec<(String, V)>);

impl<V: Serialize> Serialize for Pairs<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct TraderStats {
    transaction_count: usize,
    total_value: Option<f64>,
}

struct BundleView<'a>(&'a AnalyticsBundle);

impl Serialize for BundleView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bundle = self.0;
        let mut map = serializer.serialize_map(Some(10))?;

        map.serialize_entry("total_transactions", &bundle.total_transactions)?;
        map.serialize_entry("total_volume", &finite(bundle.total_volume))?;
        map.serialize_entry("unique_tickers", &bundle.unique_tickers)?;
        map.serialize_entry("unique_traders", &bundle.unique_traders)?;
        map.serialize_entry(
            "date_range",
            &bundle
                .date_range
                .map(|range| [iso_timestamp(range.start), iso_timestamp(range.end)]),
        )?;
        map.serialize_entry(
            "volume_by_ticker",
            &Pairs(
                bundle
                    .volume_by_ticker
                    .iter()
                    .map(|e| (e.ticker.clone(), finite(e.volume)))
                    .collect(),
            ),
        )?;
        map.serialize_entry(
            "net_position",
            &Pairs(
                bundle
                    .net_position
                    .iter()
                    .map(|e| (e.ticker.clone(), finite(e.quantity)))
                    .collect(),
            ),
        )?;
        map.serialize_entry(
            "trader_activity",
            &Pairs(
                bundle
                    .trader_activity
                    .iter()
                    .map(|e| {
                        (
                            e.trader_id.clone(),
                            TraderStats {
                                transaction_count: e.transaction_count,
                                total_value: finite(e.total_value),
                            },
                        )
                    })
                    .collect(),
            ),
        )?;
        map.serialize_entry(
            "daily_volume",
            &Pairs(
                bundle
                    .daily_volume
                    .iter()
                    .map(|e| (e.date.format("%Y-%m-%d").to_string(), finite(e.volume)))
                    .collect(),
            ),
        )?;
        map.serialize_entry(
            "action_counts",
            &Pairs(
                bundle
                    .action_counts
                    .iter()
                    .map(|e| (e.action.to_string(), e.count))
                    .collect(),
            ),
        )?;

        map.end()
    }
}
