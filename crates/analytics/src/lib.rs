//! # Tradelens Analytics Engine
//!
//! This crate turns a cleaned transaction table into the fixed analytics
//! bundle consumed by reporting and insight-generation tools.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** depends only on `core-types`; it never reads files and
//!   never mutates its input.
//! - **Stateless calculation:** `AnalyticsEngine` recomputes the whole bundle
//!   on every call. There is no incremental update.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the calculator.
//! - `AnalyticsBundle` and its entry records: the ordered aggregates.
//! - `SummaryStats` / `prompt_summary`: display and prompt views.
//! - `export`: the JSON export contract.

pub mod engine;
pub mod error;
pub mod export;
pub mod report;
pub mod summary;

pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{
    ActionCount, AnalyticsBundle, DailyVolume, DateRange, NetPosition, TickerVolume,
    TraderActivity,
};
pub use summary::{prompt_summary, SummaryStats};
