use crate::error::PipelineError;
use crate::query::TransactionQuery;
use analytics::{export, AnalyticsBundle, AnalyticsEngine, SummaryStats};
use cleaning::{clean_records, CleaningOutcome, CleaningReport};
use core_types::Transaction;
use loader::RawTable;
use std::fmt;
use std::path::PathBuf;

/// The stage a `Pipeline` has most recently completed.
///
/// Transitions only move forward: `Uninitialized → Loaded → Cleaned →
/// Analyzed`. Re-running a stage moves the phase back to that stage, since
/// everything downstream of it is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelinePhase {
    Uninitialized,
    Loaded,
    Cleaned,
    Analyzed,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelinePhase::Uninitialized => "uninitialized",
            PipelinePhase::Loaded => "loaded",
            PipelinePhase::Cleaned => "cleaned",
            PipelinePhase::Analyzed => "analyzed",
        };
        f.write_str(name)
    }
}

/// Where a pipeline reads its transactions from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionSource {
    File(PathBuf),
    /// CSV text already held in memory, e.g. an uploaded file.
    Text(String),
}

/// Owns one run of the transaction pipeline: the raw table, the cleaned
/// table, and the analytics bundle.
///
/// Stages take `&mut self` and queries take `&self`, so any number of readers
/// can query a cleaned pipeline at once while no stage is re-running. Each
/// instance is independent; there is no shared or global state.
#[derive(Debug)]
pub struct Pipeline {
    source: TransactionSource,
    phase: PipelinePhase,
    raw: Option<RawTable>,
    cleaned: Option<CleaningOutcome>,
    analytics: Option<AnalyticsBundle>,
    engine: AnalyticsEngine,
}

impl Pipeline {
    pub fn new(source: TransactionSource) -> Self {
        Self {
            source,
            phase: PipelinePhase::Uninitialized,
            raw: None,
            cleaned: None,
            analytics: None,
            engine: AnalyticsEngine::new(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(TransactionSource::File(path.into()))
    }

    pub fn from_csv_text(text: impl Into<String>) -> Self {
        Self::new(TransactionSource::Text(text.into()))
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    pub fn source(&self) -> &TransactionSource {
        &self.source
    }

    /// Reads the source and checks its schema.
    ///
    /// On failure nothing changes: a previously loaded table (and everything
    /// derived from it) stays in place. On success any cleaned table and
    /// analytics from an earlier load are discarded.
    pub fn load(&mut self) -> Result<&RawTable, PipelineError> {
        let table = match &self.source {
            TransactionSource::File(path) => loader::load_from_path(path),
            TransactionSource::Text(text) => loader::load_from_reader(text.as_bytes()),
        }
        .inspect_err(|e| tracing::error!("Error loading data: {}", e))?;
        tracing::debug!(columns = ?table.columns, rows = table.len(), "Source header accepted");

        self.cleaned = None;
        self.analytics = None;
        self.transition(PipelinePhase::Loaded);
        Ok(&*self.raw.insert(table))
    }

    /// Validates and normalizes the loaded table. Re-running it re-derives the
    /// cleaned table from the same raw table and drops any analytics.
    pub fn clean(&mut self) -> Result<&[Transaction], PipelineError> {
        let raw = self
            .raw
            .as_ref()
            .ok_or_else(|| PipelineError::InvalidState("data not loaded; load before clean".to_string()))?;

        let outcome = clean_records(&raw.records);

        self.analytics = None;
        self.transition(PipelinePhase::Cleaned);
        Ok(self.cleaned.insert(outcome).transactions.as_slice())
    }

    /// Computes the analytics bundle from the cleaned table. An empty cleaned
    /// table is valid and produces an empty bundle.
    pub fn aggregate(&mut self) -> Result<&AnalyticsBundle, PipelineError> {
        let cleaned = self
            .cleaned
            .as_ref()
            .ok_or_else(|| PipelineError::InvalidState("data not cleaned; clean before aggregate".to_string()))?;

        let bundle = self.engine.calculate(&cleaned.transactions);

        self.transition(PipelinePhase::Analyzed);
        Ok(&*self.analytics.insert(bundle))
    }

    /// Runs load, clean and aggregate in order.
    pub fn run(&mut self) -> Result<&AnalyticsBundle, PipelineError> {
        self.load()?;
        self.clean()?;
        self.aggregate()
    }

    pub fn raw_table(&self) -> Option<&RawTable> {
        self.raw.as_ref()
    }

    /// The cleaned table, sorted by timestamp.
    pub fn transactions(&self) -> Result<&[Transaction], PipelineError> {
        self.cleaned_outcome().map(|outcome| outcome.transactions.as_slice())
    }

    pub fn cleaning_report(&self) -> Result<&CleaningReport, PipelineError> {
        self.cleaned_outcome().map(|outcome| &outcome.report)
    }

    pub fn analytics(&self) -> Result<&AnalyticsBundle, PipelineError> {
        self.analytics.as_ref().ok_or_else(|| {
            PipelineError::InvalidState("analytics not calculated; aggregate first".to_string())
        })
    }

    pub fn summary(&self) -> Result<SummaryStats, PipelineError> {
        self.analytics().map(SummaryStats::from_bundle)
    }

    pub fn export_json(&self) -> Result<String, PipelineError> {
        Ok(export::to_json(self.analytics()?)?)
    }

    /// Read-only query facade over the cleaned table.
    pub fn query(&self) -> Result<TransactionQuery<'_>, PipelineError> {
        self.transactions().map(TransactionQuery::new)
    }

    pub fn by_ticker(&self, ticker: &str) -> Result<Vec<&Transaction>, PipelineError> {
        Ok(self.query()?.by_ticker(ticker))
    }

    pub fn by_trader(&self, trader_id: &str) -> Result<Vec<&Transaction>, PipelineError> {
        Ok(self.query()?.by_trader(trader_id))
    }

    pub fn by_time_range(&self, start: &str, end: &str) -> Result<Vec<&Transaction>, PipelineError> {
        self.query()?.by_time_range(start, end)
    }

    fn cleaned_outcome(&self) -> Result<&CleaningOutcome, PipelineError> {
        self.cleaned.as_ref().ok_or_else(|| {
            PipelineError::InvalidState("data not cleaned; clean before querying".to_string())
        })
    }

    fn transition(&mut self, next: PipelinePhase) {
        tracing::debug!(from = %self.phase, to = %next, "Pipeline phase transition");
        self.phase = next;
    }
}

/// Loads, cleans and analyzes a transaction file in one call, returning the
/// cleaned rows and the bundle.
pub fn process_transactions(
    path: impl Into<PathBuf>,
) -> Result<(Vec<Transaction>, AnalyticsBundle), PipelineError> {
    let mut pipeline = Pipeline::from_path(path);
    let bundle = pipeline.run()?.clone();
    let transactions = pipeline.transactions()?.to_vec();
    Ok((transactions, bundle))
}
