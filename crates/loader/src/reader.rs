use crate::error::LoaderError;
use core_types::{RawRecord, REQUIRED_COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// The untyped contents of a transaction file: its header and one
/// `RawRecord` per data row, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Positions of the six required columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex([usize; 6]);

impl ColumnIndex {
    /// Resolves every required column by exact, case-sensitive name. Extra
    /// columns are ignored and order does not matter. The first occurrence wins
    /// if a name is repeated.
    fn resolve(headers: &StringRecord) -> Result<Self, LoaderError> {
        let mut positions = [0usize; 6];
        let mut missing = Vec::new();

        for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
            match headers.iter().position(|h| h == *name) {
                Some(pos) => positions[slot] = pos,
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns(missing));
        }
        Ok(Self(positions))
    }

    fn extract(&self, record: &StringRecord) -> RawRecord {
        let field = |slot: usize| record.get(self.0[slot]).unwrap_or("").to_string();
        RawRecord {
            timestamp: field(0),
            ticker: field(1),
            action: field(2),
            quantity: field(3),
            price: field(4),
            trader_id: field(5),
        }
    }
}

/// Loads a transaction file from disk.
pub fn load_from_path(path: &Path) -> Result<RawTable, LoaderError> {
    let file = File::open(path).map_err(|source| LoaderError::Open {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Reading transaction file");
    load_from_reader(file)
}

/// Loads transactions from any CSV source with a mandatory header row.
///
/// The schema check runs against the header alone, so a file missing a
/// required column is rejected before a single data row is read. Rows are kept
/// verbatim; short rows yield empty fields rather than an error.
pub fn load_from_reader<R: Read>(reader: R) -> Result<RawTable, LoaderError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        records.push(index.extract(&record));
    }

    tracing::info!("Loaded {} transactions", records.len());

    Ok(RawTable {
        columns: headers.iter().map(str::to_string).collect(),
        records,
    })
}
