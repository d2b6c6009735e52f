// 🏗️ Export Readers - CSV → raw rows
// One row type per export schema; columns are matched by header name

use crate::transaction::Source;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// ============================================================================
// RAW ROW TYPES
// ============================================================================

/// BudgetRow - one line of the budgeting tool's transaction export
///
/// Columns: Date, Envelope, Account, Name, Notes, Amount, Status, Details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetRow {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Envelope", default)]
    pub envelope: String,

    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Notes", default)]
    pub notes: String,

    /// Decimal string, possibly with thousands separators ("-1,234.56")
    #[serde(rename = "Amount")]
    pub amount: String,

    #[serde(rename = "Status", default)]
    pub status: String,

    #[serde(rename = "Details", default)]
    pub details: String,
}

/// BankRow - one line of the bank's transaction export
///
/// Amounts are unsigned magnitudes; direction lives in `transaction_type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankRow {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Original Description", default)]
    pub original_description: String,

    #[serde(rename = "Amount")]
    pub amount: String,

    /// "debit" or "credit"
    #[serde(rename = "Transaction Type")]
    pub transaction_type: String,

    #[serde(rename = "Category", default)]
    pub category: String,

    #[serde(rename = "Account Name", default)]
    pub account_name: String,

    #[serde(rename = "Labels", default)]
    pub labels: String,

    #[serde(rename = "Notes", default)]
    pub notes: String,
}

/// ExportRow - ties a row schema to the ledger it describes
pub trait ExportRow: DeserializeOwned {
    const SOURCE: Source;
}

impl ExportRow for BudgetRow {
    const SOURCE: Source = Source::Budget;
}

impl ExportRow for BankRow {
    const SOURCE: Source = Source::Bank;
}

// ============================================================================
// RAW EXPORT
// ============================================================================

/// A row plus where it came from, so later errors can point at it
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow<T> {
    /// 1-based line in the file; the header is line 1
    pub line_number: usize,
    pub fields: T,
}

/// All rows of one export file, in file order
#[derive(Debug, Clone, PartialEq)]
pub struct RawExport<T> {
    pub source_file: String,
    pub rows: Vec<RawRow<T>>,
}

impl<T> RawExport<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// READERS
// ============================================================================

/// Read an export file from disk
pub fn load_export<T: ExportRow>(file_path: &Path) -> Result<RawExport<T>> {
    let file = File::open(file_path).with_context(|| {
        format!(
            "Failed to open {} export: {}",
            T::SOURCE.name(),
            file_path.display()
        )
    })?;

    read_export(file, &file_path.display().to_string())
}

/// Read an export from any reader. `source_file` is only used in messages.
pub fn read_export<T: ExportRow, R: Read>(reader: R, source_file: &str) -> Result<RawExport<T>> {
    use csv::ReaderBuilder;

    // Exports escape embedded quotes with a backslash
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .double_quote(false)
        .escape(Some(b'\\'))
        .from_reader(reader);

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header in {}", source_file))?
        .clone();

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.with_context(|| {
            format!("Failed to parse CSV after line {} in {}", rows.len() + 1, source_file)
        })?;

        let line_number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);

        let fields: T = record.deserialize(Some(&headers)).with_context(|| {
            format!(
                "Line {} in {} does not match the {} export columns",
                line_number,
                source_file,
                T::SOURCE.name()
            )
        })?;

        rows.push(RawRow { line_number, fields });
    }

    Ok(RawExport {
        source_file: source_file.to_string(),
        rows,
    })
}

// ============================================================================
// TESTS
// ============================================================================
