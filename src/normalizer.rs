// 🧹 Transaction Normalizer - raw export rows → canonical transactions
// Applies each source's sign and filtering conventions, then sorts by date

use crate::parser::{BankRow, BudgetRow, ExportRow, RawExport};
use crate::transaction::{parse_amount, parse_date, parse_grouped_amount, Source, Transaction};
use anyhow::{Context, Result};
use tracing::debug;

/// Budget account value for unallocated placeholder rows
pub const UNASSIGNED_ACCOUNT: &str = "[none]";

/// Bank transaction type whose magnitude is money leaving the account.
/// Compared after trimming and ignoring ASCII case, so " Debit " also counts.
pub const DEBIT_TYPE: &str = "debit";

// ============================================================================
// PER-SOURCE CONVERSION
// ============================================================================

/// Normalize - convert one raw row into a canonical transaction
///
/// `Ok(None)` means the row is intentionally skipped. Any unparseable field
/// is an error; nothing is coerced.
pub trait Normalize: ExportRow {
    fn to_transaction(&self) -> Result<Option<Transaction>>;
}

impl Normalize for BudgetRow {
    fn to_transaction(&self) -> Result<Option<Transaction>> {
        if self.account == UNASSIGNED_ACCOUNT {
            return Ok(None);
        }

        let date = parse_date(&self.date).context("Invalid Date")?;
        let amount = parse_grouped_amount(&self.amount).context("Invalid Amount")?;

        Ok(Some(Transaction::new(
            date,
            self.name.clone(),
            amount,
            self.account.clone(),
            Source::Budget,
        )))
    }
}

impl Normalize for BankRow {
    fn to_transaction(&self) -> Result<Option<Transaction>> {
        let date = parse_date(&self.date).context("Invalid Date")?;
        let magnitude = parse_amount(&self.amount).context("Invalid Amount")?;

        let amount = if self.transaction_type.trim().eq_ignore_ascii_case(DEBIT_TYPE) {
            -magnitude
        } else {
            magnitude
        };

        Ok(Some(Transaction::new(
            date,
            self.description.clone(),
            amount,
            self.account_name.clone(),
            Source::Bank,
        )))
    }
}

// ============================================================================
// WHOLE-EXPORT NORMALIZATION
// ============================================================================

/// Normalize every row of an export into a chronologically sorted sequence.
///
/// Fails on the first malformed row, naming the file and line.
pub fn normalize<T: Normalize>(export: &RawExport<T>) -> Result<Vec<Transaction>> {
    let mut transactions = Vec::with_capacity(export.len());
    let mut skipped = 0usize;

    for row in &export.rows {
        let converted = row.fields.to_transaction().with_context(|| {
            format!(
                "Malformed {} row at line {} of {}",
                T::SOURCE.name(),
                row.line_number,
                export.source_file
            )
        })?;

        match converted {
            Some(tx) => transactions.push(tx),
            None => skipped += 1,
        }
    }

    sort_chronologically(&mut transactions);

    debug!(
        source = T::SOURCE.name(),
        file = %export.source_file,
        kept = transactions.len(),
        skipped,
        "normalized export"
    );

    Ok(transactions)
}

/// Ascending by date; rows on the same day keep their input order
pub fn sort_chronologically(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|tx| tx.date);
}

/// Keep only budget transactions recorded against `account`
pub fn retain_account(transactions: &mut Vec<Transaction>, account: &str) -> usize {
    let before = transactions.len();
    transactions.retain(|tx| tx.account == account);
    before - transactions.len()
}

// ============================================================================
// TESTS
// ============================================================================
