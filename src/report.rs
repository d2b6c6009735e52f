// 📋 Unpaired Reporter - what is left after matching
// Collects transactions without a counterpart, applies the cutoff, formats lines

use crate::transaction::{Source, Transaction};
use anyhow::Result;
use chrono::NaiveDate;
use std::io::Write;

/// Prefix that pushes bank lines into their own visual column
pub const BANK_INDENT: &str = "\t\t\t\t";

// ============================================================================
// CUTOFF
// ============================================================================

/// Report only transactions strictly after this date.
///
/// The later of the explicit start date and the earliest bank transaction:
/// nothing before the first bank record can be "missing from the bank".
/// With an empty bank ledger the start date stands alone; with neither,
/// there is no cutoff.
pub fn compute_cutoff(start_date: Option<NaiveDate>, bank: &[Transaction]) -> Option<NaiveDate> {
    let earliest_bank = bank.iter().map(|tx| tx.date).min();

    match (start_date, earliest_bank) {
        (Some(start), Some(earliest)) => Some(start.max(earliest)),
        (start, earliest) => start.or(earliest),
    }
}

// ============================================================================
// COLLECTION
// ============================================================================

/// Every unpaired transaction from both ledgers dated after `cutoff`,
/// sorted by date. Same-day ties keep budget entries ahead of bank entries,
/// and each ledger's own order.
pub fn collect_unpaired(
    budget: &[Transaction],
    bank: &[Transaction],
    cutoff: Option<NaiveDate>,
) -> Vec<Transaction> {
    let mut unpaired: Vec<Transaction> = budget
        .iter()
        .chain(bank.iter())
        .filter(|tx| !tx.is_paired())
        .filter(|tx| cutoff.map_or(true, |cutoff| tx.date > cutoff))
        .cloned()
        .collect();

    unpaired.sort_by_key(|tx| tx.date);
    unpaired
}

// ============================================================================
// FORMATTING
// ============================================================================

/// `[indent]<Mon D>: <amount>\t<payee>`
///
/// Amounts drop trailing fractional zeros, so -42.00 prints as -42.
pub fn format_line(tx: &Transaction) -> String {
    let indent = match tx.source {
        Source::Bank => BANK_INDENT,
        Source::Budget => "",
    };

    format!(
        "{}{}: {}\t{}",
        indent,
        tx.date.format("%b %-d"),
        tx.amount.normalize(),
        tx.payee
    )
}

/// Write one line per transaction
pub fn write_lines<W: Write>(writer: &mut W, transactions: &[Transaction]) -> Result<()> {
    for tx in transactions {
        writeln!(writer, "{}", format_line(tx))?;
    }
    writer.flush()?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
