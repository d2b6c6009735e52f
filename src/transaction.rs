// 💳 Canonical Transaction - one shape for both ledgers
// Budget exports and bank exports both normalize into this model

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// SOURCE
// ============================================================================

/// Which ledger a transaction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Budget,
    Bank,
}

impl Source {
    /// Human-readable name for display and logs
    pub fn name(&self) -> &'static str {
        match self {
            Source::Budget => "budget",
            Source::Bank => "bank",
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// Transaction - canonical record produced by the normalizer
///
/// Everything except `pair` is fixed at creation. `pair` is the position of
/// the counterpart in the opposite ledger's sequence; it is written once by
/// the matching engine and never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub payee: String,
    pub amount: Decimal,
    pub account: String,
    pub source: Source,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pair: Option<usize>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        payee: String,
        amount: Decimal,
        account: String,
        source: Source,
    ) -> Self {
        Transaction {
            date,
            payee,
            amount,
            account,
            source,
            pair: None,
        }
    }

    /// Position of the counterpart in the other ledger, if matched
    pub fn pair(&self) -> Option<usize> {
        self.pair
    }

    pub fn is_paired(&self) -> bool {
        self.pair.is_some()
    }

    /// Record the counterpart. Only the matching engine calls this, and only
    /// on transactions that are still unpaired.
    pub(crate) fn set_pair(&mut self, counterpart: usize) {
        debug_assert!(self.pair.is_none(), "pair is written at most once");
        self.pair = Some(counterpart);
    }
}

// ============================================================================
// FIELD PARSING
// ============================================================================

/// Date formats seen in budget and bank exports
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a calendar date. Unlike a lenient parser this never yields a
/// sentinel value: anything unrecognized is an error.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| anyhow!("Unrecognized date: {:?}", raw))
}

/// Parse an exact decimal amount such as "-42.00" or "1234.5"
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed).with_context(|| format!("Unrecognized amount: {:?}", raw))
}

/// Parse an amount that may carry thousands separators ("1,234.56")
pub fn parse_grouped_amount(raw: &str) -> Result<Decimal> {
    parse_amount(&raw.replace(',', ""))
}

// ============================================================================
// TESTS
// ============================================================================
