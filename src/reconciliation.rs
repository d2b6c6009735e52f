// ⚖️ Reconciliation Engine - budget ledger vs bank ledger
// Load both exports → normalize → pair within a date window → report leftovers
//
// Budget transactions drive the search; bank transactions are the candidates.
// Anything left without a counterpart after the cutoff is what needs a look.

use crate::config::Config;
use crate::matching::{MatchSummary, MatchingEngine};
use crate::normalizer::{normalize, retain_account};
use crate::parser::{load_export, BankRow, BudgetRow, RawExport};
use crate::report::{collect_unpaired, compute_cutoff, write_lines};
use crate::transaction::Transaction;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, info};

// ============================================================================
// RECONCILIATION REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub budget_account: String,

    /// Budget transactions after the sentinel and account filters
    pub budget_count: usize,
    pub bank_count: usize,

    pub window_days: u32,
    pub matching: MatchSummary,

    /// Only transactions strictly after this date are reported
    pub cutoff: Option<NaiveDate>,

    /// Unpaired transactions from both ledgers, oldest first
    pub unpaired: Vec<Transaction>,
}

impl ReconciliationReport {
    pub fn summary(&self) -> String {
        format!(
            "Reconciliation for {}: {} budget / {} bank transactions, {} paired, {} unpaired after {}",
            self.budget_account,
            self.budget_count,
            self.bank_count,
            self.matching.paired,
            self.unpaired.len(),
            self.cutoff
                .map(|d| d.to_string())
                .unwrap_or_else(|| "the beginning".to_string())
        )
    }

    /// Line-oriented report, one unpaired transaction per line
    pub fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_lines(writer, &self.unpaired)
    }

    pub fn write_json<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self).context("Failed to serialize report")?;
        writeln!(writer)?;
        Ok(())
    }
}

// ============================================================================
// RECONCILIATION ENGINE
// ============================================================================

pub struct ReconciliationEngine {
    /// Budget transactions outside this account are ignored
    pub budget_account: String,

    /// Explicit lower bound for the report (optional)
    pub start_date: Option<NaiveDate>,

    pub matcher: MatchingEngine,
}

impl ReconciliationEngine {
    pub fn new(budget_account: impl Into<String>) -> Self {
        ReconciliationEngine {
            budget_account: budget_account.into(),
            start_date: None,
            matcher: MatchingEngine::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let engine = Self::new(config.budget_account.clone()).with_window_days(config.window_days);

        match config.start_date {
            Some(start_date) => engine.with_start_date(start_date),
            None => engine,
        }
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.matcher = MatchingEngine::with_window(window_days);
        self
    }

    /// Reconcile two already-loaded exports.
    ///
    /// Fails if any row has an unparseable date or amount; no partial report
    /// is produced in that case.
    pub fn reconcile(
        &self,
        budget_export: &RawExport<BudgetRow>,
        bank_export: &RawExport<BankRow>,
    ) -> Result<ReconciliationReport> {
        let mut budget = normalize(budget_export)?;
        let dropped = retain_account(&mut budget, &self.budget_account);
        debug!(
            account = %self.budget_account,
            dropped,
            "filtered budget transactions to account"
        );

        let mut bank = normalize(bank_export)?;

        Ok(self.reconcile_transactions(budget, bank.as_mut_slice()))
    }

    /// Pair and report over normalized, date-sorted sequences
    fn reconcile_transactions(
        &self,
        mut budget: Vec<Transaction>,
        bank: &mut [Transaction],
    ) -> ReconciliationReport {
        let matching = self.matcher.pair_transactions(&mut budget, bank);
        info!(
            budget = budget.len(),
            bank = bank.len(),
            paired = matching.paired,
            unmatched = matching.unmatched(),
            window_days = self.matcher.window_days,
            "matching complete"
        );

        let cutoff = compute_cutoff(self.start_date, bank);
        let unpaired = collect_unpaired(&budget, bank, cutoff);
        info!(cutoff = ?cutoff, unpaired = unpaired.len(), "collected unpaired transactions");

        ReconciliationReport {
            budget_account: self.budget_account.clone(),
            budget_count: budget.len(),
            bank_count: bank.len(),
            window_days: self.matcher.window_days,
            matching,
            cutoff,
            unpaired,
        }
    }
}

// ============================================================================
// PIPELINE ENTRY POINT
// ============================================================================

/// Load both exports concurrently. Both must finish before anything else runs.
pub async fn load_exports(config: &Config) -> Result<(RawExport<BudgetRow>, RawExport<BankRow>)> {
    let budget_path = config.budget_file.clone();
    let bank_path = config.bank_file.clone();

    let budget_task = tokio::task::spawn_blocking(move || load_export::<BudgetRow>(&budget_path));
    let bank_task = tokio::task::spawn_blocking(move || load_export::<BankRow>(&bank_path));

    let (budget, bank) = tokio::try_join!(budget_task, bank_task)
        .context("Export loading task failed")?;
    let (budget, bank) = (budget?, bank?);

    info!(
        budget_file = %budget.source_file,
        budget_rows = budget.len(),
        bank_file = %bank.source_file,
        bank_rows = bank.len(),
        "loaded exports"
    );

    Ok((budget, bank))
}

/// Run a full reconciliation for `config`
pub async fn run(config: &Config) -> Result<ReconciliationReport> {
    let (budget, bank) = load_exports(config).await?;
    ReconciliationEngine::from_config(config).reconcile(&budget, &bank)
}

// ============================================================================
// TESTS
// ============================================================================
