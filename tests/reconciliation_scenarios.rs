// End-to-end reconciliation scenarios over in-memory exports

use chrono::NaiveDate;
use ledger_reconcile::{
    normalize, read_export, BankRow, BudgetRow, MatchingEngine, RawExport, ReconciliationEngine,
    Source, Transaction,
};
use rust_decimal::Decimal;
use std::collections::HashSet;

const BUDGET_HEADER: &str = "Date,Envelope,Account,Name,Notes,Amount,Status,Details\n";
const BANK_HEADER: &str =
    "Date,Description,Original Description,Amount,Transaction Type,Category,Account Name,Labels,Notes\n";

fn budget_export(lines: &[&str]) -> RawExport<BudgetRow> {
    let csv = format!("{}{}", BUDGET_HEADER, lines.join("\n"));
    read_export(csv.as_bytes(), "budget.csv").unwrap()
}

fn bank_export(lines: &[&str]) -> RawExport<BankRow> {
    let csv = format!("{}{}", BANK_HEADER, lines.join("\n"));
    read_export(csv.as_bytes(), "bank.csv").unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn early_start() -> NaiveDate {
    ymd(2019, 12, 1)
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_scenario_match_within_window() {
    let engine = ReconciliationEngine::new("Checking").with_start_date(early_start());
    let budget = budget_export(&["2020-01-05,Food,Checking,Coffee Shop,,-42.00,,"]);
    let bank = bank_export(&["2020-01-06,COFFEE SHOP,,42.00,debit,,Checking,,"]);

    let report = engine.reconcile(&budget, &bank).unwrap();

    assert_eq!(report.matching.paired, 1);
    assert!(report.unpaired.is_empty());
}

#[test]
fn test_scenario_outside_window() {
    let engine = ReconciliationEngine::new("Checking").with_start_date(early_start());
    let budget = budget_export(&["2020-01-05,Food,Checking,Coffee Shop,,-42.00,,"]);
    let bank = bank_export(&[
        "2019-12-31,OPENING,,0.01,credit,,Checking,,",
        "2020-01-12,COFFEE SHOP,,42.00,debit,,Checking,,",
    ]);

    let report = engine.reconcile(&budget, &bank).unwrap();
    let mut out = Vec::new();
    report.write_text(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(report.matching.paired, 0);
    assert_eq!(lines, vec!["Jan 5: -42\tCoffee Shop", "\t\t\t\tJan 12: -42\tCOFFEE SHOP"]);
}

#[test]
fn test_scenario_unassigned_budget_row_excluded() {
    let engine = ReconciliationEngine::new("[none]").with_start_date(early_start());
    let budget = budget_export(&["2020-01-05,,[none],Envelope fill,,-42.00,,"]);
    let bank = bank_export(&[
        "2020-01-01,OPENING,,0.01,credit,,Checking,,",
        "2020-01-06,COFFEE SHOP,,42.00,debit,,Checking,,",
    ]);

    // Even an account filter naming the sentinel cannot bring it back
    let report = engine.reconcile(&budget, &bank).unwrap();

    assert_eq!(report.budget_count, 0);
    assert!(report.unpaired.iter().all(|tx| tx.source == Source::Bank));
    assert_eq!(report.unpaired.len(), 1);
}

#[test]
fn test_scenario_first_come_priority() {
    let engine = ReconciliationEngine::new("Checking").with_start_date(early_start());
    let budget = budget_export(&[
        "2020-01-05,Food,Checking,First,,-10.00,,",
        "2020-01-05,Food,Checking,Second,,-10.00,,",
    ]);
    let bank = bank_export(&[
        "2020-01-01,OPENING,,0.01,credit,,Checking,,",
        "2020-01-06,MERCHANT,,10.00,debit,,Checking,,",
    ]);

    let report = engine.reconcile(&budget, &bank).unwrap();

    assert_eq!(report.matching.paired, 1);
    assert_eq!(report.unpaired.len(), 1);
    assert_eq!(report.unpaired[0].payee, "Second");
}

#[test]
fn test_scenario_empty_bank() {
    let engine = ReconciliationEngine::new("Checking").with_start_date(ymd(2020, 1, 1));
    let budget = budget_export(&["2020-02-01,Food,Checking,Groceries,,-20.00,,"]);
    let bank = bank_export(&[]);

    let report = engine.reconcile(&budget, &bank).unwrap();

    assert_eq!(report.matching.paired, 0);
    assert_eq!(report.unpaired.len(), 1);
    assert_eq!(report.unpaired[0].date, ymd(2020, 2, 1));
}

#[test]
fn test_scenario_amount_mismatch() {
    let engine = ReconciliationEngine::new("Checking").with_start_date(early_start());
    let budget = budget_export(&["2020-01-05,Fun,Checking,Streaming,,-9.99,,"]);
    let bank = bank_export(&[
        "2020-01-01,OPENING,,0.01,credit,,Checking,,",
        "2020-01-05,STREAMING,,10.00,debit,,Checking,,",
    ]);

    let report = engine.reconcile(&budget, &bank).unwrap();

    assert_eq!(report.matching.paired, 0);
    let sources: Vec<Source> = report.unpaired.iter().map(|tx| tx.source).collect();
    assert_eq!(sources, vec![Source::Budget, Source::Bank]);
}

#[test]
fn test_cutoff_hides_entries_before_first_bank_day() {
    let engine = ReconciliationEngine::new("Checking").with_start_date(ymd(2020, 1, 1));
    let budget = budget_export(&[
        "2020-01-03,Food,Checking,Too early,,-1.00,,",
        "2020-01-10,Food,Checking,Reported,,-2.00,,",
    ]);
    let bank = bank_export(&["2020-01-05,FIRST BANK DAY,,3.00,credit,,Checking,,"]);

    let report = engine.reconcile(&budget, &bank).unwrap();

    assert_eq!(report.cutoff, Some(ymd(2020, 1, 5)));
    let payees: Vec<&str> = report.unpaired.iter().map(|tx| tx.payee.as_str()).collect();
    // The first bank day itself is not strictly after the cutoff
    assert_eq!(payees, vec!["Reported"]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

/// A deterministic but messy pair of ledgers: repeated amounts, same-day
/// clusters, gaps wider than the window
fn messy_ledgers() -> (Vec<Transaction>, Vec<Transaction>) {
    let mut budget_lines = Vec::new();
    let mut bank_lines = Vec::new();

    for i in 0..60u32 {
        let day = 1 + (i * 7) % 28;
        let cents = 100 + (i % 5) * 250;
        budget_lines.push(format!(
            "2020-03-{:02},Misc,Checking,Budget {},,-{}.{:02},,",
            day,
            i,
            cents / 100,
            cents % 100
        ));

        let bank_day = 1 + (i * 11 + 3) % 28;
        let bank_cents = 100 + (i % 4) * 250;
        bank_lines.push(format!(
            "2020-03-{:02},BANK {},,{}.{:02},debit,,Checking,,",
            bank_day,
            i,
            bank_cents / 100,
            bank_cents % 100
        ));
    }

    let budget_refs: Vec<&str> = budget_lines.iter().map(String::as_str).collect();
    let bank_refs: Vec<&str> = bank_lines.iter().map(String::as_str).collect();

    let budget = normalize(&budget_export(&budget_refs)).unwrap();
    let bank = normalize(&bank_export(&bank_refs)).unwrap();
    (budget, bank)
}

#[test]
fn test_pairing_invariants() {
    let (mut budget, mut bank) = messy_ledgers();
    let engine = MatchingEngine::new();

    let summary = engine.pair_transactions(&mut budget, &mut bank);
    assert!(summary.paired > 0, "fixture should produce some pairings");

    let mut claimed = HashSet::new();
    for (i, b) in budget.iter().enumerate() {
        let Some(j) = b.pair() else { continue };
        let k = &bank[j];

        // Symmetry
        assert_eq!(k.pair(), Some(i));
        // Amount exactness
        assert_eq!(k.amount, b.amount);
        // Window containment: [date, date + 4 days)
        assert!(k.date >= b.date);
        assert!((k.date - b.date).num_days() < 4);
        // At most one pairing per bank transaction
        assert!(claimed.insert(j));
    }

    let paired_bank = bank.iter().filter(|tx| tx.is_paired()).count();
    assert_eq!(paired_bank, summary.paired);
    assert_eq!(claimed.len(), summary.paired);
}

#[test]
fn test_matching_is_idempotent() {
    let (mut budget, mut bank) = messy_ledgers();
    let engine = MatchingEngine::new();

    engine.pair_transactions(&mut budget, &mut bank);
    let snapshot = (budget.clone(), bank.clone());
    let second = engine.pair_transactions(&mut budget, &mut bank);

    assert_eq!(second.paired, 0);
    assert_eq!((budget, bank), snapshot);
}

#[test]
fn test_report_completeness() {
    let engine = ReconciliationEngine::new("Checking").with_start_date(ymd(2020, 3, 4));
    let budget = budget_export(&[
        "2020-03-02,Food,Checking,Before,,-5.00,,",
        "2020-03-05,Food,Checking,Matched,,-7.50,,",
        "2020-03-06,Food,Checking,Orphan,,\"-1,234.00\",,",
    ]);
    let bank = bank_export(&[
        "2020-03-01,OPENING,,1.00,credit,,Checking,,",
        "2020-03-06,MATCHED,,7.50,debit,,Checking,,",
        "2020-03-09,FEE,,3.00,debit,,Checking,,",
    ]);

    let report = engine.reconcile(&budget, &bank).unwrap();
    let cutoff = report.cutoff.unwrap();

    assert_eq!(cutoff, ymd(2020, 3, 4));
    assert!(report.unpaired.iter().all(|tx| !tx.is_paired() && tx.date > cutoff));
    assert!(report.unpaired.windows(2).all(|w| w[0].date <= w[1].date));

    let payees: Vec<&str> = report.unpaired.iter().map(|tx| tx.payee.as_str()).collect();
    assert_eq!(payees, vec!["Orphan", "FEE"]);
    assert_eq!(report.unpaired[0].amount, Decimal::new(-123400, 2));
}
