// Ledger Reconcile - Core Library
// Pairs budget-tool transactions with bank transactions and reports the leftovers

pub mod config;
pub mod date_index;
pub mod matching;
pub mod normalizer;
pub mod parser;
pub mod reconciliation;
pub mod report;
pub mod transaction;

// Re-export commonly used types
pub use config::{Cli, Config, OutputFormat};
pub use date_index::DateWindowIndex;
pub use matching::{MatchSummary, MatchingEngine, DEFAULT_WINDOW_DAYS};
pub use normalizer::{normalize, retain_account, Normalize, UNASSIGNED_ACCOUNT};
pub use parser::{load_export, read_export, BankRow, BudgetRow, ExportRow, RawExport, RawRow};
pub use reconciliation::{load_exports, run, ReconciliationEngine, ReconciliationReport};
pub use report::{collect_unpaired, compute_cutoff, format_line};
pub use transaction::{parse_amount, parse_date, Source, Transaction};
