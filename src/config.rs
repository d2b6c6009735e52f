// ⚙️ Configuration - command line and environment
// Parsed once in main, then handed to the pipeline as a plain value

use crate::matching::DEFAULT_WINDOW_DAYS;
use crate::transaction::parse_date;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per unpaired transaction
    #[default]
    Text,
    /// Full reconciliation report as JSON
    Json,
}

/// Reconcile a budget export against a bank export and list what doesn't match
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Budget tool export (CSV)
    #[arg(long, env = "BUDGET_FILE")]
    pub budget_file: PathBuf,

    /// Bank export (CSV)
    #[arg(long, env = "BANK_FILE")]
    pub bank_file: PathBuf,

    /// Budget account to reconcile against the bank
    #[arg(long, env = "BUDGET_ACCOUNT")]
    pub budget_account: String,

    /// Ignore transactions on or before this date (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long, env = "START_DATE", value_parser = parse_start_date)]
    pub start_date: Option<NaiveDate>,

    /// Days after a budget transaction to look for its bank counterpart
    #[arg(
        long,
        env = "WINDOW_DAYS",
        default_value_t = DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub window_days: u32,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

fn parse_start_date(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).map_err(|e| e.to_string())
}

/// Config - everything one reconciliation run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub budget_file: PathBuf,
    pub bank_file: PathBuf,
    pub budget_account: String,
    pub start_date: Option<NaiveDate>,
    pub window_days: u32,
    pub format: OutputFormat,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            budget_file: cli.budget_file,
            bank_file: cli.bank_file,
            budget_account: cli.budget_account,
            start_date: cli.start_date,
            window_days: cli.window_days,
            format: cli.format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "ledger-reconcile",
            "--budget-file",
            "budget.csv",
            "--bank-file",
            "bank.csv",
            "--budget-account",
            "Checking",
        ]
    }

    #[test]
    fn test_defaults() {
        let config: Config = Cli::try_parse_from(base_args()).unwrap().into();

        assert_eq!(config.budget_file, PathBuf::from("budget.csv"));
        assert_eq!(config.bank_file, PathBuf::from("bank.csv"));
        assert_eq!(config.budget_account, "Checking");
        assert_eq!(config.start_date, None);
        assert_eq!(config.window_days, 4);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_all_options() {
        let mut args = base_args();
        args.extend(["--start-date", "01/15/2020", "--window-days", "7", "--format", "json"]);

        let config: Config = Cli::try_parse_from(args).unwrap().into();

        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(config.window_days, 7);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut args = base_args();
        args.extend(["--window-days", "0"]);

        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_rejects_bad_start_date() {
        let mut args = base_args();
        args.extend(["--start-date", "someday"]);

        assert!(Cli::try_parse_from(args).is_err());
    }
}
