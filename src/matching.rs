// 🔗 Matching Engine - greedy cross-ledger pairing
// Each budget transaction claims the earliest unclaimed bank transaction with
// the same amount inside its date window

use crate::date_index::DateWindowIndex;
use crate::transaction::Transaction;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::trace;

/// Default search window, in days after the driving transaction's date
pub const DEFAULT_WINDOW_DAYS: u32 = 4;

// ============================================================================
// MATCH SUMMARY
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Driving transactions that were still unpaired when the pass reached them
    pub attempted: usize,

    /// Pairings established by this pass
    pub paired: usize,
}

impl MatchSummary {
    pub fn unmatched(&self) -> usize {
        self.attempted - self.paired
    }
}

// ============================================================================
// MATCHING ENGINE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingEngine {
    /// Width of the search window in days (default: 4)
    pub window_days: u32,
}

impl MatchingEngine {
    pub fn new() -> Self {
        MatchingEngine {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window(window_days: u32) -> Self {
        MatchingEngine { window_days }
    }

    /// Pair `drivers` against `candidates`, building the candidates' index.
    ///
    /// Both sequences must be sorted ascending by date.
    pub fn pair_transactions(
        &self,
        drivers: &mut [Transaction],
        candidates: &mut [Transaction],
    ) -> MatchSummary {
        let index = DateWindowIndex::build(candidates);
        self.pair_with_index(drivers, candidates, &index)
    }

    /// Pair using an index already built over `candidates`.
    ///
    /// Drivers are visited in order, so an earlier driver always gets first
    /// claim on a shared candidate. Drivers that are already paired are left
    /// alone, which makes a second pass a no-op.
    pub fn pair_with_index(
        &self,
        drivers: &mut [Transaction],
        candidates: &mut [Transaction],
        index: &DateWindowIndex,
    ) -> MatchSummary {
        debug_assert_eq!(index.sequence_len(), candidates.len());

        let mut summary = MatchSummary::default();

        for (driver_pos, driver) in drivers.iter_mut().enumerate() {
            if driver.is_paired() {
                continue;
            }
            summary.attempted += 1;

            let window = self.window(index, driver.date);
            let found = candidates[window.clone()]
                .iter()
                .position(|candidate| !candidate.is_paired() && candidate.amount == driver.amount)
                .map(|offset| window.start + offset);

            if let Some(candidate_pos) = found {
                driver.set_pair(candidate_pos);
                candidates[candidate_pos].set_pair(driver_pos);
                summary.paired += 1;

                trace!(
                    date = %driver.date,
                    amount = %driver.amount,
                    payee = %driver.payee,
                    counterpart = %candidates[candidate_pos].payee,
                    "paired"
                );
            }
        }

        summary
    }

    /// Exclusive end of the window that opens on `date`.
    ///
    /// `None` only when the end would fall past the last representable date.
    pub fn window_end(&self, date: NaiveDate) -> Option<NaiveDate> {
        date.checked_add_days(Days::new(u64::from(self.window_days)))
    }

    /// Candidate positions dated in `[date, date + window_days)`
    fn window(&self, index: &DateWindowIndex, date: NaiveDate) -> Range<usize> {
        let range = index.range_between(date, self.window_end(date));
        let end = range.end.min(index.sequence_len());
        range.start.min(end)..end
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
