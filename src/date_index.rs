// 📅 Date-Window Index - first sequence position for each calendar day
// Lets the matcher jump straight to the slice of a sorted ledger covering a date range

use crate::transaction::Transaction;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::ops::Range;

/// DateWindowIndex - day → lowest index in a date-sorted sequence
///
/// Only the first occurrence of each day is stored. Later transactions on the
/// same day are reached by scanning forward, which works because the
/// sequence is sorted. Keys are ordered, so "nearest day on or after X" is a
/// logarithmic range lookup instead of a scan over every key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateWindowIndex {
    first_index: BTreeMap<NaiveDate, usize>,
    len: usize,
}

impl DateWindowIndex {
    /// Build from a sequence already sorted ascending by date
    pub fn build(transactions: &[Transaction]) -> Self {
        debug_assert!(
            transactions.windows(2).all(|w| w[0].date <= w[1].date),
            "index requires a date-sorted sequence"
        );

        let mut first_index = BTreeMap::new();
        for (index, tx) in transactions.iter().enumerate() {
            first_index.entry(tx.date).or_insert(index);
        }

        DateWindowIndex {
            first_index,
            len: transactions.len(),
        }
    }

    /// Length of the sequence the index was built from
    pub fn sequence_len(&self) -> usize {
        self.len
    }

    /// Nearest recorded day that is on or after `date`, with its position
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<(NaiveDate, usize)> {
        self.first_index
            .range(date..)
            .next()
            .map(|(day, index)| (*day, *index))
    }

    /// Positions of every transaction dated in `[from, until)`.
    ///
    /// `until = None` leaves the range open to the end of the sequence.
    pub fn range_between(&self, from: NaiveDate, until: Option<NaiveDate>) -> Range<usize> {
        let (start_day, start) = match self.first_on_or_after(from) {
            Some(found) => found,
            None => return self.len..self.len,
        };

        if let Some(until) = until {
            if start_day >= until {
                return start..start;
            }
        }

        let end = until
            .and_then(|until| self.first_on_or_after(until))
            .map(|(_, index)| index)
            .unwrap_or(self.len);

        start..end
    }
}

// ============================================================================
// TESTS
// ============================================================================
