//! # Rollback Ledger
//!
//! Running count and bounded journal of reversed transfers.
//!
//! The count is monotone for the lifetime of the contract; the journal
//! keeps only the most recent records so an adversarial receiver cannot
//! grow state without bound.

use super::entities::RollbackRecord;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Journal entries kept when no cap is configured explicitly.
pub const DEFAULT_JOURNAL_CAP: usize = 256;

/// Tracks every transfer the ledger has reversed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RollbackLedger {
    count: u64,
    journal: VecDeque<RollbackRecord>,
    journal_cap: usize,
}

impl RollbackLedger {
    /// Create a ledger keeping at most `journal_cap` recent records.
    #[must_use]
    pub fn new(journal_cap: usize) -> Self {
        Self {
            count: 0,
            journal: VecDeque::new(),
            journal_cap,
        }
    }

    /// Total rollbacks since initialization, including evicted records.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Record a reversal, evicting the oldest journal entry past the cap.
    pub fn record(&mut self, record: RollbackRecord) {
        self.count += 1;
        if self.journal_cap == 0 {
            return;
        }
        if self.journal.len() == self.journal_cap {
            self.journal.pop_front();
        }
        self.journal.push_back(record);
    }

    /// Journal entries, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &RollbackRecord> {
        self.journal.iter()
    }
}

impl Default for RollbackLedger {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_CAP)
    }
}

// =============================================================================
// Tests
// =============================================================================
