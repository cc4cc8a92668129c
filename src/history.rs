//! Append-only in-memory verification history

use crate::types::record::{RecordDraft, VerificationRecord};
use std::sync::{Mutex, MutexGuard};

/// Records of every verification since start-up.
///
/// Ids are assigned under the same lock as the append, so they are 1-based,
/// strictly increasing and gap-free. The history is not bounded.
#[derive(Debug, Default)]
pub struct VerificationHistory {
    records: Mutex<Vec<VerificationRecord>>,
}

impl VerificationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id to `draft`, store it and return the stored record
    pub fn append(&self, draft: RecordDraft) -> VerificationRecord {
        let mut records = self.lock();
        let record = draft.into_record(records.len() as u64 + 1);
        records.push(record.clone());
        record
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<VerificationRecord> {
        self.lock().clone()
    }

    pub fn get(&self, id: u64) -> Option<VerificationRecord> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.lock().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Records are only ever pushed whole, so a poisoned lock still holds a
    // consistent list
    fn lock(&self) -> MutexGuard<'_, Vec<VerificationRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
