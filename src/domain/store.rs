//! In-memory record store holding the authoritative loan collection.

use super::models::{LoanRecord, StatusFilter};

/// Ordered collection of [`LoanRecord`]s in insertion order.
///
/// Every operation is total and never persists on its own; callers write the
/// resulting sequence through [`crate::infrastructure::PersistenceBridge`].
///
/// # Examples
///
/// ```
/// use loanbook::domain::RecordStore;
///
/// let store = RecordStore::default();
/// assert!(store.is_empty());
/// assert_eq!(store.next_id(), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<LoanRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<LoanRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LoanRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record carrying `id`.
    pub fn get(&self, id: u32) -> Option<&LoanRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Overwrites the whole collection.
    pub fn replace_all(&mut self, records: Vec<LoanRecord>) {
        self.records = records;
    }

    pub fn append(&mut self, record: LoanRecord) {
        self.records.push(record);
    }

    /// Replaces the first record with a matching id in place. Missing ids are ignored.
    pub fn update_by_id(&mut self, record: LoanRecord) {
        if let Some(slot) = self.records.iter_mut().find(|existing| existing.id == record.id) {
            *slot = record;
        }
    }

    /// Removes every record with `id`, which may be more than one when a
    /// legacy collection carries duplicate identifiers.
    pub fn remove_by_id(&mut self, id: u32) {
        self.records.retain(|record| record.id != id);
    }

    /// Identifier for the next inserted record: one past the largest id in use.
    ///
    /// Ids freed by deleting the newest record can be reused, but an id that
    /// is still present never is. `None` once `u32::MAX` is taken.
    pub fn next_id(&self) -> Option<u32> {
        match self.records.iter().map(|record| record.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Store position of the `nth` record passing `filter`.
    pub fn filtered_position(&self, filter: StatusFilter, nth: usize) -> Option<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| filter.matches(record))
            .nth(nth)
            .map(|(position, _)| position)
    }

    /// Records passing `filter`, in collection order. Does not mutate the store.
    pub fn filtered(&self, filter: StatusFilter) -> Vec<&LoanRecord> {
        self.records.iter().filter(|record| filter.matches(record)).collect()
    }
}
