//! Data store - owns the in-memory author collection
//!
//! The collection is only changed through the methods here. Every change
//! bumps a version counter and is broadcast to subscribers over a channel.

use super::record::Record;
use crate::services::{DataSource, FetchError};
use std::sync::mpsc::{self, Receiver, Sender};

/// Change notification sent to store subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The whole collection was replaced by a fetch result
    Replaced { len: usize },
    /// The collection was mutated in place
    Mutated { len: usize },
}

/// In-memory record store
#[derive(Debug, Default)]
pub struct DataStore {
    records: Vec<Record>,
    /// Most recently confirmed dialog data
    dialog_data: Option<Record>,
    version: u64,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current collection
    pub fn data(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counter bumped on every change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register for change notifications
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: StoreEvent) {
        self.version += 1;
        // Drop subscribers whose receiver is gone
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fetch
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the full collection from `source` and publish it
    ///
    /// Errors are logged and swallowed; the collection stays as it was.
    pub fn fetch_all(&mut self, source: &dyn DataSource) -> Option<FetchError> {
        self.apply_fetch(source.fetch())
    }

    /// Publish a fetch result obtained elsewhere (e.g. the background loader)
    pub fn apply_fetch(&mut self, result: Result<Vec<Record>, FetchError>) -> Option<FetchError> {
        match result {
            Ok(records) => {
                tracing::info!(count = records.len(), "author collection loaded");
                self.set_data(records);
                None
            }
            Err(err) => {
                tracing::error!(kind = err.kind(), "{}", err);
                Some(err)
            }
        }
    }

    /// Replace the whole collection
    pub fn set_data(&mut self, records: Vec<Record>) {
        self.records = records;
        let len = self.records.len();
        self.notify(StoreEvent::Replaced { len });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dialog staging and demo CRUD endpoints
    // ─────────────────────────────────────────────────────────────────────────

    /// Hold the confirmed dialog record for the caller
    pub fn stage_for_dialog(&mut self, record: Record) {
        self.dialog_data = Some(record);
    }

    pub fn dialog_data(&self) -> Option<&Record> {
        self.dialog_data.as_ref()
    }

    pub fn add_author(&mut self, record: Record) {
        tracing::debug!(id = record.id, "add author staged");
        self.stage_for_dialog(record);
    }

    pub fn update_author(&mut self, record: Record) {
        tracing::debug!(id = record.id, "update author staged");
        self.stage_for_dialog(record);
    }

    /// Delete endpoint. Only reports the id; the collection is untouched.
    pub fn remove_by_id(&self, id: i64) {
        tracing::info!(id, "delete author requested");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Local mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Index of the first record with `id`
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn append(&mut self, record: Record) {
        self.records.push(record);
        let len = self.records.len();
        self.notify(StoreEvent::Mutated { len });
    }

    /// Replace the record at `index`. Returns false if out of range.
    pub fn replace_at(&mut self, index: usize, record: Record) -> bool {
        let Some(slot) = self.records.get_mut(index) else {
            return false;
        };
        *slot = record;
        let len = self.records.len();
        self.notify(StoreEvent::Mutated { len });
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Record> {
        if index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);
        let len = self.records.len();
        self.notify(StoreEvent::Mutated { len });
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    impl DataSource for FailingSource {
        fn fetch(&self) -> Result<Vec<Record>, FetchError> {
            Err(FetchError::Io {
                path: "remote".into(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "offline"),
            })
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    struct StaticSource(Vec<Record>);

    impl DataSource for StaticSource {
        fn fetch(&self) -> Result<Vec<Record>, FetchError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new(1, "Ann", "Signed", "2018-01-01"),
            Record::new(2, "Bob", "Pending", "2018-02-01"),
        ]
    }

    #[test]
    fn test_fetch_replaces_collection_and_notifies() {
        let mut store = DataStore::new();
        let rx = store.subscribe();

        assert!(store.fetch_all(&StaticSource(sample())).is_none());

        assert_eq!(store.len(), 2);
        assert_eq!(rx.try_recv(), Ok(StoreEvent::Replaced { len: 2 }));
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_fetch_failure_keeps_collection() {
        let mut store = DataStore::new();
        store.set_data(sample());
        let version = store.version();

        let err = store.fetch_all(&FailingSource);

        assert_eq!(err.map(|e| e.kind()), Some("IoError"));
        assert_eq!(store.data(), sample().as_slice());
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_remove_by_id_does_not_touch_collection() {
        let mut store = DataStore::new();
        store.set_data(sample());
        store.remove_by_id(1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_staging() {
        let mut store = DataStore::new();
        assert!(store.dialog_data().is_none());

        store.add_author(Record::new(3, "Cy", "", ""));
        assert_eq!(store.dialog_data().map(|r| r.id), Some(3));

        store.update_author(Record::new(4, "Di", "", ""));
        assert_eq!(store.dialog_data().map(|r| r.id), Some(4));
        assert!(store.is_empty());
    }

    #[test]
    fn test_local_mutations() {
        let mut store = DataStore::new();
        store.set_data(sample());
        let rx = store.subscribe();

        store.append(Record::new(3, "Cy", "", ""));
        assert_eq!(store.position_of(3), Some(2));

        assert!(store.replace_at(0, Record::new(1, "Anna", "", "")));
        assert_eq!(store.data()[0].author, "Anna");
        assert!(!store.replace_at(10, Record::default()));

        assert_eq!(store.remove_at(1).map(|r| r.id), Some(2));
        assert!(store.remove_at(10).is_none());

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                StoreEvent::Mutated { len: 3 },
                StoreEvent::Mutated { len: 3 },
                StoreEvent::Mutated { len: 2 },
            ]
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut store = DataStore::new();
        let rx = store.subscribe();
        drop(rx);
        store.set_data(sample());
        assert!(store.subscribers.is_empty());
    }
}
