//! Background loader for the author collection
//!
//! Runs the fetch on a worker thread so the UI keeps drawing while it is
//! in flight. The result is picked up by polling on each tick.

use crate::model::Record;
use crate::services::{DataSource, FetchError};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

type FetchResult = Result<Vec<Record>, FetchError>;

struct LoadJob {
    receiver: Receiver<FetchResult>,
    start_instant: Instant,
}

/// Runs at most one fetch at a time
#[derive(Default)]
pub struct Loader {
    job: Option<LoadJob>,
}

impl Loader {
    pub fn new() -> Self {
        Self { job: None }
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    /// Start fetching from `source`, replacing any fetch in flight
    pub fn spawn(&mut self, source: Arc<dyn DataSource>) {
        let (tx, rx) = mpsc::channel();
        tracing::info!(source = %source.describe(), "fetching authors");

        thread::spawn(move || {
            // The receiver may be gone if a newer fetch replaced this one
            let _ = tx.send(source.fetch());
        });

        self.job = Some(LoadJob {
            receiver: rx,
            start_instant: Instant::now(),
        });
    }

    /// Take the fetch result if it has arrived
    pub fn poll(&mut self) -> Option<FetchResult> {
        let job = self.job.as_ref()?;

        match job.receiver.try_recv() {
            Ok(result) => {
                tracing::debug!(
                    elapsed_ms = job.start_instant.elapsed().as_millis() as u64,
                    "fetch finished"
                );
                self.job = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("fetch worker exited without a result");
                self.job = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct SlowSource;

    impl DataSource for SlowSource {
        fn fetch(&self) -> Result<Vec<Record>, FetchError> {
            thread::sleep(Duration::from_millis(20));
            Ok(vec![Record::new(1, "Ann", "Signed", "Jan")])
        }

        fn describe(&self) -> String {
            "slow".to_string()
        }
    }

    fn wait_for(loader: &mut Loader) -> Option<FetchResult> {
        for _ in 0..200 {
            if let Some(result) = loader.poll() {
                return Some(result);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn test_poll_without_job() {
        let mut loader = Loader::new();
        assert!(!loader.is_running());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_spawn_delivers_result_once() {
        let mut loader = Loader::new();
        loader.spawn(Arc::new(SlowSource));
        assert!(loader.is_running());

        let records = wait_for(&mut loader).expect("fetch result").unwrap();
        assert_eq!(records.len(), 1);
        assert!(!loader.is_running());
        assert!(loader.poll().is_none());
    }
}
