//! Fetch scheduling for the console.
//!
//! At most one fetch task runs at a time. Starting a new one aborts the
//! previous task, and every outcome is tagged with its [`RequestId`] so
//! the reducer can drop anything that is not the latest.

use std::sync::Arc;

use feedview_network::SnapshotSource;
use feedview_protocol::{DataSnapshot, FetchError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::state::{Action, RequestId};

#[derive(Debug)]
pub struct FetchOutcome {
    pub id: RequestId,
    pub result: Result<DataSnapshot, FetchError>,
}

impl FetchOutcome {
    pub fn into_action(self) -> Action {
        match self.result {
            Ok(snapshot) => Action::FetchSucceeded(self.id, Arc::new(snapshot)),
            Err(e) => Action::FetchFailed(self.id, e.to_string()),
        }
    }
}

pub struct Refresher {
    source: Arc<dyn SnapshotSource>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    next_id: u64,
    in_flight: Option<(RequestId, JoinHandle<()>)>,
}

impl Refresher {
    pub fn new(source: Arc<dyn SnapshotSource>) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let refresher = Self {
            source,
            tx,
            next_id: 1,
            in_flight: None,
        };
        (refresher, rx)
    }

    /// Spawn a fetch, cancelling any that is still running.
    pub fn start(&mut self) -> RequestId {
        self.cancel();

        let id = RequestId(self.next_id);
        self.next_id += 1;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch_snapshot().await;
            // The receiver is gone only during shutdown.
            let _ = tx.send(FetchOutcome { id, result });
        });

        tracing::debug!(request_id = %id, "fetch started");
        self.in_flight = Some((id, handle));
        id
    }

    /// Abort the running fetch, if any.
    pub fn cancel(&mut self) {
        if let Some((id, handle)) = self.in_flight.take() {
            if !handle.is_finished() {
                tracing::info!(request_id = %id, "cancelling in-flight fetch");
                handle.abort();
            }
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }
}
