//! Singleflight Module
//!
//! Deduplicates concurrent loads of the same key: one fetch runs, every
//! concurrent caller for that key receives the same result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use bytes::Bytes;
use tokio::sync::broadcast;

use crate::error::{CacheError, Result};

type LoadResult = Result<Bytes>;
type CallMap = Mutex<HashMap<String, broadcast::Sender<LoadResult>>>;

// == Single Flight ==
/// Per-key load deduplication.
///
/// The in-flight map uses a synchronous Mutex so the drop guard can clean
/// up without awaiting; the lock is only ever held to look up or remove an
/// entry, never across an await point.
#[derive(Debug, Default)]
pub struct SingleFlight {
    calls: CallMap,
}

enum Role {
    Leader(broadcast::Sender<LoadResult>),
    Waiter(broadcast::Receiver<LoadResult>),
}

impl SingleFlight {
    /// Creates a new SingleFlight with no loads in progress.
    pub fn new() -> Self {
        Self::default()
    }

    // == Load ==
    /// Runs `fetch` for `key`, unless a fetch for the same key is already
    /// in flight, in which case the caller waits for that result instead.
    ///
    /// The first caller for a key becomes the leader and executes `fetch`;
    /// later callers subscribe to the leader's broadcast while holding the
    /// map lock, so a delivered result can never be missed. The in-flight
    /// record is removed on every leader exit path (success, error, panic,
    /// cancellation) via a drop guard. A waiter whose future is dropped
    /// simply stops waiting; the load and the other waiters are unaffected.
    pub async fn load<F, Fut>(&self, key: &str, fetch: F) -> LoadResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LoadResult>,
    {
        let role = {
            let mut calls = self
                .calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match calls.get(key) {
                Some(tx) => Role::Waiter(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(1);
                    calls.insert(key.to_string(), tx.clone());
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Leader(tx) => {
                let cleanup = FlightGuard {
                    calls: &self.calls,
                    key,
                };
                let result = fetch().await;
                // Remove the record before broadcasting so a caller arriving
                // after delivery starts a fresh flight.
                drop(cleanup);
                let _ = tx.send(result.clone());
                result
            }
            Role::Waiter(mut rx) => match rx.recv().await {
                Ok(result) => result,
                // Leader went away without delivering a result
                Err(_) => Err(CacheError::Cancelled(key.to_string())),
            },
        }
    }

    /// Number of loads currently in flight.
    #[allow(dead_code)]
    pub fn in_flight(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Removes the in-flight record when the leader's call ends, however it ends.
struct FlightGuard<'a> {
    calls: &'a CallMap,
    key: &'a str,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.key);
    }
}
