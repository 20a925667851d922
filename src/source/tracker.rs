use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::Result;

/// identifies one in-flight fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestToken(u64);

/// records as of one successful fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub records: Vec<T>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FetchState<T> {
    Idle,
    Loading { request: RequestToken },
    Loaded(Snapshot<T>),
    Failed { message: String, failed_at: DateTime<Utc> },
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    pub fn records(&self) -> &[T] {
        match self {
            FetchState::Loaded(snapshot) => &snapshot.records,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// loading state for one listing; only the latest request may land
#[derive(Debug, Clone)]
pub struct FetchTracker<T> {
    state: FetchState<T>,
    next_request: u64,
}

impl<T> FetchTracker<T> {
    pub fn new() -> Self {
        Self {
            state: FetchState::Idle,
            next_request: 0,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// start a fetch, superseding any request still in flight
    pub fn begin(&mut self) -> RequestToken {
        self.next_request += 1;
        let request = RequestToken(self.next_request);
        self.state = FetchState::Loading { request };
        request
    }

    /// apply a fetch result; returns false when the response is stale
    pub fn complete(
        &mut self,
        request: RequestToken,
        result: Result<Vec<T>>,
        time_provider: &SafeTimeProvider,
    ) -> bool {
        match self.state {
            FetchState::Loading { request: current } if current == request => {}
            _ => {
                debug!(request = request.0, "discarding stale fetch response");
                return false;
            }
        }

        let now = time_provider.now();
        self.state = match result {
            Ok(records) => FetchState::Loaded(Snapshot {
                records,
                fetched_at: now,
            }),
            Err(err) => {
                warn!(error = %err, "fetch failed");
                FetchState::Failed {
                    message: err.to_string(),
                    failed_at: now,
                }
            }
        };
        true
    }

    /// drop whatever was loaded
    pub fn reset(&mut self) {
        self.state = FetchState::Idle;
    }
}

impl<T> Default for FetchTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}
