use std::thread;
use tracing::warn;

use crate::config::RetryConfig;
use crate::errors::{CompareError, Result};
use crate::source::{Query, RecordSource, Row};

/// source wrapper retrying failed fetches with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryingSource<S> {
    inner: S,
    retry: RetryConfig,
}

impl<S: RecordSource> RetryingSource<S> {
    pub fn new(inner: S, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RecordSource> RecordSource for RetryingSource<S> {
    fn fetch_rows(&self, query: &Query) -> Result<Vec<Row>> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.inner.fetch_rows(query) {
                Ok(rows) => return Ok(rows),
                Err(err) if attempt >= max_attempts => {
                    return Err(CompareError::DataFetchFailure {
                        collection: query.collection.clone(),
                        attempts: attempt,
                        message: failure_message(err),
                    });
                }
                Err(err) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        collection = %query.collection,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "fetch failed, retrying"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

fn failure_message(err: CompareError) -> String {
    match err {
        CompareError::DataFetchFailure { message, .. } => message,
        other => other.to_string(),
    }
}
