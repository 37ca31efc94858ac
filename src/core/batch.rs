//! Per-item outcome tracking for batch transaction operations.
//!
//! Batch endpoints never abort early. Each item succeeds or fails on its own and the
//! failures are folded into one combined message, so a caller sees exactly which
//! items need attention while the well-formed ones are already persisted.

use serde::Serialize;
use std::fmt::Display;

/// Message returned when an operation (or every item of a batch) succeeded.
pub const SUCCESS: &str = "SUCCESS";

const FAILURE_HEADER: &str = "There were some errors processing the following transactions:";

/// One failed batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Item index in the request, or the transaction id of a failed removal
    pub key: i64,
    /// Why the item failed
    pub error: String,
}

/// Accumulated result of a batch operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Ids of the transactions the batch created, changed or removed
    pub succeeded: Vec<i64>,
    /// Items that failed, in request order
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Records a successfully processed transaction.
    pub fn record_success(&mut self, transaction_id: i64) {
        self.succeeded.push(transaction_id);
    }

    /// Records a failed item under `key`.
    pub fn record_failure(&mut self, key: i64, error: impl Display) {
        let error = error.to_string();
        tracing::warn!("Batch item {} failed: {}", key, error);
        self.failures.push(BatchFailure { key, error });
    }

    /// True when no item failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `"SUCCESS"`, or the failure header followed by one `\n{key}: {error}` line per failure.
    #[must_use]
    pub fn message(&self) -> String {
        if self.is_success() {
            return SUCCESS.to_string();
        }

        self.failures
            .iter()
            .fold(FAILURE_HEADER.to_string(), |mut message, failure| {
                message.push_str(&format!("\n{}: {}", failure.key, failure.error));
                message
            })
    }
}

/// Converts a batch position into the key used in failure messages.
#[must_use]
pub fn index_key(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
