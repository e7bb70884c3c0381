//! Error types used by the eventcast dispatcher and handlers.
//!
//! This module defines two error types:
//!
//! - [`HandlerError`] — the abnormal termination of a single subscriber.
//! - [`DispatchError`] — the aggregate failure of one `invoke_all` round,
//!   carrying every [`HandlerFailure`] in snapshot order plus a designated
//!   primary.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics on the caller side; the dispatcher itself never logs.

use thiserror::Error;

/// # Errors produced by a single handler invocation.
///
/// These represent the failure of one subscriber during one dispatch round.
/// They never affect sibling handlers; the dispatcher collects them into a
/// [`DispatchError`] at the join boundary.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum HandlerError {
    /// Handler reported a failure.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Handler panicked; the unwind was caught at the dispatch boundary.
    #[error("handler panicked: {message}")]
    Panicked {
        /// The captured panic payload, when it was a string.
        message: String,
    },

    /// Handler observed cancellation of its own context and gave up.
    #[error("handler canceled")]
    Canceled,
}

impl HandlerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventcast::HandlerError;
    ///
    /// let err = HandlerError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Fail { error } => format!("error: {error}"),
            HandlerError::Panicked { message } => format!("panic: {message}"),
            HandlerError::Canceled => "context canceled".to_string(),
        }
    }
}

/// A single handler failure, tagged with its position in the dispatch snapshot.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    /// Zero-based position of the failed handler in the dispatch snapshot.
    pub index: usize,
    /// The error the handler resolved with.
    pub error: HandlerError,
}

/// # Aggregate failure of one `invoke_all` round.
///
/// Produced when one or more handlers failed. Carries the full ordered list of
/// failures (snapshot order) plus a designated *primary* failure: the failure
/// of the first handler in snapshot order that failed, independent of the
/// order in which handlers happened to complete.
///
/// A caller that only wants one representative error reads [`Display`] or
/// [`DispatchError::primary`]; a caller that wants full visibility walks
/// [`DispatchError::failures`].
///
/// [`Display`]: std::fmt::Display
#[derive(Error, Debug, Clone)]
pub struct DispatchError {
    primary: HandlerError,
    dispatched: usize,
    failures: Vec<HandlerFailure>,
}

impl DispatchError {
    /// Builds the aggregate from the ordered failure list of one round.
    ///
    /// `failures` must be non-empty and sorted by snapshot index; the first
    /// entry becomes the primary.
    pub(crate) fn new(dispatched: usize, failures: Vec<HandlerFailure>) -> Self {
        debug_assert!(!failures.is_empty());
        Self {
            primary: failures[0].error.clone(),
            dispatched,
            failures,
        }
    }

    /// Returns the primary failure: the first failed handler in snapshot order.
    pub fn primary(&self) -> &HandlerError {
        &self.primary
    }

    /// Returns every failure of the round, in snapshot order.
    pub fn failures(&self) -> &[HandlerFailure] {
        &self.failures
    }

    /// Consumes the aggregate and returns the ordered failure list.
    pub fn into_failures(self) -> Vec<HandlerFailure> {
        self.failures
    }

    /// Number of handlers that failed in this round.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Number of handlers the round dispatched to (snapshot size).
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        "dispatch_failed"
    }

    /// Returns a human-readable message with the primary failure and counts.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} handler(s) failed: {}",
            self.failures.len(),
            self.dispatched,
            self.primary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_labels() {
        let fail = HandlerError::Fail { error: "x".into() };
        let panic = HandlerError::Panicked { message: "y".into() };
        assert_eq!(fail.as_label(), "handler_failed");
        assert_eq!(panic.as_label(), "handler_panicked");
        assert_eq!(HandlerError::Canceled.as_label(), "handler_canceled");
    }

    #[test]
    fn test_handler_error_messages() {
        let err = HandlerError::Fail {
            error: "connection refused".into(),
        };
        assert_eq!(err.as_message(), "error: connection refused");
        assert_eq!(err.to_string(), "handler failed: connection refused");
    }

    #[test]
    fn test_dispatch_error_primary_is_first_failure() {
        let err = DispatchError::new(
            4,
            vec![
                HandlerFailure {
                    index: 1,
                    error: HandlerError::Fail {
                        error: "first".into(),
                    },
                },
                HandlerFailure {
                    index: 3,
                    error: HandlerError::Canceled,
                },
            ],
        );

        assert!(matches!(err.primary(), HandlerError::Fail { error } if error == "first"));
        assert_eq!(err.failed(), 2);
        assert_eq!(err.dispatched(), 4);
        assert_eq!(err.failures()[1].index, 3);
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::new(
            3,
            vec![HandlerFailure {
                index: 0,
                error: HandlerError::Fail {
                    error: "boom".into(),
                },
            }],
        );
        assert_eq!(
            err.to_string(),
            "1 of 3 handler(s) failed: handler failed: boom"
        );
        assert_eq!(err.as_label(), "dispatch_failed");
    }
}
