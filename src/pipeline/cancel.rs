//! Run-level cancellation.
//!
//! Cancellation is cooperative: the pipeline polls the token before every
//! file. A check that notices the request mid-file can return
//! [`Interrupted`] (or an `io::ErrorKind::Interrupted` error) from anywhere
//! in its error chain, which stops the run the same way.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Shared, monotonic cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Cannot be undone.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Error signalling that the whole run, not just one file, must stop.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("analysis interrupted")]
pub struct Interrupted;

/// Whether an interruption appears anywhere in the error's cause chain.
pub fn is_interruption(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<Interrupted>()
            || cause
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::Interrupted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_token_shared_between_clones() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn test_nested_interruption_detected() {
        let err = Err::<(), _>(Interrupted)
            .context("resolving symbols")
            .context("running check")
            .unwrap_err();
        assert!(is_interruption(&err));

        let io_err: anyhow::Error = io::Error::new(io::ErrorKind::Interrupted, "signal").into();
        assert!(is_interruption(&io_err.context("reading")));

        assert!(!is_interruption(&anyhow::anyhow!("boom")));
    }
}
