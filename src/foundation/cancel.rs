use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::{InterpError, InterpResult};

/// Shared cancellation flag, checked between oracle calls.
///
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Returns `Cancelled` once [`CancelToken::cancel`] has been called.
    pub fn check(&self, what: &str) -> InterpResult<()> {
        if self.is_cancelled() {
            return Err(InterpError::cancelled(format!("run cancelled before {what}")));
        }
        Ok(())
    }
}
