//! Cooperative cancellation for long-running passes.
//!
//! Only the bilateral filter is expensive enough to need this. It checks the
//! token between rows; a cancelled pass returns [`OpsError::Cancelled`]
//! and discards its partial output.
//!
//! ```rust
//! use pixpaint_ops::CancelToken;
//!
//! let token = CancelToken::new();
//! let handle = token.clone();
//! handle.cancel();
//! assert!(token.is_cancelled());
//! ```

use crate::{OpsError, OpsResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns `Err(OpsError::Cancelled)` if cancellation was requested.
    #[inline]
    pub fn check(&self) -> OpsResult<()> {
        if self.is_cancelled() {
            Err(OpsError::Cancelled)
        } else {
            Ok(())
        }
    }
}
