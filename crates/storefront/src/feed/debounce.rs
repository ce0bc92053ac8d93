//! Debouncing for search-as-you-type input.
//!
//! Each keystroke submits the whole query; only the submission that
//! stays newest for the full quiescence window survives. Supersession is
//! tracked with a generation counter rather than task cancellation, so
//! callers just `await` and check the result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Debounces a stream of submissions down to the last one standing.
///
/// Cheap to clone; all clones share one generation counter.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    /// Create a debouncer with the given quiescence window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Submit `value` and wait out the quiescence window.
    ///
    /// Returns `Some(value)` if no newer submission arrived in the
    /// meantime, `None` if this one was superseded.
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let submitted = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        (self.generation.load(Ordering::SeqCst) == submitted).then_some(value)
    }
}
