//! Timers that work on both the WASM event loop and native test builds.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// One pending delayed action at a time.
///
/// [`arm`](Deadline::arm) hands out a ticket and supersedes every earlier
/// one; [`cancel`](Deadline::cancel) supersedes them all. A waiter whose
/// ticket was superseded while it slept must not act.
#[derive(Clone, Debug, Default)]
pub struct Deadline {
    current: Rc<Cell<u64>>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self) -> u64 {
        self.cancel();
        self.current.get()
    }

    pub fn cancel(&self) {
        self.current.set(self.current.get() + 1);
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.get() == ticket
    }

    /// Sleep for `delay`; true if `ticket` is still the live one afterwards.
    pub async fn elapsed(&self, ticket: u64, delay: Duration) -> bool {
        sleep(delay).await;
        self.is_current(ticket)
    }
}
