//! Cooperative shutdown flag.
//!
//! Every sleep in the engine goes through [`StopFlag::wait`], so Ctrl-C is
//! honored at each wait point instead of whenever the current track happens
//! to finish.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Granularity of interruptible sleeps.
const TICK: Duration = Duration::from_millis(25);

#[derive(Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register this flag as the process Ctrl-C handler.
    pub fn install_ctrlc(&self) -> Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            log::info!("interrupt received, shutting down");
            flag.raise();
        })
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sleep for `duration`, waking early if the flag is raised.
    ///
    /// Returns `true` if the full duration elapsed, `false` on interrupt.
    pub fn wait(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_raised() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(TICK.min(deadline - now));
        }
    }
}
