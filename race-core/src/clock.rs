use core::sync::atomic::{AtomicU32, Ordering};

/// Free-running millisecond counter since boot.
///
/// [`Clock::tick`] is called from one periodic source every
/// [`TICK_PERIOD_MS`](crate::config::TICK_PERIOD_MS) and is the only writer;
/// everything else reads. The counter is a single 32-bit word, so reads are
/// atomic on the target without a critical section.
///
/// It wraps after `u32::MAX` ms (about 49.7 days). Elapsed times go through
/// [`Clock::elapsed_since`], which stays correct across one wrap.
pub struct Clock {
    millis: AtomicU32,
}

impl Clock {
    pub const fn new() -> Self {
        Self {
            millis: AtomicU32::new(0),
        }
    }

    #[cfg(test)]
    const fn starting_at(ms: u32) -> Self {
        Self {
            millis: AtomicU32::new(ms),
        }
    }

    /// Advance by exactly one millisecond.
    pub fn tick(&self) {
        self.millis.fetch_add(1, Ordering::Relaxed);
    }

    pub fn now_ms(&self) -> u32 {
        self.millis.load(Ordering::Relaxed)
    }

    pub fn elapsed_since(&self, start_ms: u32) -> u32 {
        self.now_ms().wrapping_sub(start_ms)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
