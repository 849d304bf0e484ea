//! Time sources and the session clock.

use std::time::{Duration, Instant};

/// Monotonic time source. `now()` is measured from an arbitrary origin and
/// never goes backwards.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualClock {
    now: std::cell::Cell<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub fn advance_millis(&self, millis: u64) {
        self.now.set(self.now.get() + Duration::from_millis(millis));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Elapsed time of a whole session, independent of phase boundaries.
///
/// While running, elapsed is `base + (now - running_since)`, i.e.
/// `now - adjusted_start`. It is recomputed from the time source on every
/// tick rather than counted, so pause/resume cycles cannot drift.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    base: Duration,
    running_since: Option<Duration>,
    elapsed: Duration,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Duration) {
        self.resume(now, Duration::ZERO);
    }

    /// Continue counting from a carried-over elapsed value.
    pub fn resume(&mut self, now: Duration, base: Duration) {
        self.base = base;
        self.elapsed = base;
        self.running_since = Some(now);
    }

    /// Freeze at the value computed for `now`. No-op when not running.
    pub fn pause(&mut self, now: Duration) {
        if self.running_since.is_some() {
            self.tick(now);
            self.base = self.elapsed;
            self.running_since = None;
        }
    }

    pub fn reset(&mut self) {
        self.base = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.running_since = None;
    }

    /// Recompute elapsed from the time source.
    pub fn tick(&mut self, now: Duration) -> Duration {
        if let Some(since) = self.running_since {
            self.elapsed = self.base + now.saturating_sub(since);
        }
        self.elapsed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }
}
