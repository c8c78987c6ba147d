//! Monotonic time source.
//!
//! The driver needs two kinds of time: a microsecond-precise busy-wait for
//! the enable pulse and a coarse "time since last flip" for the idle
//! power-off. Both read the same [`Clock`]. Blocking sleeps between flips use
//! [`embedded_hal::delay::DelayNs`] instead.

/// Monotonic microsecond counter.
///
/// The value must never decrease. Its origin is arbitrary.
pub trait Clock {
    /// Current time in microseconds.
    fn now_us(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Spin until `clock` reaches `deadline_us`.
///
/// Blocks the calling thread for the whole wait, which keeps the pulse
/// width independent of the scheduler.
#[inline]
pub fn busy_wait_until<C: Clock + ?Sized>(clock: &C, deadline_us: u64) {
    while clock.now_us() < deadline_us {
        core::hint::spin_loop();
    }
}

/// [`Clock`] backed by [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}
