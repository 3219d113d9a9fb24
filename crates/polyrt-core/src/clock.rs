use std::sync::LazyLock;
use std::time::Instant;

/// Source of elapsed wall time in seconds.
pub trait Clock {
    fn elapsed(&self) -> f64;
}

/// Monotonic clock measuring from its creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

static PROCESS_ORIGIN: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Seconds since the first call in this process. Only differences are meaningful.
pub fn perf_counter() -> f64 {
    PROCESS_ORIGIN.elapsed().as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clocks_never_go_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(first >= 0.0);
        assert!(second >= first);

        let start = perf_counter();
        assert!(perf_counter() >= start);
    }
}
