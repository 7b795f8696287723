use std::time::Instant;

/// Monotonic time source for the frame loop
///
/// Implementations only report seconds since they started; the frame
/// timer derives per-frame deltas from successive readings.
pub trait FrameClock {
    fn elapsed_seconds(&self) -> f32;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn elapsed_seconds(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_clock_measures_elapsed() {
        let clock = SystemClock::new();

        thread::sleep(Duration::from_millis(10));
        let elapsed = clock.elapsed_seconds();

        assert!(elapsed >= 0.009);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let clock = SystemClock::new();
        let first = clock.elapsed_seconds();
        let second = clock.elapsed_seconds();
        assert!(second >= first);
    }
}
