use crate::core::clock::{FrameClock, SystemClock};

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the timer started
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Infinite iterator that stamps frames from a clock
///
/// The first frame's delta is measured from the clock's origin. A clock
/// that steps backwards yields a zero delta rather than a negative one.
#[derive(Debug, Clone)]
pub struct FrameTimer<C: FrameClock = SystemClock> {
    clock: C,
    frame_number: u64,
    last_time: f32,
}

impl<C: FrameClock> FrameTimer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            frame_number: 0,
            last_time: 0.0,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Stamp the next frame
    pub fn advance(&mut self) -> FrameInfo {
        let time = self.clock.elapsed_seconds();
        let delta = (time - self.last_time).max(0.0);

        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_time = time;

        info
    }
}

impl Default for FrameTimer<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}

impl<C: FrameClock> Iterator for FrameTimer<C> {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        Some(self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct ManualClock {
        now: Cell<f32>,
    }

    impl ManualClock {
        fn at(seconds: f32) -> Self {
            Self {
                now: Cell::new(seconds),
            }
        }
    }

    impl FrameClock for ManualClock {
        fn elapsed_seconds(&self) -> f32 {
            self.now.get()
        }
    }

    #[test]
    fn test_first_frame_measures_from_origin() {
        let mut timer = FrameTimer::new(ManualClock::at(0.25));
        let frame = timer.next().unwrap();
        assert_eq!(frame, FrameInfo::new(0, 0.25, 0.25));
    }

    #[test]
    fn test_deltas_follow_the_clock() {
        let mut timer = FrameTimer::new(ManualClock::at(0.0));
        timer.next();

        timer.clock().now.set(0.5);
        let frame = timer.next().unwrap();
        assert_eq!(frame.number, 1);
        assert_eq!(frame.delta, 0.5);

        timer.clock().now.set(0.75);
        let frame = timer.next().unwrap();
        assert_eq!(frame.number, 2);
        assert_eq!(frame.time, 0.75);
        assert_eq!(frame.delta, 0.25);
        assert_eq!(timer.frame_number(), 3);
    }

    #[test]
    fn test_backwards_clock_clamps_delta() {
        let mut timer = FrameTimer::new(ManualClock::at(2.0));
        timer.next();
        timer.clock().now.set(1.0);
        assert_eq!(timer.next().unwrap().delta, 0.0);
    }

    #[test]
    fn test_system_timer_counts_frames() {
        let timer = FrameTimer::default();
        let frames: Vec<FrameInfo> = timer.take(3).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].number, 2);
        assert!(frames.iter().all(|f| f.delta >= 0.0));
    }
}
