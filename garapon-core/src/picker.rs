//! Timed extraction of balls.
//!
//! The drum spins while the operator watches. When the operator stops it (or
//! patience runs out) the sub-second part of the elapsed wall-clock time,
//! taken modulo the drum size, names the slot to draw from. Empty slots are
//! rejected by reading the clock again until a ball turns up.

use crate::config::GameConfig;
use crate::error::{GaraponError, Result};
use crate::io::{Clock, Input, Key, Timestamp, Wait};
use crate::machine::Machine;
use std::time::Duration;

pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Nanoseconds between two readings, looking only at their sub-second parts.
///
/// Whole seconds are ignored: readings taken 1.2s apart give 0.2s. A negative
/// difference borrows one second.
pub fn sub_second_delta(before: Timestamp, after: Timestamp) -> u32 {
    if after.nanos >= before.nanos {
        after.nanos - before.nanos
    } else {
        after.nanos + NANOS_PER_SEC - before.nanos
    }
}

pub fn slot_index(delta: u32, size: usize) -> usize {
    delta as usize % size
}

/// How an animation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Stopped,
    PatienceExhausted,
    Quit,
}

/// A ball taken from a drum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub value: u32,
    pub slot: usize,
    /// Clock re-reads spent landing on empty slots.
    pub resamples: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedPicker {
    patience: u32,
    frame: Duration,
}

impl TimedPicker {
    pub fn new(patience: u32, frame: Duration) -> Self {
        Self { patience, frame }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.patience, config.frame_interval())
    }

    pub fn patience(&self) -> u32 {
        self.patience
    }

    /// Run animation frames until the operator stops or quits, or patience
    /// runs out. `frame` reshuffles and repaints the drums.
    pub fn spin<I, F>(&self, input: &mut I, mut frame: F) -> Result<Spin>
    where
        I: Input + ?Sized,
        F: FnMut() -> Result<()>,
    {
        for _ in 0..self.patience {
            frame()?;
            match input.poll_key(Wait::Frame(self.frame))? {
                Some(Key::Enter) => return Ok(Spin::Stopped),
                Some(Key::Quit) => return Ok(Spin::Quit),
                _ => {}
            }
        }
        Ok(Spin::PatienceExhausted)
    }

    /// Take one ball from `machine` using the time elapsed since `started`.
    pub fn extract<C>(&self, clock: &C, started: Timestamp, machine: &mut Machine) -> Result<Extraction>
    where
        C: Clock + ?Sized,
    {
        // Without a ball in the drum the rejection loop below would never end.
        if machine.remaining() == 0 {
            return Err(GaraponError::Exhausted);
        }

        let mut resamples = 0;
        loop {
            let now = clock.now()?;
            let slot = slot_index(sub_second_delta(started, now), machine.size());
            if let Some(value) = machine.take(slot) {
                return Ok(Extraction {
                    value,
                    slot,
                    resamples,
                });
            }
            resamples += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::EMPTY;
    use std::cell::Cell;
    use std::collections::{HashSet, VecDeque};

    struct StepClock {
        nanos: Cell<u64>,
        step: u64,
    }

    impl StepClock {
        fn new(start: u64, step: u64) -> Self {
            Self {
                nanos: Cell::new(start),
                step,
            }
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> Result<Timestamp> {
            let n = self.nanos.get();
            self.nanos.set(n + self.step);
            Ok(Timestamp {
                secs: n / u64::from(NANOS_PER_SEC),
                nanos: (n % u64::from(NANOS_PER_SEC)) as u32,
            })
        }

        fn pause(&self, duration: Duration) {
            self.nanos.set(self.nanos.get() + duration.as_nanos() as u64);
        }
    }

    struct BrokenClock;

    impl Clock for BrokenClock {
        fn now(&self) -> Result<Timestamp> {
            Err(GaraponError::clock("clock went away"))
        }

        fn pause(&self, _duration: Duration) {}
    }

    struct Keys(VecDeque<Option<Key>>);

    impl Input for Keys {
        fn poll_key(&mut self, _wait: Wait) -> Result<Option<Key>> {
            Ok(self.0.pop_front().flatten())
        }
    }

    fn stamp(secs: u64, nanos: u32) -> Timestamp {
        Timestamp { secs, nanos }
    }

    #[test]
    fn test_delta_ignores_whole_seconds() {
        assert_eq!(sub_second_delta(stamp(5, 100), stamp(5, 350)), 250);
        assert_eq!(sub_second_delta(stamp(5, 100), stamp(9, 350)), 250);
        assert_eq!(sub_second_delta(stamp(5, 900_000_000), stamp(6, 100_000_000)), 200_000_000);
        assert_eq!(sub_second_delta(stamp(5, 7), stamp(5, 7)), 0);
        assert_eq!(sub_second_delta(stamp(5, 999_999_999), stamp(6, 0)), 1);
    }

    #[test]
    fn test_slot_index() {
        assert_eq!(slot_index(250, 70), 40);
        assert_eq!(slot_index(999_999_999, 108), 999_999_999 % 108);
    }

    #[test]
    fn test_extract_takes_landing_slot() {
        let picker = TimedPicker::new(10, Duration::ZERO);
        let mut machine = Machine::new(70, 28, 5, 1, None).unwrap();
        let clock = StepClock::new(1_000, 3);

        let started = clock.now().unwrap();
        let drawn = picker.extract(&clock, started, &mut machine).unwrap();

        assert_eq!(drawn.slot, 3);
        assert_eq!(drawn.value, 4);
        assert_eq!(drawn.resamples, 0);
        assert_eq!(machine.pool()[3], EMPTY);
    }

    #[test]
    fn test_extract_rejects_empty_slots() {
        let picker = TimedPicker::new(10, Duration::ZERO);
        // Balls sit in slots 0..28; everything after is padding.
        let mut machine = Machine::new(70, 28, 5, 1, None).unwrap();
        let clock = StepClock::new(0, 1);

        let started = stamp(0, 0);
        clock.nanos.set(30);
        let drawn = picker.extract(&clock, started, &mut machine).unwrap();

        // Slots 30..70 are empty, so the clock keeps walking until it wraps to 0.
        assert_eq!(drawn.slot, 0);
        assert_eq!(drawn.value, 1);
        assert_eq!(drawn.resamples, 40);
    }

    #[test]
    fn test_draws_every_ball_once() {
        let picker = TimedPicker::new(10, Duration::ZERO);
        let mut machine = Machine::new(108, 23, 1, 0, None).unwrap();
        let clock = StepClock::new(123_456_789, 7_919);

        let mut seen = HashSet::new();
        for _ in 0..23 {
            let started = clock.now().unwrap();
            let drawn = picker.extract(&clock, started, &mut machine).unwrap();
            assert!((1..=23).contains(&drawn.value));
            assert!(seen.insert(drawn.value), "{} drawn twice", drawn.value);
        }

        assert_eq!(machine.remaining(), 0);
        let started = clock.now().unwrap();
        assert!(matches!(
            picker.extract(&clock, started, &mut machine),
            Err(GaraponError::Exhausted)
        ));
    }

    #[test]
    fn test_clock_failure_propagates() {
        let picker = TimedPicker::new(10, Duration::ZERO);
        let mut machine = Machine::new(10, 5, 1, 0, None).unwrap();
        let result = picker.extract(&BrokenClock, stamp(0, 0), &mut machine);
        assert!(matches!(result, Err(GaraponError::Clock(_))));
        assert_eq!(machine.remaining(), 5);
    }

    #[test]
    fn test_spin_stops_on_enter() {
        let picker = TimedPicker::new(108, Duration::ZERO);
        let mut keys = Keys(VecDeque::from(vec![None, Some(Key::Up), Some(Key::Enter)]));
        let mut frames = 0;

        let spin = picker
            .spin(&mut keys, || {
                frames += 1;
                Ok(())
            })
            .unwrap();

        assert_eq!(spin, Spin::Stopped);
        assert_eq!(frames, 3);
    }

    #[test]
    fn test_spin_quits() {
        let picker = TimedPicker::new(108, Duration::ZERO);
        let mut keys = Keys(VecDeque::from(vec![None, Some(Key::Quit)]));
        let spin = picker.spin(&mut keys, || Ok(())).unwrap();
        assert_eq!(spin, Spin::Quit);
    }

    #[test]
    fn test_spin_runs_out_of_patience() {
        let picker = TimedPicker::new(12, Duration::ZERO);
        let mut keys = Keys(VecDeque::new());
        let mut frames = 0;

        let spin = picker
            .spin(&mut keys, || {
                frames += 1;
                Ok(())
            })
            .unwrap();

        assert_eq!(spin, Spin::PatienceExhausted);
        assert_eq!(frames, 12);
    }
}
