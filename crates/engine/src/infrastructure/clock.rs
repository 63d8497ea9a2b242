//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: u64, max: u64) -> u64 {
        use rand::Rng;
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing. Rolls are clamped into the requested range.
#[cfg(test)]
pub struct FixedRandom(pub u64);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: u64, max: u64) -> u64 {
        self.0.clamp(min, max.max(min))
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::nil()
    }
}

/// Test random that cycles through a list of rolls and hands out distinct ids.
#[cfg(test)]
pub struct SequenceRandom {
    rolls: Vec<u64>,
    calls: std::sync::atomic::AtomicU64,
    ids: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(rolls: impl Into<Vec<u64>>) -> Self {
        Self {
            rolls: rolls.into(),
            calls: Default::default(),
            ids: Default::default(),
        }
    }
}

#[cfg(test)]
impl RandomPort for SequenceRandom {
    fn gen_range(&self, min: u64, max: u64) -> u64 {
        use std::sync::atomic::Ordering;
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let roll = match self.rolls.len() as u64 {
            0 => min,
            len => self.rolls[(call % len) as usize],
        };
        roll.clamp(min, max.max(min))
    }

    fn gen_uuid(&self) -> Uuid {
        use std::sync::atomic::Ordering;
        Uuid::from_u128(u128::from(self.ids.fetch_add(1, Ordering::Relaxed)) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_range() {
        let random = SystemRandom::new();
        for _ in 0..100 {
            let roll = random.gen_range(3, 5);
            assert!((3..=5).contains(&roll));
        }
        assert_eq!(random.gen_range(7, 7), 7);
    }

    #[test]
    fn sequence_random_cycles_rolls_and_ids() {
        let random = SequenceRandom::new([0, 5]);
        assert_eq!(random.gen_range(0, 9), 0);
        assert_eq!(random.gen_range(0, 3), 3);
        assert_eq!(random.gen_range(0, 9), 0);
        assert_ne!(random.gen_uuid(), random.gen_uuid());
    }

    #[test]
    fn fixed_random_clamps() {
        assert_eq!(FixedRandom(10).gen_range(0, 3), 3);
        assert_eq!(FixedRandom(0).gen_range(2, 3), 2);
    }
}
