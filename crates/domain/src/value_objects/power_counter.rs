//! Power counter - bounded use counter shown as the effect's badge.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Remaining uses of a starsign power.
///
/// # Invariants
///
/// - `max >= 1`
/// - `current <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPowerCounter", into = "RawPowerCounter")]
pub struct PowerCounter {
    current: u32,
    max: u32,
}

/// Outcome of a successful decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decremented {
    pub remaining: u32,
    pub exhausted: bool,
}

impl PowerCounter {
    pub fn new(current: u32, max: u32) -> Result<Self, DomainError> {
        if max == 0 {
            return Err(DomainError::validation("Power counter max must be positive"));
        }
        if current > max {
            return Err(DomainError::validation(format!(
                "Power counter current ({current}) cannot exceed max ({max})"
            )));
        }
        Ok(Self { current, max })
    }

    /// A full counter. A zero `max` is raised to 1.
    pub fn full(max: u32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// Whether the badge icon should be shown.
    pub fn is_visible(&self) -> bool {
        self.current > 0
    }

    /// Spend one use.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Exhausted` and leaves the counter unchanged when
    /// no uses remain.
    pub fn decrement(&mut self) -> Result<Decremented, DomainError> {
        if self.current == 0 {
            return Err(DomainError::exhausted(self.max));
        }
        self.current -= 1;
        Ok(Decremented {
            remaining: self.current,
            exhausted: self.current == 0,
        })
    }

    /// Restore to `max`. Returns `false` (no-op) when already full.
    pub fn reset(&mut self) -> bool {
        if self.current >= self.max {
            return false;
        }
        self.current = self.max;
        true
    }
}

#[derive(Serialize, Deserialize)]
struct RawPowerCounter {
    #[serde(alias = "value")]
    current: u32,
    max: u32,
}

impl TryFrom<RawPowerCounter> for PowerCounter {
    type Error = DomainError;

    fn try_from(raw: RawPowerCounter) -> Result<Self, Self::Error> {
        Self::new(raw.current, raw.max)
    }
}

impl From<PowerCounter> for RawPowerCounter {
    fn from(counter: PowerCounter) -> Self {
        Self {
            current: counter.current,
            max: counter.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariants_are_enforced() {
        assert!(PowerCounter::new(0, 0).is_err());
        assert!(PowerCounter::new(4, 3).is_err());
        assert!(PowerCounter::new(0, 3).is_ok());
        assert_eq!(PowerCounter::full(0), PowerCounter::full(1));
    }

    #[test]
    fn decrement_to_zero_reports_exhaustion() {
        let mut counter = PowerCounter::new(1, 3).unwrap();
        let outcome = counter.decrement().unwrap();
        assert_eq!(outcome, Decremented { remaining: 0, exhausted: true });
        assert_eq!(counter.current(), 0);
        assert!(!counter.is_visible());
    }

    #[test]
    fn decrement_at_zero_leaves_state_unchanged() {
        let mut counter = PowerCounter::new(0, 3).unwrap();
        let err = counter.decrement().unwrap_err();
        assert_eq!(err, DomainError::Exhausted { max: 3 });
        assert_eq!(counter, PowerCounter::new(0, 3).unwrap());
    }

    #[test]
    fn reset_restores_max_only_when_below() {
        let mut counter = PowerCounter::new(1, 3).unwrap();
        counter.decrement().unwrap();
        assert!(counter.reset());
        assert_eq!(counter.current(), 3);
        assert!(!counter.reset());
        assert_eq!(counter.current(), 3);
    }

    #[test]
    fn deserializes_host_badge_shape() {
        let counter: PowerCounter = serde_json::from_str(r#"{"value":2,"max":3}"#).unwrap();
        assert_eq!(counter, PowerCounter::new(2, 3).unwrap());

        let invalid: Result<PowerCounter, _> = serde_json::from_str(r#"{"value":5,"max":3}"#);
        assert!(invalid.is_err());
    }
}
