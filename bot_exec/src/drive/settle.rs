//! Settle detection and exit handling shared by the blocking primitives

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;

use super::Drive;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Counts consecutive in-tolerance ticks.
///
/// A single out-of-tolerance tick resets the count, so a primitive only
/// settles once it has stayed within tolerance for the whole dwell.
#[derive(Debug, Clone)]
pub struct Dwell {
    required: u32,
    count: u32,
}

/// Report on how a blocking primitive finished.
///
/// The robot is left stationary either way, callers that don't care can
/// ignore it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MotionOutcome {
    /// True if the primitive settled, false if it timed out.
    pub settled: bool,

    /// Number of control ticks run.
    pub ticks: u32,
}

/// Commands zero voltage to both sides when dropped.
///
/// Held for the duration of every blocking primitive so that the drive is
/// stopped however the loop is left, including by a panic.
pub struct StopGuard<'a> {
    drive: &'a Drive,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Dwell {
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            count: 0,
        }
    }

    /// Record one tick. Returns true once the required number of
    /// consecutive in-tolerance ticks has been seen.
    pub fn update(&mut self, in_tolerance: bool) -> bool {
        if in_tolerance {
            self.count += 1;
        } else {
            self.count = 0;
        }

        self.count >= self.required
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl MotionOutcome {
    pub fn settled(ticks: u32) -> Self {
        Self { settled: true, ticks }
    }

    pub fn timed_out(ticks: u32) -> Self {
        Self { settled: false, ticks }
    }
}

impl<'a> StopGuard<'a> {
    pub fn new(drive: &'a Drive) -> Self {
        Self { drive }
    }
}

impl<'a> Drop for StopGuard<'a> {
    fn drop(&mut self) {
        trace!("Stopping drive");
        self.drive.set_voltage(0, 0);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dwell_requires_consecutive() {
        let mut dwell = Dwell::new(3);

        assert!(!dwell.update(true));
        assert!(!dwell.update(true));
        assert!(!dwell.update(false));
        assert_eq!(dwell.count(), 0);

        assert!(!dwell.update(true));
        assert!(!dwell.update(true));
        assert!(dwell.update(true));
    }

    #[test]
    fn test_dwell_zero_is_one() {
        let mut dwell = Dwell::new(0);
        assert!(!dwell.update(false));
        assert!(dwell.update(true));
    }
}
