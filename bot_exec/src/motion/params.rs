//! Parameters structure for point-to-point motion

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::time::Duration;

use crate::params::ParamsError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for point-to-point motion.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// Gain on distance to target.
    ///
    /// Units: millivolts/inch
    pub k_dist: f64,

    /// Gain on heading error to the target bearing.
    ///
    /// Units: millivolts/radian
    pub k_turn: f64,

    /// Units: milliseconds
    pub tick_ms: u64,

    /// Units: milliseconds
    pub timeout_ms: u64,

    /// Units: inches
    pub settle_dist_in: f64,

    /// Units: radians
    pub settle_heading_rad: f64,

    /// Consecutive in-tolerance ticks needed to settle.
    pub settle_ticks: u32,

    /// Pause between the legs of a multi-point move.
    ///
    /// Units: milliseconds
    pub leg_pause_ms: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            k_dist: 600.0,
            k_turn: 4000.0,
            tick_ms: 10,
            timeout_ms: 4000,
            settle_dist_in: 1.0,
            settle_heading_rad: 0.08,
            settle_ticks: 20,
            leg_pause_ms: 200,
        }
    }
}

impl MotionParams {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        ParamsError::require_positive("motion.k_dist", self.k_dist)?;
        ParamsError::require_positive("motion.k_turn", self.k_turn)?;
        ParamsError::require_positive("motion.tick_ms", self.tick_ms as f64)?;
        ParamsError::require_positive("motion.timeout_ms", self.timeout_ms as f64)?;
        ParamsError::require_positive("motion.settle_dist_in", self.settle_dist_in)?;
        ParamsError::require_positive("motion.settle_heading_rad", self.settle_heading_rad)?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = MotionParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.settle_ticks, 20);
    }

    #[test]
    fn test_from_toml() {
        let params: MotionParams = util::params::from_str("k_dist = 450.0\ntimeout_ms = 2500\n")
            .unwrap();

        assert_eq!(params.k_dist, 450.0);
        assert_eq!(params.timeout_ms, 2500);
        assert_eq!(params.k_turn, 4000.0);
    }

    #[test]
    fn test_validate_rejects() {
        let mut params = MotionParams::default();
        params.settle_heading_rad = -0.1;
        assert!(params.validate().is_err());
    }
}
