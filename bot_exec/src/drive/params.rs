//! Parameters structure for the drive

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::time::Duration;

use crate::{ctrl::PidGains, params::ParamsError};
use hal_if::MAX_VOLTAGE_MV;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the drive abstraction and its blocking primitives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriveParams {

    // ---- GEOMETRY ----

    /// Units: inches
    pub wheel_diameter_in: f64,

    /// Number of motor revolutions per wheel revolution. A 600 rpm motor
    /// geared down to a 450 rpm wheel gives 1/0.75.
    pub motor_rot_per_wheel_rot: f64,

    /// Units: inches
    pub track_width_in: f64,

    // ---- ACTUATION ----

    /// Largest voltage magnitude ever commanded.
    ///
    /// Units: millivolts
    pub max_voltage_mv: i32,

    /// Optional rate limit on `tank` outputs. `None` disables slewing.
    ///
    /// Units: millivolts/second
    pub slew_rate_mv_per_s: Option<f64>,

    // ---- TIMING ----

    /// Period of the blocking control loops.
    ///
    /// Units: milliseconds
    pub tick_ms: u64,

    /// Units: milliseconds
    pub imu_poll_ms: u64,

    /// Longest time to wait for the heading sensor to calibrate.
    ///
    /// Units: milliseconds
    pub imu_calibration_timeout_ms: u64,

    // ---- CONTROLLERS ----

    pub turn: TurnParams,

    pub distance: DistanceParams,
}

/// Parameters for the turn-in-place primitive.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnParams {
    /// Gains on heading error.
    ///
    /// Units: millivolts/degree
    pub gains: PidGains,

    /// Units: degrees
    pub settle_error_deg: f64,

    /// Consecutive in-tolerance ticks needed to settle.
    pub settle_ticks: u32,

    /// Units: milliseconds
    pub timeout_ms: u64,
}

/// Parameters for the straight-line distance primitive.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceParams {
    /// Gains on distance error.
    ///
    /// Units: millivolts/inch
    pub gains: PidGains,

    /// Proportional heading hold gain.
    ///
    /// Units: millivolts/degree
    pub heading_k_p: f64,

    /// Units: inches
    pub settle_error_in: f64,

    /// Consecutive in-tolerance ticks needed to settle.
    pub settle_ticks: u32,

    /// Units: milliseconds
    pub timeout_ms: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            wheel_diameter_in: 2.75,
            motor_rot_per_wheel_rot: 1.0 / 0.75,
            track_width_in: 12.5,
            max_voltage_mv: MAX_VOLTAGE_MV,
            slew_rate_mv_per_s: None,
            tick_ms: 10,
            imu_poll_ms: 20,
            imu_calibration_timeout_ms: 3000,
            turn: TurnParams::default(),
            distance: DistanceParams::default(),
        }
    }
}

impl Default for TurnParams {
    fn default() -> Self {
        Self {
            gains: PidGains {
                k_p: 150.0,
                k_i: 0.0,
                k_d: 1.0,
                integral_limit: 1e9,
            },
            settle_error_deg: 1.0,
            settle_ticks: 10,
            timeout_ms: 2000,
        }
    }
}

impl Default for DistanceParams {
    fn default() -> Self {
        Self {
            gains: PidGains {
                k_p: 1000.0,
                k_i: 0.0,
                k_d: 10.0,
                integral_limit: 1e9,
            },
            heading_k_p: 150.0,
            settle_error_in: 0.5,
            settle_ticks: 10,
            timeout_ms: 3000,
        }
    }
}

impl DriveParams {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Tick period in seconds, as used for controller `dt`.
    pub fn tick_s(&self) -> f64 {
        util::time::millis_to_seconds(self.tick_ms)
    }

    /// Convert motor rotation into distance travelled by the wheel.
    ///
    /// Units: degrees -> inches
    pub fn inches_from_motor_deg(&self, motor_deg: f64) -> f64 {
        let motor_rot = motor_deg / 360.0;
        let wheel_rot = motor_rot / self.motor_rot_per_wheel_rot;
        wheel_rot * std::f64::consts::PI * self.wheel_diameter_in
    }

    /// Check the parameters describe a drivetrain the control loops can run.
    pub fn validate(&self) -> Result<(), ParamsError> {
        ParamsError::require_positive("drive.wheel_diameter_in", self.wheel_diameter_in)?;
        ParamsError::require_positive("drive.motor_rot_per_wheel_rot", self.motor_rot_per_wheel_rot)?;
        ParamsError::require_positive("drive.track_width_in", self.track_width_in)?;
        ParamsError::require_positive("drive.tick_ms", self.tick_ms as f64)?;
        ParamsError::require_positive("drive.imu_poll_ms", self.imu_poll_ms as f64)?;

        if self.max_voltage_mv <= 0 || self.max_voltage_mv > MAX_VOLTAGE_MV {
            return Err(ParamsError::OutOfRange {
                name: "drive.max_voltage_mv",
                value: self.max_voltage_mv as f64,
            });
        }

        if let Some(rate) = self.slew_rate_mv_per_s {
            ParamsError::require_positive("drive.slew_rate_mv_per_s", rate)?;
        }

        ParamsError::require_positive("drive.turn.settle_error_deg", self.turn.settle_error_deg)?;
        ParamsError::require_positive("drive.turn.timeout_ms", self.turn.timeout_ms as f64)?;
        ParamsError::require_positive("drive.distance.settle_error_in", self.distance.settle_error_in)?;
        ParamsError::require_positive("drive.distance.timeout_ms", self.distance.timeout_ms as f64)?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_inches_from_motor_deg() {
        let params = DriveParams::default();

        // One wheel revolution takes 480 degrees of motor rotation
        let circumference = std::f64::consts::PI * 2.75;
        assert!((params.inches_from_motor_deg(480.0) - circumference).abs() < 1e-9);
        assert!((params.inches_from_motor_deg(-240.0) + 0.5 * circumference).abs() < 1e-9);
    }

    #[test]
    fn test_defaults_valid() {
        assert!(DriveParams::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let mut params = DriveParams::default();
        params.tick_ms = 0;
        assert!(params.validate().is_err());

        let mut params = DriveParams::default();
        params.max_voltage_mv = 20000;
        assert!(params.validate().is_err());

        let mut params = DriveParams::default();
        params.slew_rate_mv_per_s = Some(0.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let params: DriveParams = util::params::from_str(
            "track_width_in = 11.0\n\
             slew_rate_mv_per_s = 30000.0\n\
             [turn]\n\
             settle_error_deg = 2.0\n\
             settle_ticks = 5\n\
             timeout_ms = 1500\n\
             [turn.gains]\n\
             k_p = 200.0\n"
        ).unwrap();

        assert_eq!(params.track_width_in, 11.0);
        assert_eq!(params.slew_rate_mv_per_s, Some(30000.0));
        assert_eq!(params.turn.gains.k_p, 200.0);
        assert_eq!(params.turn.gains.k_d, 0.0);
        assert_eq!(params.turn.settle_ticks, 5);
        assert_eq!(params.wheel_diameter_in, 2.75);
        assert_eq!(params.distance.settle_ticks, 10);
    }
}
