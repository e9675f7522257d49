//! PID controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use hal_if::MAX_VOLTAGE_MV;
use util::maths::clamp_abs;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Integral limit used when none is configured, effectively unbounded.
pub const DEFAULT_INTEGRAL_LIMIT: f64 = 1e9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller with output and integral saturation.
#[derive(Debug, Clone)]
pub struct Pid {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// The integral accumulation
    integral: f64,

    /// Previous error, `None` until the first step of a session
    prev_error: Option<f64>,

    /// Absolute limit on the output
    output_limit: f64,

    /// Absolute limit on the integral accumulation
    integral_limit: f64,
}

/// Gains and limits for a [`Pid`] as they appear in parameter files.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub k_p: f64,

    #[serde(default)]
    pub k_i: f64,

    #[serde(default)]
    pub k_d: f64,

    /// Absolute limit on the integral accumulation.
    #[serde(default = "default_integral_limit")]
    pub integral_limit: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pid {

    /// Create a new controller with the given gains.
    ///
    /// The output is limited to the motor voltage envelope until
    /// `set_output_limit` is called.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p, k_i, k_d,
            integral: 0f64,
            prev_error: None,
            output_limit: MAX_VOLTAGE_MV as f64,
            integral_limit: DEFAULT_INTEGRAL_LIMIT,
        }
    }

    /// Create a new controller from a set of parameter gains.
    pub fn from_gains(gains: &PidGains) -> Self {
        let mut pid = Self::new(gains.k_p, gains.k_i, gains.k_d);
        pid.set_integral_limit(gains.integral_limit);
        pid
    }

    pub fn set_output_limit(&mut self, max_abs: f64) {
        self.output_limit = max_abs.abs();
    }

    pub fn set_integral_limit(&mut self, max_abs: f64) {
        self.integral_limit = max_abs.abs();
    }

    /// Clear the accumulated state so the controller can be reused for an
    /// independent session.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn prev_error(&self) -> Option<f64> {
        self.prev_error
    }

    /// Step the controller.
    ///
    /// A non-positive (or NaN) `dt` returns zero and leaves the controller
    /// untouched.
    ///
    /// Units: `dt` in seconds, output in the units of the gains
    pub fn step(&mut self, target: f64, current: f64, dt: f64) -> f64 {
        if !(dt > 0f64) {
            return 0f64;
        }

        let error = target - current;

        // Accumulate and saturate the integral term
        self.integral = clamp_abs(self.integral + error * dt, self.integral_limit);

        // There's no meaningful previous error on the first step, so the
        // derivative is held at zero rather than spiking.
        let deriv = match self.prev_error {
            Some(e) => (error - e) / dt,
            None => 0f64
        };

        self.prev_error = Some(error);

        let out = 
            self.k_p * error 
            + self.k_i * self.integral 
            + self.k_d * deriv;

        clamp_abs(out, self.output_limit)
    }
}

fn default_integral_limit() -> f64 {
    DEFAULT_INTEGRAL_LIMIT
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_output_bounded() {
        let mut pid = Pid::new(900.0, 50.0, 30.0);
        pid.set_output_limit(12000.0);

        let values = [-1e6, -500.0, -3.0, 0.0, 0.25, 7.0, 180.0, 1e6];
        let dts = [1e-4, 0.01, 0.5, 3.0];

        for &t in values.iter() {
            for &c in values.iter() {
                for &dt in dts.iter() {
                    let out = pid.step(t, c, dt);
                    assert!(out.abs() <= 12000.0, "t={} c={} dt={} out={}", t, c, dt, out);
                }
            }
        }
    }

    #[test]
    fn test_non_positive_dt_is_noop() {
        let mut pid = Pid::new(1.0, 1.0, 1.0);
        pid.step(10.0, 0.0, 0.01);
        let integral = pid.integral();
        let prev_error = pid.prev_error();

        assert_eq!(pid.step(50.0, 0.0, 0.0), 0.0);
        assert_eq!(pid.step(50.0, 0.0, -0.01), 0.0);
        assert_eq!(pid.step(50.0, 0.0, std::f64::NAN), 0.0);

        assert_eq!(pid.integral(), integral);
        assert_eq!(pid.prev_error(), prev_error);
    }

    #[test]
    fn test_first_step_has_no_derivative() {
        // Pure derivative controller, the first step must output nothing
        let mut pid = Pid::new(0.0, 0.0, 10.0);
        assert_eq!(pid.step(5.0, 0.0, 0.01), 0.0);

        // The error shrinks by 1 over 0.01 s on the next step
        let out = pid.step(5.0, 1.0, 0.01);
        assert!((out - (-1000.0)).abs() < 1e-6);
    }

    #[test]
    fn test_integral_limit() {
        let mut pid = Pid::new(0.0, 1.0, 0.0);
        pid.set_integral_limit(2.0);

        for _ in 0..100 {
            pid.step(10.0, 0.0, 0.1);
        }

        assert_eq!(pid.integral(), 2.0);
        assert_eq!(pid.step(10.0, 0.0, 0.1), 2.0);
    }

    #[test]
    fn test_reset_matches_fresh() {
        let mut used = Pid::new(120.0, 4.0, 9.0);
        for i in 0..20 {
            used.step(90.0, i as f64 * 3.0, 0.01);
        }
        used.reset();

        let mut fresh = Pid::new(120.0, 4.0, 9.0);

        assert_eq!(used.step(45.0, 10.0, 0.01), fresh.step(45.0, 10.0, 0.01));
        assert_eq!(used.step(45.0, 12.0, 0.01), fresh.step(45.0, 12.0, 0.01));
    }

    #[test]
    fn test_gains_from_toml() {
        let gains: PidGains = util::params::from_str("k_p = 150.0\nk_d = 6.0").unwrap();
        assert_eq!(gains.k_i, 0.0);
        assert_eq!(gains.integral_limit, DEFAULT_INTEGRAL_LIMIT);

        let mut pid = Pid::from_gains(&gains);
        assert_eq!(pid.step(1.0, 0.0, 0.01), 150.0);
    }
}
