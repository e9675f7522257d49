//! Drive state and direct actuation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

// Internal
use super::{DriveParams, StopGuard, MAX_PCT, MOTORS_PER_SIDE};
use crate::ctrl::Slew;
use hal_if::{BrakeMode, Delay, HeadingSensor, Motor};
use util::maths::wrap_360;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The drivetrain: three motors on each side plus the heading sensor.
///
/// All methods take `&self` so the drive can be shared between the
/// odometry thread and the thread running the active control primitive.
pub struct Drive {
    left: [Box<dyn Motor>; MOTORS_PER_SIDE],
    right: [Box<dyn Motor>; MOTORS_PER_SIDE],
    imu: Box<dyn HeadingSensor>,
    delay: Arc<dyn Delay>,

    pub(crate) params: DriveParams,

    /// Rate limiters on the `tank` outputs, only present if slewing is
    /// enabled.
    slew: Option<Mutex<TankSlew>>,
}

/// Per-side rate limiters, always holding the voltage last applied to each
/// side.
struct TankSlew {
    left: Slew,
    right: Slew,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Drive {

    /// Create a new drive from its hardware handles.
    pub fn new(
        left: [Box<dyn Motor>; MOTORS_PER_SIDE],
        right: [Box<dyn Motor>; MOTORS_PER_SIDE],
        imu: Box<dyn HeadingSensor>,
        delay: Arc<dyn Delay>,
        params: DriveParams,
    ) -> Self {
        let slew = params.slew_rate_mv_per_s.map(|rate| {
            Mutex::new(TankSlew {
                left: Slew::new(rate),
                right: Slew::new(rate),
            })
        });

        Self {
            left,
            right,
            imu,
            delay,
            params,
            slew,
        }
    }

    pub fn params(&self) -> &DriveParams {
        &self.params
    }

    /// The delay source all drive loops sleep through.
    pub fn delay(&self) -> &Arc<dyn Delay> {
        &self.delay
    }

    // ---- SENSING ----

    /// Mean rotation of the left motors since they were last tared.
    ///
    /// Units: degrees
    pub fn left_motor_deg(&self) -> f64 {
        mean_position_deg(&self.left)
    }

    /// Mean rotation of the right motors since they were last tared.
    ///
    /// Units: degrees
    pub fn right_motor_deg(&self) -> f64 {
        mean_position_deg(&self.right)
    }

    /// Current heading in the range [0, 360).
    ///
    /// Units: degrees
    pub fn heading_deg(&self) -> f64 {
        wrap_360(self.imu.heading_deg())
    }

    /// Zero the position of every drive motor.
    pub fn tare_encoders(&self) {
        for motor in self.left.iter().chain(self.right.iter()) {
            motor.tare();
        }
    }

    /// Convert motor rotation to wheel travel using the drive geometry.
    ///
    /// Units: degrees -> inches
    pub fn inches_from_motor_deg(&self, motor_deg: f64) -> f64 {
        self.params.inches_from_motor_deg(motor_deg)
    }

    // ---- ACTUATION ----

    /// Apply a voltage to each side of the drive.
    ///
    /// Demands are clamped to the voltage envelope. The `tank` rate limiters
    /// are reseeded with the applied voltages, so slewing resumes from what
    /// the motors were last given rather than from an older `tank` demand.
    ///
    /// Units: millivolts
    pub fn set_voltage(&self, left_mv: i32, right_mv: i32) {
        let slew = match self.slew {
            Some(ref s) => s,
            None => {
                self.apply_voltage(left_mv, right_mv);
                return;
            }
        };

        let mut slew = slew.lock().unwrap_or_else(PoisonError::into_inner);
        let (left_mv, right_mv) = self.apply_voltage(left_mv, right_mv);

        slew.left.reset(left_mv as f64);
        slew.right.reset(right_mv as f64);
    }

    /// Drive each side at a percentage of full voltage.
    ///
    /// If a slew rate is configured each call moves the voltages by at most
    /// one drive tick's worth of the rate. Callers are expected to call this
    /// once per tick.
    pub fn tank(&self, left_pct: i32, right_pct: i32) {
        let max = self.params.max_voltage_mv;
        let left_mv = left_pct * max / MAX_PCT;
        let right_mv = right_pct * max / MAX_PCT;

        let slew = match self.slew {
            Some(ref s) => s,
            None => {
                self.apply_voltage(left_mv, right_mv);
                return;
            }
        };

        // Held across the apply so steps and reseeds stay in motor order
        let mut slew = slew.lock().unwrap_or_else(PoisonError::into_inner);
        let dt = self.params.tick_s();

        let left_mv = slew.left.step(left_mv as f64, dt) as i32;
        let right_mv = slew.right.step(right_mv as f64, dt) as i32;

        self.apply_voltage(left_mv, right_mv);
    }

    /// Drive with a forward and a turn percentage.
    ///
    /// Each side is clamped to [-100, 100] before being passed to `tank`.
    pub fn arcade(&self, forward_pct: i32, turn_pct: i32) {
        let left = (forward_pct + turn_pct).max(-MAX_PCT).min(MAX_PCT);
        let right = (forward_pct - turn_pct).max(-MAX_PCT).min(MAX_PCT);

        self.tank(left, right);
    }

    /// Set the brake mode of every drive motor, `Hold` if enabled otherwise
    /// `Coast`.
    pub fn brake_hold(&self, enabled: bool) {
        let mode = if enabled { BrakeMode::Hold } else { BrakeMode::Coast };
        debug!("Setting drive brake mode to {:?}", mode);

        for motor in self.left.iter().chain(self.right.iter()) {
            motor.set_brake_mode(mode);
        }
    }

    /// A guard which stops the drive when it goes out of scope.
    pub fn stop_guard(&self) -> StopGuard<'_> {
        StopGuard::new(self)
    }

    /// Clamp and apply a voltage to each side, returning what was applied.
    /// Every actuation command ends up here.
    fn apply_voltage(&self, left_mv: i32, right_mv: i32) -> (i32, i32) {
        let max = self.params.max_voltage_mv;
        let left_mv = left_mv.max(-max).min(max);
        let right_mv = right_mv.max(-max).min(max);

        for motor in self.left.iter() {
            motor.apply_voltage(left_mv);
        }
        for motor in self.right.iter() {
            motor.apply_voltage(right_mv);
        }

        (left_mv, right_mv)
    }

    // ---- CALIBRATION ----

    /// Calibrate the heading sensor, blocking until it's done.
    ///
    /// Calibration is bounded by the configured timeout so start-up can't
    /// hang on a faulty sensor. Returns true if calibration completed.
    pub fn calibrate_imu(&self) -> bool {
        let poll = Duration::from_millis(self.params.imu_poll_ms);
        let timeout_ms = self.params.imu_calibration_timeout_ms;

        info!("Calibrating heading sensor");
        self.imu.calibrate();

        let mut elapsed_ms = 0;
        while self.imu.is_calibrating() {
            if elapsed_ms >= timeout_ms {
                warn!(
                    "Heading sensor still calibrating after {} ms, continuing anyway",
                    elapsed_ms
                );
                return false;
            }

            self.delay.delay(poll);
            elapsed_ms += self.params.imu_poll_ms;
        }

        info!("Heading sensor calibrated in {} ms", elapsed_ms);
        true
    }
}

fn mean_position_deg(motors: &[Box<dyn Motor>; MOTORS_PER_SIDE]) -> f64 {
    motors.iter().map(|m| m.position_deg()).sum::<f64>() / MOTORS_PER_SIDE as f64
}
