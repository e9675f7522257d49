//! # Driver control
//!
//! Maps the gamepad sticks onto arcade drive: left stick Y drives forward
//! and back, right stick X turns.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

// Internal
use crate::{
    drive::{Drive, MAX_PCT},
    params::ParamsError,
};
use hal_if::{eqpt::gamepad::AXIS_MAX, Axis, Gamepad};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for driver control.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverParams {
    pub forward_axis: Axis,

    pub turn_axis: Axis,

    /// Stick readings smaller than this are treated as zero.
    ///
    /// Units: axis counts
    pub deadband: i32,
}

/// Driver control loop.
pub struct DriverControl {
    drive: Arc<Drive>,
    gamepad: Arc<dyn Gamepad>,
    params: DriverParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            forward_axis: Axis::LeftY,
            turn_axis: Axis::RightX,
            deadband: 5,
        }
    }
}

impl DriverParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.deadband < 0 || self.deadband > AXIS_MAX {
            return Err(ParamsError::OutOfRange {
                name: "driver.deadband",
                value: self.deadband as f64,
            });
        }

        Ok(())
    }
}

impl DriverControl {
    pub fn new(drive: Arc<Drive>, gamepad: Arc<dyn Gamepad>, params: DriverParams) -> Self {
        Self {
            drive,
            gamepad,
            params,
        }
    }

    /// Read the sticks once and command the drive.
    pub fn step(&self) {
        let forward = self.axis_pct(self.params.forward_axis);
        let turn = self.axis_pct(self.params.turn_axis);

        self.drive.arcade(forward, turn);
    }

    /// Run driver control for the given duration, stopping the drive at the
    /// end.
    pub fn run_for(&self, duration: Duration) {
        let tick = self.drive.params().tick();
        let tick_ms = self.drive.params().tick_ms;
        let duration_ms = duration.as_millis() as u64;

        let _stop = self.drive.stop_guard();

        info!("Driver control for {:?}", duration);

        let mut elapsed_ms = 0;
        while elapsed_ms < duration_ms {
            self.step();
            self.drive.delay().delay(tick);
            elapsed_ms += tick_ms;
        }

        debug!("Driver control finished");
    }

    /// Read an axis as a percentage of full deflection.
    fn axis_pct(&self, axis: Axis) -> i32 {
        let value = self.gamepad.axis_value(axis).max(-AXIS_MAX).min(AXIS_MAX);

        if value.abs() < self.params.deadband {
            0
        } else {
            value * MAX_PCT / AXIS_MAX
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        drive::{fixture::sim_drive, DriveParams},
        sim::{SimDelay, SimGamepad, SimRig},
    };
    use std::sync::Mutex;

    fn driver() -> (SimRig, DriverControl) {
        let (rig, _delay, driver) = driver_with(DriveParams::default());
        (rig, driver)
    }

    fn driver_with(params: DriveParams) -> (SimRig, Arc<SimDelay>, DriverControl) {
        let (rig, delay, drive) = sim_drive(params);
        let driver = DriverControl::new(
            Arc::new(drive),
            rig.gamepad.clone() as Arc<dyn Gamepad>,
            DriverParams::default(),
        );
        (rig, delay, driver)
    }

    fn pad(rig: &SimRig) -> &SimGamepad {
        &rig.gamepad
    }

    #[test]
    fn test_deadband() {
        let (rig, driver) = driver();

        pad(&rig).set_axis(Axis::LeftY, 4);
        pad(&rig).set_axis(Axis::RightX, -4);
        driver.step();
        assert_eq!(rig.world.side_voltages(), (0.0, 0.0));

        // At the deadband the stick counts: 5 * 100 / 127 = 3 %
        pad(&rig).set_axis(Axis::LeftY, 5);
        driver.step();
        assert_eq!(rig.world.side_voltages(), (360.0, 360.0));
    }

    #[test]
    fn test_full_stick() {
        let (rig, driver) = driver();

        pad(&rig).set_axis(Axis::LeftY, 127);
        driver.step();
        assert_eq!(rig.world.side_voltages(), (12000.0, 12000.0));

        pad(&rig).set_axis(Axis::LeftY, -127);
        driver.step();
        assert_eq!(rig.world.side_voltages(), (-12000.0, -12000.0));
    }

    #[test]
    fn test_turn_mixing() {
        let (rig, driver) = driver();

        // 64 counts is 50 %, 127 counts is 100 %
        pad(&rig).set_axis(Axis::LeftY, 64);
        pad(&rig).set_axis(Axis::RightX, 127);
        driver.step();

        // left = 150 % clamped, right = -50 %
        assert_eq!(rig.world.side_voltages(), (12000.0, -6000.0));
    }

    #[test]
    fn test_run_for_stops() {
        let (rig, driver) = driver();

        pad(&rig).set_axis(Axis::LeftY, 100);
        driver.run_for(Duration::from_millis(500));

        assert!(rig.world.true_pose().x > 0.0);
        assert_eq!(rig.world.side_voltages(), (0.0, 0.0));
        assert!((rig.world.time_s() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_run_for_slews_each_tick() {
        let mut params = DriveParams::default();
        params.slew_rate_mv_per_s = Some(24000.0);
        let (rig, delay, driver) = driver_with(params);

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let world = rig.world.clone();
            let seen = seen.clone();
            delay.on_tick(move || seen.lock().unwrap().push(world.side_voltages()));
        }

        pad(&rig).set_axis(Axis::LeftY, 127);
        driver.run_for(Duration::from_millis(1000));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 100);

        // One tick of 24000 mV/s is 240 mV
        let mut prev = 0.0;
        for (i, &(left, right)) in seen.iter().enumerate() {
            assert_eq!(left, right);
            assert!(left - prev <= 240.0 && left >= prev, "tick {}: {} -> {}", i, prev, left);
            prev = left;
        }
        assert_eq!(seen[0].0, 240.0);
        assert_eq!(seen[49].0, 12000.0);
        assert_eq!(seen[99].0, 12000.0);

        // Stopped at the end, and the next session ramps up from rest
        assert_eq!(rig.world.side_voltages(), (0.0, 0.0));
        driver.step();
        assert_eq!(rig.world.side_voltages(), (240.0, 240.0));
    }

    #[test]
    fn test_deadband_validated() {
        let mut params = DriverParams::default();
        params.deadband = -1;
        assert!(params.validate().is_err());
        assert!(DriverParams::default().validate().is_ok());
    }
}
