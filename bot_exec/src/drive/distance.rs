//! Straight line distance primitive

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};

// Internal
use super::{Drive, Dwell, MotionOutcome};
use crate::ctrl::Pid;
use util::maths::angle_error_deg;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Drive {

    /// Drive straight for the given distance, blocking until settled or
    /// timed out.
    ///
    /// The heading is held at `heading_hold_deg`, or at the heading when
    /// called if `None`. Negative distances drive backwards. The encoders
    /// are tared at the start and the drive is stopped on return.
    ///
    /// Units: inches, degrees
    pub fn drive_distance(&self, inches: f64, heading_hold_deg: Option<f64>) -> MotionOutcome {
        let params = &self.params.distance;
        let tick = self.params.tick();
        let dt = self.params.tick_s();

        let hold_deg = heading_hold_deg.unwrap_or_else(|| self.heading_deg());

        let mut pid = Pid::from_gains(&params.gains);
        pid.set_output_limit(self.params.max_voltage_mv as f64);
        let mut dwell = Dwell::new(params.settle_ticks);

        let _stop = self.stop_guard();

        debug!("Driving {:.2} in holding {:.2} deg", inches, hold_deg);
        self.tare_encoders();

        let mut elapsed_ms = 0;
        let mut ticks = 0;

        loop {
            ticks += 1;

            let traveled_in = self.traveled_in();
            let error_in = inches - traveled_in;

            if dwell.update(error_in.abs() < params.settle_error_in) {
                info!(
                    "Drive settled at {:.2} in after {} ms",
                    traveled_in, elapsed_ms
                );
                return MotionOutcome::settled(ticks);
            }

            if elapsed_ms >= params.timeout_ms {
                warn!(
                    "Drive of {:.2} in timed out with {:.2} in of error",
                    inches, error_in
                );
                return MotionOutcome::timed_out(ticks);
            }

            let forward_mv = pid.step(inches, traveled_in, dt);
            let heading_err_deg = angle_error_deg(hold_deg, self.heading_deg());
            let correction_mv = params.heading_k_p * heading_err_deg;

            trace!(
                "distance: error {:.3} in, heading error {:.3} deg, forward {:.0} mV, correction {:.0} mV",
                error_in, heading_err_deg, forward_mv, correction_mv
            );

            self.set_voltage(
                (forward_mv + correction_mv) as i32,
                (forward_mv - correction_mv) as i32,
            );

            self.delay().delay(tick);
            elapsed_ms += self.params.tick_ms;
        }
    }

    /// Mean travel of both sides since the encoders were last tared.
    ///
    /// Units: inches
    fn traveled_in(&self) -> f64 {
        let left = self.inches_from_motor_deg(self.left_motor_deg());
        let right = self.inches_from_motor_deg(self.right_motor_deg());
        0.5 * (left + right)
    }
}

#[cfg(test)]
mod test {
    use crate::drive::{fixture::sim_drive, DriveParams};
    use crate::sim::TruePose;
    use util::maths::angle_error_deg;

    #[test]
    fn test_drive_forward() {
        let (rig, _delay, drive) = sim_drive(DriveParams::default());

        let outcome = drive.drive_distance(24.0, None);

        assert!(outcome.settled);
        let pose = rig.world.true_pose();
        assert!((pose.x - 24.0).abs() < 0.5, "x = {}", pose.x);
        assert!(pose.y.abs() < 1e-6);
        assert_eq!(rig.world.side_voltages(), (0.0, 0.0));
    }

    #[test]
    fn test_drive_backward() {
        let (rig, _delay, drive) = sim_drive(DriveParams::default());

        let outcome = drive.drive_distance(-12.0, None);

        assert!(outcome.settled);
        assert!((rig.world.true_pose().x + 12.0).abs() < 0.5);
    }

    #[test]
    fn test_drive_corrects_heading() {
        let (rig, _delay, drive) = sim_drive(DriveParams::default());

        // Start 10 degrees off the heading to hold
        rig.world.place(TruePose {
            heading_rad: 10f64.to_radians(),
            ..TruePose::default()
        });

        let outcome = drive.drive_distance(36.0, Some(0.0));

        assert!(outcome.settled);
        assert!(angle_error_deg(0.0, drive.heading_deg()).abs() < 10.0);
    }

    #[test]
    fn test_drive_times_out_when_stalled() {
        let (rig, _delay, drive) = sim_drive(DriveParams::default());
        rig.world.set_stalled(true);

        let outcome = drive.drive_distance(24.0, None);

        assert!(!outcome.settled);
        assert!((rig.world.time_s() - 3.0).abs() < 1e-6);
        assert_eq!(rig.world.side_voltages(), (0.0, 0.0));
    }
}
