//! Point-to-point motion controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use nalgebra::Vector2;
use std::{sync::Arc, time::Duration};

// Internal
use super::MotionParams;
use crate::{
    drive::{Drive, Dwell, MotionOutcome},
    loc::{Odom, Pose},
};
use util::maths::{clamp_abs, wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drives the robot to points on the field using the odometry pose.
pub struct Motion {
    drive: Arc<Drive>,
    odom: Arc<Odom>,
    params: MotionParams,
}

/// The command computed for a single tick of point-to-point motion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointCommand {
    /// Units: millivolts
    pub forward_mv: f64,

    /// Units: millivolts
    pub turn_mv: f64,

    /// Distance to the target.
    ///
    /// Units: inches
    pub distance_in: f64,

    /// Heading error to the bearing of the target.
    ///
    /// Units: radians, in [-pi, pi)
    pub heading_err_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Motion {
    pub fn new(drive: Arc<Drive>, odom: Arc<Odom>, params: MotionParams) -> Self {
        Self {
            drive,
            odom,
            params,
        }
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    /// Compute the command for one tick of motion from `pose` to the target.
    ///
    /// The forward command is scaled by the cosine of the heading error so
    /// the robot doesn't drive hard towards the target while facing away
    /// from it. Forward and turn are each clamped to the voltage envelope.
    pub fn command(&self, pose: &Pose, target_x: f64, target_y: f64) -> PointCommand {
        let max_mv = self.drive.params().max_voltage_mv as f64;

        let delta = Vector2::new(target_x, target_y) - pose.position();
        let distance_in = delta.norm();
        let bearing_rad = delta.y.atan2(delta.x);
        let heading_err_rad = wrap_pi(bearing_rad - pose.theta);

        let forward_mv = clamp_abs(
            self.params.k_dist * distance_in * heading_err_rad.cos(),
            max_mv,
        );
        let turn_mv = clamp_abs(self.params.k_turn * heading_err_rad, max_mv);

        PointCommand {
            forward_mv,
            turn_mv,
            distance_in,
            heading_err_rad,
        }
    }

    /// Drive to the target point, blocking until settled or timed out.
    ///
    /// Settling requires both the distance and heading error to be within
    /// tolerance. The drive is stopped on return.
    ///
    /// Units: inches
    pub fn drive_to_point(&self, target_x: f64, target_y: f64) -> MotionOutcome {
        let tick = self.params.tick();
        let mut dwell = Dwell::new(self.params.settle_ticks);

        let _stop = self.drive.stop_guard();

        debug!(
            "Driving from {:?} to ({:.2}, {:.2})",
            self.odom.get(),
            target_x,
            target_y
        );

        let mut elapsed_ms = 0;
        let mut ticks = 0;

        loop {
            ticks += 1;

            let pose = self.odom.get();
            let cmd = self.command(&pose, target_x, target_y);

            let in_tolerance = cmd.distance_in < self.params.settle_dist_in
                && cmd.heading_err_rad.abs() < self.params.settle_heading_rad;

            if dwell.update(in_tolerance) {
                info!(
                    "Reached ({:.2}, {:.2}) at ({:.2}, {:.2}) after {} ms",
                    target_x, target_y, pose.x, pose.y, elapsed_ms
                );
                return MotionOutcome::settled(ticks);
            }

            if elapsed_ms >= self.params.timeout_ms {
                warn!(
                    "Drive to ({:.2}, {:.2}) timed out {:.2} in away",
                    target_x, target_y, cmd.distance_in
                );
                return MotionOutcome::timed_out(ticks);
            }

            trace!("point: {:?}", cmd);

            self.drive.set_voltage(
                (cmd.forward_mv + cmd.turn_mv) as i32,
                (cmd.forward_mv - cmd.turn_mv) as i32,
            );

            self.drive.delay().delay(tick);
            elapsed_ms += self.params.tick_ms;
        }
    }

    /// Drive through each point in turn, pausing between legs.
    ///
    /// Every leg is run even if an earlier one times out. The outcome is
    /// settled only if every leg settled.
    pub fn drive_to_points(&self, points: &[(f64, f64)]) -> MotionOutcome {
        let pause = Duration::from_millis(self.params.leg_pause_ms);
        let mut outcome = MotionOutcome::settled(0);

        for (i, &(x, y)) in points.iter().enumerate() {
            if i > 0 {
                self.drive.delay().delay(pause);
            }

            let leg = self.drive_to_point(x, y);
            outcome.settled &= leg.settled;
            outcome.ticks += leg.ticks;
        }

        outcome
    }
}
