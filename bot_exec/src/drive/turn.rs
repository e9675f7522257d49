//! Turn-in-place primitive

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

    /// Turn on the spot to face the target heading, blocking until settled
    /// or timed out.
    ///
    /// The turn always takes the shortest way round, so -45 and 315 are the
    /// same target. The drive is stopped on return.
    ///
    /// Units: degrees
    pub fn turn_to(&self, target_heading_deg: f64) -> MotionOutcome {
        let params = &self.params.turn;
        let tick = self.params.tick();
        let dt = self.params.tick_s();

        let mut pid = Pid::from_gains(&params.gains);
        pid.set_output_limit(self.params.max_voltage_mv as f64);
        let mut dwell = Dwell::new(params.settle_ticks);

        let _stop = self.stop_guard();

        debug!(
            "Turning from {:.2} deg to {:.2} deg",
            self.heading_deg(),
            target_heading_deg
        );

        let mut elapsed_ms = 0;
        let mut ticks = 0;

        loop {
            ticks += 1;

            let error_deg = angle_error_deg(target_heading_deg, self.heading_deg());

            if dwell.update(error_deg.abs() < params.settle_error_deg) {
                info!(
                    "Turn settled at {:.2} deg after {} ms",
                    self.heading_deg(),
                    elapsed_ms
                );
                return MotionOutcome::settled(ticks);
            }

            if elapsed_ms >= params.timeout_ms {
                warn!(
                    "Turn to {:.2} deg timed out with {:.2} deg of error",
                    target_heading_deg, error_deg
                );
                return MotionOutcome::timed_out(ticks);
            }

            // Positive error turns towards increasing heading
            let out_mv = pid.step(error_deg, 0.0, dt) as i32;
            trace!("turn: error {:.3} deg, output {} mV", error_deg, out_mv);
            self.set_voltage(out_mv, -out_mv);

            self.delay().delay(tick);
            elapsed_ms += self.params.tick_ms;
        }
    }
}
