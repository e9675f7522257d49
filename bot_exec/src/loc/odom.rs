//! Odometry pose estimator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
};

// Internal
use super::Pose;
use crate::drive::Drive;
use util::{atomic::AtomicF64, maths::wrap_pi};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Odometry pose estimator.
///
/// Each field of the pose is published through its own atomic, so readers
/// never block the estimator. A reader may see a pose mixing two
/// consecutive ticks, which is tolerated by every consumer.
pub struct Odom {
    drive: Arc<Drive>,

    x: AtomicF64,
    y: AtomicF64,
    theta: AtomicF64,

    /// Encoder readings at the previous tick
    baseline: Mutex<Baseline>,

    started: AtomicBool,
}

#[derive(Debug, Default)]
struct Baseline {
    /// Units: degrees of motor rotation
    left_deg: f64,
    right_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Odom {
    pub fn new(drive: Arc<Drive>) -> Self {
        let baseline = Baseline {
            left_deg: drive.left_motor_deg(),
            right_deg: drive.right_motor_deg(),
        };

        Self {
            drive,
            x: AtomicF64::default(),
            y: AtomicF64::default(),
            theta: AtomicF64::default(),
            baseline: Mutex::new(baseline),
            started: AtomicBool::new(false),
        }
    }

    /// Start the perpetual estimation loop on a background thread.
    ///
    /// The estimator may only be started once, `None` is returned on any
    /// later call.
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Odometry already started");
            return None;
        }

        self.rebaseline(&mut self.lock_baseline());

        let odom = self.clone();
        let tick = odom.drive.params().tick();
        debug!("Starting odometry at {:?}", tick);

        Some(thread::spawn(move || loop {
            odom.update();
            odom.drive.delay().delay(tick);
        }))
    }

    /// Integrate one tick of encoder and heading data into the pose.
    pub fn update(&self) {
        let mut baseline = self.lock_baseline();

        let left_deg = self.drive.left_motor_deg();
        let right_deg = self.drive.right_motor_deg();

        let d_left_in = self.drive.inches_from_motor_deg(left_deg - baseline.left_deg);
        let d_right_in = self.drive.inches_from_motor_deg(right_deg - baseline.right_deg);
        baseline.left_deg = left_deg;
        baseline.right_deg = right_deg;

        // Forward travel along the robot's heading
        let ds = 0.5 * (d_left_in + d_right_in);

        let heading_rad = wrap_pi(self.drive.heading_deg().to_radians());

        // Integrate along the heading half way between the previous and
        // current headings. The half-difference is taken across the shortest
        // arc so that crossing +-pi doesn't flip the direction of travel.
        let prev_theta = self.theta.load(Ordering::Acquire);
        let mid_theta = wrap_pi(prev_theta + 0.5 * wrap_pi(heading_rad - prev_theta));

        let x = self.x.load(Ordering::Acquire) + ds * mid_theta.cos();
        let y = self.y.load(Ordering::Acquire) + ds * mid_theta.sin();

        self.x.store(x, Ordering::Release);
        self.y.store(y, Ordering::Release);
        self.theta.store(heading_rad, Ordering::Release);

        trace!(
            "odom: ds {:.4} in, pose ({:.3}, {:.3}, {:.4})",
            ds, x, y, heading_rad
        );
    }

    /// Overwrite the published pose and re-baseline the encoders so no
    /// motion from before the reset is integrated.
    pub fn reset(&self, pose: Pose) {
        let mut baseline = self.lock_baseline();

        self.x.store(pose.x, Ordering::Release);
        self.y.store(pose.y, Ordering::Release);
        self.theta.store(pose.theta, Ordering::Release);
        self.rebaseline(&mut baseline);

        debug!("Odometry reset to {:?}", pose);
    }

    /// A snapshot of the current pose.
    pub fn get(&self) -> Pose {
        Pose {
            x: self.x.load(Ordering::Acquire),
            y: self.y.load(Ordering::Acquire),
            theta: self.theta.load(Ordering::Acquire),
        }
    }

    fn rebaseline(&self, baseline: &mut Baseline) {
        baseline.left_deg = self.drive.left_motor_deg();
        baseline.right_deg = self.drive.right_motor_deg();
    }

    fn lock_baseline(&self) -> MutexGuard<'_, Baseline> {
        self.baseline.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::drive::DriveParams;
    use hal_if::{BrakeMode, HeadingSensor, Motor, ThreadDelay};
    use std::f64::consts::{FRAC_PI_2, PI};

    /// Encoders and heading sensor whose readings are set by the test.
    #[derive(Clone, Default)]
    struct Script {
        left_deg: Arc<AtomicF64>,
        right_deg: Arc<AtomicF64>,
        heading_deg: Arc<AtomicF64>,
    }

    struct ScriptedMotor(Arc<AtomicF64>);

    struct ScriptedImu(Arc<AtomicF64>);

    impl Motor for ScriptedMotor {
        fn position_deg(&self) -> f64 {
            self.0.load(Ordering::SeqCst)
        }
        fn tare(&self) {}
        fn apply_voltage(&self, _mv: i32) {}
        fn set_brake_mode(&self, _mode: BrakeMode) {}
    }

    impl HeadingSensor for ScriptedImu {
        fn heading_deg(&self) -> f64 {
            self.0.load(Ordering::SeqCst)
        }
        fn calibrate(&self) {}
        fn is_calibrating(&self) -> bool {
            false
        }
    }

    impl Script {
        fn odom(&self) -> Odom {
            let motor = |deg: &Arc<AtomicF64>| -> Box<dyn Motor> {
                Box::new(ScriptedMotor(deg.clone()))
            };

            let drive = Drive::new(
                [motor(&self.left_deg), motor(&self.left_deg), motor(&self.left_deg)],
                [motor(&self.right_deg), motor(&self.right_deg), motor(&self.right_deg)],
                Box::new(ScriptedImu(self.heading_deg.clone())),
                Arc::new(ThreadDelay),
                DriveParams::default(),
            );

            Odom::new(Arc::new(drive))
        }

        fn advance(&self, left_deg: f64, right_deg: f64) {
            let l = self.left_deg.load(Ordering::SeqCst);
            let r = self.right_deg.load(Ordering::SeqCst);
            self.left_deg.store(l + left_deg, Ordering::SeqCst);
            self.right_deg.store(r + right_deg, Ordering::SeqCst);
        }

        fn set_heading(&self, heading_deg: f64) {
            self.heading_deg.store(heading_deg, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_reset_then_get() {
        let script = Script::default();
        let odom = script.odom();

        script.advance(500.0, 500.0);
        odom.update();

        let pose = Pose::new(12.5, -3.0, 1.2);
        odom.reset(pose);
        assert_eq!(odom.get(), pose);
    }

    #[test]
    fn test_reset_rebaselines() {
        let script = Script::default();
        let odom = script.odom();

        // Motion before the reset must not be integrated afterwards
        script.advance(1000.0, 1000.0);
        odom.reset(Pose::default());
        odom.update();

        assert_eq!(odom.get(), Pose::default());
    }

    #[test]
    fn test_straight_line() {
        let script = Script::default();
        let odom = script.odom();

        let mut prev_x = 0.0;
        for _ in 0..50 {
            script.advance(20.0, 20.0);
            odom.update();

            let pose = odom.get();
            assert!(pose.x > prev_x);
            assert!(pose.y.abs() < 1e-9);
            assert_eq!(pose.theta, 0.0);
            prev_x = pose.x;
        }

        let expected = DriveParams::default().inches_from_motor_deg(1000.0);
        assert!((prev_x - expected).abs() < 1e-9);
    }

    #[test]
    fn test_pure_rotation() {
        let script = Script::default();
        let odom = script.odom();

        for i in 1..=90 {
            script.set_heading(i as f64);
            odom.update();

            let pose = odom.get();
            assert_eq!(pose.x, 0.0);
            assert_eq!(pose.y, 0.0);
        }

        assert!((odom.get().theta - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_across_wrap() {
        let script = Script::default();
        let odom = script.odom();

        // Face just short of +pi, then step across it while driving
        script.set_heading(179.0);
        odom.update();
        script.set_heading(181.0);
        script.advance(100.0, 100.0);
        odom.update();

        // Travel is along the negative x axis
        let pose = odom.get();
        assert!(pose.x < 0.0);
        assert!(pose.y.abs() < 1e-9);
        assert!((pose.theta + PI - 1f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_heading_wraps() {
        let script = Script::default();
        let odom = script.odom();

        script.set_heading(270.0);
        odom.update();

        assert!((odom.get().theta + FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_start_once() {
        let script = Script::default();
        let odom = Arc::new(script.odom());

        assert!(odom.start().is_some());
        assert!(odom.start().is_none());
    }
}
