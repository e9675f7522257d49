//! Simulated world state and drivetrain kinematics

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Deserialize;
use std::{
    f64::consts::PI,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

// Internal
use crate::drive::DriveParams;
use hal_if::MAX_VOLTAGE_MV;
use util::maths::{lin_map, wrap_360};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated robot.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SimParams {
    /// Free speed of the drive motors.
    ///
    /// Units: revolutions/minute
    pub motor_free_rpm: f64,

    /// Units: inches
    pub wheel_diameter_in: f64,

    /// Motor revolutions for one wheel revolution.
    pub motor_rot_per_wheel_rot: f64,

    /// Distance between the left and right wheel contact patches.
    ///
    /// Units: inches
    pub track_width_in: f64,

    /// How long a heading sensor calibration takes.
    ///
    /// Units: seconds
    pub imu_calibration_s: f64,
}

/// Which side of the drivetrain a motor belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// The simulated world.
pub struct SimWorld {
    params: SimParams,
    state: Mutex<WorldState>,
}

/// Ground truth of the simulated robot.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TruePose {
    /// Units: inches
    pub x: f64,

    /// Units: inches
    pub y: f64,

    /// Heading in the sensor's rotational sense.
    ///
    /// Units: radians, unwrapped
    pub heading_rad: f64,
}

#[derive(Debug, Default)]
struct WorldState {
    pose: TruePose,

    /// Rotation of each side's motors since start.
    ///
    /// Units: degrees of motor rotation
    left_deg: f64,
    right_deg: f64,

    /// Last voltage commanded to each motor
    left_mv: [i32; 3],
    right_mv: [i32; 3],

    /// Simulation time
    ///
    /// Units: seconds
    time_s: f64,

    /// Time at which the current calibration finishes
    calibrated_at_s: Option<f64>,

    /// When true the wheels can't turn, as if the robot was pinned
    stalled: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self::matching(&DriveParams::default())
    }
}

impl SimParams {
    /// Simulated robot with the same geometry as the drive model.
    pub fn matching(drive: &DriveParams) -> Self {
        Self {
            motor_free_rpm: 600.0,
            wheel_diameter_in: drive.wheel_diameter_in,
            motor_rot_per_wheel_rot: drive.motor_rot_per_wheel_rot,
            track_width_in: drive.track_width_in,
            imu_calibration_s: 0.5,
        }
    }

    /// Wheel surface speed at full voltage.
    ///
    /// Units: inches/second
    pub fn free_speed_ins(&self) -> f64 {
        let wheel_rps = self.motor_free_rpm / 60.0 / self.motor_rot_per_wheel_rot;
        wheel_rps * PI * self.wheel_diameter_in
    }

    fn motor_deg_per_inch(&self) -> f64 {
        360.0 * self.motor_rot_per_wheel_rot / (PI * self.wheel_diameter_in)
    }
}

impl SimWorld {
    pub fn new(params: SimParams) -> Self {
        Self {
            params,
            state: Mutex::new(WorldState::default()),
        }
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Advance the world by `dt` seconds.
    pub fn step(&self, dt: f64) {
        if !(dt > 0.0) {
            return;
        }

        let mut state = self.lock();
        state.time_s += dt;

        if let Some(t) = state.calibrated_at_s {
            if state.time_s >= t {
                state.calibrated_at_s = None;
            }
        }

        if state.stalled {
            return;
        }

        let v_left = self.surface_speed(&state.left_mv);
        let v_right = self.surface_speed(&state.right_mv);

        let speed = 0.5 * (v_left + v_right);
        let rate = (v_left - v_right) / self.params.track_width_in;

        // Integrate along the mean heading of the step
        let mid = state.pose.heading_rad + 0.5 * rate * dt;
        state.pose.x += speed * dt * mid.cos();
        state.pose.y += speed * dt * mid.sin();
        state.pose.heading_rad += rate * dt;

        let deg_per_in = self.params.motor_deg_per_inch();
        state.left_deg += v_left * dt * deg_per_in;
        state.right_deg += v_right * dt * deg_per_in;
    }

    /// Step the world against the wall clock from a background thread.
    pub fn spawn_realtime(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        debug!("Starting realtime simulation at {:?}", period);

        thread::spawn(move || {
            let mut last = Instant::now();
            loop {
                thread::sleep(period);
                let now = Instant::now();
                self.step((now - last).as_secs_f64());
                last = now;
            }
        })
    }

    pub fn true_pose(&self) -> TruePose {
        self.lock().pose
    }

    /// Teleport the robot, leaving the encoders untouched.
    pub fn place(&self, pose: TruePose) {
        self.lock().pose = pose;
    }

    pub fn time_s(&self) -> f64 {
        self.lock().time_s
    }

    pub fn set_stalled(&self, stalled: bool) {
        self.lock().stalled = stalled;
    }

    /// Mean voltage currently commanded to each side.
    ///
    /// Units: millivolts
    pub fn side_voltages(&self) -> (f64, f64) {
        let state = self.lock();
        (mean_mv(&state.left_mv), mean_mv(&state.right_mv))
    }

    pub(crate) fn side_deg(&self, side: Side) -> f64 {
        let state = self.lock();
        match side {
            Side::Left => state.left_deg,
            Side::Right => state.right_deg,
        }
    }

    pub(crate) fn apply_voltage(&self, side: Side, index: usize, mv: i32) {
        if mv.abs() > MAX_VOLTAGE_MV {
            warn!("Simulated motor {:?}[{}] given {} mV", side, index, mv);
        }

        let mv = mv.max(-MAX_VOLTAGE_MV).min(MAX_VOLTAGE_MV);
        let mut state = self.lock();
        match side {
            Side::Left => state.left_mv[index] = mv,
            Side::Right => state.right_mv[index] = mv,
        }
    }

    pub(crate) fn heading_deg(&self) -> f64 {
        wrap_360(self.lock().pose.heading_rad.to_degrees())
    }

    pub(crate) fn start_calibration(&self) {
        let mut state = self.lock();
        state.calibrated_at_s = Some(state.time_s + self.params.imu_calibration_s);
    }

    pub(crate) fn is_calibrating(&self) -> bool {
        self.lock().calibrated_at_s.is_some()
    }

    fn surface_speed(&self, mv: &[i32; 3]) -> f64 {
        let max = MAX_VOLTAGE_MV as f64;
        let free = self.params.free_speed_ins();
        lin_map((-max, max), (-free, free), mean_mv(mv))
    }

    fn lock(&self) -> MutexGuard<'_, WorldState> {
        // A panicking test thread mustn't take the rest of the world down
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn mean_mv(mv: &[i32; 3]) -> f64 {
    mv.iter().map(|&v| v as f64).sum::<f64>() / mv.len() as f64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_free_speed() {
        let p = SimParams::default();
        // 600 rpm geared to 450 rpm on a 2.75" wheel
        assert!((p.free_speed_ins() - 7.5 * PI * 2.75).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line() {
        let world = SimWorld::new(SimParams::default());
        for i in 0..3 {
            world.apply_voltage(Side::Left, i, 6000);
            world.apply_voltage(Side::Right, i, 6000);
        }

        for _ in 0..100 {
            world.step(0.01);
        }

        let pose = world.true_pose();
        let expected = 0.5 * world.params().free_speed_ins();
        assert!((pose.x - expected).abs() < 1e-6);
        assert!(pose.y.abs() < 1e-9);
        assert_eq!(pose.heading_rad, 0.0);
        assert!((world.side_deg(Side::Left) - world.side_deg(Side::Right)).abs() < 1e-9);
    }

    #[test]
    fn test_left_faster_turns_heading_up() {
        let world = SimWorld::new(SimParams::default());
        for i in 0..3 {
            world.apply_voltage(Side::Left, i, 4000);
            world.apply_voltage(Side::Right, i, -4000);
        }
        world.step(0.1);

        let pose = world.true_pose();
        assert!(pose.heading_rad > 0.0);
        assert!(pose.x.abs() < 1e-9 && pose.y.abs() < 1e-9);
        assert!(world.heading_deg() > 0.0 && world.heading_deg() < 90.0);
    }

    #[test]
    fn test_stalled_does_not_move() {
        let world = SimWorld::new(SimParams::default());
        world.set_stalled(true);
        world.apply_voltage(Side::Left, 0, 12000);
        world.step(1.0);
        assert_eq!(world.true_pose(), TruePose::default());
        assert_eq!(world.time_s(), 1.0);
    }

    #[test]
    fn test_calibration_completes() {
        let world = SimWorld::new(SimParams::default());
        world.start_calibration();
        assert!(world.is_calibrating());
        world.step(0.25);
        assert!(world.is_calibrating());
        world.step(0.25);
        assert!(!world.is_calibrating());
    }
}
