//! # Robot
//!
//! Composition root for the motion core. Builds the drive, odometry, motion
//! controller and autonomous selector once from the hardware and
//! parameters, and provides the lifecycle entry points.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use std::{sync::Arc, time::Duration};

// Internal
use crate::{
    auton::{standard_routines, Screen, Selector},
    drive::{Drive, MOTORS_PER_SIDE},
    loc::Odom,
    motion::Motion,
    opcontrol::DriverControl,
    params::RobotParams,
};
use hal_if::{Delay, Display, Gamepad, HeadingSensor, Motor};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Display row used for status messages during initialisation.
const STATUS_ROW: u8 = 1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Handles to every piece of hardware on the robot.
pub struct Hardware {
    pub left: [Box<dyn Motor>; MOTORS_PER_SIDE],
    pub right: [Box<dyn Motor>; MOTORS_PER_SIDE],
    pub imu: Box<dyn HeadingSensor>,
    pub gamepad: Arc<dyn Gamepad>,

    /// The brain screen, which shows the selection and start-up status
    pub brain: Arc<dyn Display>,

    /// The gamepad's screen, which shows the selection
    pub pad_screen: Arc<dyn Display>,

    pub delay: Arc<dyn Delay>,
}

/// The robot.
pub struct Robot {
    pub drive: Arc<Drive>,
    pub odom: Arc<Odom>,
    pub motion: Arc<Motion>,
    pub selector: Arc<Selector>,

    driver: DriverControl,
    gamepad: Arc<dyn Gamepad>,
    brain: Arc<dyn Display>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Robot {
    pub fn new(hw: Hardware, params: RobotParams) -> Self {
        let drive = Arc::new(Drive::new(
            hw.left,
            hw.right,
            hw.imu,
            hw.delay,
            params.drive,
        ));
        let odom = Arc::new(Odom::new(drive.clone()));
        let motion = Arc::new(Motion::new(drive.clone(), odom.clone(), params.motion));

        let selector = Arc::new(Selector::new(
            standard_routines(drive.clone(), odom.clone(), motion.clone()),
            vec![
                Screen::Brain(hw.brain.clone()),
                Screen::Gamepad(hw.pad_screen),
            ],
            params.selector,
        ));

        let driver = DriverControl::new(drive.clone(), hw.gamepad.clone(), params.driver);

        Self {
            drive,
            odom,
            motion,
            selector,
            driver,
            gamepad: hw.gamepad,
            brain: hw.brain,
        }
    }

    /// Calibrate the heading sensor and start the background tasks.
    pub fn initialize(&self) {
        self.show_status("Calibrating IMU...");
        self.drive.calibrate_imu();
        self.show_status("IMU ready");

        self.odom.start();
        self.selector
            .init(self.gamepad.clone(), self.drive.delay().clone());

        info!("Initialisation complete");
    }

    /// Run the selected autonomous routine with the drive held in place
    /// between motions.
    pub fn autonomous(&self) {
        info!("Autonomous: {}", self.selector.name());

        self.drive.brake_hold(true);
        self.selector.run();
        self.drive.brake_hold(false);
    }

    /// Run driver control for the given duration.
    pub fn opcontrol(&self, duration: Duration) {
        self.driver.run_for(duration);
    }

    fn show_status(&self, text: &str) {
        info!("{}", text);
        self.brain.set_line(STATUS_ROW, text);
    }
}
