//! # Simulated hardware
//!
//! A kinematic model of the six motor differential drivetrain, plus
//! simulated gamepad and display devices. Every device implements the
//! `hal_if` traits so the motion core can't tell it apart from the real
//! robot.
//!
//! Wheel surface speed is taken to be proportional to the commanded voltage
//! (no inertia or traction limits), with the free speed derived from the
//! motor rpm and gearing. The heading sensor reads the simulated heading in
//! the same rotational sense as the heading sensor on the robot, so heading
//! increases when the left side drives faster than the right.
//!
//! The world only advances when [`SimWorld::step`] is called. Tests advance
//! it through [`SimDelay`], which makes every control loop deterministic,
//! while the host executable uses [`SimWorld::spawn_realtime`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod delay;
mod devices;
mod world;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use delay::SimDelay;
pub use devices::*;
pub use world::*;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::Arc;

use hal_if::{Delay, Display, Gamepad};

use crate::robot::Hardware;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A complete simulated robot: the world and handles onto every device.
#[derive(Clone)]
pub struct SimRig {
    pub world: Arc<SimWorld>,
    pub gamepad: Arc<SimGamepad>,

    /// The brain screen
    pub brain: Arc<SimDisplay>,

    /// The gamepad's screen
    pub pad_screen: Arc<SimDisplay>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimRig {
    pub fn new(params: SimParams) -> Self {
        Self {
            world: Arc::new(SimWorld::new(params)),
            gamepad: Arc::new(SimGamepad::default()),
            brain: Arc::new(SimDisplay::default()),
            pad_screen: Arc::new(SimDisplay::default()),
        }
    }

    /// Build the hardware bundle for this rig, with loops sleeping through
    /// the given delay.
    pub fn hardware(&self, delay: Arc<dyn Delay>) -> Hardware {
        let (left, right) = SimMotor::drivetrain(&self.world);

        Hardware {
            left,
            right,
            imu: Box::new(SimImu::new(self.world.clone())),
            gamepad: self.gamepad.clone() as Arc<dyn Gamepad>,
            brain: self.brain.clone() as Arc<dyn Display>,
            pad_screen: self.pad_screen.clone() as Arc<dyn Display>,
            delay,
        }
    }

    /// Build a delay which advances this rig's world.
    pub fn sim_delay(&self) -> Arc<SimDelay> {
        Arc::new(SimDelay::new(self.world.clone()))
    }
}
