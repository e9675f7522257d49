//! # Hardware interface crate.
//!
//! Provides the interfaces through which the motion core talks to the robot's
//! hardware. Implementations exist for the simulated robot in `bot_exec`, and
//! any real platform layer only needs to implement the traits in [`eqpt`] and
//! [`delay`].
//!
//! All interfaces are synchronous, infallible and take `&self` so that a
//! single device can be shared between the control threads.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Equipment interfaces (motors, heading sensor, gamepad, display)
pub mod eqpt;

/// Cooperative time-slicing
pub mod delay;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use delay::{Delay, ThreadDelay};
pub use eqpt::{
    display::Display,
    gamepad::{Axis, Button, Gamepad},
    imu::HeadingSensor,
    motor::{BrakeMode, Motor, MAX_VOLTAGE_MV},
};
