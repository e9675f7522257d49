//! # Drive module
//!
//! Owns the six drive motors and the heading sensor, and provides both the
//! direct actuation commands (`set_voltage`, `tank`, `arcade`) and the
//! blocking closed-loop primitives (`turn_to`, `drive_distance`).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod distance;
mod params;
mod settle;
mod state;
mod turn;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use settle::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of motors on each side of the drivetrain.
pub const MOTORS_PER_SIDE: usize = 3;

/// Full scale of the percentage commands taken by `tank` and `arcade`.
pub const MAX_PCT: i32 = 100;

// ---------------------------------------------------------------------------
// TEST FIXTURES
// ---------------------------------------------------------------------------
