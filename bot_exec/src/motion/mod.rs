//! # Motion module
//!
//! Point-to-point motion on top of the drive and odometry. Each tick the
//! bearing and distance to the target are taken from the published pose and
//! turned into forward and turn voltages with proportional control.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;
