//! # Control primitives module
//!
//! Small, self contained signal generators used by the drive and motion
//! modules. Each is constructed per control session (one turn, one drive)
//! so no state is carried between manoeuvres.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod pid;
mod slew;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use pid::*;
pub use slew::*;
