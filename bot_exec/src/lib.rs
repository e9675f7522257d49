//! # Drivebot library.
//!
//! The motion-control and localisation core of a six motor differential
//! drive robot, plus the simulated hardware it's tested against. The
//! executable in this crate and the benchmarks access the core through this
//! library.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Autonomous module - the routine table and the selector used to pick one
pub mod auton;

/// Control primitives - PID controller and slew rate limiter
pub mod ctrl;

/// Drive module - actuation and the blocking turn and distance primitives
pub mod drive;

/// Localisation module - odometry pose estimation
pub mod loc;

/// Motion module - point-to-point motion using the odometry pose
pub mod motion;

/// Driver control - maps the gamepad sticks onto the drive
pub mod opcontrol;

/// Parameter loading and validation for every module
pub mod params;

/// Composition root and lifecycle entry points
pub mod robot;

/// Simulated hardware
pub mod sim;
