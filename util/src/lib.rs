//! Utility library for the drivebot software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Lock-free atomic floating point values
pub mod atomic;

pub mod host;
pub mod logger;
pub mod maths;
pub mod params;
pub mod session;
pub mod time;
