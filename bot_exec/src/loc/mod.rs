//! # Localisation module
//!
//! Dead-reckoning odometry. The drive encoders give the distance travelled
//! each tick and the heading sensor gives the absolute heading, which are
//! integrated into a pose published for lock-free reads by any thread.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod odom;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use odom::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The estimated pose of the robot on the field.
///
/// `theta` is measured in the same rotational sense as the heading sensor,
/// with zero along the positive x axis.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Pose {
    /// Units: inches
    pub x: f64,

    /// Units: inches
    pub y: f64,

    /// Units: radians, in [-pi, pi)
    pub theta: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Position as a vector.
    ///
    /// Units: inches
    pub fn position(&self) -> nalgebra::Vector2<f64> {
        nalgebra::Vector2::new(self.x, self.y)
    }
}
