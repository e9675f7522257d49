//! # Gamepad Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Magnitude of a fully deflected analog axis.
pub const AXIS_MAX: i32 = 127;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Operator input device.
pub trait Gamepad: Send + Sync {
    /// Whether the button is currently held down.
    fn is_pressed(&self, button: Button) -> bool;

    /// Current deflection of an analog axis in `[-AXIS_MAX, AXIS_MAX]`.
    fn axis_value(&self, axis: Axis) -> i32;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Digital buttons on the gamepad.
#[derive(Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum Button {
    L1,
    L2,
    R1,
    R2,
    Up,
    Down,
    Left,
    Right,
    X,
    B,
    Y,
    A,
}

/// Analog axes on the gamepad.
#[derive(Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}
