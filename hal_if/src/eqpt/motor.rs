//! # Motor Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Largest voltage magnitude any motor accepts.
///
/// Units: millivolts
pub const MAX_VOLTAGE_MV: i32 = 12000;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A single drive motor with an integrated encoder.
///
/// Gearing, encoder units and direction are expected to be configured by the
/// platform layer before the motor is handed to the motion core.
pub trait Motor: Send + Sync {
    /// Rotation of the motor since the last tare.
    ///
    /// Units: degrees of motor rotation
    fn position_deg(&self) -> f64;

    /// Zero the encoder at the current position.
    fn tare(&self);

    /// Command a voltage to the motor.
    ///
    /// Units: millivolts, in the range `[-MAX_VOLTAGE_MV, MAX_VOLTAGE_MV]`
    fn apply_voltage(&self, mv: i32);

    /// Select what the motor does when commanded zero voltage.
    fn set_brake_mode(&self, mode: BrakeMode);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Behaviour of a motor when no voltage is commanded.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BrakeMode {
    /// Let the motor spin freely.
    Coast,
    /// Short the windings to slow the motor.
    Brake,
    /// Actively hold the current position.
    Hold,
}

impl Default for BrakeMode {
    fn default() -> Self {
        BrakeMode::Coast
    }
}
