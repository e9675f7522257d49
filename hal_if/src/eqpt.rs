//! # Equipment Interface
//!
//! This module defines the interfaces to each piece of equipment the motion
//! core consumes.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod display;
pub mod gamepad;
pub mod imu;
pub mod motor;
