//! # Robot parameters
//!
//! Every module's parameters are loaded from their own TOML file in the
//! `params` directory of the software root, and checked before any module is
//! built from them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::de::DeserializeOwned;

// Internal
use crate::{
    auton::SelectorParams, drive::DriveParams, motion::MotionParams, opcontrol::DriverParams,
};
use util::params::LoadError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

pub const DRIVE_PARAMS_FILE: &str = "drive.toml";
pub const MOTION_PARAMS_FILE: &str = "motion.toml";
pub const SELECTOR_PARAMS_FILE: &str = "selector.toml";
pub const DRIVER_PARAMS_FILE: &str = "driver.toml";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while loading or checking parameters.
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("Failed to load \"{0}\": {1}")]
    Load(&'static str, LoadError),

    #[error("Parameter {name} is out of range, found {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("Each selector button must be different")]
    DuplicateButton,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for every module on the robot.
#[derive(Debug, Clone, Default)]
pub struct RobotParams {
    pub drive: DriveParams,
    pub motion: MotionParams,
    pub selector: SelectorParams,
    pub driver: DriverParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ParamsError {
    /// Fail unless `value` is strictly positive.
    pub fn require_positive(name: &'static str, value: f64) -> Result<(), Self> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(Self::OutOfRange { name, value })
        }
    }
}

impl RobotParams {
    /// Load every parameter file from the software root and validate them.
    pub fn load() -> Result<Self, ParamsError> {
        let params = Self {
            drive: load_file(DRIVE_PARAMS_FILE)?,
            motion: load_file(MOTION_PARAMS_FILE)?,
            selector: load_file(SELECTOR_PARAMS_FILE)?,
            driver: load_file(DRIVER_PARAMS_FILE)?,
        };

        params.validate()?;

        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        self.drive.validate()?;
        self.motion.validate()?;
        self.selector.validate()?;
        self.driver.validate()?;

        Ok(())
    }
}

fn load_file<P>(file: &'static str) -> Result<P, ParamsError>
where
    P: DeserializeOwned,
{
    debug!("Loading parameters from {}", file);
    util::params::load(file).map_err(|e| ParamsError::Load(file, e))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults_valid() {
        assert!(RobotParams::default().validate().is_ok());
    }

    #[test]
    fn test_require_positive() {
        assert!(ParamsError::require_positive("a", 1e-9).is_ok());
        assert!(ParamsError::require_positive("a", 0.0).is_err());
        assert!(ParamsError::require_positive("a", std::f64::NAN).is_err());
    }

    #[test]
    fn test_shipped_params_parse() {
        // The parameter files shipped in the repository must parse and be
        // valid
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../params");

        let params = RobotParams {
            drive: util::params::load_from_path(dir.join(DRIVE_PARAMS_FILE)).unwrap(),
            motion: util::params::load_from_path(dir.join(MOTION_PARAMS_FILE)).unwrap(),
            selector: util::params::load_from_path(dir.join(SELECTOR_PARAMS_FILE)).unwrap(),
            driver: util::params::load_from_path(dir.join(DRIVER_PARAMS_FILE)).unwrap(),
        };

        assert!(params.validate().is_ok());
    }
}
