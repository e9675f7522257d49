//! # Heading Sensor Interface

/// An absolute heading source, typically an inertial measurement unit.
pub trait HeadingSensor: Send + Sync {
    /// Current heading of the robot.
    ///
    /// Units: degrees in `[0, 360)`
    fn heading_deg(&self) -> f64;

    /// Start calibrating the sensor. Readings are invalid until
    /// `is_calibrating` returns false.
    fn calibrate(&self);

    /// Whether a calibration started by `calibrate` is still in progress.
    fn is_calibrating(&self) -> bool;
}
