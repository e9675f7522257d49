//! Output rate limiter

/// Bounds how quickly a signal may change.
#[derive(Debug, Clone)]
pub struct Slew {
    /// Maximum rate of change
    ///
    /// Units: output units/second
    rate: f64,

    /// The last emitted output
    value: f64,
}

/// Default rate, takes a motor from rest to full voltage in 0.5 s.
///
/// Units: millivolts/second
pub const DEFAULT_SLEW_RATE: f64 = 24000.0;

impl Default for Slew {
    fn default() -> Self {
        Self::new(DEFAULT_SLEW_RATE)
    }
}

impl Slew {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.abs(),
            value: 0f64,
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate.abs();
    }

    /// Reseed the output so the next step starts from `value`.
    pub fn reset(&mut self, value: f64) {
        self.value = value;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Move the output toward `target` by at most `rate * dt`.
    ///
    /// Once the remaining gap fits inside one step the output lands exactly
    /// on `target`. A non-positive `dt` returns the current output unchanged.
    pub fn step(&mut self, target: f64, dt: f64) -> f64 {
        if !(dt > 0f64) {
            return self.value;
        }

        let max_delta = self.rate * dt;
        let delta = target - self.value;

        if delta > max_delta {
            self.value += max_delta;
        }
        else if delta < -max_delta {
            self.value -= max_delta;
        }
        else {
            self.value = target;
        }

        self.value
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rate_bounded() {
        let mut slew = Slew::new(24000.0);
        let targets = [12000.0, -12000.0, 300.0, 0.0, -7000.0, 12000.0];

        for &target in targets.iter() {
            for _ in 0..10 {
                let before = slew.value();
                let after = slew.step(target, 0.01);
                assert!((after - before).abs() <= 240.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_snaps_to_target() {
        let mut slew = Slew::new(1000.0);
        slew.reset(95.0);

        // Gap of 5 is within the 10 allowed this step
        assert_eq!(slew.step(100.0, 0.01), 100.0);

        // Gap equal to the step is also taken exactly
        assert_eq!(slew.step(90.0, 0.01), 90.0);

        // Too far to reach in one step
        assert_eq!(slew.step(0.0, 0.01), 80.0);
    }

    #[test]
    fn test_non_positive_dt() {
        let mut slew = Slew::new(1000.0);
        slew.reset(42.0);
        assert_eq!(slew.step(1000.0, 0.0), 42.0);
        assert_eq!(slew.step(1000.0, -1.0), 42.0);
        assert_eq!(slew.value(), 42.0);
    }

    #[test]
    fn test_negative_rate_is_magnitude() {
        let mut slew = Slew::new(-1000.0);
        assert_eq!(slew.step(100.0, 0.05), 50.0);
        slew.set_rate(-2000.0);
        assert_eq!(slew.step(100.0, 0.025), 100.0);
    }
}
