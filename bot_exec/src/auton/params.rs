//! Parameters structure for the autonomous selector

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::time::Duration;

use crate::params::ParamsError;
use hal_if::Button;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the autonomous selector.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorParams {
    /// Button which selects the next routine.
    pub advance: Button,

    /// Button which selects the previous routine.
    pub retreat: Button,

    /// Button which locks and unlocks the selection.
    pub toggle_lock: Button,

    /// Units: milliseconds
    pub poll_ms: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SelectorParams {
    fn default() -> Self {
        Self {
            advance: Button::L1,
            retreat: Button::L2,
            toggle_lock: Button::X,
            poll_ms: 20,
        }
    }
}

impl SelectorParams {
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        ParamsError::require_positive("selector.poll_ms", self.poll_ms as f64)?;

        if self.advance == self.retreat
            || self.advance == self.toggle_lock
            || self.retreat == self.toggle_lock
        {
            return Err(ParamsError::DuplicateButton);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_buttons_from_toml() {
        let params: SelectorParams =
            util::params::from_str("advance = \"Right\"\nretreat = \"Left\"\n").unwrap();

        assert_eq!(params.advance, Button::Right);
        assert_eq!(params.retreat, Button::Left);
        assert_eq!(params.toggle_lock, Button::X);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_duplicate_buttons_rejected() {
        let mut params = SelectorParams::default();
        params.retreat = Button::L1;
        assert!(params.validate().is_err());
    }
}
