//! # Autonomous module
//!
//! Holds the table of autonomous routines and the selector used to pick one
//! from the gamepad before a match.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod routines;
mod selector;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use routines::*;
pub use selector::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A named autonomous routine.
pub struct AutonEntry {
    pub name: String,
    pub routine: Box<dyn Fn() + Send + Sync>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutonEntry {
    pub fn new<S, F>(name: S, routine: F) -> Self
    where
        S: Into<String>,
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            routine: Box::new(routine),
        }
    }
}

impl std::fmt::Debug for AutonEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutonEntry").field("name", &self.name).finish()
    }
}
