//! # Delay Interface
//!
//! Every periodic loop in the motion core sleeps through a [`Delay`] rather
//! than calling `thread::sleep` directly, which lets simulated hardware run
//! the loops faster than real time.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{thread, time::Duration};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Source of cooperative time-slicing for control loops.
pub trait Delay: Send + Sync {
    /// Yield the calling thread for the given duration.
    fn delay(&self, duration: Duration);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A [`Delay`] which sleeps the calling OS thread.
#[derive(Debug, Default, Copy, Clone)]
pub struct ThreadDelay;

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Delay for ThreadDelay {
    fn delay(&self, duration: Duration) {
        thread::sleep(duration)
    }
}
