//! Simulated time

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use super::world::SimWorld;
use hal_if::Delay;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

type TickHook = Box<dyn Fn() + Send + Sync>;

/// A [`Delay`] which advances the simulated world instead of sleeping.
///
/// After each advance every registered hook is run, in registration order.
/// Hooks are how background loops (such as odometry) are driven in lock-step
/// with a blocking control loop.
pub struct SimDelay {
    world: Arc<SimWorld>,
    hooks: Mutex<Vec<TickHook>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimDelay {
    pub fn new(world: Arc<SimWorld>) -> Self {
        Self {
            world,
            hooks: Mutex::new(Vec::new()),
        }
    }

    /// Register a hook to run after every delay.
    pub fn on_tick<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(hook));
    }
}

impl Delay for SimDelay {
    fn delay(&self, duration: Duration) {
        self.world.step(duration.as_secs_f64());

        for hook in self
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            hook();
        }
    }
}
