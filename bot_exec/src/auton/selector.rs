//! Autonomous routine selector

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

// Internal
use super::{AutonEntry, SelectorParams};
use hal_if::{Delay, Display, Gamepad};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const BRAIN_HEADER_UNLOCKED: &str = "Selected Auton:";
const BRAIN_HEADER_LOCKED: &str = "Selected (LOCKED):";

/// The gamepad screen is narrow, so it gets a shorter header.
const PAD_HEADER_UNLOCKED: &str = "Auton:";
const PAD_HEADER_LOCKED: &str = "Auton: LOCK";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Cyclic menu over a fixed list of autonomous routines.
///
/// The selection can be locked so that stray button presses during setup
/// can't change it. The routine list never changes after construction.
pub struct Selector {
    entries: Vec<AutonEntry>,

    index: AtomicUsize,
    locked: AtomicBool,

    screens: Vec<Screen>,

    params: SelectorParams,

    started: AtomicBool,
}

/// A display the selection is shown on, tagged with the layout it takes.
#[derive(Clone)]
pub enum Screen {
    Brain(Arc<dyn Display>),
    Gamepad(Arc<dyn Display>),
}

/// Button states seen on the previous poll, used to detect rising edges.
#[derive(Debug, Default, Clone)]
pub struct SelectorEdges {
    advance: bool,
    retreat: bool,
    toggle_lock: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Selector {
    pub fn new(
        entries: Vec<AutonEntry>,
        screens: Vec<Screen>,
        params: SelectorParams,
    ) -> Self {
        if entries.is_empty() {
            warn!("Autonomous selector created with no routines");
        }

        Self {
            entries,
            index: AtomicUsize::new(0),
            locked: AtomicBool::new(false),
            screens,
            params,
            started: AtomicBool::new(false),
        }
    }

    /// Show the current selection and start polling the gamepad on a
    /// background thread.
    ///
    /// Polling may only be started once, `None` is returned on any later
    /// call.
    pub fn init(
        self: &Arc<Self>,
        gamepad: Arc<dyn Gamepad>,
        delay: Arc<dyn Delay>,
    ) -> Option<JoinHandle<()>> {
        self.display();

        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Autonomous selector already started");
            return None;
        }

        let selector = self.clone();
        let poll = self.params.poll();
        debug!("Starting autonomous selector at {:?}", poll);

        Some(thread::spawn(move || {
            let mut edges = SelectorEdges::default();
            loop {
                selector.poll(&mut edges, gamepad.as_ref());
                delay.delay(poll);
            }
        }))
    }

    /// Read the gamepad once and act on any new button presses.
    ///
    /// Lock toggling always works. Advance and retreat are ignored while
    /// locked, but their edges are still tracked so that a button held
    /// through unlocking doesn't register as a press.
    pub fn poll(&self, edges: &mut SelectorEdges, gamepad: &dyn Gamepad) {
        let toggle = rising_edge(
            gamepad.is_pressed(self.params.toggle_lock),
            &mut edges.toggle_lock,
        );
        let advance = rising_edge(gamepad.is_pressed(self.params.advance), &mut edges.advance);
        let retreat = rising_edge(gamepad.is_pressed(self.params.retreat), &mut edges.retreat);

        if toggle {
            self.set_locked(!self.is_locked());
        }

        if self.is_locked() {
            return;
        }

        if advance {
            self.next();
        }
        if retreat {
            self.prev();
        }
    }

    /// Select the next routine, wrapping to the first.
    pub fn next(&self) {
        self.step_index(1);
    }

    /// Select the previous routine, wrapping to the last.
    pub fn prev(&self) {
        let len = self.entries.len();
        self.step_index(len.saturating_sub(1));
    }

    /// Select a routine by name. Returns false if there's no such routine.
    pub fn select(&self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(i) => {
                self.index.store(i, Ordering::SeqCst);
                self.display();
                true
            }
            None => {
                warn!("No autonomous routine named \"{}\"", name);
                false
            }
        }
    }

    pub fn index(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// Name of the selected routine.
    pub fn name(&self) -> &str {
        self.entries
            .get(self.index())
            .map(|e| e.name.as_str())
            .unwrap_or("")
    }

    /// Names of every routine, in selection order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
        self.display();
    }

    /// Run the selected routine on the calling thread.
    pub fn run(&self) {
        match self.entries.get(self.index()) {
            Some(entry) => {
                info!("Running autonomous routine \"{}\"", entry.name);
                (entry.routine)();
                info!("Autonomous routine \"{}\" complete", entry.name);
            }
            None => warn!("No autonomous routine to run"),
        }
    }

    /// Show the selection on every screen: the header on row 0 and the
    /// routine name on row 1.
    pub fn display(&self) {
        let locked = self.is_locked();
        let name = self.name();

        for screen in self.screens.iter() {
            let (display, header) = match screen {
                Screen::Brain(d) if locked => (d, BRAIN_HEADER_LOCKED),
                Screen::Brain(d) => (d, BRAIN_HEADER_UNLOCKED),
                Screen::Gamepad(d) if locked => (d, PAD_HEADER_LOCKED),
                Screen::Gamepad(d) => (d, PAD_HEADER_UNLOCKED),
            };

            display.set_line(0, header);
            display.set_line(1, name);
        }
    }

    fn step_index(&self, by: usize) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }

        // The closure never returns None so the update can't fail
        let _ = self
            .index
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |i| Some((i + by) % len));

        debug!("Selected autonomous routine \"{}\"", self.name());
        self.display();
    }
}

/// True if `current` is pressed and wasn't on the last poll.
fn rising_edge(current: bool, last: &mut bool) -> bool {
    let pressed = current && !*last;
    *last = current;
    pressed
}
