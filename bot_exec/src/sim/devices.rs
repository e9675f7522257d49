//! Simulated devices

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::{
    collections::{HashMap, HashSet},
    sync::{atomic::Ordering, Arc, Mutex, PoisonError},
};

// Internal
use super::world::{Side, SimWorld};
use hal_if::{
    eqpt::gamepad::AXIS_MAX, Axis, BrakeMode, Button, Display, Gamepad, HeadingSensor, Motor,
};
use util::atomic::AtomicF64;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One simulated drive motor.
pub struct SimMotor {
    world: Arc<SimWorld>,
    side: Side,
    index: usize,

    /// Side rotation at the last tare
    tare_deg: AtomicF64,

    brake_mode: Mutex<BrakeMode>,
}

/// Simulated heading sensor.
pub struct SimImu {
    world: Arc<SimWorld>,
}

/// A gamepad whose inputs are set by the test or the host executable.
#[derive(Default)]
pub struct SimGamepad {
    pressed: Mutex<HashSet<Button>>,
    axes: Mutex<HashMap<Axis, i32>>,
}

/// A display which remembers what was written to it.
#[derive(Default)]
pub struct SimDisplay {
    lines: Mutex<HashMap<u8, String>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimMotor {
    pub fn new(world: Arc<SimWorld>, side: Side, index: usize) -> Self {
        Self {
            world,
            side,
            index,
            tare_deg: AtomicF64::new(0.0),
            brake_mode: Mutex::new(BrakeMode::default()),
        }
    }

    /// Build the three left and three right motors of the drivetrain.
    pub fn drivetrain(world: &Arc<SimWorld>) -> ([Box<dyn Motor>; 3], [Box<dyn Motor>; 3]) {
        let motor = |side, index| -> Box<dyn Motor> {
            Box::new(SimMotor::new(world.clone(), side, index))
        };

        (
            [motor(Side::Left, 0), motor(Side::Left, 1), motor(Side::Left, 2)],
            [motor(Side::Right, 0), motor(Side::Right, 1), motor(Side::Right, 2)],
        )
    }

    pub fn brake_mode(&self) -> BrakeMode {
        *self.brake_mode.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Motor for SimMotor {
    fn position_deg(&self) -> f64 {
        self.world.side_deg(self.side) - self.tare_deg.load(Ordering::Acquire)
    }

    fn tare(&self) {
        self.tare_deg
            .store(self.world.side_deg(self.side), Ordering::Release);
    }

    fn apply_voltage(&self, mv: i32) {
        self.world.apply_voltage(self.side, self.index, mv);
    }

    fn set_brake_mode(&self, mode: BrakeMode) {
        *self.brake_mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
    }
}

impl SimImu {
    pub fn new(world: Arc<SimWorld>) -> Self {
        Self { world }
    }
}

impl HeadingSensor for SimImu {
    fn heading_deg(&self) -> f64 {
        self.world.heading_deg()
    }

    fn calibrate(&self) {
        self.world.start_calibration();
    }

    fn is_calibrating(&self) -> bool {
        self.world.is_calibrating()
    }
}

impl SimGamepad {
    pub fn press(&self, button: Button) {
        self.pressed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(button);
    }

    pub fn release(&self, button: Button) {
        self.pressed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&button);
    }

    /// Set an axis, clamped to the gamepad's range.
    pub fn set_axis(&self, axis: Axis, value: i32) {
        self.axes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(axis, value.max(-AXIS_MAX).min(AXIS_MAX));
    }
}

impl Gamepad for SimGamepad {
    fn is_pressed(&self, button: Button) -> bool {
        self.pressed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&button)
    }

    fn axis_value(&self, axis: Axis) -> i32 {
        self.axes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&axis)
            .copied()
            .unwrap_or(0)
    }
}

impl SimDisplay {
    /// Text currently shown on the given row, empty if never written.
    pub fn line(&self, row: u8) -> String {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&row)
            .cloned()
            .unwrap_or_default()
    }
}

impl Display for SimDisplay {
    fn set_line(&self, row: u8, text: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(row, text.to_string());
    }
}
