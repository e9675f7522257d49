//! Main robot-side executable entry point.
//!
//! Runs the robot lifecycle against the simulated hardware in real time:
//!
//!     - Initialise the session, logging and parameters
//!     - Build the simulated robot and start its physics
//!     - `initialize`: calibrate the heading sensor and start odometry and
//!       the autonomous selector
//!     - `autonomous`: run the selected routine
//!     - `opcontrol`: driver control for a fixed duration

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info};
use std::{str::FromStr, sync::Arc, time::Duration};
use structopt::StructOpt;

// Internal
use bot_lib::{
    params::RobotParams,
    robot::Robot,
    sim::{SimParams, SimRig},
};
use hal_if::ThreadDelay;
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period at which the simulated world is stepped.
const SIM_PERIOD: Duration = Duration::from_millis(2);

/// Parameter file for the simulated robot.
const SIM_PARAMS_FILE: &str = "sim.toml";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line arguments.
#[derive(Debug, StructOpt)]
#[structopt(name = "bot_exec", about = "Runs the drivebot against simulated hardware")]
struct Args {
    /// Name of the autonomous routine to run, the first routine if not given.
    #[structopt(short, long)]
    routine: Option<String>,

    /// Which parts of the match to run: auton, driver or both.
    #[structopt(short, long, default_value = "both")]
    mode: Mode,

    /// Duration of driver control.
    ///
    /// Units: seconds
    #[structopt(long, default_value = "5")]
    driver_secs: u64,
}

/// Parts of the match to run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Mode {
    Auton,
    Driver,
    Both,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FromStr for Mode {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auton" => Ok(Mode::Auton),
            "driver" => Ok(Mode::Driver),
            "both" => Ok(Mode::Both),
            _ => Err(eyre!("Expected one of auton, driver or both, found \"{}\"", s)),
        }
    }
}

impl Mode {
    fn runs_auton(&self) -> bool {
        matches!(self, Mode::Auton | Mode::Both)
    }

    fn runs_driver(&self) -> bool {
        matches!(self, Mode::Driver | Mode::Both)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("bot_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Drivebot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    // ---- LOAD PARAMETERS ----

    let params = RobotParams::load().wrap_err("Could not load robot params")?;
    let sim_params: SimParams =
        util::params::load(SIM_PARAMS_FILE).wrap_err("Could not load sim params")?;

    info!("Parameters loaded");

    // ---- INITIALISE ROBOT ----

    let rig = SimRig::new(sim_params);
    rig.world.clone().spawn_realtime(SIM_PERIOD);

    let robot = Robot::new(rig.hardware(Arc::new(ThreadDelay)), params);

    if let Some(ref name) = args.routine {
        if !robot.selector.select(name) {
            return Err(eyre!(
                "Unknown routine \"{}\", expected one of {:?}",
                name,
                robot.selector.names()
            ));
        }
    }

    robot.initialize();

    // ---- MATCH ----

    if args.mode.runs_auton() {
        robot.autonomous();
        info!("Pose after autonomous: {:?}", robot.odom.get());
    }

    if args.mode.runs_driver() {
        robot.opcontrol(Duration::from_secs(args.driver_secs));
        info!("Pose after driver control: {:?}", robot.odom.get());
    }

    let truth = rig.world.true_pose();
    info!(
        "True pose: ({:.2}, {:.2}, {:.4})",
        truth.x, truth.y, truth.heading_rad
    );

    Ok(())
}
