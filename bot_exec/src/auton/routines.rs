//! Standard autonomous routines

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{sync::Arc, time::Duration};

use super::AutonEntry;
use crate::{
    drive::Drive,
    loc::{Odom, Pose},
    motion::Motion,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Pause between driving and turning in the rush routines.
const SETTLE_PAUSE: Duration = Duration::from_millis(150);

/// Waypoints of the skills routine.
///
/// Units: inches
const SKILLS_POINTS: [(f64, f64); 3] = [(24.0, 0.0), (24.0, 24.0), (0.0, 24.0)];

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the standard routine table, in selection order.
pub fn standard_routines(
    drive: Arc<Drive>,
    odom: Arc<Odom>,
    motion: Arc<Motion>,
) -> Vec<AutonEntry> {
    vec![
        AutonEntry::new("Do Nothing", || ()),
        AutonEntry::new("Skills", move || {
            odom.reset(Pose::default());
            motion.drive_to_points(&SKILLS_POINTS);
        }),
        AutonEntry::new("Left Rush", {
            let drive = drive.clone();
            move || rush(&drive, 36.0, 45.0)
        }),
        AutonEntry::new("Right Safe", move || rush(&drive, 24.0, -45.0)),
    ]
}

/// Drive forward, pause, then turn to face `heading_deg`.
fn rush(drive: &Drive, inches: f64, heading_deg: f64) {
    drive.drive_distance(inches, None);
    drive.delay().delay(SETTLE_PAUSE);
    drive.turn_to(heading_deg);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        drive::{fixture::sim_drive, DriveParams},
        motion::MotionParams,
        sim::SimRig,
    };
    use util::maths::angle_error_deg;

    fn table() -> (SimRig, Arc<Odom>, Vec<AutonEntry>) {
        let (rig, delay, drive) = sim_drive(DriveParams::default());
        let drive = Arc::new(drive);
        let odom = Arc::new(Odom::new(drive.clone()));
        let motion = Arc::new(Motion::new(
            drive.clone(),
            odom.clone(),
            MotionParams::default(),
        ));

        {
            let odom = odom.clone();
            delay.on_tick(move || odom.update());
        }

        let routines = standard_routines(drive, odom.clone(), motion);
        (rig, odom, routines)
    }

    fn run(routines: &[AutonEntry], name: &str) {
        let entry = routines.iter().find(|e| e.name == name).unwrap();
        (entry.routine)();
    }

    #[test]
    fn test_names_in_order() {
        let (_rig, _odom, routines) = table();
        let names: Vec<_> = routines.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Do Nothing", "Skills", "Left Rush", "Right Safe"]);
    }

    #[test]
    fn test_do_nothing() {
        let (rig, _odom, routines) = table();
        run(&routines, "Do Nothing");
        assert_eq!(rig.world.time_s(), 0.0);
    }

    #[test]
    fn test_left_rush() {
        let (rig, _odom, routines) = table();
        run(&routines, "Left Rush");

        let pose = rig.world.true_pose();
        assert!((pose.x - 36.0).abs() < 0.5, "x = {}", pose.x);
        assert!(angle_error_deg(45.0, pose.heading_rad.to_degrees()).abs() < 1.0);
        assert_eq!(rig.world.side_voltages(), (0.0, 0.0));
    }

    #[test]
    fn test_right_safe() {
        let (rig, _odom, routines) = table();
        run(&routines, "Right Safe");

        let pose = rig.world.true_pose();
        assert!((pose.x - 24.0).abs() < 0.5);
        assert!(angle_error_deg(315.0, pose.heading_rad.to_degrees()).abs() < 1.0);
    }

    #[test]
    fn test_skills_resets_and_moves() {
        let (rig, odom, routines) = table();

        // Stale pose from before the routine
        odom.reset(Pose::new(100.0, 100.0, 0.0));

        run(&routines, "Skills");

        // Ends up on the far side of the square from the start
        let pose = odom.get();
        assert!(pose.y > 12.0, "pose = {:?}", pose);
        assert!(pose.x < 100.0);
        assert_eq!(rig.world.side_voltages(), (0.0, 0.0));
    }
}
