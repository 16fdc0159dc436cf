use flotilla::{
    CellMark, Gunner, NullScreen, RandomGunner, ScriptedControls, ShotTracker, TiltGunner,
    GRID_SIZE, TILT_THRESHOLD,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

const PUSH: i32 = TILT_THRESHOLD + 100;

#[test]
fn random_gunner_never_repeats_a_cell() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut gunner = RandomGunner::new();
    let mut tracker = ShotTracker::new();

    for _ in 0..GRID_SIZE * GRID_SIZE {
        let (row, col) = gunner.select_target(&mut rng, &mut tracker);
        assert_eq!(tracker.mark(row, col), CellMark::Unknown);
        tracker.record(row, col, false);
    }
    assert_eq!(tracker.shot_count(), GRID_SIZE * GRID_SIZE);

    // exhausted board still yields a target instead of stalling
    let (row, col) = gunner.select_target(&mut rng, &mut tracker);
    assert!(row < GRID_SIZE && col < GRID_SIZE);
}

#[test]
fn random_gunner_leaves_the_aim_on_its_target() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut gunner = RandomGunner::new();
    let mut tracker = ShotTracker::new();
    let target = gunner.select_target(&mut rng, &mut tracker);
    assert_eq!(tracker.aim(), target);
}

#[test]
fn tilt_gunner_steers_then_commits_on_trigger() {
    // two steps right, one step up from the center, then fire
    let controls = ScriptedControls::new([(PUSH, 0), (PUSH, 0), (0, -PUSH)]);
    let mut gunner =
        TiltGunner::new(NullScreen, controls).with_step(Duration::ZERO);
    let mut rng = SmallRng::seed_from_u64(0);
    let mut tracker = ShotTracker::new();

    let target = gunner.select_target(&mut rng, &mut tracker);
    assert_eq!(target, (1, 4));
    assert_eq!(tracker.aim(), (1, 4));
}

#[test]
fn tilt_gunner_with_empty_script_fires_at_the_center() {
    let mut gunner = TiltGunner::new(NullScreen, ScriptedControls::new([]))
        .with_step(Duration::ZERO);
    let mut rng = SmallRng::seed_from_u64(0);
    let mut tracker = ShotTracker::new();
    assert_eq!(
        gunner.select_target(&mut rng, &mut tracker),
        (GRID_SIZE / 2, GRID_SIZE / 2)
    );
}
