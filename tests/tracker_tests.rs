use flotilla::{Board, CellMark, Orientation, ShotTracker, GRID_SIZE, TILT_THRESHOLD};

const PUSH: i32 = TILT_THRESHOLD + 100;

#[test]
fn aim_starts_at_center() {
    let tracker = ShotTracker::new();
    assert_eq!(tracker.aim(), (GRID_SIZE / 2, GRID_SIZE / 2));
}

#[test]
fn advance_clamps_to_grid_edges() {
    let mut tracker = ShotTracker::new();
    for _ in 0..10 {
        tracker.advance(PUSH, 0);
    }
    assert_eq!(tracker.aim(), (2, GRID_SIZE - 1));

    for _ in 0..10 {
        tracker.advance(-PUSH, -PUSH);
    }
    assert_eq!(tracker.aim(), (0, 0));

    for _ in 0..10 {
        tracker.advance(0, PUSH);
    }
    assert_eq!(tracker.aim(), (GRID_SIZE - 1, 0));
}

#[test]
fn tilt_at_or_below_threshold_does_not_move() {
    let mut tracker = ShotTracker::new();
    tracker.advance(TILT_THRESHOLD, -TILT_THRESHOLD);
    tracker.advance(TILT_THRESHOLD - 1, 0);
    tracker.advance(0, TILT_THRESHOLD);
    assert_eq!(tracker.aim(), (GRID_SIZE / 2, GRID_SIZE / 2));
}

#[test]
fn diagonal_tilt_moves_both_axes() {
    let mut tracker = ShotTracker::new();
    tracker.advance(PUSH, PUSH);
    assert_eq!(tracker.aim(), (3, 3));
    tracker.advance(-PUSH, PUSH);
    assert_eq!(tracker.aim(), (4, 2));
}

#[test]
fn set_aim_clamps() {
    let mut tracker = ShotTracker::new();
    tracker.set_aim(9, 9);
    assert_eq!(tracker.aim(), (GRID_SIZE - 1, GRID_SIZE - 1));
    tracker.set_aim(1, 3);
    assert_eq!(tracker.aim(), (1, 3));
}

#[test]
fn record_is_idempotent_and_last_write_wins() {
    let mut tracker = ShotTracker::new();
    tracker.record(1, 1, true);
    let once = tracker;
    tracker.record(1, 1, true);
    assert_eq!(tracker, once);
    assert_eq!(tracker.shot_count(), 1);

    // a conflicting report overwrites the mark
    tracker.record(1, 1, false);
    assert_eq!(tracker.mark(1, 1), CellMark::Miss);
    assert_eq!(tracker.shot_count(), 1);

    tracker.record(1, 1, true);
    assert_eq!(tracker.mark(1, 1), CellMark::Hit);
}

#[test]
fn record_ignores_out_of_range_cells() {
    let mut tracker = ShotTracker::new();
    tracker.record(GRID_SIZE, 0, true);
    tracker.record(0, 17, false);
    assert_eq!(tracker.shot_count(), 0);
}

#[test]
fn covers_requires_every_ship_cell() {
    let mut board = Board::empty();
    board.place_run(2, 1, 3, Orientation::Horizontal).unwrap();
    let ships = board.ship_cells();

    let mut tracker = ShotTracker::new();
    assert!(!tracker.covers(&ships));
    tracker.record(2, 1, true);
    tracker.record(2, 2, true);
    assert!(!tracker.covers(&ships));
    tracker.record(2, 3, true);
    assert!(tracker.covers(&ships));

    // downgrading one mark to a miss drops the win again
    tracker.record(2, 2, false);
    assert!(!tracker.covers(&ships));
}

#[test]
fn covers_is_trivially_true_for_an_empty_mask() {
    let tracker = ShotTracker::new();
    assert!(tracker.covers(&Board::empty().ship_cells()));
}

#[test]
fn render_uses_hit_miss_and_dark_glows() {
    let mut tracker = ShotTracker::new();
    tracker.record(0, 0, true);
    tracker.record(4, 4, false);
    let frame = tracker.render();
    assert_eq!(frame.get(0, 0), flotilla::SHIP_GLOW);
    assert_eq!(frame.get(4, 4), flotilla::WATER_GLOW);
    assert_eq!(frame.get(2, 2), flotilla::DARK);
}
