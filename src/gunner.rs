//! Shot selection: who decides where the next shot goes.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::common::CellMark;
use crate::config::GRID_SIZE;
use crate::tracker::ShotTracker;

/// Picks target coordinates for each local turn. The tracker is handed in
/// mutably because the aim cursor lives there.
pub trait Gunner {
    /// Choose the next target and leave the tracker's aim on it.
    fn select_target(&mut self, rng: &mut SmallRng, tracker: &mut ShotTracker) -> (usize, usize);

    /// Result of the last local shot.
    fn handle_shot_result(&mut self, _coord: (usize, usize), _hit: bool) {}

    /// An opponent shot landed on our board.
    fn handle_incoming_shot(&mut self, _coord: (usize, usize), _hit: bool) {}
}

/// Uniform random choice among cells not yet shot at. Drives the demo
/// modes and the headless simulator.
#[derive(Debug, Default)]
pub struct RandomGunner;

impl RandomGunner {
    pub fn new() -> Self {
        Self
    }
}

impl Gunner for RandomGunner {
    fn select_target(&mut self, rng: &mut SmallRng, tracker: &mut ShotTracker) -> (usize, usize) {
        let unknown: Vec<(usize, usize)> = (0..GRID_SIZE)
            .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| tracker.mark(r, c) == CellMark::Unknown)
            .collect();

        if unknown.is_empty() {
            // Board exhausted; re-shoot the cursor cell rather than stall.
            return tracker.aim();
        }
        let (row, col) = unknown[rng.random_range(0..unknown.len())];
        tracker.set_aim(row, col);
        (row, col)
    }
}

#[cfg(feature = "std")]
pub use self::tilt::TiltGunner;

#[cfg(feature = "std")]
mod tilt {
    use super::*;
    use crate::config::CURSOR_GLOW;
    use crate::io::{Controls, Screen};
    use std::time::Duration;

    /// Interactive aiming: tilt steers the cursor, trigger A commits.
    ///
    /// The cursor alternates once per poll between its marker glow and the
    /// true cell state, 50 ms a phase. The sleeps are deliberate blocking
    /// waits; aiming owns the thread of control while it runs.
    pub struct TiltGunner<S: Screen, C: Controls> {
        screen: S,
        controls: C,
        step: Duration,
    }

    impl<S: Screen, C: Controls> TiltGunner<S, C> {
        pub fn new(screen: S, controls: C) -> Self {
            Self {
                screen,
                controls,
                step: Duration::from_millis(50),
            }
        }

        /// Override the cursor blink step (tests use zero).
        pub fn with_step(mut self, step: Duration) -> Self {
            self.step = step;
            self
        }
    }

    impl<S: Screen, C: Controls> Gunner for TiltGunner<S, C> {
        fn select_target(
            &mut self,
            _rng: &mut SmallRng,
            tracker: &mut ShotTracker,
        ) -> (usize, usize) {
            loop {
                self.controls.poll();
                if self.controls.trigger_a() {
                    return tracker.aim();
                }

                self.screen.show_frame(&tracker.render());
                let (tilt_x, tilt_y) = self.controls.tilt();
                tracker.advance(tilt_x, tilt_y);

                let (row, col) = tracker.aim();
                self.screen.set_pixel(row, col, tracker.glow(row, col));
                std::thread::sleep(self.step);
                self.screen.set_pixel(row, col, CURSOR_GLOW);
                std::thread::sleep(self.step);
            }
        }
    }
}
