//! Shot bookkeeping: what one participant has learned about the opposing
//! grid, plus the aim cursor the tilt input steers.

use crate::board::Mask;
use crate::common::CellMark;
use crate::config::{DARK, GRID_SIZE, SHIP_GLOW, TILT_THRESHOLD, WATER_GLOW};
use crate::io::Frame;

/// Per-participant record of resolved shots and the current aim.
///
/// Hits and misses live in two cell sets; a cell in neither is unknown.
/// The record is never reset mid-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotTracker {
    hits: Mask,
    misses: Mask,
    aim_row: usize,
    aim_col: usize,
}

impl ShotTracker {
    /// Fresh tracker with the aim cursor at the grid center.
    pub fn new() -> Self {
        ShotTracker {
            hits: Mask::new(),
            misses: Mask::new(),
            aim_row: GRID_SIZE / 2,
            aim_col: GRID_SIZE / 2,
        }
    }

    /// Record a resolved shot. Recording the same outcome twice is a no-op;
    /// a conflicting outcome overwrites (last write wins). Nothing here
    /// prevents re-shooting a known cell.
    pub fn record(&mut self, row: usize, col: usize, hit: bool) {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return;
        }
        if hit {
            let _ = self.misses.unset(row, col);
            let _ = self.hits.set(row, col);
        } else {
            let _ = self.hits.unset(row, col);
            let _ = self.misses.set(row, col);
        }
    }

    /// What is known about one cell.
    pub fn mark(&self, row: usize, col: usize) -> CellMark {
        if self.hits.contains(row, col) {
            CellMark::Hit
        } else if self.misses.contains(row, col) {
            CellMark::Miss
        } else {
            CellMark::Unknown
        }
    }

    /// Cells recorded as hits.
    pub fn hits(&self) -> Mask {
        self.hits
    }

    /// Cells recorded as misses.
    pub fn misses(&self) -> Mask {
        self.misses
    }

    /// Number of shots recorded so far.
    pub fn shot_count(&self) -> usize {
        self.hits.count() + self.misses.count()
    }

    /// Current aim coordinates (row, col).
    pub fn aim(&self) -> (usize, usize) {
        (self.aim_row, self.aim_col)
    }

    /// Move the aim cursor to an exact cell, clamped to the grid.
    pub fn set_aim(&mut self, row: usize, col: usize) {
        self.aim_row = row.min(GRID_SIZE - 1);
        self.aim_col = col.min(GRID_SIZE - 1);
    }

    /// Advance the aim one step per axis from a raw tilt sample. Each axis
    /// moves independently when its magnitude clears the threshold; the
    /// cursor clamps to the grid.
    pub fn advance(&mut self, tilt_x: i32, tilt_y: i32) {
        if tilt_x > TILT_THRESHOLD {
            self.aim_col = (self.aim_col + 1).min(GRID_SIZE - 1);
        } else if tilt_x < -TILT_THRESHOLD {
            self.aim_col = self.aim_col.saturating_sub(1);
        }

        if tilt_y > TILT_THRESHOLD {
            self.aim_row = (self.aim_row + 1).min(GRID_SIZE - 1);
        } else if tilt_y < -TILT_THRESHOLD {
            self.aim_row = self.aim_row.saturating_sub(1);
        }
    }

    /// Win predicate: every cell of `ships` carries a hit mark. Evaluated
    /// by a full grid rescan every time, never an incremental counter.
    pub fn covers(&self, ships: &Mask) -> bool {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if ships.contains(row, col) && !self.hits.contains(row, col) {
                    return false;
                }
            }
        }
        true
    }

    /// Glow value of one cell, as rendered.
    pub fn glow(&self, row: usize, col: usize) -> u8 {
        match self.mark(row, col) {
            CellMark::Hit => SHIP_GLOW,
            CellMark::Miss => WATER_GLOW,
            CellMark::Unknown => DARK,
        }
    }

    /// Full-frame render: hits bright, misses dim, unknown dark.
    pub fn render(&self) -> Frame {
        Frame::from_fn(|r, c| self.glow(r, c))
    }
}

impl Default for ShotTracker {
    fn default() -> Self {
        Self::new()
    }
}
