//! The sea: ship occupancy for one participant, fixed after placement.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use rand::Rng;

use crate::common::BoardError;
use crate::config::{GRID_SIZE, MAX_BOARD_ATTEMPTS, SHIP_GLOW, WATER_GLOW};
use crate::io::Frame;
use crate::mask::CellSet;

/// Cell set sized for the game grid.
pub type Mask = CellSet<u32, GRID_SIZE>;

/// Orientation of a ship run on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A populated game board. Ships never move once placed.
///
/// Invariant: every ship is a straight contiguous run, and no two runs
/// share or touch a cell, diagonals included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    ships: Mask,
}

impl Board {
    /// Build a board by placing `fleet` (a list of ship lengths) at random.
    ///
    /// Each ship draws candidate cells uniformly without replacement from
    /// the water cells and pairs each draw with a random orientation. When
    /// a ship runs out of candidates the whole grid is thrown away and
    /// regenerated; after [`MAX_BOARD_ATTEMPTS`] failed grids the fleet is
    /// considered unplaceable.
    pub fn generate<R: Rng>(rng: &mut R, fleet: &[usize]) -> Result<Self, BoardError> {
        for _ in 0..MAX_BOARD_ATTEMPTS {
            if let Some(board) = Self::try_populate(rng, fleet) {
                return Ok(board);
            }
        }
        Err(BoardError::GenerationFailed {
            attempts: MAX_BOARD_ATTEMPTS,
        })
    }

    /// An empty board, for deterministic setups via [`Board::place_run`].
    pub fn empty() -> Self {
        Board { ships: Mask::new() }
    }

    fn try_populate<R: Rng>(rng: &mut R, fleet: &[usize]) -> Option<Self> {
        let mut board = Self::empty();
        for &len in fleet {
            if !board.place_random(rng, len) {
                return None;
            }
        }
        Some(board)
    }

    /// Try random candidate cells until one admits a run of `len`.
    /// Returns false when every water cell has been tried.
    fn place_random<R: Rng>(&mut self, rng: &mut R, len: usize) -> bool {
        let mut candidates: Vec<(usize, usize)> = (0..GRID_SIZE)
            .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| !self.ships.contains(r, c))
            .collect();

        while !candidates.is_empty() {
            let pick = rng.random_range(0..candidates.len());
            let (row, col) = candidates.swap_remove(pick);
            let orientation = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            if self.place_run(row, col, len, orientation).is_ok() {
                return true;
            }
        }
        false
    }

    /// Place a ship run starting at (row, col). Fails if the run leaves the
    /// grid or enters the one-cell neighborhood of an existing ship.
    pub fn place_run(
        &mut self,
        row: usize,
        col: usize,
        len: usize,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        let run = Self::run_mask(row, col, len, orientation)?;
        if !(run & self.ships.dilated()).is_empty() {
            return Err(BoardError::RunTouchesShip);
        }
        self.ships = self.ships | run;
        Ok(())
    }

    fn run_mask(
        row: usize,
        col: usize,
        len: usize,
        orientation: Orientation,
    ) -> Result<Mask, BoardError> {
        let mut run = Mask::new();
        for i in 0..len {
            let (r, c) = match orientation {
                Orientation::Horizontal => (row, col + i),
                Orientation::Vertical => (row + i, col),
            };
            run.set(r, c).map_err(|_| BoardError::RunOutOfBounds)?;
        }
        Ok(run)
    }

    /// Whether a shot at (row, col) strikes a ship. Pure lookup;
    /// out-of-range coordinates are water.
    pub fn is_hit(&self, row: usize, col: usize) -> bool {
        self.ships.contains(row, col)
    }

    /// Occupancy mask of every ship cell.
    pub fn ship_cells(&self) -> Mask {
        self.ships
    }

    /// Total number of ship cells on the board.
    pub fn cell_count(&self) -> usize {
        self.ships.count()
    }

    /// Glow value of one cell, as rendered.
    pub fn glow(&self, row: usize, col: usize) -> u8 {
        if self.ships.contains(row, col) {
            SHIP_GLOW
        } else {
            WATER_GLOW
        }
    }

    /// Full-frame render: ships bright, water dim.
    pub fn render(&self) -> Frame {
        Frame::from_fn(|r, c| self.glow(r, c))
    }
}
