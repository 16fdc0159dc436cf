//! Common types: board errors, shot marks, roles and terminal outcomes.

use crate::mask::MaskError;
use core::fmt;

/// What a participant knows about one opponent cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    /// Never shot at.
    Unknown,
    /// Shot resolved as a hit.
    Hit,
    /// Shot resolved as a miss.
    Miss,
}

/// Turn-order role, fixed for the whole game.
///
/// `First` sends before receiving each round; `Second` receives before
/// sending. The fixed alternation is the entire anti-collision mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    First,
    Second,
}

impl Role {
    /// The other participant's role.
    pub fn other(self) -> Role {
        match self {
            Role::First => Role::Second,
            Role::Second => Role::First,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::First => write!(f, "first"),
            Role::Second => write!(f, "second"),
        }
    }
}

/// How a finished game ended for this participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Errors returned by board construction and placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying cell set error (index out of range).
    Mask(MaskError),
    /// A forced run does not fit inside the grid.
    RunOutOfBounds,
    /// A forced run would touch or overlap another ship.
    RunTouchesShip,
    /// Random generation exhausted its whole-grid attempt budget.
    GenerationFailed { attempts: usize },
}

impl From<MaskError> for BoardError {
    fn from(err: MaskError) -> Self {
        BoardError::Mask(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Mask(e) => write!(f, "mask error: {}", e),
            BoardError::RunOutOfBounds => write!(f, "ship run does not fit inside the grid"),
            BoardError::RunTouchesShip => {
                write!(f, "ship run touches or overlaps another ship")
            }
            BoardError::GenerationFailed { attempts } => {
                write!(f, "fleet placement failed after {} board attempts", attempts)
            }
        }
    }
}
