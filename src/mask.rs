//! Square cell sets packed into a single unsigned integer.
//!
//! An `N`×`N` grid occupies the low `N*N` bits of the backing integer,
//! row-major, bit `row * N + col`. All set algebra is plain integer
//! bit-twiddling.

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};

use num_traits::{PrimInt, Unsigned};

/// Error for cell indices outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskError {
    OutOfBounds { row: usize, col: usize },
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskError::OutOfBounds { row, col } => {
                write!(f, "cell ({}, {}) is outside the grid", row, col)
            }
        }
    }
}

/// A set of cells on an `N`×`N` grid, backed by `T`.
///
/// `T` must carry at least `N*N` bits; `u32` covers grids up to 5×5.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CellSet<T, const N: usize> {
    bits: T,
}

impl<T: PrimInt + Unsigned, const N: usize> CellSet<T, N> {
    /// The empty set.
    pub fn new() -> Self {
        debug_assert!(N * N <= T::zero().count_zeros() as usize);
        CellSet { bits: T::zero() }
    }

    fn bit(row: usize, col: usize) -> T {
        T::one() << (row * N + col)
    }

    /// Every in-grid bit set; the complement boundary for [`Not`].
    fn full_bits() -> T {
        let width = T::zero().count_zeros() as usize;
        if N * N >= width {
            !T::zero()
        } else {
            (T::one() << (N * N)) - T::one()
        }
    }

    /// Number of cells in the set.
    pub fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    /// Membership test. Out-of-grid coordinates are never members.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < N && col < N && self.bits & Self::bit(row, col) != T::zero()
    }

    /// Checked membership test.
    pub fn get(&self, row: usize, col: usize) -> Result<bool, MaskError> {
        if row >= N || col >= N {
            return Err(MaskError::OutOfBounds { row, col });
        }
        Ok(self.contains(row, col))
    }

    /// Add a cell.
    pub fn set(&mut self, row: usize, col: usize) -> Result<(), MaskError> {
        if row >= N || col >= N {
            return Err(MaskError::OutOfBounds { row, col });
        }
        self.bits = self.bits | Self::bit(row, col);
        Ok(())
    }

    /// Remove a cell.
    pub fn unset(&mut self, row: usize, col: usize) -> Result<(), MaskError> {
        if row >= N || col >= N {
            return Err(MaskError::OutOfBounds { row, col });
        }
        self.bits = self.bits & !Self::bit(row, col);
        Ok(())
    }

    /// The set expanded by one cell in every direction, diagonals
    /// included, clipped to the grid. A run's dilation is its exclusion
    /// zone for neighbouring runs.
    pub fn dilated(&self) -> Self {
        let mut bits = T::zero();
        for row in 0..N {
            for col in 0..N {
                if !self.contains(row, col) {
                    continue;
                }
                for r in row.saturating_sub(1)..=(row + 1).min(N - 1) {
                    for c in col.saturating_sub(1)..=(col + 1).min(N - 1) {
                        bits = bits | Self::bit(r, c);
                    }
                }
            }
        }
        CellSet { bits }
    }

    /// Member cells in row-major order.
    pub fn iter(&self) -> Cells<T, N> {
        Cells {
            set: *self,
            next: 0,
        }
    }
}

impl<T: PrimInt + Unsigned, const N: usize> Default for CellSet<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PrimInt + Unsigned, const N: usize> BitAnd for CellSet<T, N> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        CellSet {
            bits: self.bits & rhs.bits,
        }
    }
}

impl<T: PrimInt + Unsigned, const N: usize> BitOr for CellSet<T, N> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        CellSet {
            bits: self.bits | rhs.bits,
        }
    }
}

impl<T: PrimInt + Unsigned, const N: usize> Not for CellSet<T, N> {
    type Output = Self;

    /// Complement within the grid; bits past `N*N` stay clear.
    fn not(self) -> Self {
        CellSet {
            bits: !self.bits & Self::full_bits(),
        }
    }
}

impl<T: PrimInt + Unsigned, const N: usize> fmt::Debug for CellSet<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in 0..N {
            for col in 0..N {
                write!(f, "{}", if self.contains(row, col) { '■' } else { '□' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Row-major iterator over member cells.
pub struct Cells<T, const N: usize> {
    set: CellSet<T, N>,
    next: usize,
}

impl<T: PrimInt + Unsigned, const N: usize> Iterator for Cells<T, N> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        while self.next < N * N {
            let idx = self.next;
            self.next += 1;
            let (row, col) = (idx / N, idx % N);
            if self.set.contains(row, col) {
                return Some((row, col));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Set5 = CellSet<u32, 5>;

    #[test]
    fn set_unset_and_contains() {
        let mut set = Set5::new();
        assert!(set.is_empty());
        set.set(2, 3).unwrap();
        assert!(set.contains(2, 3));
        assert!(!set.contains(3, 2));
        assert_eq!(set.count(), 1);
        set.unset(2, 3).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut set = Set5::new();
        assert_eq!(
            set.set(5, 0),
            Err(MaskError::OutOfBounds { row: 5, col: 0 })
        );
        assert_eq!(set.get(0, 9), Err(MaskError::OutOfBounds { row: 0, col: 9 }));
        assert!(!set.contains(7, 7));
    }

    #[test]
    fn dilation_clips_to_the_grid() {
        let mut set = Set5::new();
        set.set(0, 0).unwrap();
        let grown = set.dilated();
        assert_eq!(grown.count(), 4);
        assert!(grown.contains(0, 0));
        assert!(grown.contains(0, 1));
        assert!(grown.contains(1, 0));
        assert!(grown.contains(1, 1));
    }

    #[test]
    fn dilation_covers_the_chebyshev_neighbourhood() {
        let mut set = Set5::new();
        set.set(2, 2).unwrap();
        let grown = set.dilated();
        assert_eq!(grown.count(), 9);
        for r in 1..=3 {
            for c in 1..=3 {
                assert!(grown.contains(r, c));
            }
        }
    }

    #[test]
    fn complement_stays_inside_the_grid() {
        let empty = Set5::new();
        let full = !empty;
        assert_eq!(full.count(), 25);
        assert_eq!((!full).count(), 0);
    }

    #[test]
    fn iteration_is_row_major() {
        let mut set = Set5::new();
        set.set(4, 4).unwrap();
        set.set(0, 1).unwrap();
        set.set(2, 0).unwrap();
        let cells: Vec<_> = set.iter().collect();
        assert_eq!(cells, vec![(0, 1), (2, 0), (4, 4)]);
    }
}
