//! Game constants. Values mirror the classroom hardware build: a 5×5 LED
//! grid, a three-ship fleet and raw accelerometer units.

/// Side length of the square grid.
pub const GRID_SIZE: usize = 5;

/// Ship lengths placed on a fresh board, largest first.
pub const DEFAULT_FLEET: [usize; 3] = [4, 3, 2];

/// Raw tilt magnitude above which the aim cursor takes one step.
pub const TILT_THRESHOLD: i32 = 400;

/// Shared radio group identifier. A namespace, not a security boundary.
pub const DEFAULT_GROUP: u8 = 23;

/// UDP port the broadcast radio binds to.
pub const DEFAULT_PORT: u16 = 20023;

/// Whole-grid regeneration attempts before fleet placement gives up.
pub const MAX_BOARD_ATTEMPTS: usize = 64;

/// Display intensity for a ship cell.
pub const SHIP_GLOW: u8 = 9;

/// Display intensity for the aim cursor.
pub const CURSOR_GLOW: u8 = 7;

/// Display intensity for a water cell.
pub const WATER_GLOW: u8 = 2;

/// Display intensity for a cell nothing is known about.
pub const DARK: u8 = 0;

/// Inter-poll delay on the radio and input loops, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 100;
