//! Hardware capability seams: screen, controls and speaker.
//!
//! The game never touches a device directly; sessions receive these as
//! injected handles so simulated and scripted doubles can stand in for the
//! real thing.

use crate::common::Role;
use crate::config::GRID_SIZE;
use core::fmt;

/// A full-frame intensity grid: one glow level (0..=9) per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame([[u8; GRID_SIZE]; GRID_SIZE]);

impl Frame {
    /// Build a frame cell by cell.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut cells = [[0u8; GRID_SIZE]; GRID_SIZE];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = f(r, c);
            }
        }
        Frame(cells)
    }

    /// Glow level at (row, col).
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    /// Set the glow level at (row, col).
    pub fn set(&mut self, row: usize, col: usize, glow: u8) {
        self.0[row][col] = glow;
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            for cell in row {
                write!(f, "{} ", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Named full-screen pictures used by the game choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Concentric target rings; shown while attracting and on a hit.
    Target,
    /// A cross; shown on a miss.
    Cross,
    /// Happy face on victory.
    Happy,
    /// Sad face on defeat.
    Sad,
    /// An anchor; shown while roles are being chosen.
    Anchor,
    /// A single digit (countdown, role number).
    Digit(u8),
}

impl Glyph {
    /// The digit glyph announcing an assigned role.
    pub fn role(role: Role) -> Glyph {
        match role {
            Role::First => Glyph::Digit(1),
            Role::Second => Glyph::Digit(2),
        }
    }
}

/// Short sound cues, fire and forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    StartJingle,
    CountdownTick,
    PowerUp,
    PowerDown,
    Victory,
    Defeat,
}

/// The 5×5 display.
pub trait Screen {
    /// Replace the whole frame.
    fn show_frame(&mut self, frame: &Frame);
    /// Update one pixel, keeping the rest of the frame.
    fn set_pixel(&mut self, row: usize, col: usize, glow: u8);
    /// Show a named picture.
    fn show_glyph(&mut self, glyph: Glyph);
    /// Blank the display.
    fn clear(&mut self);
}

/// Two momentary triggers and two signed tilt axes.
pub trait Controls {
    /// Sample the hardware once. Called at the top of every polling loop;
    /// trigger and tilt reads reflect the latest sample.
    fn poll(&mut self) {}
    /// Whether trigger A is currently held.
    fn trigger_a(&mut self) -> bool;
    /// Whether trigger B is currently held.
    fn trigger_b(&mut self) -> bool;
    /// Raw tilt magnitudes (x, y); one sample per call.
    fn tilt(&mut self) -> (i32, i32);
}

/// Sound output.
pub trait Speaker {
    /// Play a short cue; returns when the cue has been handed off.
    fn play(&mut self, cue: Cue);
}

/// Screen that drops every frame. For headless sessions and tests.
#[derive(Debug, Default)]
pub struct NullScreen;

impl Screen for NullScreen {
    fn show_frame(&mut self, _frame: &Frame) {}
    fn set_pixel(&mut self, _row: usize, _col: usize, _glow: u8) {}
    fn show_glyph(&mut self, _glyph: Glyph) {}
    fn clear(&mut self) {}
}

/// Speaker that swallows every cue.
#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn play(&mut self, _cue: Cue) {}
}

/// Controls with both triggers permanently held and the board level.
/// Lets automated sessions sail through the start gate.
#[derive(Debug, Default)]
pub struct AutoControls;

impl Controls for AutoControls {
    fn trigger_a(&mut self) -> bool {
        true
    }
    fn trigger_b(&mut self) -> bool {
        true
    }
    fn tilt(&mut self) -> (i32, i32) {
        (0, 0)
    }
}

#[cfg(feature = "std")]
pub use self::std_io::*;

#[cfg(feature = "std")]
mod std_io {
    use super::*;
    use crate::config::TILT_THRESHOLD;
    use std::collections::VecDeque;
    use std::io::{BufRead, Write};

    /// Prints frames and glyphs to the terminal, keeping a frame buffer so
    /// single-pixel writes redraw correctly.
    #[derive(Debug, Default)]
    pub struct ConsoleScreen {
        buffer: Frame,
    }

    impl ConsoleScreen {
        pub fn new() -> Self {
            Self::default()
        }

        fn draw(&self) {
            println!();
            println!("    A B C D E");
            for r in 0..GRID_SIZE {
                print!("  {} ", r + 1);
                for c in 0..GRID_SIZE {
                    let glow = self.buffer.get(r, c);
                    if glow == 0 {
                        print!(". ");
                    } else {
                        print!("{} ", glow);
                    }
                }
                println!();
            }
        }
    }

    impl Screen for ConsoleScreen {
        fn show_frame(&mut self, frame: &Frame) {
            self.buffer = *frame;
            self.draw();
        }

        fn set_pixel(&mut self, row: usize, col: usize, glow: u8) {
            self.buffer.set(row, col, glow);
            self.draw();
        }

        fn show_glyph(&mut self, glyph: Glyph) {
            match glyph {
                Glyph::Target => println!("  [ (@) target ]"),
                Glyph::Cross => println!("  [  X  miss   ]"),
                Glyph::Happy => println!("  [ :)  happy  ]"),
                Glyph::Sad => println!("  [ :(  sad    ]"),
                Glyph::Anchor => println!("  [ -U- anchor ]"),
                Glyph::Digit(d) => println!("  [  {}  ]", d),
            }
        }

        fn clear(&mut self) {
            self.buffer = Frame::default();
            println!();
        }
    }

    /// Line-driven controls for terminal play. Each input poll reads one
    /// line from stdin: `a`, `b` or `ab` hold the triggers; `u`/`d`/`l`/`r`
    /// tilt one step; an empty line does nothing.
    pub struct ConsoleControls {
        held_a: bool,
        held_b: bool,
        pending_tilt: (i32, i32),
    }

    impl ConsoleControls {
        pub fn new() -> Self {
            Self {
                held_a: false,
                held_b: false,
                pending_tilt: (0, 0),
            }
        }

        /// Read and decode the next command line.
        fn read_command(&mut self) {
            self.held_a = false;
            self.held_b = false;
            self.pending_tilt = (0, 0);

            print!("> ");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            if std::io::stdin().lock().read_line(&mut line).is_err() {
                return;
            }
            let step = TILT_THRESHOLD + 100;
            for ch in line.trim().chars() {
                match ch {
                    'a' => self.held_a = true,
                    'b' => self.held_b = true,
                    'l' => self.pending_tilt.0 = -step,
                    'r' => self.pending_tilt.0 = step,
                    'u' => self.pending_tilt.1 = -step,
                    'd' => self.pending_tilt.1 = step,
                    _ => {}
                }
            }
        }
    }

    impl Default for ConsoleControls {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Controls for ConsoleControls {
        fn poll(&mut self) {
            self.read_command();
        }

        fn trigger_a(&mut self) -> bool {
            self.held_a
        }

        fn trigger_b(&mut self) -> bool {
            self.held_b
        }

        fn tilt(&mut self) -> (i32, i32) {
            self.pending_tilt
        }
    }

    /// Speaker that logs cue names instead of playing them.
    #[derive(Debug, Default)]
    pub struct LogSpeaker;

    impl Speaker for LogSpeaker {
        fn play(&mut self, cue: Cue) {
            log::info!("cue: {:?}", cue);
        }
    }

    /// Controls fed from a fixed tilt script; trigger A fires once the
    /// script is exhausted. For driving the aim loop in tests.
    #[derive(Debug, Default)]
    pub struct ScriptedControls {
        tilts: VecDeque<(i32, i32)>,
    }

    impl ScriptedControls {
        pub fn new(tilts: impl IntoIterator<Item = (i32, i32)>) -> Self {
            Self {
                tilts: tilts.into_iter().collect(),
            }
        }
    }

    impl Controls for ScriptedControls {
        fn trigger_a(&mut self) -> bool {
            self.tilts.is_empty()
        }

        fn trigger_b(&mut self) -> bool {
            false
        }

        fn tilt(&mut self) -> (i32, i32) {
            self.tilts.pop_front().unwrap_or((0, 0))
        }
    }
}
