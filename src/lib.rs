#![cfg_attr(not(feature = "std"), no_std)]

//! A 5×5 turn-based grid game over an unreliable broadcast radio link.
//!
//! The game core (mask, board, tracker, protocol codec) is `no_std`
//! friendly; the channel, session and console layers sit behind the
//! default `std` feature.

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod board;
#[cfg(feature = "std")]
mod channel;
mod common;
mod config;
mod gunner;
mod io;
#[cfg(feature = "std")]
mod logging;
mod mask;
mod protocol;
#[cfg(feature = "std")]
mod session;
mod tracker;

pub use board::{Board, Mask, Orientation};
#[cfg(feature = "std")]
pub use channel::{Airwave, InMemoryRadio, Received, TurnChannel, UdpRadio};
pub use common::{BoardError, CellMark, Outcome, Role};
pub use config::*;
pub use gunner::{Gunner, RandomGunner};
#[cfg(feature = "std")]
pub use gunner::TiltGunner;
pub use io::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use mask::{CellSet, MaskError};
pub use protocol::{Message, ProtocolError};
#[cfg(feature = "std")]
pub use session::{GameSession, Pace, RoleClaim};
pub use tracker::ShotTracker;
