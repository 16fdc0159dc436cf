//! Turn messages and their plain-text wire codec.
//!
//! Messages are single lines of space-separated fields, one message per
//! radio send. The payload shapes keep the legacy formats (`<row> <col>`
//! for a shot, `<True|False> <True|False>` for its report) behind a kind
//! tag and a sequence number so receivers can reject stray or
//! out-of-order traffic instead of silently desynchronizing.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

use crate::common::Role;
use crate::config::GRID_SIZE;
use core::fmt;

/// One turn-exchange message. Exactly one `Shot`/`Report` pair flows per
/// round; nothing is retried or acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Role announcement during session setup.
    Ready { role: Role },
    /// A shot request at (row, col).
    Shot { seq: u64, row: u8, col: u8 },
    /// The response to the same-sequence shot: did it hit, and did it end
    /// the game.
    Report { seq: u64, hit: bool, game_over: bool },
}

/// Errors produced when decoding wire text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line was empty.
    Empty,
    /// The kind tag was not READY, SHOT or REPORT.
    UnknownKind,
    /// A required field was absent.
    MissingField(&'static str),
    /// A numeric field did not parse.
    BadNumber(&'static str),
    /// A boolean field was neither `True` nor `False`.
    BadBool(&'static str),
    /// The role digit was neither 1 nor 2.
    BadRole,
    /// A shot coordinate fell outside the grid.
    CoordinateOutOfRange { row: u64, col: u64 },
    /// Extra fields trailed the message.
    TrailingInput,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Empty => write!(f, "empty message"),
            ProtocolError::UnknownKind => write!(f, "unknown message kind"),
            ProtocolError::MissingField(name) => write!(f, "missing field: {}", name),
            ProtocolError::BadNumber(name) => write!(f, "field is not a number: {}", name),
            ProtocolError::BadBool(name) => {
                write!(f, "field is not True or False: {}", name)
            }
            ProtocolError::BadRole => write!(f, "role must be 1 or 2"),
            ProtocolError::CoordinateOutOfRange { row, col } => {
                write!(f, "coordinate ({}, {}) is outside the grid", row, col)
            }
            ProtocolError::TrailingInput => write!(f, "unexpected trailing fields"),
        }
    }
}

fn bool_token(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn parse_bool(token: &str, name: &'static str) -> Result<bool, ProtocolError> {
    match token {
        "True" => Ok(true),
        "False" => Ok(false),
        _ => Err(ProtocolError::BadBool(name)),
    }
}

impl Message {
    /// Encode to the wire text.
    pub fn encode(&self) -> String {
        match *self {
            Message::Ready { role } => {
                let digit = match role {
                    Role::First => 1,
                    Role::Second => 2,
                };
                format!("READY {}", digit)
            }
            Message::Shot { seq, row, col } => format!("SHOT {} {} {}", seq, row, col),
            Message::Report {
                seq,
                hit,
                game_over,
            } => {
                format!("REPORT {} {} {}", seq, bool_token(hit), bool_token(game_over))
            }
        }
    }

    /// Decode wire text. Anything that does not parse exactly is rejected;
    /// callers decide whether to ignore or abort.
    pub fn parse(text: &str) -> Result<Message, ProtocolError> {
        let mut fields = text.split_whitespace();
        let kind = fields.next().ok_or(ProtocolError::Empty)?;

        let msg = match kind {
            "READY" => {
                let digit = fields.next().ok_or(ProtocolError::MissingField("role"))?;
                let role = match digit {
                    "1" => Role::First,
                    "2" => Role::Second,
                    _ => return Err(ProtocolError::BadRole),
                };
                Message::Ready { role }
            }
            "SHOT" => {
                let seq = next_number(&mut fields, "seq")?;
                let row = next_number(&mut fields, "row")?;
                let col = next_number(&mut fields, "col")?;
                if row >= GRID_SIZE as u64 || col >= GRID_SIZE as u64 {
                    return Err(ProtocolError::CoordinateOutOfRange { row, col });
                }
                Message::Shot {
                    seq,
                    row: row as u8,
                    col: col as u8,
                }
            }
            "REPORT" => {
                let seq = next_number(&mut fields, "seq")?;
                let hit = fields
                    .next()
                    .ok_or(ProtocolError::MissingField("hit"))
                    .and_then(|t| parse_bool(t, "hit"))?;
                let game_over = fields
                    .next()
                    .ok_or(ProtocolError::MissingField("game_over"))
                    .and_then(|t| parse_bool(t, "game_over"))?;
                Message::Report {
                    seq,
                    hit,
                    game_over,
                }
            }
            _ => return Err(ProtocolError::UnknownKind),
        };

        if fields.next().is_some() {
            return Err(ProtocolError::TrailingInput);
        }
        Ok(msg)
    }
}

fn next_number<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<u64, ProtocolError> {
    fields
        .next()
        .ok_or(ProtocolError::MissingField(name))?
        .parse()
        .map_err(|_| ProtocolError::BadNumber(name))
}
