#![cfg(feature = "std")]

//! The game session: one participant's state machine from the start gate
//! through the turn loop to a terminal outcome.
//!
//! `AwaitingStart → RoleSelection → {Turn:Local ⇄ Turn:Remote} → {Won, Lost}`
//!
//! One session type covers both play modes: `run_solo` resolves shots
//! directly against the local board, `run_linked` exchanges them with a
//! peer session over a [`TurnChannel`]. Roles strictly alternate every
//! half-turn: First always sends before receiving, Second always receives
//! before sending. That fixed order is the only thing keeping the two
//! state machines aligned, so any unexpected message kind or sequence
//! number aborts the session rather than guessing.

use rand::rngs::SmallRng;
use tokio::time::{sleep, Duration, Instant};

use crate::board::Board;
use crate::channel::{Received, TurnChannel};
use crate::common::{Outcome, Role};
use crate::config::{CURSOR_GLOW, POLL_INTERVAL_MS};
use crate::gunner::Gunner;
use crate::io::{Controls, Cue, Glyph, Screen, Speaker};
use crate::protocol::Message;
use crate::tracker::ShotTracker;

/// Every delay the session choreography uses, injectable so tests and
/// headless runs finish instantly.
#[derive(Debug, Clone, Copy)]
pub struct Pace {
    /// Attract-mode blink while waiting for the start gate.
    pub attract_blink: Duration,
    /// Hold per countdown digit.
    pub countdown_step: Duration,
    /// Cadence of receive polls and input sampling.
    pub poll: Duration,
    /// One phase of the incoming-shot blink.
    pub blink_step: Duration,
    /// How long a sent shot may wait for its report before the session
    /// aborts. Waiting for the opponent's *shot* is unbounded; that is
    /// their thinking time.
    pub reply_deadline: Duration,
}

impl Default for Pace {
    fn default() -> Self {
        Pace {
            attract_blink: Duration::from_millis(350),
            countdown_step: Duration::from_secs(1),
            poll: Duration::from_millis(POLL_INTERVAL_MS),
            blink_step: Duration::from_millis(500),
            reply_deadline: Duration::from_secs(60),
        }
    }
}

impl Pace {
    /// No visible delays; polls stay non-zero so waiting loops still yield
    /// to the peer future on a shared runtime.
    pub fn instant() -> Self {
        Pace {
            attract_blink: Duration::ZERO,
            countdown_step: Duration::ZERO,
            poll: Duration::from_millis(1),
            blink_step: Duration::ZERO,
            reply_deadline: Duration::from_secs(5),
        }
    }
}

/// How a linked session obtains its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClaim {
    /// The trigger race: trigger A claims First, trigger B waits
    /// for a First and answers as Second.
    TriggerRace,
    /// Skip the race and announce this exact role. Used by the automated
    /// modes and tests.
    Claim(Role),
}

/// One participant's game. Owns the board it defends (or, solo, attacks),
/// both shot trackers, the gunner and the hardware handles.
pub struct GameSession<S: Screen, C: Controls, A: Speaker> {
    board: Board,
    /// What we know about the opponent's grid.
    tracker: ShotTracker,
    /// What the opponent has learned about ours; the loss scan reads this.
    incoming: ShotTracker,
    gunner: Box<dyn Gunner + Send>,
    screen: S,
    controls: C,
    speaker: A,
    rng: SmallRng,
    pace: Pace,
}

impl<S: Screen, C: Controls, A: Speaker> GameSession<S, C, A> {
    pub fn new(
        board: Board,
        gunner: Box<dyn Gunner + Send>,
        screen: S,
        controls: C,
        speaker: A,
        rng: SmallRng,
    ) -> Self {
        Self {
            board,
            tracker: ShotTracker::new(),
            incoming: ShotTracker::new(),
            gunner,
            screen,
            controls,
            speaker,
            rng,
            pace: Pace::default(),
        }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    /// Shots this session has fired so far.
    pub fn shots_fired(&self) -> usize {
        self.tracker.shot_count()
    }

    /// The shot record against the opponent.
    pub fn tracker(&self) -> &ShotTracker {
        &self.tracker
    }

    /// Single-player: shoot at the session's own (generated) board until
    /// every ship cell is found. Cannot be lost.
    pub async fn run_solo(&mut self) -> anyhow::Result<Outcome> {
        self.await_start().await;
        loop {
            let (row, col) = self.gunner.select_target(&mut self.rng, &mut self.tracker);
            let hit = self.board.is_hit(row, col);
            self.tracker.record(row, col, hit);
            self.gunner.handle_shot_result((row, col), hit);

            if hit {
                self.screen.show_glyph(Glyph::Target);
                self.speaker.play(Cue::PowerUp);
                // win is only reachable on a hit, so only rescan then
                if self.tracker.covers(&self.board.ship_cells()) {
                    self.finish(true);
                    return Ok(Outcome::Won);
                }
            } else {
                self.screen.show_glyph(Glyph::Cross);
                self.speaker.play(Cue::PowerDown);
            }
        }
    }

    /// Two-player: race (or claim) a role, then alternate shot exchange
    /// until one side's fleet is fully found.
    pub async fn run_linked(
        &mut self,
        channel: &mut dyn TurnChannel,
        claim: RoleClaim,
    ) -> anyhow::Result<Outcome> {
        self.await_start().await;
        let role = self.select_role(channel, claim).await?;
        log::info!("playing as {}", role);

        let mut seq: u64 = 0;
        let won = loop {
            match role {
                Role::First => {
                    if self.send_shot(channel, seq).await? {
                        break true;
                    }
                    if self.receive_shot(channel, seq).await? {
                        break false;
                    }
                }
                Role::Second => {
                    if self.receive_shot(channel, seq).await? {
                        break false;
                    }
                    if self.send_shot(channel, seq).await? {
                        break true;
                    }
                }
            }
            seq += 1;
        };

        self.finish(won);
        Ok(if won { Outcome::Won } else { Outcome::Lost })
    }

    /// Attract mode until both triggers are held together, then a 3-2-1
    /// countdown. Presentational only.
    async fn await_start(&mut self) {
        self.screen.show_glyph(Glyph::Target);
        self.speaker.play(Cue::StartJingle);
        loop {
            self.controls.poll();
            if self.controls.trigger_a() && self.controls.trigger_b() {
                break;
            }
            self.screen.clear();
            sleep(self.pace.attract_blink).await;
            self.screen.show_glyph(Glyph::Target);
            sleep(self.pace.attract_blink).await;
        }

        for digit in [3, 2, 1] {
            self.screen.show_glyph(Glyph::Digit(digit));
            self.speaker.play(Cue::CountdownTick);
            sleep(self.pace.countdown_step).await;
        }
        self.speaker.play(Cue::PowerUp);
        self.screen.clear();
    }

    /// Resolve which role this session plays.
    ///
    /// Known race, kept on purpose: if both
    /// participants fire trigger A in the same poll window, both announce
    /// First and both then wait forever for a Second that never answers.
    /// Messages that are not the awaited READY are ignored here rather
    /// than treated as fatal, since stale group traffic is expected while
    /// players join.
    async fn select_role(
        &mut self,
        channel: &mut dyn TurnChannel,
        claim: RoleClaim,
    ) -> anyhow::Result<Role> {
        self.screen.show_glyph(Glyph::Anchor);

        let role = loop {
            let claimed = match claim {
                RoleClaim::Claim(role) => Some(role),
                RoleClaim::TriggerRace => {
                    self.controls.poll();
                    if self.controls.trigger_a() {
                        Some(Role::First)
                    } else if self.controls.trigger_b() {
                        Some(Role::Second)
                    } else {
                        None
                    }
                }
            };

            match claimed {
                Some(Role::First) => {
                    channel.broadcast(Message::Ready { role: Role::First }).await?;
                    self.await_ready(channel, Role::Second).await?;
                    break Role::First;
                }
                Some(Role::Second) => {
                    self.await_ready(channel, Role::First).await?;
                    channel
                        .broadcast(Message::Ready { role: Role::Second })
                        .await?;
                    break Role::Second;
                }
                None => sleep(self.pace.poll).await,
            }
        };

        self.screen.show_glyph(Glyph::role(role));
        sleep(self.pace.countdown_step).await;
        Ok(role)
    }

    /// Poll until the peer announces `role`. Unbounded: joining has no
    /// deadline, exactly like the attract loop.
    async fn await_ready(
        &mut self,
        channel: &mut dyn TurnChannel,
        role: Role,
    ) -> anyhow::Result<()> {
        loop {
            match channel.recv(self.pace.poll).await? {
                Received::Message(Message::Ready { role: r }) if r == role => return Ok(()),
                Received::Message(other) => {
                    log::debug!("ignoring {:?} while waiting for ready", other);
                }
                Received::TimedOut => {}
            }
        }
    }

    /// Turn:Local: aim, broadcast the shot, block for its report, record
    /// the result. Returns true when the report says we won.
    async fn send_shot(
        &mut self,
        channel: &mut dyn TurnChannel,
        seq: u64,
    ) -> anyhow::Result<bool> {
        let (row, col) = self.gunner.select_target(&mut self.rng, &mut self.tracker);
        channel
            .broadcast(Message::Shot {
                seq,
                row: row as u8,
                col: col as u8,
            })
            .await?;

        let (hit, game_over) = self.await_report(channel, seq).await?;
        self.tracker.record(row, col, hit);
        self.gunner.handle_shot_result((row, col), hit);

        if hit {
            self.screen.show_glyph(Glyph::Target);
            self.speaker.play(Cue::PowerUp);
        } else {
            self.screen.show_glyph(Glyph::Cross);
            self.speaker.play(Cue::PowerDown);
        }
        Ok(game_over)
    }

    /// Wait for the report matching `seq`, bounded by the reply deadline.
    async fn await_report(
        &mut self,
        channel: &mut dyn TurnChannel,
        seq: u64,
    ) -> anyhow::Result<(bool, bool)> {
        let deadline = Instant::now() + self.pace.reply_deadline;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(anyhow::anyhow!(
                    "no report for shot {} within {:?}",
                    seq,
                    self.pace.reply_deadline
                ));
            }
            match channel.recv(self.pace.poll.min(remaining)).await? {
                Received::TimedOut => {}
                Received::Message(Message::Report {
                    seq: got,
                    hit,
                    game_over,
                }) if got == seq => return Ok((hit, game_over)),
                Received::Message(other) => {
                    return Err(anyhow::anyhow!(
                        "expected report {}, got {:?} (closing session)",
                        seq,
                        other
                    ));
                }
            }
        }
    }

    /// Turn:Remote: show our sea, block for the opponent's shot, resolve
    /// it, reply with the report. Returns true when that shot lost us the
    /// game.
    async fn receive_shot(
        &mut self,
        channel: &mut dyn TurnChannel,
        expected_seq: u64,
    ) -> anyhow::Result<bool> {
        self.screen.show_frame(&self.board.render());

        let (row, col) = loop {
            match channel.recv(self.pace.poll).await? {
                Received::TimedOut => {}
                Received::Message(Message::Shot { seq, row, col }) => {
                    if seq != expected_seq {
                        return Err(anyhow::anyhow!(
                            "out-of-order shot: expected seq {}, got {} (closing session)",
                            expected_seq,
                            seq
                        ));
                    }
                    break (row as usize, col as usize);
                }
                Received::Message(other) => {
                    return Err(anyhow::anyhow!(
                        "expected shot {}, got {:?} (closing session)",
                        expected_seq,
                        other
                    ));
                }
            }
        };

        self.blink_cell(row, col, 3).await;
        let hit = self.board.is_hit(row, col);
        self.incoming.record(row, col, hit);
        self.gunner.handle_incoming_shot((row, col), hit);
        let lost = self.incoming.covers(&self.board.ship_cells());

        channel
            .broadcast(Message::Report {
                seq: expected_seq,
                hit,
                game_over: lost,
            })
            .await?;

        // cues invert on the receiving side: their hit is our power-down
        if hit {
            self.screen.show_glyph(Glyph::Target);
            self.speaker.play(Cue::PowerDown);
        } else {
            self.screen.show_glyph(Glyph::Cross);
            self.speaker.play(Cue::PowerUp);
        }
        Ok(lost)
    }

    /// Alternate the cell between the cursor marker and its true state.
    async fn blink_cell(&mut self, row: usize, col: usize, times: usize) {
        for _ in 0..times {
            self.screen.set_pixel(row, col, CURSOR_GLOW);
            sleep(self.pace.blink_step).await;
            self.screen.set_pixel(row, col, self.board.glow(row, col));
            sleep(self.pace.blink_step).await;
        }
    }

    fn finish(&mut self, won: bool) {
        if won {
            self.screen.show_glyph(Glyph::Happy);
            self.speaker.play(Cue::Victory);
        } else {
            self.screen.show_glyph(Glyph::Sad);
            self.speaker.play(Cue::Defeat);
        }
    }
}
