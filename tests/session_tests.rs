use std::sync::{Arc, Mutex};

use flotilla::{
    Airwave, AutoControls, Board, GameSession, InMemoryRadio, Message, NullScreen, Outcome, Pace,
    RandomGunner, Received, Role, RoleClaim, SilentSpeaker, TurnChannel, DEFAULT_FLEET, GRID_SIZE,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::Duration;

fn make_session(seed: u64) -> GameSession<NullScreen, AutoControls, SilentSpeaker> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let board = Board::generate(&mut rng, &DEFAULT_FLEET).unwrap();
    GameSession::new(
        board,
        Box::new(RandomGunner::new()),
        NullScreen,
        AutoControls,
        SilentSpeaker,
        rng,
    )
    .with_pace(Pace::instant())
}

#[tokio::test]
async fn solo_session_always_ends_in_a_win() {
    for seed in [1u64, 17, 99] {
        let mut session = make_session(seed);
        let outcome = session.run_solo().await.unwrap();
        assert_eq!(outcome, Outcome::Won);

        let fleet_cells: usize = DEFAULT_FLEET.iter().sum();
        assert_eq!(session.tracker().hits().count(), fleet_cells);
        assert!(session.shots_fired() <= GRID_SIZE * GRID_SIZE);
    }
}

#[tokio::test]
async fn linked_duel_ends_with_complementary_outcomes() {
    for (seed1, seed2) in [(1u64, 2u64), (10, 20), (123, 456)] {
        let (mut radio1, mut radio2) = Airwave::pair();

        let future1 = async move {
            let mut session = make_session(seed1);
            let outcome = session
                .run_linked(&mut radio1, RoleClaim::Claim(Role::First))
                .await?;
            Ok::<(Outcome, usize), anyhow::Error>((outcome, session.shots_fired()))
        };
        let future2 = async move {
            let mut session = make_session(seed2);
            let outcome = session
                .run_linked(&mut radio2, RoleClaim::Claim(Role::Second))
                .await?;
            Ok::<(Outcome, usize), anyhow::Error>((outcome, session.shots_fired()))
        };

        let ((outcome1, shots1), (outcome2, shots2)) =
            tokio::try_join!(future1, future2).unwrap();

        assert_ne!(outcome1, outcome2, "seeds {}/{}", seed1, seed2);
        // the winner must have uncovered a whole fleet
        let fleet_cells: usize = DEFAULT_FLEET.iter().sum();
        let winner_shots = if outcome1 == Outcome::Won { shots1 } else { shots2 };
        assert!(winner_shots >= fleet_cells);
        assert!(winner_shots <= GRID_SIZE * GRID_SIZE);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    SentShot(u64),
    SentReport(u64),
    GotShot(u64),
    GotReport(u64),
}

/// Channel wrapper that records the shot/report exchange order.
struct RecordingChannel {
    inner: InMemoryRadio,
    events: Arc<Mutex<Vec<Event>>>,
}

#[async_trait::async_trait]
impl TurnChannel for RecordingChannel {
    async fn broadcast(&mut self, msg: Message) -> anyhow::Result<()> {
        match msg {
            Message::Shot { seq, .. } => self.events.lock().unwrap().push(Event::SentShot(seq)),
            Message::Report { seq, .. } => {
                self.events.lock().unwrap().push(Event::SentReport(seq))
            }
            Message::Ready { .. } => {}
        }
        self.inner.broadcast(msg).await
    }

    async fn recv(&mut self, wait: Duration) -> anyhow::Result<Received> {
        let got = self.inner.recv(wait).await?;
        if let Received::Message(msg) = got {
            match msg {
                Message::Shot { seq, .. } => self.events.lock().unwrap().push(Event::GotShot(seq)),
                Message::Report { seq, .. } => {
                    self.events.lock().unwrap().push(Event::GotReport(seq))
                }
                Message::Ready { .. } => {}
            }
        }
        Ok(got)
    }
}

fn position(events: &[Event], needle: Event) -> Option<usize> {
    events.iter().position(|&e| e == needle)
}

#[tokio::test]
async fn roles_strictly_alternate_within_every_round() {
    let (radio1, radio2) = Airwave::pair();
    let first_events = Arc::new(Mutex::new(Vec::new()));
    let second_events = Arc::new(Mutex::new(Vec::new()));

    let mut channel1 = RecordingChannel {
        inner: radio1,
        events: first_events.clone(),
    };
    let mut channel2 = RecordingChannel {
        inner: radio2,
        events: second_events.clone(),
    };

    let future1 = async move {
        make_session(3)
            .run_linked(&mut channel1, RoleClaim::Claim(Role::First))
            .await
    };
    let future2 = async move {
        make_session(4)
            .run_linked(&mut channel2, RoleClaim::Claim(Role::Second))
            .await
    };
    tokio::try_join!(future1, future2).unwrap();

    let first = first_events.lock().unwrap().clone();
    let second = second_events.lock().unwrap().clone();
    assert!(!first.is_empty() && !second.is_empty());

    let rounds = first
        .iter()
        .filter(|e| matches!(e, Event::SentShot(_)))
        .count() as u64;
    for seq in 0..rounds {
        // First fires, hears the report, then takes the return shot
        let sent = position(&first, Event::SentShot(seq)).unwrap();
        let report = position(&first, Event::GotReport(seq)).unwrap();
        assert!(sent < report, "round {}", seq);
        if let Some(got) = position(&first, Event::GotShot(seq)) {
            assert!(report < got, "round {}", seq);
        }

        // Second answers before firing back
        let got = position(&second, Event::GotShot(seq)).unwrap();
        let replied = position(&second, Event::SentReport(seq)).unwrap();
        assert!(got < replied, "round {}", seq);
        if let Some(fired) = position(&second, Event::SentShot(seq)) {
            assert!(replied < fired, "round {}", seq);
        }
    }
}

#[tokio::test]
async fn mismatched_report_sequence_aborts_the_session() {
    let (mut radio_a, mut radio_b) = Airwave::pair();

    let session_future = async move {
        make_session(5)
            .run_linked(&mut radio_a, RoleClaim::Claim(Role::First))
            .await
    };
    let peer_future = async move {
        radio_b
            .broadcast(Message::Ready { role: Role::Second })
            .await?;
        // wait for the opening shot, then reply with a stale sequence
        loop {
            match radio_b.recv(Duration::from_millis(50)).await? {
                Received::Message(Message::Shot { .. }) => break,
                _ => {}
            }
        }
        radio_b
            .broadcast(Message::Report {
                seq: 7,
                hit: false,
                game_over: false,
            })
            .await?;
        Ok::<(), anyhow::Error>(())
    };

    let (session_result, peer_result) = tokio::join!(session_future, peer_future);
    peer_result.unwrap();
    let err = session_result.unwrap_err();
    assert!(err.to_string().contains("expected report"), "{}", err);
}

#[tokio::test]
async fn out_of_order_shot_aborts_the_session() {
    let (mut radio_a, mut radio_b) = Airwave::pair();

    let session_future = async move {
        make_session(6)
            .run_linked(&mut radio_a, RoleClaim::Claim(Role::Second))
            .await
    };
    let peer_future = async move {
        radio_b
            .broadcast(Message::Ready { role: Role::First })
            .await?;
        // wait for the role answer, then open with a bogus sequence
        loop {
            match radio_b.recv(Duration::from_millis(50)).await? {
                Received::Message(Message::Ready { role: Role::Second }) => break,
                _ => {}
            }
        }
        radio_b
            .broadcast(Message::Shot {
                seq: 5,
                row: 0,
                col: 0,
            })
            .await?;
        Ok::<(), anyhow::Error>(())
    };

    let (session_result, peer_result) = tokio::join!(session_future, peer_future);
    peer_result.unwrap();
    let err = session_result.unwrap_err();
    assert!(err.to_string().contains("out-of-order shot"), "{}", err);
}

#[tokio::test]
async fn silent_opponent_trips_the_reply_deadline() {
    let (mut radio_a, mut radio_b) = Airwave::pair();

    let pace = Pace {
        reply_deadline: Duration::from_millis(50),
        ..Pace::instant()
    };

    let session_future = async move {
        let mut rng = SmallRng::seed_from_u64(8);
        let board = Board::generate(&mut rng, &DEFAULT_FLEET).unwrap();
        GameSession::new(
            board,
            Box::new(RandomGunner::new()),
            NullScreen,
            AutoControls,
            SilentSpeaker,
            rng,
        )
        .with_pace(pace)
        .run_linked(&mut radio_a, RoleClaim::Claim(Role::First))
        .await
    };
    let peer_future = async move {
        radio_b
            .broadcast(Message::Ready { role: Role::Second })
            .await?;
        // swallow the shot and never report back
        loop {
            match radio_b.recv(Duration::from_millis(50)).await? {
                Received::Message(Message::Shot { .. }) => break,
                Received::TimedOut => {}
                _ => {}
            }
        }
        Ok::<(), anyhow::Error>(())
    };

    let (session_result, peer_result) = tokio::join!(session_future, peer_future);
    peer_result.unwrap();
    let err = session_result.unwrap_err();
    assert!(err.to_string().contains("no report"), "{}", err);
}
