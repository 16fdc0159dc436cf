//! Headless seeded duel. Prints one JSON summary line, for scripted
//! tournaments and regression sweeps.

use flotilla::{
    Airwave, AutoControls, Board, GameSession, NullScreen, Outcome, Pace, RandomGunner, Role,
    RoleClaim, SilentSpeaker, DEFAULT_FLEET,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;

#[derive(Serialize)]
struct PlayerSummary {
    outcome: String,
    shots: usize,
}

#[derive(Serialize)]
struct DuelSummary {
    first: PlayerSummary,
    second: PlayerSummary,
    winner: Option<&'static str>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flotilla::init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);

    let board1 = Board::generate(&mut rng1, &DEFAULT_FLEET).map_err(|e| anyhow::anyhow!(e))?;
    let board2 = Board::generate(&mut rng2, &DEFAULT_FLEET).map_err(|e| anyhow::anyhow!(e))?;

    let (mut radio1, mut radio2) = Airwave::pair();

    let future1 = async move {
        let mut session = GameSession::new(
            board1,
            Box::new(RandomGunner::new()),
            NullScreen,
            AutoControls,
            SilentSpeaker,
            rng1,
        )
        .with_pace(Pace::instant());
        let outcome = session
            .run_linked(&mut radio1, RoleClaim::Claim(Role::First))
            .await?;
        Ok::<(Outcome, usize), anyhow::Error>((outcome, session.shots_fired()))
    };
    let future2 = async move {
        let mut session = GameSession::new(
            board2,
            Box::new(RandomGunner::new()),
            NullScreen,
            AutoControls,
            SilentSpeaker,
            rng2,
        )
        .with_pace(Pace::instant());
        let outcome = session
            .run_linked(&mut radio2, RoleClaim::Claim(Role::Second))
            .await?;
        Ok::<(Outcome, usize), anyhow::Error>((outcome, session.shots_fired()))
    };

    let (result1, result2) = tokio::try_join!(future1, future2)?;

    let winner = match (result1.0, result2.0) {
        (Outcome::Won, Outcome::Lost) => Some("first"),
        (Outcome::Lost, Outcome::Won) => Some("second"),
        _ => None,
    };

    let summary = DuelSummary {
        first: PlayerSummary {
            outcome: format!("{:?}", result1.0),
            shots: result1.1,
        },
        second: PlayerSummary {
            outcome: format!("{:?}", result2.0),
            shots: result2.1,
        },
        winner,
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
