#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "std")]
use flotilla::{
    init_logging, Airwave, AutoControls, Board, ConsoleControls, ConsoleScreen, GameSession,
    LogSpeaker, Outcome, Pace, RandomGunner, Role, RoleClaim, SilentSpeaker, TiltGunner,
    UdpRadio, DEFAULT_FLEET, DEFAULT_GROUP, DEFAULT_PORT,
};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

#[cfg(feature = "std")]
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "std")]
#[derive(ValueEnum, Clone, Copy, Debug)]
enum ClaimArg {
    /// Announce as First without racing.
    First,
    /// Wait for a First and answer as Second.
    Second,
}

#[cfg(feature = "std")]
#[derive(Subcommand)]
enum Commands {
    /// Single player against a randomly generated board.
    Solo {
        #[arg(long, help = "Fix RNG seed for a reproducible board")]
        seed: Option<u64>,
        #[arg(long, help = "Let a random gunner play instead of the console")]
        auto: bool,
    },
    /// Two automated sessions duelling over an in-process radio.
    Local {
        #[arg(long, help = "Fix RNG seed for a reproducible game")]
        seed: Option<u64>,
    },
    /// Linked play over UDP broadcast. One endpoint per machine; both
    /// machines share the port and group.
    Radio {
        #[arg(long, default_value_t = DEFAULT_GROUP)]
        group: u8,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, value_enum, help = "Skip the trigger race and claim a role")]
        claim: Option<ClaimArg>,
        #[arg(long, help = "Fix RNG seed for a reproducible board")]
        seed: Option<u64>,
        #[arg(long, help = "Let a random gunner play instead of the console")]
        auto: bool,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solo { seed, auto } => {
            let mut rng = make_rng(seed);
            let board = Board::generate(&mut rng, &DEFAULT_FLEET).map_err(|e| anyhow::anyhow!(e))?;
            let outcome = if auto {
                let mut session = GameSession::new(
                    board,
                    Box::new(RandomGunner::new()),
                    ConsoleScreen::new(),
                    AutoControls,
                    LogSpeaker,
                    rng,
                )
                .with_pace(Pace::instant());
                session.run_solo().await?
            } else {
                println!("Find the fleet. Commands: ab = start, a = fire, u/d/l/r = tilt.");
                let gunner = TiltGunner::new(ConsoleScreen::new(), ConsoleControls::new());
                let mut session = GameSession::new(
                    board,
                    Box::new(gunner),
                    ConsoleScreen::new(),
                    ConsoleControls::new(),
                    LogSpeaker,
                    rng,
                );
                session.run_solo().await?
            };
            println!("Game over: {:?}", outcome);
        }
        Commands::Local { seed } => {
            println!("Starting local duel over in-process radio...");
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let mut rng1 = make_rng(seed);
            let mut rng2 = make_rng(seed.map(|s| s.wrapping_add(1)));

            let board1 =
                Board::generate(&mut rng1, &DEFAULT_FLEET).map_err(|e| anyhow::anyhow!(e))?;
            let board2 =
                Board::generate(&mut rng2, &DEFAULT_FLEET).map_err(|e| anyhow::anyhow!(e))?;

            let (mut radio1, mut radio2) = Airwave::pair();

            let future1 = async move {
                let mut session = GameSession::new(
                    board1,
                    Box::new(RandomGunner::new()),
                    flotilla::NullScreen,
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
                    flotilla::NullScreen,
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
            println!(
                "First: {:?} after {} shots; Second: {:?} after {} shots",
                result1.0, result1.1, result2.0, result2.1
            );
        }
        Commands::Radio {
            group,
            port,
            claim,
            seed,
            auto,
        } => {
            println!("Joining radio group {} on port {}...", group, port);
            let mut radio = UdpRadio::bind(group, port).await?;
            let mut rng = make_rng(seed);
            let board = Board::generate(&mut rng, &DEFAULT_FLEET).map_err(|e| anyhow::anyhow!(e))?;

            let role_claim = match claim {
                Some(ClaimArg::First) => RoleClaim::Claim(Role::First),
                Some(ClaimArg::Second) => RoleClaim::Claim(Role::Second),
                None => RoleClaim::TriggerRace,
            };

            let outcome = if auto {
                let mut session = GameSession::new(
                    board,
                    Box::new(RandomGunner::new()),
                    ConsoleScreen::new(),
                    AutoControls,
                    LogSpeaker,
                    rng,
                );
                session.run_linked(&mut radio, role_claim).await?
            } else {
                println!("Commands: ab = start, a = claim first / fire, b = claim second, u/d/l/r = tilt.");
                let gunner = TiltGunner::new(ConsoleScreen::new(), ConsoleControls::new());
                let mut session = GameSession::new(
                    board,
                    Box::new(gunner),
                    ConsoleScreen::new(),
                    ConsoleControls::new(),
                    LogSpeaker,
                    rng,
                );
                session.run_linked(&mut radio, role_claim).await?
            };
            println!("Game over: {:?}", outcome);
        }
    }
    Ok(())
}
