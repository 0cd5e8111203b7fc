//! Flap Royale headless driver
//!
//! Runs rounds without a renderer and prints the session as JSON.
//! A graphical front end drives the same `tick` once per frame instead.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use flap_royale::sim::{ColorToken, RoundEvent, RoundSnapshot, RoundState, TickInput, tick};
use flap_royale::{SessionStats, Tuning};

#[derive(Parser)]
#[command(name = "flap-royale", about = "Headless Flap Royale rounds")]
struct Cli {
    /// Session seed (each round draws its own seed from it)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rounds to play
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// JSON tuning file (missing fields use defaults)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Give up on a round after this many ticks
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,

    /// Fly the player for this many ticks, then let go so it falls
    #[arg(long, default_value_t = 3_000)]
    autopilot_ticks: u64,

    /// Player name shown above the avatar
    #[arg(long, default_value = "")]
    name: String,

    /// Player color (cyan, magenta, green, yellow, orange)
    #[arg(long, default_value = "cyan")]
    color: String,

    /// Print the default tuning as JSON and exit
    #[arg(long)]
    dump_tuning: bool,
}

#[derive(Serialize)]
struct Report {
    seed: u64,
    stats: SessionStats,
    last_round: RoundSnapshot,
}

/// Headless game instance holding all state
struct Game {
    state: RoundState,
    stats: SessionStats,
    autopilot_ticks: u64,
}

impl Game {
    fn new(tuning: Tuning, seed: Option<u64>, autopilot_ticks: u64) -> Self {
        let state = match seed {
            Some(seed) => RoundState::with_seed(tuning, seed),
            None => RoundState::new(tuning),
        };
        Self {
            state,
            stats: SessionStats::new(),
            autopilot_ticks,
        }
    }

    /// Input for the next tick: autopilot until the cutoff, then nothing
    fn input(&self) -> TickInput {
        TickInput {
            autopilot: self.state.elapsed_ticks() < self.autopilot_ticks,
            ..Default::default()
        }
    }

    /// Play one round to completion (or the tick cap)
    fn play_round(&mut self, name: &str, color: ColorToken, max_ticks: u64) {
        self.state.start(name, color);

        while self.state.is_running() && self.state.elapsed_ticks() < max_ticks {
            let input = self.input();
            tick(&mut self.state, &input);

            for event in self.state.drain_events() {
                if let RoundEvent::ObstaclePassed { score, .. } = event {
                    log::debug!("Score {}", score);
                }
            }
        }

        match self.state.outcome() {
            Some(outcome) => {
                self.stats
                    .record(outcome, self.state.score(), self.state.elapsed_ticks());
            }
            None => {
                log::warn!(
                    "Round still running after {} ticks ({} alive), abandoning",
                    max_ticks,
                    self.state.alive_count()
                );
                self.state.reset();
            }
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.dump_tuning {
        match Tuning::default().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize tuning: {}", e),
        }
        return;
    }

    let tuning = cli.tuning.as_ref().map(Tuning::load).unwrap_or_default();
    let color = ColorToken::from_str(&cli.color).unwrap_or_else(|| {
        log::warn!("Unknown color {:?}, using cyan", cli.color);
        ColorToken::Cyan
    });

    let mut game = Game::new(tuning, cli.seed, cli.autopilot_ticks);
    log::info!(
        "Flap Royale (headless) starting: {} round(s), seed {}, autopilot for {} ticks",
        cli.rounds,
        game.state.seed(),
        cli.autopilot_ticks
    );

    for _ in 0..cli.rounds {
        game.play_round(&cli.name, color, cli.max_ticks);
    }

    log::info!(
        "Session: {} wins / {} losses, best score {}",
        game.stats.wins,
        game.stats.losses,
        game.stats.best_score
    );

    let report = Report {
        seed: game.state.seed(),
        last_round: game.state.snapshot(),
        stats: game.stats,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize report: {}", e),
    }
}
