//! Astro Ascent headless entry point
//!
//! Plays rounds with the demo autopilot through the same fixed-step loop a
//! windowed front end would use, then records the result on the leaderboard.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use astro_ascent::consts::{MAX_SUBSTEPS, SIM_DT};
use astro_ascent::persistence::JsonFileStore;
use astro_ascent::sim::{GameEvent, GamePhase, GameState, Viewport, autopilot_input, tick};
use astro_ascent::{Leaderboard, Settings, Tuning};

#[derive(Debug, Parser)]
#[command(name = "astro-ascent", about = "Run Astro Ascent rounds headlessly")]
struct Args {
    /// RNG seed for the first round (later rounds use seed + n)
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of rounds to play
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Stop a round after this many simulation ticks
    #[arg(long, default_value_t = 60 * 60 * 5)]
    max_ticks: u64,

    /// Simulated frame time in seconds (fed through the fixed-step accumulator)
    #[arg(long, default_value_t = 1.0 / 30.0)]
    frame_dt: f32,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// JSON tuning file; defaults are used when missing or invalid
    #[arg(long)]
    tuning: Option<PathBuf>,

    #[arg(long, default_value = "leaderboard.json")]
    scores: PathBuf,

    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Player name for the leaderboard (saved to settings)
    #[arg(long)]
    name: Option<String>,

    /// Print debug stats at the end of each round
    #[arg(long)]
    debug: bool,
}

/// Frame driver state
struct Game {
    state: GameState,
    accumulator: f32,
}

impl Game {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = autopilot_input(&self.state);
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Astro Ascent (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    tuning.validate()?;

    let mut settings = Settings::load(&args.settings);
    if let Some(name) = &args.name {
        if settings.set_player_name(name) {
            if let Err(e) = settings.save(&args.settings) {
                log::warn!("Could not save settings: {}", e);
            }
        }
    }
    let show_stats = args.debug || settings.debug_overlay;

    let store = JsonFileStore::new(&args.scores);
    let mut board = Leaderboard::load_from(&store);

    let viewport = Viewport::new(args.width, args.height);
    let mut game = Game::new(GameState::new(tuning, viewport, args.seed));

    for round in 0..args.rounds {
        if round > 0 {
            game.state.reset();
        }

        while game.state.phase == GamePhase::Playing && game.state.time_ticks < args.max_ticks {
            game.update(args.frame_dt);
            for event in game.state.drain_events() {
                if let GameEvent::Collision { obstacle, at } = event {
                    log::debug!("Hit {:?} at ({:.0}, {:.0})", obstacle, at.x, at.y);
                }
            }
        }

        let score = game.state.final_score.unwrap_or(game.state.score);
        let outcome = if game.state.phase == GamePhase::RoundOver {
            "crashed"
        } else {
            "survived"
        };
        println!(
            "Round {}: {} at height {} after {:.1}s",
            round + 1,
            outcome,
            score,
            game.state.time_ticks as f32 * SIM_DT
        );

        match board.add_score(&settings.player_name, score) {
            Some(rank) => println!("New high score! Rank #{}", rank),
            None => println!("No leaderboard entry"),
        }
        board.save_to(&store);

        if show_stats {
            println!("{:#?}", game.state.debug_stats());
        }
    }

    println!("\n=== LEADERBOARD ===");
    for (i, entry) in board.entries.iter().enumerate() {
        println!("{:>2}. {:<16} {:>8}", i + 1, entry.name, entry.score);
    }

    Ok(())
}
