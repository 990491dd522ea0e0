//! Brick Rally entry point
//!
//! Native builds run a headless attract-mode match: the autopilot plays,
//! the fixed-tick loop runs until the match ends, and the result is stored
//! through the score worker without blocking the loop.
//!
//! Usage: `brick-rally [--config FILE] [--scores FILE] [--seed N] [--max-frames N]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use brick_rally::consts::SIM_DT;
    use brick_rally::highscores::format_date;
    use brick_rally::input::autopilot;
    use brick_rally::persistence::{JsonFileScoreStore, ScoreWorker};
    use brick_rally::platform::{FrameClock, init_logging, now_ms};
    use brick_rally::sim::{handle_intent, tick};
    use brick_rally::{GameConfig, GameEvent, GamePhase, GameState, ScoreRequest};

    struct Options {
        config: Option<PathBuf>,
        scores: PathBuf,
        seed: u64,
        max_frames: u64,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                config: None,
                scores: PathBuf::from("brick_rally_scores.json"),
                seed: now_ms() as u64,
                max_frames: 60 * 60 * 10,
            }
        }
    }

    fn parse_args() -> Result<Options, String> {
        let mut options = Options::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{} needs a value", arg));
            match arg.as_str() {
                "--config" => options.config = Some(PathBuf::from(value()?)),
                "--scores" => options.scores = PathBuf::from(value()?),
                "--seed" => {
                    options.seed = value()?.parse().map_err(|e| format!("bad seed: {}", e))?
                }
                "--max-frames" => {
                    options.max_frames = value()?
                        .parse()
                        .map_err(|e| format!("bad frame count: {}", e))?
                }
                other => return Err(format!("unknown argument: {}", other)),
            }
        }
        Ok(options)
    }

    fn load_config(path: Option<&PathBuf>) -> Result<GameConfig, String> {
        let Some(path) = path else {
            return Ok(GameConfig::default());
        };
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("could not read {:?}: {}", path, e))?;
        GameConfig::from_json(&json).map_err(|e| e.to_string())
    }

    /// Route events that need host action; returns true when the match ended
    fn dispatch(events: Vec<GameEvent>, worker: &ScoreWorker, clock: &mut FrameClock) -> bool {
        let mut ended = false;
        for event in events {
            match event {
                GameEvent::ScoreRequested(request) => worker.request(request),
                GameEvent::PhaseChanged { to, .. } => {
                    if to == GamePhase::Playing {
                        clock.start();
                    } else {
                        clock.stop();
                    }
                    ended |= matches!(to, GamePhase::GameOver | GamePhase::Clear);
                }
                GameEvent::StageStarted { stage } => log::info!("Stage {} begins", stage),
                _ => {}
            }
        }
        ended
    }

    pub fn run() -> Result<(), String> {
        init_logging();
        let options = parse_args()?;
        let config = load_config(options.config.as_ref())?;
        let mut state = GameState::new(config, options.seed).map_err(|e| e.to_string())?;
        let worker = ScoreWorker::spawn(JsonFileScoreStore::new(&options.scores));
        let mut clock = FrameClock::new();

        log::info!("Brick Rally (native) starting, seed {}", options.seed);
        worker.request(ScoreRequest::Refresh);

        let mut ended = false;
        for _ in 0..options.max_frames {
            for intent in autopilot(&state) {
                let events = handle_intent(&mut state, intent);
                ended |= dispatch(events, &worker, &mut clock);
            }

            for _ in 0..clock.advance(SIM_DT) {
                let events = tick(&mut state);
                ended |= dispatch(events, &worker, &mut clock);
            }

            if let Some(result) = worker.poll() {
                state.apply_scores(result);
            }
            if ended {
                break;
            }
        }

        log::info!(
            "Finished in {:?}: score {}, stage {}, lives {}",
            state.phase,
            state.score,
            state.stage,
            state.lives
        );

        if let Some(request) = state.submit_score("AUTO") {
            worker.request(request);
        }
        // The match is over, so blocking here only delays the leaderboard printout
        if let Some(result) = worker.finish() {
            state.apply_scores(result);
        }

        let now = now_ms();
        for (rank, entry) in state.leaderboard.entries.iter().enumerate() {
            log::info!(
                "{:>2}. {:<12} {:>8}  {}",
                rank + 1,
                entry.name,
                entry.score,
                format_date(entry.date, now)
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        log::error!("{}", e);
        eprintln!("brick-rally: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
    brick_rally::platform::init_logging();
}
