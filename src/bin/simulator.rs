//! Headless arcade simulator.
//!
//! Drives a game with a simple random autopilot and fixed 16 ms frames, no
//! terminal involved. Useful for checking difficulty curves and score
//! ranges after tuning changes.
//!
//! Usage:
//!   arcade-sim <game-id> [OPTIONS]
//!
//! Options:
//!   --runs N       Number of runs with incrementing seeds (default: 1)
//!   --seed S       RNG seed (default: 42)
//!   --seconds T    Give up after T seconds of game time (default: 120)
//!   --quiet        Only the final summary line

use arcade::core::{ArcadeConfig, Controls, Direction, GameState, Outcome, PHYSICS_TICK_MS};
use arcade::games::mole::{Hole, COLS, ROWS};
use arcade::games::{Game, GameEvent, GameKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    kind: GameKind,
    runs: u32,
    seed: u64,
    seconds: u64,
    quiet: bool,
}

fn parse_args(args: &[String]) -> Result<SimConfig, String> {
    let mut iter = args.iter().skip(1);
    let id = iter.next().ok_or("missing game id")?;
    if id == "--help" || id == "-h" {
        print_usage();
        std::process::exit(0);
    }
    let kind = GameKind::from_id(id).ok_or_else(|| format!("Unknown game: {id}"))?;
    let mut config = SimConfig {
        kind,
        runs: 1,
        seed: 42,
        seconds: 120,
        quiet: false,
    };

    fn number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
        value
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| format!("{flag} requires a number"))
    }

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--runs" => config.runs = number("--runs", iter.next())?,
            "--seed" => config.seed = number("--seed", iter.next())?,
            "--seconds" => config.seconds = number("--seconds", iter.next())?,
            "--quiet" => config.quiet = true,
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(config)
}

fn print_usage() {
    eprintln!(
        "Arcade Headless Simulator\n\
         \n\
         Usage: arcade-sim <game-id> [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N       Number of runs with incrementing seeds (default: 1)\n\
         \x20 --seed S       RNG seed (default: 42)\n\
         \x20 --seconds T    Game-time limit per run (default: 120)\n\
         \x20 --quiet        Only the final summary line\n\
         \x20 --help, -h     Show this help"
    );
    let ids: Vec<&str> = GameKind::ALL.iter().map(|k| k.id()).collect();
    eprintln!("\nGames: {}", ids.join(", "));
}

// ── Autopilot ────────────────────────────────────────────────────────

/// Milliseconds between autopilot decisions.
const DECISION_MS: u64 = 200;

/// Pick this frame's input. The bot does not look at the world; it just
/// presses what each game listens to, at a human-ish rate.
fn autopilot(kind: GameKind, rng: &mut StdRng, controls: &mut Controls) {
    match kind {
        GameKind::CrossyRoad => {
            let dir = match rng.gen_range(0..10) {
                0..=5 => Direction::Up,
                6 => Direction::Down,
                7 | 8 => Direction::Left,
                _ => Direction::Right,
            };
            controls.press(dir);
        }
        GameKind::FlappyBird => controls.jump = rng.gen_bool(0.6),
        GameKind::Match3 => {
            if rng.gen_bool(0.5) {
                controls.action = true;
            } else {
                let dir = [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
                    [rng.gen_range(0..4)];
                controls.press(dir);
            }
        }
        GameKind::SpeedRunner => {
            controls.jump = rng.gen_bool(0.3);
            controls.slide = rng.gen_bool(0.2);
        }
        GameKind::WhackTheMole => {
            let hole = rng.gen_range(0..COLS * ROWS);
            controls.pointer = Some(Hole::new(hole).center());
        }
    }
}

// ── Simulation ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct RunStats {
    score: u32,
    duration_ms: u64,
    outcome: Option<Outcome>,
    difficulty: f64,
    scored_events: u64,
    penalties: u64,
    power_ups: u64,
    levels: u32,
}

fn run_simulation(config: &SimConfig, seed: u64) -> RunStats {
    let mut rng = StdRng::seed_from_u64(seed);
    let arcade_config = ArcadeConfig::default();
    let mut game: Box<dyn Game> = config
        .kind
        .create(&arcade_config.game(config.kind.id()), &mut rng);
    game.start();

    let mut stats = RunStats::default();
    let mut controls = Controls::default();
    let limit_ms = config.seconds * 1000;
    let mut sim_ms = 0;
    let mut next_decision = 0;

    while sim_ms < limit_ms {
        if sim_ms >= next_decision {
            autopilot(config.kind, &mut rng, &mut controls);
            next_decision = sim_ms + DECISION_MS;
        }

        for event in game.step(PHYSICS_TICK_MS, &mut controls, &mut rng) {
            match event {
                GameEvent::Scored(_) => stats.scored_events += 1,
                GameEvent::Penalty(_) => stats.penalties += 1,
                GameEvent::PowerUp(_) => stats.power_ups += 1,
                GameEvent::SessionEnded(report) => stats.outcome = Some(report.outcome),
                GameEvent::LevelComplete { .. } => stats.outcome = Some(Outcome::LevelComplete),
                _ => {}
            }
        }
        controls.end_frame();
        sim_ms += PHYSICS_TICK_MS;

        match game.session().state {
            GameState::LevelComplete => {
                stats.levels += 1;
                if !game.next_level(&mut rng) {
                    break;
                }
            }
            GameState::GameOver => break,
            _ => {}
        }
    }

    let session = game.session();
    stats.score = session.score;
    stats.duration_ms = session.elapsed_ms;
    stats.difficulty = session.difficulty;
    stats
}

fn outcome_label(outcome: Option<Outcome>) -> &'static str {
    match outcome {
        Some(Outcome::GameOver) => "game over",
        Some(Outcome::LevelComplete) => "level complete",
        None => "time limit",
    }
}

fn print_summary(all: &[RunStats], kind: GameKind) {
    let n = all.len().max(1) as f64;
    let scores: Vec<u32> = all.iter().map(|s| s.score).collect();
    let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / n;
    let min = scores.iter().copied().min().unwrap_or(0);
    let max = scores.iter().copied().max().unwrap_or(0);
    let mean_secs = all.iter().map(|s| s.duration_ms as f64).sum::<f64>() / n / 1000.0;
    let game_overs = all
        .iter()
        .filter(|s| s.outcome == Some(Outcome::GameOver))
        .count();
    println!(
        "{}: runs={} score mean={:.1} min={} max={} survived={:.1}s game_overs={}",
        kind.id(),
        all.len(),
        mean,
        min,
        max,
        mean_secs,
        game_overs
    );
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            std::process::exit(1);
        }
    };

    if !config.quiet {
        eprintln!(
            "Arcade Simulator: {} x {} run(s), seed={}, limit={}s",
            config.kind.name(),
            config.runs,
            config.seed,
            config.seconds
        );
    }

    let mut all_stats = Vec::with_capacity(config.runs as usize);
    for run in 0..config.runs {
        let seed = config.seed + run as u64;
        let stats = run_simulation(&config, seed);
        if !config.quiet {
            println!(
                "  Run {} (seed={}): score={} time={:.1}s difficulty={:.1} end={} scored={} penalties={} power_ups={} levels={}",
                run + 1,
                seed,
                stats.score,
                stats.duration_ms as f64 / 1000.0,
                stats.difficulty,
                outcome_label(stats.outcome),
                stats.scored_events,
                stats.penalties,
                stats.power_ups,
                stats.levels,
            );
        }
        all_stats.push(stats);
    }

    print_summary(&all_stats, config.kind);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("arcade-sim")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_defaults_and_flags() {
        let config = parse_args(&args(&["flappy-bird"])).unwrap();
        assert_eq!(config.kind, GameKind::FlappyBird);
        assert_eq!((config.runs, config.seed, config.seconds), (1, 42, 120));

        let config =
            parse_args(&args(&["whack-the-mole", "--runs", "3", "--seed", "9", "--seconds", "30"]))
                .unwrap();
        assert_eq!((config.runs, config.seed, config.seconds), (3, 9, 30));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["pong"])).is_err());
        assert!(parse_args(&args(&["match-3", "--runs"])).is_err());
        assert!(parse_args(&args(&["match-3", "--runs", "many"])).is_err());
    }

    #[test]
    fn test_runs_are_reproducible() {
        for kind in GameKind::ALL {
            let config = SimConfig {
                kind,
                runs: 1,
                seed: 5,
                seconds: 20,
                quiet: true,
            };
            let a = run_simulation(&config, 5);
            let b = run_simulation(&config, 5);
            assert_eq!(a.score, b.score, "{}", kind.id());
            assert_eq!(a.duration_ms, b.duration_ms, "{}", kind.id());
            assert!(a.duration_ms <= 20_000);
        }
    }
}
