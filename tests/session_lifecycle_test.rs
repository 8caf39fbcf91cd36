//! Session state machine as seen through the `Game` trait.

use arcade::core::{
    Controls, GameConfig, GameState, Outcome, ScoreReporter, Session, SessionReport,
    PHYSICS_TICK_MS,
};
use arcade::games::{GameEvent, GameKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_session_transitions() {
    let mut s = Session::new("flappy-bird", 1.0);
    assert_eq!(s.state, GameState::Menu);
    assert!(!s.toggle_pause());
    assert!(!s.restart());

    assert!(s.start());
    assert!(!s.start());
    assert!(s.toggle_pause());
    assert_eq!(s.state, GameState::Paused);
    assert!(s.finish(Outcome::GameOver).is_none());
    assert!(s.toggle_pause());

    s.add_score(12);
    s.raise_difficulty(2.5);
    s.raise_difficulty(1.5);
    assert_eq!(s.difficulty, 2.5);

    let report = s.finish(Outcome::GameOver).expect("first end reports");
    assert_eq!(report.score, 12);
    assert_eq!(report.game, "flappy-bird");
    assert!(s.finish(Outcome::GameOver).is_none());
    assert_eq!(s.best_score, 12);

    assert!(s.restart());
    assert_eq!((s.score, s.difficulty, s.best_score), (0, 1.0, 12));
    assert!(!s.continue_level());
}

#[test]
fn test_level_complete_continues_with_score() {
    let mut s = Session::new("match-3", 1.0);
    s.start();
    s.add_score(1000);
    assert!(s.finish(Outcome::LevelComplete).is_none());
    assert!(s.state.is_terminal());
    assert!(s.continue_level());
    assert_eq!(s.score, 1000);
    assert!(s.finish(Outcome::LevelComplete).is_none());
    assert!(s.continue_level());
    let report = s.finish(Outcome::GameOver).expect("run end reports");
    assert_eq!(report.score, 1000);
}

#[test]
fn test_penalty_floors_at_zero() {
    let mut s = Session::new("whack-the-mole", 1.0);
    s.start();
    s.add_score(5);
    s.apply_penalty(20);
    assert_eq!(s.score, 0);
}

#[test]
fn test_reporter_called_once_per_session() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut game = GameKind::FlappyBird.create(&GameConfig::default(), &mut rng);
    let mut reports: Vec<SessionReport> = Vec::new();
    let mut reporter = |r: &SessionReport| reports.push(r.clone());

    for round in 0..2 {
        if round == 0 {
            game.start();
        } else {
            assert!(game.restart(&mut rng));
        }
        let mut controls = Controls::default();
        // Without flapping the bird falls to the ground.
        for _ in 0..2000 {
            for event in game.step(PHYSICS_TICK_MS, &mut controls, &mut rng) {
                if let GameEvent::SessionEnded(report) = event {
                    reporter.report(&report);
                }
            }
        }
        assert_eq!(game.session().state, GameState::GameOver);
    }

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.game == "flappy-bird"));
    assert!(reports.iter().all(|r| r.outcome == Outcome::GameOver));
}
