//! Crossy Road lane hazards end to end.

use arcade::core::{
    Anchor, Controls, Entity, GameConfig, GameState, Motion, Spawner, Vec2, PHYSICS_TICK_MS,
};
use arcade::games::crossy::{CrossyGame, LaneKind, Traffic, PLAYER_SIZE, START};
use arcade::games::{Game, GameEvent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A started game whose lanes are all empty grass.
fn quiet_game() -> (CrossyGame, ChaCha8Rng) {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut game = CrossyGame::new(&GameConfig::default(), &mut rng);
    for lane in &mut game.lanes {
        lane.kind = LaneKind::Safe;
        lane.traffic.clear();
        lane.spawner = Spawner::new(1.0e9, 1.0e9, 0.0);
    }
    game.start();
    (game, rng)
}

#[test]
fn test_vehicle_on_player_lane_ends_game() {
    let (mut game, mut rng) = quiet_game();
    let frog = game.player.bounds();
    let lane = game.lane_mut(0).expect("start lane");
    lane.kind = LaneKind::Road;
    // Same box as the frog.
    let size = Vec2::new(PLAYER_SIZE, PLAYER_SIZE);
    lane.traffic.push(Entity::new(Traffic::Car, START, size, Anchor::Center));
    assert_eq!(lane.traffic[0].bounds(), frog);

    let mut controls = Controls::default();
    let events = game.step(PHYSICS_TICK_MS, &mut controls, &mut rng);
    assert_eq!(game.session.state, GameState::GameOver);
    let ended: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::SessionEnded(_)))
        .collect();
    assert_eq!(ended.len(), 1);

    // Frozen until restart.
    let pos = game.player.pos;
    assert!(game.step(PHYSICS_TICK_MS, &mut controls, &mut rng).is_empty());
    assert_eq!(game.player.pos, pos);
}

#[test]
fn test_vehicle_grazing_within_tolerance_is_safe() {
    let (mut game, mut rng) = quiet_game();
    let lane = game.lane_mut(0).expect("start lane");
    lane.kind = LaneKind::Road;
    // Car edge overlaps the frog by 3 px, inside the 4 px hitbox inset.
    let car_x = START.x + 15.0 + 30.0 - 3.0;
    lane.traffic.push(Entity::new(
        Traffic::Car,
        Vec2::new(car_x, START.y),
        Traffic::Car.size(),
        Anchor::Center,
    ));

    let mut controls = Controls::default();
    game.step(PHYSICS_TICK_MS, &mut controls, &mut rng);
    assert_eq!(game.session.state, GameState::Playing);
}

#[test]
fn test_log_carries_player_on_river() {
    let (mut game, mut rng) = quiet_game();
    let lane = game.lane_mut(0).expect("start lane");
    lane.kind = LaneKind::River;
    lane.traffic.push(
        Entity::new(Traffic::Log, START, Traffic::Log.size(), Anchor::Center)
            .with_motion(Motion::Drift)
            .with_velocity(Vec2::new(1.5, 0.0)),
    );

    let mut controls = Controls::default();
    game.step(PHYSICS_TICK_MS, &mut controls, &mut rng);
    assert_eq!(game.session.state, GameState::Playing);
    assert_eq!(game.riding, Some(1.5));

    let x = game.player.pos.x;
    game.step(PHYSICS_TICK_MS, &mut controls, &mut rng);
    assert_eq!(game.session.state, GameState::Playing);
    assert!((game.player.pos.x - (x + 1.5)).abs() < 1e-9);
}
