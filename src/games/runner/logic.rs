//! Speed Runner game logic: jumping, sliding, scrolling obstacles and
//! power-ups.

use super::types::*;
use crate::core::entity::MAX_FRAME_MS;
use crate::core::{
    clear_of, overlaps_with_tolerance, Anchor, AssetSlot, AssetStore, Controls, Direction,
    Entity, FixedStep, GameConfig, Motion, Outcome, ParamSpec, Rect, RenderSink, Session,
    Spawner, Vec2, WeightedTable, PHYSICS_TICK_MS,
};
use crate::games::{end_session, Game, GameEvent, GameKind};
use log::debug;
use rand::{Rng, RngCore};

const TICK_MS: f64 = PHYSICS_TICK_MS as f64;

fn new_runner(gravity: f64) -> Entity<()> {
    Entity::new(
        (),
        Vec2::new(RUNNER_X, GROUND_Y - RUNNER_SIZE.y),
        RUNNER_SIZE,
        Anchor::TopLeft,
    )
    .with_motion(Motion::Ballistic {
        gravity,
        terminal_velocity: TERMINAL_VELOCITY,
    })
}

fn obstacle_table() -> WeightedTable<ObstacleKind> {
    WeightedTable::new(vec![
        (ObstacleKind::Ground, 1.0, 0.0),
        (ObstacleKind::Air, 1.0, 0.3),
        (ObstacleKind::Tall, 1.0, 0.3),
    ])
}

fn new_obstacle(kind: ObstacleKind, x: f64, speed: f64) -> Entity<ObstacleKind> {
    Entity::new(kind, Vec2::new(x, kind.top()), kind.size(), Anchor::TopLeft)
        .with_motion(Motion::Drift)
        .with_velocity(Vec2::new(-speed, 0.0))
}

fn new_power_up(kind: PowerUpKind, x: f64, speed: f64) -> Entity<PowerUpKind> {
    Entity::new(
        kind,
        Vec2::new(x, POWER_UP_Y),
        Vec2::new(POWER_UP_SIZE, POWER_UP_SIZE),
        Anchor::TopLeft,
    )
    .with_motion(Motion::Drift)
    .with_velocity(Vec2::new(-speed, 0.0))
}

/// Speed multiplier after `distance` metres: +0.2 per 100 m.
pub fn speed_multiplier(distance: f64) -> f64 {
    1.0 + (distance / METRES_PER_STEP).floor() * SPEED_STEP
}

impl RunnerGame {
    pub fn new(config: &GameConfig) -> Self {
        let tuning = Tuning::from_config(config);
        Self {
            session: Session::new(GameKind::SpeedRunner.id(), 1.0),
            tuning,
            runner: new_runner(tuning.gravity),
            grounded: true,
            sliding: false,
            slide_ms: 0.0,
            slide_spent: false,
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            obstacle_spawner: Spawner::new(OBSTACLE_MIN_MS, OBSTACLE_FLOOR_MS, OBSTACLE_EASE_MS),
            power_up_spawner: Spawner::new(POWER_UP_MIN_MS, POWER_UP_MIN_MS, 0.0),
            distance: 0.0,
            metres_scored: 0,
            shield_ms: 0.0,
            double_score_ms: 0.0,
            clock: FixedStep::default(),
        }
    }

    fn reset_world(&mut self) {
        *self = Self {
            session: self.session.clone(),
            tuning: self.tuning,
            runner: new_runner(self.tuning.gravity),
            ..Self::new(&GameConfig::default())
        };
    }

    /// Scroll speed in pixels per tick.
    pub fn speed(&self) -> f64 {
        self.tuning.base_speed * speed_multiplier(self.distance)
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_ms > 0.0
    }

    pub fn is_double_score(&self) -> bool {
        self.double_score_ms > 0.0
    }

    /// Jump if standing on the ground and not sliding.
    pub fn jump(&mut self) -> bool {
        if !self.grounded || self.sliding {
            return false;
        }
        self.runner.vel.y = -self.tuning.jump_strength;
        self.grounded = false;
        true
    }

    fn set_runner_size(&mut self, size: Vec2) {
        let bottom = self.runner.bounds().bottom();
        self.runner.size = size;
        self.runner.pos.y = bottom - size.y;
    }

    fn update_slide(&mut self, held: bool) {
        if self.sliding {
            if !held {
                self.sliding = false;
                self.set_runner_size(RUNNER_SIZE);
                return;
            }
            self.slide_ms -= TICK_MS;
            if self.slide_ms <= 0.0 {
                self.sliding = false;
                self.slide_spent = true;
                self.set_runner_size(RUNNER_SIZE);
            }
        } else if !held {
            self.slide_spent = false;
        } else if self.grounded && !self.slide_spent {
            self.sliding = true;
            self.slide_ms = MAX_SLIDE_MS;
            self.set_runner_size(SLIDE_SIZE);
        }
    }

    fn move_runner(&mut self) {
        self.runner.advance();
        let bottom = self.runner.bounds().bottom();
        if bottom >= GROUND_Y {
            self.runner.pos.y = GROUND_Y - self.runner.size.y;
            self.runner.vel.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Spawn a random obstacle at the right edge unless it would crowd the
    /// last one. Returns whether it spawned.
    pub fn spawn_obstacle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(kind) = obstacle_table().pick(self.session.difficulty, rng) else {
            return false;
        };
        let size = kind.size();
        let candidate = Rect::new(WIDTH, kind.top(), size.x, size.y);
        let existing: Vec<Rect> = self.obstacles.iter().map(|o| o.bounds()).collect();
        if !clear_of(existing.iter(), &candidate, OBSTACLE_MIN_GAP) {
            return false;
        }
        debug!("runner: {:?} obstacle at {:.0} m", kind, self.distance);
        self.obstacles.push(new_obstacle(kind, WIDTH, self.speed()));
        true
    }

    pub fn spawn_power_up<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let kind = if rng.gen_bool(0.5) {
            PowerUpKind::Shield
        } else {
            PowerUpKind::DoubleScore
        };
        debug!("runner: {:?} power-up", kind);
        self.power_ups.push(new_power_up(kind, WIDTH, self.speed()));
    }

    fn spawn(&mut self, rng: &mut dyn RngCore) {
        // Interval easing starts from the first speed step.
        let ease = self.session.difficulty - 1.0;
        self.obstacle_spawner.advance(TICK_MS);
        if self.obstacle_spawner.is_due(ease) && self.spawn_obstacle(rng) {
            self.obstacle_spawner.reset();
            self.obstacle_spawner
                .reroll(rng.gen_range(OBSTACLE_MIN_MS..OBSTACLE_MAX_MS));
        }
        if self.power_up_spawner.tick(TICK_MS, 0.0) {
            self.spawn_power_up(rng);
            self.power_up_spawner
                .reroll(rng.gen_range(POWER_UP_MIN_MS..POWER_UP_MAX_MS));
        }
    }

    /// Turn newly covered metres into points. Returns the points added.
    fn award_distance(&mut self, events: &mut Vec<GameEvent>) -> u32 {
        let metres = self.distance.floor() as u64;
        let per_metre = if self.is_double_score() { 2 } else { 1 };
        let mut points = 0;
        while self.metres_scored < metres {
            self.metres_scored += 1;
            points += per_metre;
            if self.metres_scored % METRES_PER_STEP as u64 == 0 {
                points += DISTANCE_BONUS;
                events.push(GameEvent::Milestone(self.metres_scored as u32));
            }
        }
        self.session.add_score(points);
        points
    }

    fn tick(
        &mut self,
        slide_held: bool,
        rng: &mut dyn RngCore,
        events: &mut Vec<GameEvent>,
        points: &mut u32,
    ) -> Option<Outcome> {
        self.update_slide(slide_held);
        self.move_runner();

        self.distance += self.speed() / 10.0;
        *points += self.award_distance(events);
        self.session
            .raise_difficulty(1.0 + (self.distance / METRES_PER_STEP).floor());

        let speed = self.speed();
        for obstacle in &mut self.obstacles {
            obstacle.vel.x = -speed;
            obstacle.advance();
        }
        for power_up in &mut self.power_ups {
            power_up.vel.x = -speed;
            power_up.advance();
        }
        self.obstacles.retain(|o| o.bounds().right() > 0.0);
        self.power_ups.retain(|p| p.bounds().right() > 0.0);
        self.spawn(rng);

        self.shield_ms = (self.shield_ms - TICK_MS).max(0.0);
        self.double_score_ms = (self.double_score_ms - TICK_MS).max(0.0);

        let body = self.runner.bounds();
        if !self.is_shielded()
            && self
                .obstacles
                .iter()
                .any(|o| overlaps_with_tolerance(&body, &o.bounds(), OBSTACLE_HITBOX_INSET))
        {
            return Some(Outcome::GameOver);
        }

        let mut picked = Vec::new();
        self.power_ups.retain(|p| {
            let hit = overlaps_with_tolerance(&body, &p.bounds(), POWER_UP_PICKUP_INSET);
            if hit {
                picked.push(p.kind);
            }
            !hit
        });
        for kind in picked {
            match kind {
                PowerUpKind::Shield => self.shield_ms = kind.duration_ms(),
                PowerUpKind::DoubleScore => self.double_score_ms = kind.duration_ms(),
            }
            events.push(GameEvent::PowerUp(kind.slot()));
        }
        None
    }
}

impl Game for RunnerGame {
    fn kind(&self) -> GameKind {
        GameKind::SpeedRunner
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn world_size(&self) -> Vec2 {
        Vec2::new(WIDTH, HEIGHT)
    }

    fn step(
        &mut self,
        dt_ms: u64,
        controls: &mut Controls,
        rng: &mut dyn RngCore,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.session.is_playing() {
            return events;
        }
        self.session.tick_clock(dt_ms.min(MAX_FRAME_MS));

        let jump = controls.take_jump() | controls.take_action();
        let up = controls.take_direction() == Some(Direction::Up);
        if jump || up {
            self.jump();
        }

        let mut points = 0;
        let mut outcome = None;
        for _ in 0..self.clock.advance(dt_ms) {
            outcome = self.tick(controls.slide, rng, &mut events, &mut points);
            if outcome.is_some() {
                break;
            }
        }
        if points > 0 {
            events.push(GameEvent::Scored(points));
        }
        if let Some(outcome) = outcome {
            end_session(&mut self.session, outcome, &mut events);
        }
        events
    }

    fn render(&self, sink: &mut dyn RenderSink, assets: &AssetStore) {
        self.draw(sink, assets);
    }

    fn restart(&mut self, _rng: &mut dyn RngCore) -> bool {
        if !self.session.restart() {
            return false;
        }
        self.reset_world();
        true
    }

    fn apply_config(&mut self, config: &GameConfig) {
        self.tuning = Tuning::from_config(config);
        if let Motion::Ballistic { gravity, .. } = &mut self.runner.motion {
            *gravity = self.tuning.gravity;
        }
        let speed = self.speed();
        for obstacle in &mut self.obstacles {
            obstacle.vel.x = -speed;
        }
        for power_up in &mut self.power_ups {
            power_up.vel.x = -speed;
        }
        debug!("runner: config applied, speed {:.1}", speed);
    }

    fn param_specs(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn asset_slots(&self) -> &'static [AssetSlot] {
        SLOTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn started_game() -> (RunnerGame, ChaCha8Rng) {
        let mut game = RunnerGame::new(&GameConfig::default());
        game.session.start();
        (game, ChaCha8Rng::seed_from_u64(8))
    }

    fn run_ticks(
        game: &mut RunnerGame,
        rng: &mut ChaCha8Rng,
        controls: &mut Controls,
        ticks: u32,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(game.step(PHYSICS_TICK_MS, controls, rng));
        }
        events
    }

    /// Keep the spawners quiet so a test controls every entity.
    fn quiet(game: &mut RunnerGame) {
        game.obstacle_spawner = Spawner::new(1e9, 1e9, 0.0);
        game.power_up_spawner = Spawner::new(1e9, 1e9, 0.0);
    }

    #[test]
    fn test_runner_stands_on_ground() {
        let (mut game, mut rng) = started_game();
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 5);
        assert_eq!(game.runner.pos.y, GROUND_Y - RUNNER_SIZE.y);
        assert!(game.grounded);
        assert_eq!(game.runner.pos.x, RUNNER_X);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let (mut game, mut rng) = started_game();
        let mut controls = Controls {
            jump: true,
            ..Controls::default()
        };
        run_ticks(&mut game, &mut rng, &mut controls, 1);
        assert!((game.runner.vel.y - (-15.0 + 0.8)).abs() < 1e-9);
        assert!((game.runner.pos.y - (340.0 - 14.2)).abs() < 1e-9);
        assert!(!game.grounded);
        assert!(!game.jump());
    }

    #[test]
    fn test_jump_lands_again() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        assert!(game.jump());
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 60);
        assert!(game.grounded);
        assert_eq!(game.runner.pos.y, GROUND_Y - RUNNER_SIZE.y);
    }

    #[test]
    fn test_slide_is_capped_and_needs_release() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        let mut controls = Controls {
            slide: true,
            ..Controls::default()
        };
        run_ticks(&mut game, &mut rng, &mut controls, 1);
        assert!(game.sliding);
        assert_eq!(game.runner.size, SLIDE_SIZE);
        assert_eq!(game.runner.bounds().bottom(), GROUND_Y);
        assert!(!game.jump());

        run_ticks(&mut game, &mut rng, &mut controls, 62);
        assert!(game.sliding);
        run_ticks(&mut game, &mut rng, &mut controls, 1);
        assert!(!game.sliding);
        assert_eq!(game.runner.size, RUNNER_SIZE);

        run_ticks(&mut game, &mut rng, &mut controls, 10);
        assert!(!game.sliding);
        controls.slide = false;
        run_ticks(&mut game, &mut rng, &mut controls, 1);
        controls.slide = true;
        run_ticks(&mut game, &mut rng, &mut controls, 1);
        assert!(game.sliding);
    }

    #[test]
    fn test_air_obstacle_clears_a_slide() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        game.obstacles
            .push(new_obstacle(ObstacleKind::Air, RUNNER_X, 0.0));
        let mut controls = Controls {
            slide: true,
            ..Controls::default()
        };
        run_ticks(&mut game, &mut rng, &mut controls, 1);
        assert_eq!(game.session.state, GameState::Playing);

        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        game.obstacles
            .push(new_obstacle(ObstacleKind::Air, RUNNER_X, 0.0));
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.session.state, GameState::GameOver);
    }

    #[test]
    fn test_ground_obstacle_ends_run_unless_shielded() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        game.obstacles
            .push(new_obstacle(ObstacleKind::Ground, RUNNER_X, 0.0));
        game.shield_ms = SHIELD_MS;
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.session.state, GameState::Playing);

        game.shield_ms = 0.0;
        game.obstacles
            .push(new_obstacle(ObstacleKind::Ground, RUNNER_X, 0.0));
        let events = run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.session.state, GameState::GameOver);
        assert!(matches!(events.last(), Some(GameEvent::SessionEnded(_))));
    }

    #[test]
    fn test_obstacle_edge_within_inset_is_safe() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        // Scrolls to x=77, so the hitbox starts at 81, one past the runner.
        game.obstacles
            .push(new_obstacle(ObstacleKind::Ground, 80.0, 0.0));
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.session.state, GameState::Playing);
    }

    #[test]
    fn test_power_up_pickup() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        // Grown by the pickup inset, a box just beyond reach still counts.
        game.power_ups
            .push(new_power_up(PowerUpKind::DoubleScore, RUNNER_X + 33.0, 0.0));
        let events = run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert!(events.contains(&GameEvent::PowerUp("double_score")));
        assert!(game.power_ups.is_empty());
        assert!(game.is_double_score());
        assert!(!game.is_shielded());
    }

    #[test]
    fn test_distance_scores_metres_and_bonus() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        game.distance = 99.95;
        game.metres_scored = 99;
        game.session.score = 99;
        let events = run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.session.score, 99 + 1 + DISTANCE_BONUS);
        assert!(events.contains(&GameEvent::Milestone(100)));
        assert!(events.contains(&GameEvent::Scored(51)));
        assert!((game.speed() - 3.6).abs() < 1e-9);
        assert_eq!(game.session.difficulty, 2.0);
    }

    #[test]
    fn test_double_score_doubles_metres() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        game.distance = 10.9;
        game.metres_scored = 10;
        game.double_score_ms = DOUBLE_SCORE_MS;
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.session.score, 2);
    }

    #[test]
    fn test_score_never_decreases() {
        let (mut game, mut rng) = started_game();
        let mut last = 0;
        for _ in 0..200 {
            game.step(PHYSICS_TICK_MS, &mut Controls::default(), &mut rng);
            assert!(game.session.score >= last);
            last = game.session.score;
        }
    }

    #[test]
    fn test_first_obstacle_after_interval() {
        let (mut game, mut rng) = started_game();
        game.power_up_spawner = Spawner::new(1e9, 1e9, 0.0);
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 62);
        assert!(game.obstacles.is_empty());
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.obstacles.len(), 1);
        assert_eq!(game.obstacles[0].pos.x, WIDTH);
        let interval = game.obstacle_spawner.interval_ms;
        assert!((OBSTACLE_MIN_MS..OBSTACLE_MAX_MS).contains(&interval));
    }

    #[test]
    fn test_crowded_spawn_waits() {
        let (mut game, mut rng) = started_game();
        game.power_up_spawner = Spawner::new(1e9, 1e9, 0.0);
        game.obstacles
            .push(new_obstacle(ObstacleKind::Ground, WIDTH - 100.0, 0.0));
        game.obstacle_spawner.timer_ms = 5000.0;
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.obstacles.len(), 1);
        assert!(game.obstacle_spawner.is_due(0.0));
    }

    #[test]
    fn test_obstacles_scroll_and_despawn() {
        let (mut game, mut rng) = started_game();
        quiet(&mut game);
        game.obstacles
            .push(new_obstacle(ObstacleKind::Tall, 600.0, 0.0));
        game.obstacles.push(new_obstacle(ObstacleKind::Tall, -24.0, 0.0));
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert_eq!(game.obstacles.len(), 1);
        assert_eq!(game.obstacles[0].pos.x, 597.0);
    }

    #[test]
    fn test_config_reaches_live_entities() {
        let (mut game, _) = started_game();
        game.obstacles
            .push(new_obstacle(ObstacleKind::Ground, 500.0, 3.0));
        game.apply_config(
            &GameConfig::default()
                .with_param("baseSpeed", 5.0)
                .with_param("gravity", 0.5),
        );
        assert_eq!(game.obstacles[0].vel.x, -5.0);
        assert!(matches!(game.runner.motion, Motion::Ballistic { gravity, .. } if gravity == 0.5));
    }

    #[test]
    fn test_restart_keeps_tuning() {
        let (mut game, mut rng) = started_game();
        game.apply_config(&GameConfig::default().with_param("jumpStrength", 12.0));
        game.obstacles
            .push(new_obstacle(ObstacleKind::Ground, RUNNER_X, 0.0));
        run_ticks(&mut game, &mut rng, &mut Controls::default(), 1);
        assert!(game.restart(&mut rng));
        assert!(game.obstacles.is_empty());
        assert_eq!(game.distance, 0.0);
        assert_eq!(game.session.score, 0);
        assert_eq!(game.tuning.jump_strength, 12.0);
    }
}
