//! Flappy Bird game logic: flapping, pipe scrolling, scoring and collisions.

use super::types::*;
use crate::core::config::param;
use crate::core::entity::MAX_FRAME_MS;
use crate::core::{
    overlaps_with_tolerance, Anchor, AssetSlot, AssetStore, Controls, Direction, Entity,
    FixedStep, GameConfig, Motion, Outcome, ParamSpec, RenderSink, Session, Spawner, Vec2,
    PHYSICS_TICK_MS,
};
use crate::games::{end_session, Game, GameEvent, GameKind};
use log::debug;
use rand::{Rng, RngCore};

fn new_bird(gravity: f64) -> Entity<()> {
    Entity::new(
        (),
        Vec2::new(BIRD_X, BIRD_START_Y),
        Vec2::new(BIRD_SIZE, BIRD_SIZE),
        Anchor::Center,
    )
    .with_motion(Motion::Ballistic {
        gravity,
        terminal_velocity: TERMINAL_VELOCITY,
    })
}

fn new_spawner() -> Spawner {
    Spawner::new(SPAWN_INTERVAL_MS, SPAWN_FLOOR_MS, SPAWN_EASE_MS)
}

/// Bird tilt in degrees for the current vertical velocity.
pub fn rotation(vel_y: f64) -> f64 {
    (vel_y * 3.0).clamp(-30.0, 90.0)
}

impl FlappyGame {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            session: Session::new(GameKind::FlappyBird.id(), 0.0),
            bird: new_bird(param(config, PARAMS, "gravity")),
            pipes: Vec::new(),
            spawner: new_spawner(),
            clock: FixedStep::default(),
            jump_strength: param(config, PARAMS, "jumpStrength"),
            min_gap: param(config, PARAMS, "pipeGap"),
            base_speed: param(config, PARAMS, "gameSpeed"),
            milestones_hit: Vec::new(),
        }
    }

    fn gravity(&self) -> f64 {
        match self.bird.motion {
            Motion::Ballistic { gravity, .. } => gravity,
            _ => 0.0,
        }
    }

    fn reset_world(&mut self) {
        self.bird = new_bird(self.gravity());
        self.pipes.clear();
        self.spawner = new_spawner();
        self.clock.reset();
        self.milestones_hit.clear();
    }

    /// Current scroll speed in pixels per tick.
    pub fn speed(&self) -> f64 {
        self.base_speed + self.session.difficulty
    }

    pub fn flap(&mut self) {
        self.bird.vel.y = -self.jump_strength;
    }

    pub fn spawn_pipe<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let gap = rng.gen_range(self.min_gap..self.min_gap + PIPE_GAP_SPREAD);
        let lowest = (HEIGHT - PIPE_MARGIN - gap).max(PIPE_MARGIN + 1.0);
        let gap_y = rng.gen_range(PIPE_MARGIN..lowest);
        debug!("flappy: pipe gap {:.0} at {:.0}", gap, gap_y);
        self.pipes.push(Pipe::new(WIDTH, gap_y, gap, self.speed()));
    }

    fn set_pipe_speed(&mut self) {
        let speed = self.speed();
        for pipe in &mut self.pipes {
            pipe.body.vel.x = -speed;
        }
    }

    fn tick(&mut self, rng: &mut dyn RngCore, events: &mut Vec<GameEvent>) -> Option<Outcome> {
        self.bird.advance();
        for pipe in &mut self.pipes {
            pipe.body.advance();
        }
        self.pipes.retain(|p| p.x() > -PIPE_WIDTH);

        if self
            .spawner
            .tick(PHYSICS_TICK_MS as f64, self.session.difficulty)
        {
            self.spawn_pipe(rng);
        }

        let bird = self.bird.bounds();
        for pipe in &mut self.pipes {
            let hit = overlaps_with_tolerance(&bird, &pipe.top_rect(), PIPE_HITBOX_INSET)
                || overlaps_with_tolerance(&bird, &pipe.bottom_rect(), PIPE_HITBOX_INSET);
            if hit {
                return Some(Outcome::GameOver);
            }

            if !pipe.is_scored() && pipe.x() + PIPE_WIDTH < self.bird.pos.x {
                pipe.body.flags.scored = true;
                self.session.add_score(1);
                events.push(GameEvent::Scored(1));

                let score = self.session.score;
                if MILESTONES.contains(&score) && !self.milestones_hit.contains(&score) {
                    self.milestones_hit.push(score);
                    events.push(GameEvent::Milestone(score));
                }
                if score % SPEED_UP_EVERY == 0 {
                    self.session
                        .raise_difficulty((score / SPEED_UP_EVERY) as f64 * SPEED_UP_STEP);
                }
            }
        }
        self.set_pipe_speed();

        if self.bird.pos.y > HEIGHT || self.bird.pos.y < 0.0 {
            return Some(Outcome::GameOver);
        }
        None
    }
}

impl Game for FlappyGame {
    fn kind(&self) -> GameKind {
        GameKind::FlappyBird
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

        let flap = controls.take_jump() | controls.take_action();
        let up = controls.take_direction() == Some(Direction::Up);
        if flap || up {
            self.flap();
        }

        for _ in 0..self.clock.advance(dt_ms) {
            if let Some(outcome) = self.tick(rng, &mut events) {
                end_session(&mut self.session, outcome, &mut events);
                break;
            }
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
        if let Motion::Ballistic { gravity, .. } = &mut self.bird.motion {
            *gravity = param(config, PARAMS, "gravity");
        }
        self.jump_strength = param(config, PARAMS, "jumpStrength");
        self.min_gap = param(config, PARAMS, "pipeGap");
        self.base_speed = param(config, PARAMS, "gameSpeed");
        self.set_pipe_speed();
        debug!("flappy: config applied, speed {:.1}", self.speed());
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

    fn started_game() -> (FlappyGame, ChaCha8Rng) {
        let mut game = FlappyGame::new(&GameConfig::default());
        game.session.start();
        (game, ChaCha8Rng::seed_from_u64(21))
    }

    fn run_ticks(game: &mut FlappyGame, rng: &mut ChaCha8Rng, ticks: u32) -> Vec<GameEvent> {
        let mut controls = Controls::default();
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(game.step(PHYSICS_TICK_MS, &mut controls, rng));
        }
        events
    }

    #[test]
    fn test_gravity_pulls_bird_down() {
        let (mut game, mut rng) = started_game();
        run_ticks(&mut game, &mut rng, 1);
        assert!((game.bird.vel.y - 0.6).abs() < 1e-9);
        assert!((game.bird.pos.y - 300.6).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_capped_at_terminal() {
        let (mut game, _) = started_game();
        for _ in 0..30 {
            game.bird.advance();
        }
        assert_eq!(game.bird.vel.y, TERMINAL_VELOCITY);
    }

    #[test]
    fn test_flap_sets_upward_velocity() {
        let (mut game, mut rng) = started_game();
        let mut controls = Controls {
            jump: true,
            ..Controls::default()
        };
        game.step(PHYSICS_TICK_MS, &mut controls, &mut rng);
        // One tick of gravity after the flap.
        assert!((game.bird.vel.y - (-12.0 + 0.6)).abs() < 1e-9);
        assert!(!controls.jump);
    }

    #[test]
    fn test_first_pipe_after_interval() {
        let (mut game, mut rng) = started_game();
        game.bird.motion = Motion::Still;
        run_ticks(&mut game, &mut rng, 112);
        assert!(game.pipes.is_empty());
        run_ticks(&mut game, &mut rng, 1);
        assert_eq!(game.pipes.len(), 1);
        let pipe = &game.pipes[0];
        assert!(pipe.gap >= 120.0 && pipe.gap < 160.0);
        assert!(pipe.gap_y >= PIPE_MARGIN && pipe.gap_y + pipe.gap <= HEIGHT - PIPE_MARGIN);
    }

    #[test]
    fn test_passing_pipe_scores_once() {
        let (mut game, mut rng) = started_game();
        game.bird.motion = Motion::Still;
        game.pipes.push(Pipe::new(BIRD_X - PIPE_WIDTH - 1.0, 0.0, HEIGHT, 3.0));
        let events = run_ticks(&mut game, &mut rng, 3);
        assert_eq!(game.session.score, 1);
        assert_eq!(events, vec![GameEvent::Scored(1)]);
    }

    #[test]
    fn test_pipe_overlap_ends_game() {
        let (mut game, mut rng) = started_game();
        game.bird.motion = Motion::Still;
        game.pipes.push(Pipe::new(BIRD_X - 10.0, 0.0, 100.0, 0.0));
        let events = run_ticks(&mut game, &mut rng, 1);
        assert_eq!(game.session.state, GameState::GameOver);
        assert!(matches!(events.last(), Some(GameEvent::SessionEnded(r)) if r.score == 0));
    }

    #[test]
    fn test_pipe_edge_within_tolerance_is_safe() {
        let (mut game, mut rng) = started_game();
        game.bird.motion = Motion::Still;
        // Bird spans 285..315; top pipe ends 1 px inside it.
        game.pipes.push(Pipe::new(BIRD_X - 10.0, 286.0, 200.0, 0.0));
        run_ticks(&mut game, &mut rng, 1);
        assert_eq!(game.session.state, GameState::Playing);
    }

    #[test]
    fn test_leaving_screen_ends_game() {
        let (mut game, mut rng) = started_game();
        game.bird.pos.y = -1.0;
        game.bird.motion = Motion::Still;
        run_ticks(&mut game, &mut rng, 1);
        assert_eq!(game.session.state, GameState::GameOver);
    }

    #[test]
    fn test_speed_up_every_five_points() {
        let (mut game, mut rng) = started_game();
        game.bird.motion = Motion::Still;
        game.session.score = 4;
        game.pipes.push(Pipe::new(BIRD_X - PIPE_WIDTH - 1.0, 0.0, HEIGHT, 3.0));
        run_ticks(&mut game, &mut rng, 1);
        assert_eq!(game.session.score, 5);
        assert_eq!(game.speed(), 3.5);
        assert_eq!(game.spawner.effective_interval(game.session.difficulty), 1750.0);
        assert!(game.pipes.iter().all(|p| p.body.vel.x == -3.5));
    }

    #[test]
    fn test_milestone_emitted_once() {
        let (mut game, mut rng) = started_game();
        game.bird.motion = Motion::Still;
        game.session.score = 9;
        game.pipes.push(Pipe::new(BIRD_X - PIPE_WIDTH - 1.0, 0.0, HEIGHT, 3.0));
        let events = run_ticks(&mut game, &mut rng, 1);
        assert!(events.contains(&GameEvent::Milestone(10)));
        assert_eq!(game.milestones_hit, vec![10]);
    }

    #[test]
    fn test_config_updates_live_pipes() {
        let (mut game, mut rng) = started_game();
        game.spawn_pipe(&mut rng);
        game.apply_config(&GameConfig::default().with_param("gameSpeed", 5.0));
        assert_eq!(game.pipes[0].body.vel.x, -5.0);
        game.apply_config(&GameConfig::default().with_param("gravity", 9.0));
        assert!((game.gravity() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_clamped() {
        assert_eq!(rotation(-12.0), -30.0);
        assert_eq!(rotation(10.0), 30.0);
        assert_eq!(rotation(40.0), 90.0);
    }

    #[test]
    fn test_restart_clears_pipes() {
        let (mut game, mut rng) = started_game();
        game.spawn_pipe(&mut rng);
        game.bird.pos.y = HEIGHT + 5.0;
        run_ticks(&mut game, &mut rng, 1);
        assert!(game.restart(&mut rng));
        assert!(game.pipes.is_empty());
        assert_eq!(game.bird.pos.y, BIRD_START_Y);
        assert_eq!(game.speed(), 3.0);
    }
}
