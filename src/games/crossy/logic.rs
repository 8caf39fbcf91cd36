//! Crossy Road game logic: hopping, lane traffic, camera and collisions.

use super::types::*;
use crate::core::config::param;
use crate::core::entity::MAX_FRAME_MS;
use crate::core::{
    overlaps, overlaps_with_tolerance, Anchor, AssetSlot, AssetStore, Controls, Direction, Entity,
    FixedStep, GameConfig, Motion, Outcome, ParamSpec, RenderSink, Session, Spawner, Vec2,
    WeightedTable, PHYSICS_TICK_MS,
};
use crate::games::{end_session, Game, GameEvent, GameKind};
use log::debug;
use rand::{Rng, RngCore};

const TICK: f64 = PHYSICS_TICK_MS as f64;

fn vehicle_table() -> WeightedTable<Traffic> {
    WeightedTable::new(vec![
        (Traffic::Car, 2.0, 0.0),
        (Traffic::Truck, 1.0, 0.25),
        (Traffic::Bus, 1.0, 0.25),
    ])
}

fn new_player() -> Entity<()> {
    Entity::new((), START, Vec2::new(PLAYER_SIZE, PLAYER_SIZE), Anchor::Center)
}

/// Lane index of a world y coordinate.
pub fn row_of(y: f64) -> i64 {
    ((START.y - y) / GRID).round() as i64
}

fn lane_kind_for<R: Rng + ?Sized>(index: i64, rng: &mut R) -> LaneKind {
    if index % SAFE_LANE_EVERY == 0 {
        LaneKind::Safe
    } else if rng.gen_bool(0.5) {
        LaneKind::Road
    } else {
        LaneKind::River
    }
}

/// Put one piece of traffic into `lane` centred at `x`.
fn spawn_traffic<R: Rng + ?Sized>(
    lane: &mut Lane,
    x: f64,
    tuning: &Tuning,
    difficulty: f64,
    rng: &mut R,
) {
    let speed = lane.base_speed * tuning.scale_for(lane.kind) * (1.0 + difficulty * 0.2);
    let vel = Vec2::new(lane.direction * speed, 0.0);
    let entity = match lane.kind {
        LaneKind::Road => {
            let kind = vehicle_table().pick(difficulty, rng).unwrap_or(Traffic::Car);
            Entity::new(kind, Vec2::new(x, lane.y), kind.size(), Anchor::Center)
                .with_motion(Motion::Drift)
                .with_velocity(vel)
        }
        LaneKind::River => {
            let width = rng.gen_range(80.0..140.0);
            Entity::new(
                Traffic::Log,
                Vec2::new(x, lane.y),
                Vec2::new(width, Traffic::Log.size().y),
                Anchor::Center,
            )
            .with_motion(Motion::Drift)
            .with_velocity(vel)
        }
        LaneKind::Safe => {
            if !rng.gen_bool(SHIELD_CHANCE) {
                return;
            }
            let x = WIDTH / 2.0 + rng.gen_range(-100.0..100.0);
            Entity::new(
                Traffic::Shield,
                Vec2::new(x, lane.y),
                Traffic::Shield.size(),
                Anchor::Center,
            )
        }
    };
    debug!("crossy: {:?} spawned in lane {}", entity.kind, lane.index);
    lane.traffic.push(entity);
}

/// Build lane `index` with traffic already spread across the screen.
pub fn new_lane<R: Rng + ?Sized>(
    index: i64,
    tuning: &Tuning,
    difficulty: f64,
    rng: &mut R,
) -> Lane {
    let kind = lane_kind_for(index, rng);
    let mut lane = Lane {
        index,
        y: Lane::y_for(index),
        kind,
        direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
        base_speed: rng.gen_range(1.0..3.0),
        spawner: Spawner::new(rng.gen_range(2000.0..5000.0), 800.0, 100.0),
        traffic: Vec::new(),
    };
    if kind != LaneKind::Safe {
        let mut x = rng.gen_range(0.0..200.0);
        while x < WIDTH {
            spawn_traffic(&mut lane, x, tuning, difficulty, rng);
            let width = lane.traffic.last().map(|e| e.size.x).unwrap_or(0.0);
            x += width + rng.gen_range(150.0..350.0);
        }
    }
    lane
}

impl CrossyGame {
    pub fn new(config: &GameConfig, rng: &mut dyn RngCore) -> Self {
        let mut game = Self {
            session: Session::new(GameKind::CrossyRoad.id(), param(config, PARAMS, "difficulty")),
            tuning: Tuning::from_config(config),
            player: new_player(),
            riding: None,
            shield_ms: 0.0,
            furthest_row: 0,
            streak: 0,
            camera_y: 0.0,
            lanes: Vec::new(),
            next_lane: 0,
            clock: FixedStep::default(),
        };
        game.extend_lanes(rng);
        game
    }

    fn reset_world(&mut self, rng: &mut dyn RngCore) {
        self.player = new_player();
        self.riding = None;
        self.shield_ms = 0.0;
        self.furthest_row = 0;
        self.streak = 0;
        self.camera_y = 0.0;
        self.lanes.clear();
        self.next_lane = 0;
        self.clock.reset();
        self.extend_lanes(rng);
    }

    pub fn lane(&self, index: i64) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.index == index)
    }

    pub fn lane_mut(&mut self, index: i64) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|l| l.index == index)
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_ms > 0.0
    }

    /// Generate lanes above the camera and drop the ones far below it.
    fn extend_lanes(&mut self, rng: &mut dyn RngCore) {
        while Lane::y_for(self.next_lane) > self.camera_y - LANE_BUFFER {
            let lane = new_lane(self.next_lane, &self.tuning, self.session.difficulty, rng);
            self.lanes.push(lane);
            self.next_lane += 1;
        }
        let floor = self.camera_y + HEIGHT + LANE_BUFFER;
        self.lanes.retain(|l| l.y < floor);
    }

    /// Start a hop. Ignored while a hop is in flight. Returns points earned.
    pub fn hop(&mut self, dir: Direction) -> u32 {
        if self.player.is_moving() {
            return 0;
        }
        let mut target = self.player.pos;
        let half = GRID / 2.0;
        match dir {
            Direction::Up => target.y -= GRID,
            Direction::Down => target.y = (target.y + GRID).min(START.y),
            Direction::Left => target.x = (target.x - GRID).max(half),
            Direction::Right => target.x = (target.x + GRID).min(WIDTH - half),
        }
        if target == self.player.pos {
            return 0;
        }
        self.player.motion = Motion::Seek {
            target,
            rate: self.tuning.player_speed,
        };
        self.riding = None;

        let mut points = 0;
        match dir {
            Direction::Up => {
                let row = row_of(target.y);
                if row > self.furthest_row {
                    self.furthest_row = row;
                    self.streak += 1;
                    points += 1;
                    if self.streak >= STREAK_LENGTH {
                        points += STREAK_BONUS;
                        self.streak = 0;
                    }
                }
            }
            Direction::Down => self.streak = 0,
            _ => {}
        }
        self.session.add_score(points);
        points
    }

    fn tick(&mut self, rng: &mut dyn RngCore) {
        if self.player.is_moving() {
            self.player.advance();
            if !self.player.is_moving() {
                self.player.motion = Motion::Still;
            }
        } else if let Some(vx) = self.riding {
            self.player.pos.x += vx;
            let half = PLAYER_SIZE / 2.0;
            if self.player.clamp_x(half, WIDTH - half) {
                self.riding = None;
            }
        }
        self.shield_ms = (self.shield_ms - TICK).max(0.0);

        let target = self.session.base_difficulty + (self.furthest_row / 10) as f64 * 0.3;
        self.session.raise_difficulty(target);
        let difficulty = self.session.difficulty;

        for lane in &mut self.lanes {
            if lane.spawner.tick(TICK, difficulty) {
                let start_x = if lane.direction > 0.0 {
                    -100.0
                } else {
                    WIDTH + 100.0
                };
                spawn_traffic(lane, start_x, &self.tuning, difficulty, rng);
            }
            for entity in &mut lane.traffic {
                entity.advance();
            }
            lane.traffic
                .retain(|e| e.pos.x > -DESPAWN_MARGIN && e.pos.x < WIDTH + DESPAWN_MARGIN);
        }

        let camera_target = self.player.pos.y - HEIGHT + CAMERA_MARGIN;
        if camera_target < self.camera_y {
            self.camera_y += (camera_target - self.camera_y) * 0.1;
        }
        self.extend_lanes(rng);
    }

    /// Resolve what the frog is touching. Returns the outcome if it died.
    fn resolve_contacts(&mut self, events: &mut Vec<GameEvent>) -> Option<Outcome> {
        let bounds = self.player.bounds();
        let moving = self.player.is_moving();
        let y = self.player.pos.y;

        if let Some(lane) = self.lanes.iter_mut().find(|l| (l.y - y).abs() < GRID / 2.0) {
            match lane.kind {
                LaneKind::Road => {
                    let hit = lane.traffic.iter().any(|v| {
                        v.kind.is_vehicle()
                            && overlaps_with_tolerance(&bounds, &v.bounds(), VEHICLE_HITBOX_INSET)
                    });
                    if hit && self.shield_ms <= 0.0 {
                        return Some(Outcome::GameOver);
                    }
                }
                LaneKind::River => {
                    let support = lane
                        .traffic
                        .iter()
                        .find(|l| {
                            l.kind == Traffic::Log
                                && overlaps_with_tolerance(&bounds, &l.bounds(), LOG_SUPPORT_INSET)
                        })
                        .map(|l| l.vel.x);
                    if !moving {
                        match support {
                            Some(vx) => self.riding = Some(vx),
                            None => return Some(Outcome::GameOver),
                        }
                    }
                }
                LaneKind::Safe => {}
            }

            for shield in lane
                .traffic
                .iter_mut()
                .filter(|e| e.kind == Traffic::Shield && !e.flags.collected)
            {
                if overlaps(&bounds, &shield.bounds()) {
                    shield.flags.collected = true;
                    self.shield_ms = SHIELD_MS;
                    self.session.add_score(SHIELD_POINTS);
                    events.push(GameEvent::PowerUp("shield"));
                    events.push(GameEvent::Scored(SHIELD_POINTS));
                }
            }
            lane.traffic.retain(|e| !e.flags.collected);
            if lane.kind != LaneKind::River {
                self.riding = None;
            }
        }

        if y > self.camera_y + HEIGHT {
            return Some(Outcome::GameOver);
        }
        None
    }
}

impl Game for CrossyGame {
    fn kind(&self) -> GameKind {
        GameKind::CrossyRoad
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

        if let Some(dir) = controls.take_direction() {
            let points = self.hop(dir);
            if points > 0 {
                events.push(GameEvent::Scored(points));
            }
        }

        for _ in 0..self.clock.advance(dt_ms) {
            self.tick(rng);
            if let Some(outcome) = self.resolve_contacts(&mut events) {
                end_session(&mut self.session, outcome, &mut events);
                break;
            }
        }
        events
    }

    fn render(&self, sink: &mut dyn RenderSink, assets: &AssetStore) {
        self.draw(sink, assets);
    }

    fn restart(&mut self, rng: &mut dyn RngCore) -> bool {
        if !self.session.restart() {
            return false;
        }
        self.reset_world(rng);
        true
    }

    fn apply_config(&mut self, config: &GameConfig) {
        let tuning = Tuning::from_config(config);
        for lane in &mut self.lanes {
            let old = self.tuning.scale_for(lane.kind);
            let new = tuning.scale_for(lane.kind);
            if old > 0.0 {
                for entity in &mut lane.traffic {
                    entity.vel.x *= new / old;
                }
            }
        }
        if let Motion::Seek { rate, .. } = &mut self.player.motion {
            *rate = tuning.player_speed;
        }
        self.riding = None;
        self.tuning = tuning;
        self.session.base_difficulty = param(config, PARAMS, "difficulty");
        self.session.raise_difficulty(self.session.base_difficulty);
        debug!("crossy: config applied {:?}", self.tuning);
    }

    fn param_specs(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn asset_slots(&self) -> &'static [AssetSlot] {
        SLOTS
    }
}
