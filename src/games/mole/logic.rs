//! Whack-the-Mole game logic: spawning, whacking, combos and the countdown.

use super::types::*;
use crate::core::entity::MAX_FRAME_MS;
use crate::core::{
    AssetSlot, AssetStore, Controls, FixedStep, GameConfig, GameState, Outcome, ParamSpec,
    RenderSink, Session, Spawner, Vec2, WeightedTable, PHYSICS_TICK_MS,
};
use crate::games::{end_session, Game, GameEvent, GameKind};
use log::debug;
use rand::{Rng, RngCore};

const TICK_MS: f64 = PHYSICS_TICK_MS as f64;

fn mole_table() -> WeightedTable<MoleKind> {
    WeightedTable::new(vec![
        (MoleKind::Normal, 8.0, 0.0),
        (MoleKind::Golden, 1.0, 0.0),
        (MoleKind::Bomb, 1.0, 0.5),
    ])
}

/// Points for a hit at `combo` (1 for the first hit in a chain).
pub fn combo_points(points: u32, combo: u32) -> u32 {
    let bonus = (points as f64 * combo.saturating_sub(1) as f64 * COMBO_BONUS).floor() as u32;
    points + bonus
}

impl MoleGame {
    pub fn new(config: &GameConfig) -> Self {
        let tuning = Tuning::from_config(config);
        Self {
            session: Session::new(GameKind::WhackTheMole.id(), tuning.difficulty),
            tuning,
            holes: (0..COLS * ROWS).map(Hole::new).collect(),
            spawner: Spawner::new(tuning.spawn_rate_ms, MIN_SPAWN_MS, SPAWN_EASE_MS),
            time_left_ms: tuning.game_time_ms,
            play_ms: 0,
            combo: 0,
            max_combo: 0,
            last_hit_ms: 0,
            missed: 0,
            hammer: None,
            clock: FixedStep::default(),
        }
    }

    fn reset_world(&mut self) {
        *self = Self {
            session: self.session.clone(),
            ..Self::new_with(self.tuning)
        };
    }

    fn new_with(tuning: Tuning) -> Self {
        let mut game = Self::new(&GameConfig::default());
        game.tuning = tuning;
        game.spawner = Spawner::new(tuning.spawn_rate_ms, MIN_SPAWN_MS, SPAWN_EASE_MS);
        game.time_left_ms = tuning.game_time_ms;
        game
    }

    pub fn visible_count(&self) -> usize {
        self.holes.iter().filter(|h| h.is_up()).count()
    }

    /// Raise one mole, or two at higher difficulty, in random empty holes.
    pub fn spawn_moles<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let difficulty = self.session.difficulty;
        let count = if difficulty > DOUBLE_SPAWN_DIFFICULTY && rng.gen_bool(DOUBLE_SPAWN_CHANCE) {
            2
        } else {
            1
        };
        for _ in 0..count {
            let free: Vec<usize> = (0..self.holes.len())
                .filter(|&i| !self.holes[i].is_up())
                .collect();
            if free.is_empty() {
                return;
            }
            let index = free[rng.gen_range(0..free.len())];
            let Some(kind) = mole_table().pick(difficulty, rng) else {
                return;
            };
            let visible = kind.visible_ms(difficulty) * self.tuning.visibility_scale();
            debug!("mole: {:?} in hole {} for {:.0} ms", kind, index, visible);
            self.holes[index].show(kind, visible);
        }
    }

    /// Swing at `point`. Returns true if a mole was hit.
    pub fn whack(&mut self, point: Vec2, events: &mut Vec<GameEvent>) -> bool {
        self.hammer = Some((point, HAMMER_MS));
        let Some(hole) = self.holes.iter_mut().find(|h| h.is_hit(point)) else {
            self.combo = 0;
            return false;
        };
        let kind = hole.mole.kind;
        hole.hide();

        if kind == MoleKind::Bomb {
            self.session.apply_penalty(kind.points());
            self.combo = 0;
            events.push(GameEvent::Penalty(kind.points()));
        } else {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
            self.last_hit_ms = self.play_ms;
            let points = combo_points(kind.points(), self.combo);
            self.session.add_score(points);
            events.push(GameEvent::Scored(points));
        }
        true
    }

    fn tick(&mut self, rng: &mut dyn RngCore, events: &mut Vec<GameEvent>) -> Option<Outcome> {
        self.play_ms += PHYSICS_TICK_MS;
        self.time_left_ms = (self.time_left_ms - TICK_MS).max(0.0);
        if self.time_left_ms <= 0.0 {
            return Some(Outcome::GameOver);
        }

        let steps = (self.play_ms / DIFFICULTY_EVERY_MS) as f64;
        self.session
            .raise_difficulty(self.session.base_difficulty + steps * DIFFICULTY_STEP);

        if self.combo > 0 && self.play_ms - self.last_hit_ms > COMBO_WINDOW_MS {
            self.combo = 0;
        }

        if self.spawner.tick(TICK_MS, self.session.difficulty) {
            self.spawn_moles(rng);
        }

        let mut missed = 0;
        for hole in self.holes.iter_mut().filter(|h| h.is_up()) {
            hole.shown_ms += TICK_MS;
            if hole.shown_ms >= hole.visible_for_ms {
                if hole.mole.kind != MoleKind::Bomb {
                    missed += 1;
                }
                hole.hide();
            }
        }
        if missed > 0 {
            self.missed += missed;
            self.combo = 0;
            self.session.apply_penalty(missed * MISS_PENALTY);
            events.push(GameEvent::Penalty(missed * MISS_PENALTY));
        }

        if let Some((_, ms)) = &mut self.hammer {
            *ms -= TICK_MS;
            if *ms <= 0.0 {
                self.hammer = None;
            }
        }
        None
    }
}

impl Game for MoleGame {
    fn kind(&self) -> GameKind {
        GameKind::WhackTheMole
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

        if let Some(point) = controls.take_pointer() {
            self.whack(point, &mut events);
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
        let old_scale = self.tuning.visibility_scale();
        self.tuning = Tuning::from_config(config);
        let ratio = self.tuning.visibility_scale() / old_scale;
        for hole in self.holes.iter_mut().filter(|h| h.is_up()) {
            hole.visible_for_ms *= ratio;
        }
        self.spawner.interval_ms = self.tuning.spawn_rate_ms;
        if self.session.state == GameState::Menu {
            self.time_left_ms = self.tuning.game_time_ms;
            self.session.base_difficulty = self.tuning.difficulty;
            self.session.difficulty = self.tuning.difficulty;
        }
        debug!(
            "mole: config applied, spawn every {:.0} ms",
            self.spawner.effective_interval(self.session.difficulty)
        );
    }

    fn param_specs(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn asset_slots(&self) -> &'static [AssetSlot] {
        SLOTS
    }
}
