//! Match-3 game logic: swaps, cascade resolution, levels and hints.

use super::board::*;
use super::types::*;
use crate::core::config::param;
use crate::core::entity::MAX_FRAME_MS;
use crate::core::{
    AssetSlot, AssetStore, Controls, FixedStep, GameConfig, GameState, GridPos, Outcome,
    ParamSpec, RenderSink, Session, Vec2, PHYSICS_TICK_MS,
};
use crate::games::{end_session, Game, GameEvent, GameKind};
use log::debug;
use rand::RngCore;

impl Match3Game {
    pub fn new(config: &GameConfig, rng: &mut dyn RngCore) -> Self {
        let mut game = Self {
            session: Session::new(GameKind::Match3.id(), 1.0),
            board: Board::empty(0, 0),
            grid_size: 0,
            level: 1,
            moves_left: 0,
            target: 0,
            moves_per_level: 0,
            base_target: 0,
            base_special_chance: 0.0,
            special_chance: 0.0,
            cursor: GridPos::new(0, 0),
            selected: None,
            hint: None,
            hint_ms: 0.0,
            last_cascade: 0,
            clock: FixedStep::default(),
        };
        game.read_config(config);
        game.setup_level(rng);
        game
    }

    fn read_config(&mut self, config: &GameConfig) {
        self.grid_size = param(config, PARAMS, "gridSize") as usize;
        self.moves_per_level = param(config, PARAMS, "movesPerLevel") as u32;
        self.base_target = param(config, PARAMS, "targetScore") as u32;
        self.base_special_chance = param(config, PARAMS, "specialGemChance") / 100.0;
        self.special_chance = self.special_chance_for(self.level);
        self.target = self.base_target * self.level;
    }

    fn special_chance_for(&self, level: u32) -> f64 {
        if level <= 1 {
            self.base_special_chance
        } else {
            (self.base_special_chance + level as f64 * SPECIAL_CHANCE_PER_LEVEL)
                .min(MAX_SPECIAL_CHANCE)
        }
    }

    fn moves_for(&self, level: u32) -> u32 {
        if level <= 1 {
            self.moves_per_level
        } else {
            self.moves_per_level + level * MOVES_PER_LEVEL_STEP
        }
    }

    /// Fresh board and counters for the current level.
    fn setup_level(&mut self, rng: &mut dyn RngCore) {
        self.moves_left = self.moves_for(self.level);
        self.target = self.base_target * self.level;
        self.special_chance = self.special_chance_for(self.level);
        self.board = Board::random(self.grid_size, self.grid_size, self.special_chance, rng);
        self.ensure_moves(rng);
        self.cursor = GridPos::new(0, 0);
        self.selected = None;
        self.hint = None;
        self.hint_ms = 0.0;
        self.last_cascade = 0;
        self.clock.reset();
        debug!(
            "match3: level {} with {} moves, target {}",
            self.level, self.moves_left, self.target
        );
    }

    /// Replace the board until at least one swap is available.
    pub fn ensure_moves(&mut self, rng: &mut dyn RngCore) {
        for _ in 0..REROLL_ATTEMPTS {
            if !find_possible_moves(&self.board).is_empty() {
                return;
            }
            debug!("match3: no moves left, reshuffling");
            self.board = Board::random(self.board.width, self.board.height, self.special_chance, rng);
        }
    }

    /// Board cell under a world-space point.
    pub fn cell_at(&self, point: Vec2) -> Option<GridPos> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let pos = GridPos::new(
            (point.x / GEM_SIZE) as usize,
            (point.y / GEM_SIZE) as usize,
        );
        self.board.contains(pos).then_some(pos)
    }

    /// Swap two neighbouring gems. A swap that makes no run is undone and
    /// costs nothing; otherwise it spends a move and resolves every cascade.
    pub fn try_swap(
        &mut self,
        a: GridPos,
        b: GridPos,
        rng: &mut dyn RngCore,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !a.is_adjacent(b) || !self.board.contains(a) || !self.board.contains(b) {
            return false;
        }
        self.board.swap_cells(a, b);
        let valid = !find_matches(&self.board).is_empty();
        self.board.swap_cells(a, b);
        if !valid {
            debug!("match3: swap {:?} <-> {:?} makes no match", a, b);
            return false;
        }

        self.board.swap(a, b);
        self.moves_left = self.moves_left.saturating_sub(1);
        self.selected = None;
        self.hint = None;

        let total = self.resolve(rng, events);
        if total > 0 {
            events.push(GameEvent::Scored(total));
        }
        self.ensure_moves(rng);

        if self.session.score >= self.target {
            self.session.finish(Outcome::LevelComplete);
            if self.session.state == GameState::LevelComplete {
                events.push(GameEvent::LevelComplete {
                    level: self.level,
                    score: self.session.score,
                });
            }
        } else if self.moves_left == 0 {
            end_session(&mut self.session, Outcome::GameOver, events);
        }
        true
    }

    /// Clear, collapse and refill until the board is quiet. Returns the
    /// points earned.
    fn resolve(&mut self, rng: &mut dyn RngCore, events: &mut Vec<GameEvent>) -> u32 {
        let mut level = 0;
        let mut total = 0;
        while level < MAX_CASCADES {
            let matched = find_matches(&self.board);
            if matched.is_empty() {
                break;
            }
            level += 1;
            let cleared = expand_specials(&self.board, &matched);
            for pos in &cleared {
                self.board.take(*pos);
            }
            let points = cascade_points(cleared.len(), level);
            self.session.add_score(points);
            total += points;
            events.push(GameEvent::Cascade {
                level,
                cleared: cleared.len(),
                points,
            });
            collapse(&mut self.board, self.special_chance, rng);
        }
        self.last_cascade = level;
        total
    }

    /// Click on a cell: select it, or swap with the selection if adjacent.
    fn select(&mut self, cell: GridPos, rng: &mut dyn RngCore, events: &mut Vec<GameEvent>) {
        match self.selected.take() {
            Some(sel) if sel == cell => {}
            Some(sel) if sel.is_adjacent(cell) => {
                self.try_swap(sel, cell, rng, events);
            }
            _ => self.selected = Some(cell),
        }
    }

    fn handle_input(
        &mut self,
        controls: &mut Controls,
        rng: &mut dyn RngCore,
        events: &mut Vec<GameEvent>,
    ) {
        if let Some((a, b)) = controls.take_swap() {
            self.try_swap(a, b, rng, events);
            return;
        }
        if let Some(point) = controls.take_pointer() {
            if let Some(cell) = self.cell_at(point) {
                self.cursor = cell;
                self.select(cell, rng, events);
            }
            return;
        }
        if controls.take_action() {
            self.select(self.cursor, rng, events);
            return;
        }
        if let Some(dir) = controls.take_direction() {
            let (w, h) = (self.board.width, self.board.height);
            match self.selected.take() {
                Some(sel) => {
                    if let Some(target) = sel.step(dir, w, h) {
                        self.cursor = target;
                        self.try_swap(sel, target, rng, events);
                    }
                }
                None => {
                    if let Some(next) = self.cursor.step(dir, w, h) {
                        self.cursor = next;
                    }
                }
            }
        }
    }

    fn tick(&mut self) {
        self.board.advance();
        if self.hint.is_some() {
            self.hint_ms -= PHYSICS_TICK_MS as f64;
            if self.hint_ms <= 0.0 {
                self.hint = None;
            }
        }
    }
}

impl Game for Match3Game {
    fn kind(&self) -> GameKind {
        GameKind::Match3
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.board.width as f64 * GEM_SIZE,
            self.board.height as f64 * GEM_SIZE + HUD_HEIGHT,
        )
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

        // Input waits for gems to finish falling.
        if self.board.is_settled() {
            self.handle_input(controls, rng, &mut events);
        }
        if !self.session.is_playing() {
            return events;
        }
        for _ in 0..self.clock.advance(dt_ms) {
            self.tick();
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
        self.level = 1;
        self.setup_level(rng);
        true
    }

    fn apply_config(&mut self, config: &GameConfig) {
        // Grid size takes effect with the next board.
        self.read_config(config);
        debug!(
            "match3: config applied, grid {} target {}",
            self.grid_size, self.target
        );
    }

    fn param_specs(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn asset_slots(&self) -> &'static [AssetSlot] {
        SLOTS
    }

    fn next_level(&mut self, rng: &mut dyn RngCore) -> bool {
        if !self.session.continue_level() {
            return false;
        }
        self.level += 1;
        self.setup_level(rng);
        self.session.raise_difficulty(self.level as f64);
        true
    }

    fn hint(&mut self) -> bool {
        if !self.session.is_playing() {
            return false;
        }
        match find_possible_moves(&self.board).first() {
            Some(&mv) => {
                self.hint = Some(mv);
                self.hint_ms = HINT_MS;
                true
            }
            None => false,
        }
    }
}
