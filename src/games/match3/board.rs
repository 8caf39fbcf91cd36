//! Gem board and the match, special-trigger and gravity rules.

use super::types::*;
use crate::core::{Anchor, Entity, GridPos, Vec2};
use log::debug;
use rand::Rng;
use std::collections::BTreeSet;

pub type Gem = Entity<GemKind>;

/// Pixel origin of a cell relative to the board's top-left corner.
pub fn cell_origin(pos: GridPos) -> Vec2 {
    Vec2::new(pos.x as f64 * GEM_SIZE, pos.y as f64 * GEM_SIZE)
}

pub fn new_gem(kind: GemKind, pos: GridPos) -> Gem {
    Entity::new(
        kind,
        cell_origin(pos),
        Vec2::new(GEM_SIZE, GEM_SIZE),
        Anchor::TopLeft,
    )
}

pub fn random_kind<R: Rng + ?Sized>(special_chance: f64, rng: &mut R) -> GemKind {
    if special_chance > 0.0 && rng.gen_bool(special_chance.min(1.0)) {
        GemKind::SPECIAL[rng.gen_range(0..GemKind::SPECIAL.len())]
    } else {
        GemKind::NORMAL[rng.gen_range(0..GemKind::NORMAL.len())]
    }
}

/// Points for clearing `cleared` gems at cascade `level` (1-based).
pub fn cascade_points(cleared: usize, level: u32) -> u32 {
    let base = cleared as u32 * POINTS_PER_GEM;
    let bonus = (base as f64 * level.saturating_sub(1) as f64 * CASCADE_BONUS).floor() as u32;
    base + bonus
}

/// Row-major grid of optional gems. Empty cells only exist mid-resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    cells: Vec<Option<Gem>>,
}

impl Board {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, mut kind: impl FnMut(GridPos) -> GemKind) -> Self {
        let mut board = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                let pos = GridPos::new(x, y);
                board.set(pos, Some(new_gem(kind(pos), pos)));
            }
        }
        board
    }

    /// A full board with no runs, each gem re-rolled as it is placed.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        special_chance: f64,
        rng: &mut R,
    ) -> Self {
        let mut board = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                let pos = GridPos::new(x, y);
                let kind = board.roll_kind(pos, special_chance, rng);
                board.set(pos, Some(new_gem(kind, pos)));
            }
        }
        board
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        (pos.x < self.width && pos.y < self.height).then(|| pos.y * self.width + pos.x)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.index(pos).is_some()
    }

    pub fn get(&self, pos: GridPos) -> Option<&Gem> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    pub fn kind(&self, pos: GridPos) -> Option<GemKind> {
        self.get(pos).map(|g| g.kind)
    }

    pub fn set(&mut self, pos: GridPos, gem: Option<Gem>) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = gem;
        }
    }

    pub fn take(&mut self, pos: GridPos) -> Option<Gem> {
        self.index(pos).and_then(|i| self.cells[i].take())
    }

    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| GridPos::new(x, y)))
    }

    pub fn gems(&self) -> impl Iterator<Item = (GridPos, &Gem)> + '_ {
        self.positions()
            .filter_map(move |p| self.get(p).map(|g| (p, g)))
    }

    /// Exchange two cells without animating.
    pub fn swap_cells(&mut self, a: GridPos, b: GridPos) {
        if let (Some(i), Some(j)) = (self.index(a), self.index(b)) {
            self.cells.swap(i, j);
        }
    }

    /// Exchange two cells and tween both gems to their new homes.
    pub fn swap(&mut self, a: GridPos, b: GridPos) {
        self.swap_cells(a, b);
        for pos in [a, b] {
            if let Some(i) = self.index(pos) {
                if let Some(gem) = self.cells[i].as_mut() {
                    gem.tween_to(cell_origin(pos), TWEEN_MS);
                }
            }
        }
    }

    /// True once every gem has reached its cell.
    pub fn is_settled(&self) -> bool {
        self.cells.iter().flatten().all(|g| !g.is_moving())
    }

    pub fn advance(&mut self) {
        for gem in self.cells.iter_mut().flatten() {
            gem.advance();
        }
    }

    /// Length of the same-kind run through `pos` along (`dx`, `dy`) if the
    /// cell held `kind`, counting `pos` itself.
    fn run_through(&self, pos: GridPos, kind: GemKind, dx: isize, dy: isize) -> usize {
        let mut count = 1;
        for sign in [-1isize, 1] {
            let (mut x, mut y) = (pos.x as isize, pos.y as isize);
            loop {
                x += dx * sign;
                y += dy * sign;
                if x < 0 || y < 0 {
                    break;
                }
                let next = GridPos::new(x as usize, y as usize);
                match self.kind(next) {
                    Some(k) if k == kind => count += 1,
                    _ => break,
                }
            }
        }
        count
    }

    /// True if `kind` placed at `pos` would complete a run of three.
    pub fn would_match(&self, pos: GridPos, kind: GemKind) -> bool {
        !kind.is_special()
            && (self.run_through(pos, kind, 1, 0) >= 3 || self.run_through(pos, kind, 0, 1) >= 3)
    }

    fn roll_kind<R: Rng + ?Sized>(&self, pos: GridPos, special_chance: f64, rng: &mut R) -> GemKind {
        let mut kind = random_kind(special_chance, rng);
        for _ in 1..REROLL_ATTEMPTS {
            if !self.would_match(pos, kind) {
                break;
            }
            kind = random_kind(special_chance, rng);
        }
        kind
    }
}

/// Every cell that belongs to a horizontal or vertical run of three or more
/// identical normal gems.
pub fn find_matches(board: &Board) -> BTreeSet<GridPos> {
    let mut matched = BTreeSet::new();
    let lines = (0..board.height)
        .map(|y| (0..board.width).map(move |x| GridPos::new(x, y)).collect::<Vec<_>>())
        .chain(
            (0..board.width)
                .map(|x| (0..board.height).map(move |y| GridPos::new(x, y)).collect::<Vec<_>>()),
        );

    for line in lines {
        let mut start = 0;
        while start < line.len() {
            let kind = board.kind(line[start]);
            let mut end = start + 1;
            while end < line.len() && board.kind(line[end]) == kind {
                end += 1;
            }
            if let Some(kind) = kind {
                if !kind.is_special() && end - start >= 3 {
                    matched.extend(&line[start..end]);
                }
            }
            start = end;
        }
    }
    matched
}

fn orthogonal_neighbours(board: &Board, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
    use crate::core::Direction::*;
    [Up, Down, Left, Right]
        .into_iter()
        .filter_map(move |d| pos.step(d, board.width, board.height))
}

/// Cells a triggered special gem at `pos` clears.
pub fn special_pattern(board: &Board, pos: GridPos, kind: GemKind) -> Vec<GridPos> {
    match kind {
        GemKind::Bomb => {
            let mut cells = Vec::with_capacity(9);
            for y in pos.y.saturating_sub(1)..=(pos.y + 1).min(board.height - 1) {
                for x in pos.x.saturating_sub(1)..=(pos.x + 1).min(board.width - 1) {
                    cells.push(GridPos::new(x, y));
                }
            }
            cells
        }
        GemKind::LineClear => (0..board.width)
            .map(|x| GridPos::new(x, pos.y))
            .chain((0..board.height).map(|y| GridPos::new(pos.x, y)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Grow a set of matched cells by the patterns of every special gem it
/// triggers. A special next to a matched gem fires; specials caught inside a
/// pattern fire in turn.
pub fn expand_specials(board: &Board, matched: &BTreeSet<GridPos>) -> BTreeSet<GridPos> {
    let mut cleared = matched.clone();
    let mut fired = BTreeSet::new();
    let mut queue: Vec<GridPos> = board
        .gems()
        .filter(|(p, g)| {
            g.kind.is_special() && orthogonal_neighbours(board, *p).any(|n| matched.contains(&n))
        })
        .map(|(p, _)| p)
        .collect();

    while let Some(pos) = queue.pop() {
        if !fired.insert(pos) {
            continue;
        }
        let Some(kind) = board.kind(pos) else {
            continue;
        };
        cleared.insert(pos);
        for cell in special_pattern(board, pos, kind) {
            cleared.insert(cell);
            if board.kind(cell).is_some_and(|k| k.is_special()) && !fired.contains(&cell) {
                queue.push(cell);
            }
        }
    }
    cleared
}

/// Drop gems into the gaps below them, then refill each column from the top.
/// New gems slide in from above the board and are re-rolled if they would
/// complete a run on arrival.
pub fn collapse<R: Rng + ?Sized>(board: &mut Board, special_chance: f64, rng: &mut R) {
    for x in 0..board.width {
        let mut write = board.height;
        for y in (0..board.height).rev() {
            let from = GridPos::new(x, y);
            if let Some(mut gem) = board.take(from) {
                write -= 1;
                let to = GridPos::new(x, write);
                if to != from {
                    gem.tween_to(cell_origin(to), TWEEN_MS);
                }
                board.set(to, Some(gem));
            }
        }
    }

    for x in 0..board.width {
        let empty = (0..board.height)
            .take_while(|&y| board.get(GridPos::new(x, y)).is_none())
            .count();
        for y in (0..empty).rev() {
            let pos = GridPos::new(x, y);
            let kind = board.roll_kind(pos, special_chance, rng);
            let mut gem = new_gem(kind, pos);
            gem.pos.y -= empty as f64 * GEM_SIZE;
            gem.tween_to(cell_origin(pos), TWEEN_MS);
            board.set(pos, Some(gem));
        }
        if empty > 0 {
            debug!("match3: refilled {} gems in column {}", empty, x);
        }
    }
}

/// Every adjacent swap that would produce at least one run.
pub fn find_possible_moves(board: &Board) -> Vec<(GridPos, GridPos)> {
    let mut scratch = board.clone();
    let mut moves = Vec::new();
    for pos in board.positions() {
        for other in [GridPos::new(pos.x + 1, pos.y), GridPos::new(pos.x, pos.y + 1)] {
            if !board.contains(other) {
                continue;
            }
            scratch.swap_cells(pos, other);
            if !find_matches(&scratch).is_empty() {
                moves.push((pos, other));
            }
            scratch.swap_cells(pos, other);
        }
    }
    moves
}
