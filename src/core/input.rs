//! Edge-triggered action flags supplied by the front-end.
//!
//! The front-end sets flags as keys arrive; each game consumes the ones it
//! cares about with the `take_*` methods during `step`, and `end_frame`
//! drops anything left over so a stale press never fires a frame late.

use super::geometry::Vec2;

/// A cell on a grid board (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// True if the two cells share an edge.
    pub fn is_adjacent(&self, other: GridPos) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }

    /// Neighbour in `dir`, if it stays inside a `width` x `height` grid.
    pub fn step(&self, dir: Direction, width: usize, height: usize) -> Option<GridPos> {
        let (x, y) = match dir {
            Direction::Up => (Some(self.x), self.y.checked_sub(1)),
            Direction::Down => (Some(self.x), Some(self.y + 1)),
            Direction::Left => (self.x.checked_sub(1), Some(self.y)),
            Direction::Right => (Some(self.x + 1), Some(self.y)),
        };
        match (x, y) {
            (Some(x), Some(y)) if x < width && y < height => Some(GridPos::new(x, y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Jump / flap.
    pub jump: bool,
    /// Select / confirm.
    pub action: bool,
    /// Pointer click in world coordinates.
    pub pointer: Option<Vec2>,
    /// Drag gesture between two grid cells.
    pub swap: Option<(GridPos, GridPos)>,
    /// Level flag: held for as long as the front-end keeps it set.
    pub slide: bool,
}

impl Controls {
    pub fn press(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    /// Consume one pending direction, in up/down/left/right priority.
    pub fn take_direction(&mut self) -> Option<Direction> {
        if std::mem::take(&mut self.up) {
            Some(Direction::Up)
        } else if std::mem::take(&mut self.down) {
            Some(Direction::Down)
        } else if std::mem::take(&mut self.left) {
            Some(Direction::Left)
        } else if std::mem::take(&mut self.right) {
            Some(Direction::Right)
        } else {
            None
        }
    }

    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    pub fn take_action(&mut self) -> bool {
        std::mem::take(&mut self.action)
    }

    pub fn take_pointer(&mut self) -> Option<Vec2> {
        self.pointer.take()
    }

    pub fn take_swap(&mut self) -> Option<(GridPos, GridPos)> {
        self.swap.take()
    }

    /// Clear every edge-triggered flag. `slide` is a level and survives.
    pub fn end_frame(&mut self) {
        let slide = self.slide;
        *self = Controls {
            slide,
            ..Controls::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears_flag() {
        let mut c = Controls::default();
        c.jump = true;
        assert!(c.take_jump());
        assert!(!c.take_jump());
    }

    #[test]
    fn test_direction_priority() {
        let mut c = Controls::default();
        c.press(Direction::Left);
        c.press(Direction::Up);
        assert_eq!(c.take_direction(), Some(Direction::Up));
        assert_eq!(c.take_direction(), Some(Direction::Left));
        assert_eq!(c.take_direction(), None);
    }

    #[test]
    fn test_end_frame_keeps_slide() {
        let mut c = Controls {
            slide: true,
            jump: true,
            pointer: Some(Vec2::new(1.0, 2.0)),
            ..Controls::default()
        };
        c.end_frame();
        assert!(c.slide);
        assert!(!c.jump);
        assert!(c.pointer.is_none());
    }

    #[test]
    fn test_grid_step_stays_inside() {
        let p = GridPos::new(0, 0);
        assert_eq!(p.step(Direction::Left, 8, 8), None);
        assert_eq!(p.step(Direction::Up, 8, 8), None);
        assert_eq!(p.step(Direction::Right, 8, 8), Some(GridPos::new(1, 0)));
        assert_eq!(GridPos::new(7, 7).step(Direction::Down, 8, 8), None);
    }

    #[test]
    fn test_adjacency() {
        let p = GridPos::new(3, 3);
        assert!(p.is_adjacent(GridPos::new(3, 4)));
        assert!(p.is_adjacent(GridPos::new(2, 3)));
        assert!(!p.is_adjacent(GridPos::new(4, 4)));
        assert!(!p.is_adjacent(p));
    }
}
