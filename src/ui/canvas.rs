//! Character-cell render sink.
//!
//! Games draw in world pixels; `TerminalCanvas` maps the world onto a grid
//! of terminal cells. A cell is painted when its centre falls inside the
//! shape, and tiny shapes still claim the cell they sit in.

use arcade::core::{Rect, RenderSink, Rgb, Sprite, Vec2};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Option<Rgb>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgb::WHITE,
            bg: None,
        }
    }
}

pub struct TerminalCanvas {
    cols: usize,
    rows: usize,
    world: Vec2,
    cells: Vec<Cell>,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16, world: Vec2) -> Self {
        let (cols, rows) = (cols as usize, rows as usize);
        Self {
            cols,
            rows,
            world,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    fn scale(&self) -> (f64, f64) {
        if self.world.x <= 0.0 || self.world.y <= 0.0 {
            return (0.0, 0.0);
        }
        (
            self.cols as f64 / self.world.x,
            self.rows as f64 / self.world.y,
        )
    }

    /// Cell under a world point.
    pub fn cell_at(&self, point: Vec2) -> (isize, isize) {
        let (sx, sy) = self.scale();
        (
            (point.x * sx).floor() as isize,
            (point.y * sy).floor() as isize,
        )
    }

    /// World point at the centre of a cell.
    pub fn world_at(&self, col: usize, row: usize) -> Vec2 {
        let (sx, sy) = self.scale();
        if sx == 0.0 || sy == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new((col as f64 + 0.5) / sx, (row as f64 + 0.5) / sy)
    }

    /// Half-open cell span covering `[start, end)` along one axis.
    fn span(start: f64, end: f64, scale: f64, limit: usize) -> (usize, usize) {
        if end * scale <= 0.0 || start * scale >= limit as f64 {
            return (0, 0);
        }
        let lo = (start * scale).round().max(0.0);
        let mut hi = (end * scale).round().max(0.0);
        if hi <= lo && end > start {
            hi = lo + 1.0;
        }
        let lo = (lo as usize).min(limit);
        let hi = (hi as usize).min(limit);
        (lo, hi)
    }

    fn cell_span(&self, rect: &Rect) -> ((usize, usize), (usize, usize)) {
        let (sx, sy) = self.scale();
        (
            Self::span(rect.x, rect.right(), sx, self.cols),
            Self::span(rect.y, rect.bottom(), sy, self.rows),
        )
    }

    /// Convert to ratatui lines, one per row.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        (0..self.rows)
            .map(|row| {
                let spans: Vec<Span<'static>> = (0..self.cols)
                    .filter_map(|col| self.cell(col, row))
                    .map(|cell| {
                        let mut style = Style::default().fg(to_color(cell.fg));
                        if let Some(bg) = cell.bg {
                            style = style.bg(to_color(bg));
                        }
                        Span::styled(cell.ch.to_string(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

impl RenderSink for TerminalCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let ((c0, c1), (r0, r1)) = self.cell_span(&rect);
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = ' ';
                    cell.bg = Some(color);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgb) {
        let bounds = Rect::centered(center, Vec2::new(radius * 2.0, radius * 2.0));
        let ((c0, c1), (r0, r1)) = self.cell_span(&bounds);
        let mut painted = false;
        for row in r0..r1 {
            for col in c0..c1 {
                if self.world_at(col, row).distance(center) <= radius {
                    if let Some(cell) = self.cell_mut(col, row) {
                        cell.ch = ' ';
                        cell.bg = Some(color);
                        painted = true;
                    }
                }
            }
        }
        if !painted {
            let (col, row) = self.cell_at(center);
            if col >= 0 && row >= 0 {
                if let Some(cell) = self.cell_mut(col as usize, row as usize) {
                    cell.ch = ' ';
                    cell.bg = Some(color);
                }
            }
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite, rect: Rect) {
        let ((c0, c1), (r0, r1)) = self.cell_span(&rect);
        let (span_w, span_h) = (c1.saturating_sub(c0), r1.saturating_sub(r0));
        if span_w == 0 || span_h == 0 {
            return;
        }
        for row in r0..r1 {
            for col in c0..c1 {
                let sprite_col = (col - c0) * sprite.width / span_w;
                let sprite_row = (row - r0) * sprite.height / span_h;
                if let Some(ch) = sprite.glyph(sprite_col, sprite_row) {
                    if let Some(cell) = self.cell_mut(col, row) {
                        cell.ch = ch;
                        cell.fg = sprite.color;
                    }
                }
            }
        }
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Rgb) {
        let (col, row) = self.cell_at(pos);
        if row < 0 || row as usize >= self.rows {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as isize;
            if c < 0 {
                continue;
            }
            match self.cell_mut(c as usize, row as usize) {
                Some(cell) => {
                    cell.ch = ch;
                    cell.fg = color;
                }
                None => break,
            }
        }
    }
}
