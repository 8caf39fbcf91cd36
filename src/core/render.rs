//! Abstract drawing surface.
//!
//! Games describe a frame as primitive calls in world pixels. The terminal
//! front-end rasterises them into character cells; `DrawList` just records
//! them, which is what headless runs and tests use.

use super::assets::{AssetStore, Sprite};
use super::geometry::{Rect, Vec2};

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// From a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Rgb {
        Rgb(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        )
    }
}

pub trait RenderSink {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgb);
    fn draw_sprite(&mut self, sprite: &Sprite, rect: Rect);
    fn text(&mut self, pos: Vec2, text: &str, color: Rgb);
}

/// Draw the custom sprite for `slot` if one is loaded, else run `fallback`.
/// Returns true when the custom sprite was used.
pub fn draw_slot<S, F>(sink: &mut S, assets: &AssetStore, slot: &str, rect: Rect, fallback: F) -> bool
where
    S: RenderSink + ?Sized,
    F: FnOnce(&mut S),
{
    match assets.get(slot) {
        Some(sprite) => {
            sink.draw_sprite(sprite, rect);
            true
        }
        None => {
            fallback(sink);
            false
        }
    }
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Rect(Rect, Rgb),
    Circle(Vec2, f64, Rgb),
    Sprite(String, Rect),
    Text(Vec2, String, Rgb),
}

/// Sink that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn sprites(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Sprite(name, _) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Text(_, t, _) => Some(t.as_str()),
            _ => None,
        })
    }
}

impl RenderSink for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.calls.push(DrawCall::Rect(rect, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgb) {
        self.calls.push(DrawCall::Circle(center, radius, color));
    }

    fn draw_sprite(&mut self, sprite: &Sprite, rect: Rect) {
        self.calls.push(DrawCall::Sprite(sprite.name.clone(), rect));
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Rgb) {
        self.calls.push(DrawCall::Text(pos, text.to_string(), color));
    }
}
