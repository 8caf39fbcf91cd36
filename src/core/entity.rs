//! Generic entity model shared by all five games.
//!
//! An entity is a positioned, sized object with a type tag and a movement
//! rule. Games differ only in the tag type `K` and in which `Motion` they
//! pick for each entity, so the update and bounds logic lives here once.

use super::geometry::{Rect, Vec2};

/// Physics tick length in milliseconds (~60 FPS).
pub const PHYSICS_TICK_MS: u64 = 16;

/// Largest frame delta accepted by `FixedStep`, so a stall or pause doesn't
/// turn into a burst of physics ticks.
pub const MAX_FRAME_MS: u64 = 100;

/// Which point of the entity `pos` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopLeft,
}

/// Per-tick movement rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Does not move on its own.
    Still,
    /// Constant velocity.
    Drift,
    /// Gravity-integrated vertical motion with a terminal velocity clamp.
    Ballistic {
        gravity: f64,
        terminal_velocity: f64,
    },
    /// Exponential approach toward a grid target; snaps within 1 px.
    Seek { target: Vec2, rate: f64 },
    /// Eased interpolation between two points over a fixed duration.
    Tween {
        from: Vec2,
        to: Vec2,
        elapsed_ms: f64,
        duration_ms: f64,
    },
}

/// Lifecycle flags. Which ones matter depends on the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub visible: bool,
    pub collected: bool,
    pub matched: bool,
    pub scored: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity<K> {
    pub kind: K,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub anchor: Anchor,
    pub motion: Motion,
    pub flags: Flags,
}

impl<K> Entity<K> {
    pub fn new(kind: K, pos: Vec2, size: Vec2, anchor: Anchor) -> Self {
        Self {
            kind,
            pos,
            size,
            vel: Vec2::ZERO,
            anchor,
            motion: Motion::Still,
            flags: Flags {
                visible: true,
                ..Flags::default()
            },
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Bounding box derived from the current position and size.
    pub fn bounds(&self) -> Rect {
        match self.anchor {
            Anchor::Center => Rect::centered(self.pos, self.size),
            Anchor::TopLeft => Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y),
        }
    }

    /// True while a `Seek` or `Tween` is still in flight.
    pub fn is_moving(&self) -> bool {
        match self.motion {
            Motion::Seek { target, .. } => self.pos != target,
            Motion::Tween {
                elapsed_ms,
                duration_ms,
                ..
            } => elapsed_ms < duration_ms,
            _ => false,
        }
    }

    /// Advance one physics tick.
    pub fn advance(&mut self) {
        match &mut self.motion {
            Motion::Still => {}
            Motion::Drift => {
                self.pos += self.vel;
            }
            Motion::Ballistic {
                gravity,
                terminal_velocity,
            } => {
                self.vel.y = (self.vel.y + *gravity).min(*terminal_velocity);
                self.pos += self.vel;
            }
            Motion::Seek { target, rate } => {
                let delta = *target - self.pos;
                if delta.x.abs() < 1.0 && delta.y.abs() < 1.0 {
                    self.pos = *target;
                } else {
                    self.pos += delta * *rate;
                }
            }
            Motion::Tween {
                from,
                to,
                elapsed_ms,
                duration_ms,
            } => {
                *elapsed_ms = (*elapsed_ms + PHYSICS_TICK_MS as f64).min(*duration_ms);
                let t = if *duration_ms > 0.0 {
                    *elapsed_ms / *duration_ms
                } else {
                    1.0
                };
                let eased = ease_in_out_cubic(t);
                self.pos = *from + (*to - *from) * eased;
            }
        }
    }

    /// Start a tween from the current position to `to`.
    pub fn tween_to(&mut self, to: Vec2, duration_ms: f64) {
        self.motion = Motion::Tween {
            from: self.pos,
            to,
            elapsed_ms: 0.0,
            duration_ms,
        };
    }

    /// Clamp the anchor x into `[min, max]`. Returns true if it had to clamp.
    pub fn clamp_x(&mut self, min: f64, max: f64) -> bool {
        let clamped = self.pos.x.clamp(min, max);
        let engaged = clamped != self.pos.x;
        self.pos.x = clamped;
        engaged
    }
}

/// Cubic ease-in-out on `t` in `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Fixed-timestep accumulator turning variable frame deltas into ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep {
    pub accumulated_ms: u64,
}

impl FixedStep {
    /// Add `dt_ms` (clamped to `MAX_FRAME_MS`) and return how many whole
    /// ticks are now due.
    pub fn advance(&mut self, dt_ms: u64) -> u32 {
        self.accumulated_ms += dt_ms.min(MAX_FRAME_MS);
        let ticks = self.accumulated_ms / PHYSICS_TICK_MS;
        self.accumulated_ms %= PHYSICS_TICK_MS;
        ticks as u32
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
    }
}
