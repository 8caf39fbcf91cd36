use super::logic::rotation;
use super::types::*;
use crate::core::{draw_slot, AssetStore, Rect, RenderSink, Rgb, Vec2};

const GROUND_HEIGHT: f64 = 20.0;
const PIPE_GREEN: Rgb = Rgb::hex(0x4CAF50);
const PIPE_CAP: Rgb = Rgb::hex(0x45A049);

impl FlappyGame {
    pub(super) fn draw(&self, sink: &mut dyn RenderSink, assets: &AssetStore) {
        let view = Rect::new(0.0, 0.0, WIDTH, HEIGHT);
        draw_slot(sink, assets, "background", view, |s| {
            s.fill_rect(view, Rgb::hex(0x87CEEB))
        });
        sink.fill_rect(
            Rect::new(0.0, HEIGHT - GROUND_HEIGHT, WIDTH, GROUND_HEIGHT),
            Rgb::hex(0x8B4513),
        );

        for pipe in &self.pipes {
            for (rect, cap_y) in [
                (pipe.top_rect(), pipe.gap_y - GROUND_HEIGHT),
                (pipe.bottom_rect(), pipe.gap_y + pipe.gap),
            ] {
                if rect.height <= 0.0 {
                    continue;
                }
                let custom = draw_slot(sink, assets, "pipe", rect, |s| s.fill_rect(rect, PIPE_GREEN));
                if !custom {
                    sink.fill_rect(
                        Rect::new(rect.x - 5.0, cap_y, rect.width + 10.0, GROUND_HEIGHT),
                        PIPE_CAP,
                    );
                }
            }
        }

        let bird = self.bird.bounds();
        draw_slot(sink, assets, "bird", bird, |s| {
            s.fill_circle(self.bird.pos, BIRD_SIZE / 2.0, Rgb::hex(0xFFD700));
            // Eye sits forward when climbing, drops when diving.
            let tilt = rotation(self.bird.vel.y).to_radians();
            let eye = self.bird.pos + Vec2::new(5.0 * tilt.cos(), -5.0 + 5.0 * tilt.sin());
            s.fill_circle(eye, 3.0, Rgb::WHITE);
        });

        sink.text(
            Vec2::new(WIDTH / 2.0, 80.0),
            &self.session.score.to_string(),
            Rgb::WHITE,
        );
        sink.text(
            Vec2::new(20.0, HEIGHT - 40.0),
            &format!("Speed: {:.1}x", self.speed()),
            Rgb::WHITE,
        );
        if let Some(next) = MILESTONES.iter().find(|m| **m > self.session.score) {
            sink.text(
                Vec2::new(20.0, HEIGHT - 20.0),
                &format!("Next: {}", next),
                Rgb::WHITE,
            );
        }
    }
}
