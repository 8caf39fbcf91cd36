use super::types::*;
use crate::core::{draw_slot, AssetStore, Rect, RenderSink, Rgb, Vec2};

const SKY: Rgb = Rgb::hex(0x87CEEB);
const GROUND: Rgb = Rgb::hex(0x8B4513);

impl RunnerGame {
    pub(super) fn draw(&self, sink: &mut dyn RenderSink, assets: &AssetStore) {
        let view = Rect::new(0.0, 0.0, WIDTH, HEIGHT);
        draw_slot(sink, assets, "background", view, |s| s.fill_rect(view, SKY));
        sink.fill_rect(Rect::new(0.0, GROUND_Y, WIDTH, HEIGHT - GROUND_Y), GROUND);

        for obstacle in &self.obstacles {
            let rect = obstacle.bounds();
            let color = obstacle.kind.color();
            draw_slot(sink, assets, obstacle.kind.slot(), rect, |s| {
                s.fill_rect(rect, color)
            });
        }
        for power_up in &self.power_ups {
            let rect = power_up.bounds();
            let color = power_up.kind.color();
            draw_slot(sink, assets, power_up.kind.slot(), rect, |s| {
                s.fill_circle(rect.center(), POWER_UP_SIZE / 2.0, color)
            });
        }

        let body = self.runner.bounds();
        if self.is_shielded() {
            sink.fill_circle(body.center(), 30.0, Rgb::hex(0x00BFFF));
        }
        draw_slot(sink, assets, "runner", body, |s| {
            s.fill_rect(body, Rgb::hex(0x4A90E2));
            s.fill_circle(Vec2::new(body.center().x, body.y + 10.0), 8.0, Rgb::hex(0xFFD700));
        });

        sink.text(
            Vec2::new(20.0, 40.0),
            &format!("Score: {}", self.session.score),
            Rgb::WHITE,
        );
        sink.text(
            Vec2::new(20.0, 70.0),
            &format!("Distance: {}m", self.distance.floor()),
            Rgb::WHITE,
        );
        sink.text(
            Vec2::new(20.0, 100.0),
            &format!("Speed: {:.1}x", self.speed() / self.tuning.base_speed),
            Rgb::WHITE,
        );
        if self.is_shielded() {
            sink.text(
                Vec2::new(WIDTH - 150.0, 40.0),
                &format!("Shield {}s", (self.shield_ms / 1000.0).ceil()),
                PowerUpKind::Shield.color(),
            );
        }
        if self.is_double_score() {
            sink.text(
                Vec2::new(WIDTH - 150.0, 70.0),
                &format!("2X {}s", (self.double_score_ms / 1000.0).ceil()),
                PowerUpKind::DoubleScore.color(),
            );
        }
    }
}
