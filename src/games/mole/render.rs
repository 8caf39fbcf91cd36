use super::types::*;
use crate::core::{draw_slot, AssetStore, Rect, RenderSink, Rgb, Vec2};

const HOLE_COLOR: Rgb = Rgb::hex(0x4A4A4A);

impl MoleGame {
    pub(super) fn draw(&self, sink: &mut dyn RenderSink, assets: &AssetStore) {
        let view = Rect::new(0.0, 0.0, WIDTH, HEIGHT);
        draw_slot(sink, assets, "background", view, |s| {
            s.fill_rect(view, Rgb::hex(0x90EE90))
        });

        for hole in &self.holes {
            let c = hole.center();
            let pit = Rect::new(c.x - 40.0, c.y + 10.0, 80.0, 40.0);
            draw_slot(sink, assets, "hole", pit, |s| {
                s.fill_rect(Rect::new(c.x - MOLE_SIZE / 2.0, c.y + 10.0, MOLE_SIZE, 20.0), HOLE_COLOR)
            });
            if !hole.is_up() {
                continue;
            }
            let body = hole.mole.bounds();
            let kind = hole.mole.kind;
            draw_slot(sink, assets, "mole", body, |s| {
                s.fill_circle(c, MOLE_SIZE / 2.0, kind.color());
                s.fill_circle(c + Vec2::new(-8.0, -10.0), 3.0, Rgb::BLACK);
                s.fill_circle(c + Vec2::new(8.0, -10.0), 3.0, Rgb::BLACK);
            });
            let marker = c + Vec2::new(0.0, 15.0);
            match kind {
                MoleKind::Golden => sink.text(marker, "*", Rgb::WHITE),
                MoleKind::Bomb => sink.text(marker, "!", Rgb::hex(0xFF0000)),
                MoleKind::Normal => {}
            }
        }

        if let Some((point, _)) = self.hammer {
            let head = Rect::new(point.x - 20.0, point.y - 30.0, 40.0, 60.0);
            draw_slot(sink, assets, "hammer", head, |s| {
                s.fill_rect(Rect::new(point.x - 15.0, point.y - 25.0, 30.0, 15.0), Rgb::hex(0x8B0000))
            });
        }

        sink.text(
            Vec2::new(20.0, 40.0),
            &format!("Score: {}", self.session.score),
            Rgb::WHITE,
        );
        sink.text(
            Vec2::new(20.0, 70.0),
            &format!("Time: {}s", (self.time_left_ms / 1000.0).ceil()),
            Rgb::WHITE,
        );
        if self.combo > 1 {
            sink.text(
                Vec2::new(WIDTH - 150.0, 40.0),
                &format!("Combo x{}", self.combo),
                Rgb::hex(0xFFD700),
            );
        }
    }
}
