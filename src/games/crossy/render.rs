use super::types::*;
use crate::core::{draw_slot, AssetStore, Rect, RenderSink, Rgb, Vec2};

fn lane_color(kind: LaneKind) -> Rgb {
    match kind {
        LaneKind::Safe => Rgb::hex(0x90EE90),
        LaneKind::Road => Rgb::hex(0x333333),
        LaneKind::River => Rgb::hex(0x4169E1),
    }
}

fn traffic_color(kind: Traffic) -> Rgb {
    match kind {
        Traffic::Car => Rgb::hex(0xFF4444),
        Traffic::Truck => Rgb::hex(0xFF8C00),
        Traffic::Bus => Rgb::hex(0xFFD700),
        Traffic::Log => Rgb::hex(0x8B4513),
        Traffic::Shield => Rgb::hex(0x00BFFF),
    }
}

impl CrossyGame {
    pub(super) fn draw(&self, sink: &mut dyn RenderSink, assets: &AssetStore) {
        let view = Rect::new(0.0, 0.0, WIDTH, HEIGHT);
        draw_slot(sink, assets, "background", view, |s| {
            s.fill_rect(view, Rgb::hex(0x87CEEB))
        });

        let to_screen = |r: Rect| Rect::new(r.x, r.y - self.camera_y, r.width, r.height);

        for lane in &self.lanes {
            let band = to_screen(Rect::new(0.0, lane.y - GRID / 2.0, WIDTH, GRID));
            if band.bottom() < 0.0 || band.y > HEIGHT {
                continue;
            }
            sink.fill_rect(band, lane_color(lane.kind));
            for entity in &lane.traffic {
                let rect = to_screen(entity.bounds());
                let color = traffic_color(entity.kind);
                if entity.kind == Traffic::Shield {
                    draw_slot(sink, assets, "shield", rect, |s| {
                        s.fill_circle(rect.center(), SHIELD_SIZE / 2.0, color)
                    });
                } else {
                    draw_slot(sink, assets, entity.kind.slot(), rect, |s| {
                        s.fill_rect(rect, color)
                    });
                }
            }
        }

        let player = to_screen(self.player.bounds());
        if self.is_shielded() {
            sink.fill_circle(player.center(), PLAYER_SIZE * 0.8, Rgb::hex(0x00BFFF));
        }
        draw_slot(sink, assets, "player", player, |s| {
            s.fill_rect(player, Rgb::hex(0x32CD32))
        });

        sink.text(
            Vec2::new(20.0, 40.0),
            &format!("Score: {}", self.session.score),
            Rgb::WHITE,
        );
        if self.is_shielded() {
            sink.text(
                Vec2::new(20.0, 70.0),
                &format!("Shield: {:.1}s", self.shield_ms / 1000.0),
                Rgb::hex(0x00BFFF),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DrawCall, DrawList, GameConfig, Sprite};
    use crate::games::Game;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_player_sprite_replaces_fallback() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let game = CrossyGame::new(&GameConfig::default(), &mut rng);
        let mut assets = AssetStore::default();
        assets.insert("player", Sprite::parse("frog", "@@\n@@").unwrap());

        let mut list = DrawList::default();
        game.render(&mut list, &assets);
        assert_eq!(list.sprites().collect::<Vec<_>>(), vec!["frog"]);
        assert!(list.texts().any(|t| t == "Score: 0"));
    }

    #[test]
    fn test_player_drawn_at_camera_offset() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut game = CrossyGame::new(&GameConfig::default(), &mut rng);
        game.camera_y = -100.0;
        let mut list = DrawList::default();
        game.render(&mut list, &AssetStore::default());
        let expected = Rect::new(385.0, 665.0, 30.0, 30.0);
        assert!(list
            .calls
            .iter()
            .any(|c| *c == DrawCall::Rect(expected, Rgb::hex(0x32CD32))));
    }
}
