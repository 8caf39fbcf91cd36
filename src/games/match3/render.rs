use super::types::*;
use crate::core::{draw_slot, AssetStore, GridPos, Rect, RenderSink, Rgb, Vec2};

const FRAME: f64 = 3.0;
const CURSOR: Rgb = Rgb::hex(0xCCCCCC);
const SELECTED: Rgb = Rgb::hex(0xFFFF00);
const HINT: Rgb = Rgb::hex(0x00FF00);

fn cell_rect(pos: GridPos) -> Rect {
    Rect::new(
        pos.x as f64 * GEM_SIZE,
        pos.y as f64 * GEM_SIZE,
        GEM_SIZE,
        GEM_SIZE,
    )
}

/// Hollow square drawn as four thin bars.
fn outline(sink: &mut dyn RenderSink, r: Rect, color: Rgb) {
    sink.fill_rect(Rect::new(r.x, r.y, r.width, FRAME), color);
    sink.fill_rect(Rect::new(r.x, r.bottom() - FRAME, r.width, FRAME), color);
    sink.fill_rect(Rect::new(r.x, r.y, FRAME, r.height), color);
    sink.fill_rect(Rect::new(r.right() - FRAME, r.y, FRAME, r.height), color);
}

impl Match3Game {
    pub(super) fn draw(&self, sink: &mut dyn RenderSink, assets: &AssetStore) {
        let board_w = self.board.width as f64 * GEM_SIZE;
        let board_h = self.board.height as f64 * GEM_SIZE;
        let view = Rect::new(0.0, 0.0, board_w, board_h);
        draw_slot(sink, assets, "background", view, |s| {
            s.fill_rect(view, Rgb::hex(0x1A1A2E))
        });

        for (_, gem) in self.board.gems() {
            let rect = gem.bounds().inset(1.0);
            let kind = gem.kind;
            draw_slot(sink, assets, kind.slot(), rect, |s| match kind {
                GemKind::LineClear => {
                    s.fill_rect(
                        Rect::new(rect.x, rect.center().y - 4.0, rect.width, 8.0),
                        kind.color(),
                    );
                    s.fill_rect(
                        Rect::new(rect.center().x - 4.0, rect.y, 8.0, rect.height),
                        kind.color(),
                    );
                }
                _ => s.fill_circle(rect.center(), rect.width / 2.0, kind.color()),
            });
        }

        outline(sink, cell_rect(self.cursor), CURSOR);
        if let Some(sel) = self.selected {
            outline(sink, cell_rect(sel), SELECTED);
        }
        if let Some((a, b)) = self.hint {
            outline(sink, cell_rect(a), HINT);
            outline(sink, cell_rect(b), HINT);
        }

        let hud_y = board_h + 20.0;
        sink.text(
            Vec2::new(10.0, hud_y),
            &format!("Score: {}/{}", self.session.score, self.target),
            Rgb::WHITE,
        );
        sink.text(
            Vec2::new(10.0, hud_y + 25.0),
            &format!("Moves: {}  Level: {}", self.moves_left, self.level),
            Rgb::WHITE,
        );
        if self.last_cascade > 1 {
            sink.text(
                Vec2::new(board_w / 2.0, board_h / 2.0),
                &format!("Cascade x{}!", self.last_cascade),
                SELECTED,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DrawCall, DrawList, GameConfig, Sprite};
    use crate::games::match3::Board;
    use crate::games::Game;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn game() -> Match3Game {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        Match3Game::new(&GameConfig::default(), &mut rng)
    }

    #[test]
    fn test_hud_text() {
        let mut list = DrawList::default();
        game().render(&mut list, &AssetStore::default());
        let texts: Vec<_> = list.texts().collect();
        assert!(texts.contains(&"Score: 0/1000"));
        assert!(texts.contains(&"Moves: 30  Level: 1"));
    }

    #[test]
    fn test_gem_sprite_replaces_circle() {
        let mut game = game();
        game.board = Board::from_fn(8, 8, |_| GemKind::Red);
        let mut assets = AssetStore::default();
        assets.insert("red_gem", Sprite::parse("red_gem", "##\n##").unwrap());
        let mut list = DrawList::default();
        game.render(&mut list, &assets);
        assert_eq!(list.sprites().filter(|s| *s == "red_gem").count(), 64);
        assert!(!list.calls.iter().any(|c| matches!(c, DrawCall::Circle(..))));
    }
}
