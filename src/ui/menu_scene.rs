//! Game-select screen.

use super::game_common::{format_score, render_status_bar};
use arcade::games::GameKind;
use arcade::scores::ScoreBoard;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct MenuScreen {
    pub selected_index: usize,
}

impl MenuScreen {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn selected(&self) -> GameKind {
        GameKind::from_index(self.selected_index).unwrap_or(GameKind::CrossyRoad)
    }

    pub fn select(&mut self, kind: GameKind) {
        if let Some(index) = GameKind::ALL.iter().position(|k| *k == kind) {
            self.selected_index = index;
        }
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.selected_index = (self.selected_index + 1).min(GameKind::ALL.len() - 1);
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, scores: &ScoreBoard) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // List + details
                Constraint::Length(2), // Controls
            ])
            .split(area);

        let title = Paragraph::new("Arcade")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.draw_list(f, main_chunks[0], scores);
        self.draw_details(f, main_chunks[1], scores);

        render_status_bar(
            f,
            chunks[2],
            "Choose a game",
            Color::Yellow,
            &[("[↑↓]", "Select"), ("[Enter]", "Play"), ("[Q]", "Quit")],
        );
    }

    fn draw_list(&self, f: &mut Frame, area: Rect, scores: &ScoreBoard) {
        let block = Block::default()
            .title(" Games ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let lines: Vec<Line> = GameKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let selected = i == self.selected_index;
                let marker = if selected { "> " } else { "  " };
                let style = if selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(format!("{}{}", marker, kind.name()), style),
                    Span::styled(
                        format!("  {}", format_score(scores.best(kind.id()))),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_details(&self, f: &mut Frame, area: Rect, scores: &ScoreBoard) {
        let kind = self.selected();
        let block = Block::default()
            .title(format!(" {} ", kind.name()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut lines = vec![
            Line::from(Span::styled(
                kind.description(),
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Best: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    scores.best(kind.id()).to_string(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Recent:",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        for record in scores.recent_for(kind.id()).take(5) {
            lines.push(Line::from(format!(
                "  {:>6}  {}",
                record.score,
                record.recorded_at.format("%Y-%m-%d %H:%M")
            )));
        }
        f.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_is_clamped() {
        let mut menu = MenuScreen::new();
        menu.move_up();
        assert_eq!(menu.selected(), GameKind::CrossyRoad);
        for _ in 0..10 {
            menu.move_down();
        }
        assert_eq!(menu.selected(), GameKind::WhackTheMole);
    }

    #[test]
    fn test_select_by_kind() {
        let mut menu = MenuScreen::new();
        menu.select(GameKind::Match3);
        assert_eq!(menu.selected_index, 2);
    }
}
