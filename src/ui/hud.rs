use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::{Difficulty, Theme};
use crate::game::SessionSnapshot;
use crate::renderer::to_color;

const SEPARATOR: &str = " │ ";

/// Values the HUD shows besides the session's own.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub high_score: u32,
    pub games_played: u32,
    pub difficulty: Difficulty,
    pub theme: &'a Theme,
}

/// Splits the terminal into the bordered play area and the one-line HUD
/// below it.
#[must_use]
pub fn split_area(area: Rect) -> (Rect, Rect) {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
    (play_area, hud_area)
}

/// Renders the status line: Score | Level | Difficulty | Hi.
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &SessionSnapshot,
    info: &HudInfo<'_>,
) {
    let accent = Style::default()
        .fg(to_color(info.theme.hud_accent))
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(to_color(info.theme.hud_muted));
    let high_score = info.high_score.max(snapshot.score);
    let high_style = if snapshot.score > info.high_score {
        accent
    } else {
        muted
    };

    let line = Line::from(vec![
        Span::styled("Score: ", muted),
        Span::styled(snapshot.score.to_string(), accent),
        Span::styled(SEPARATOR, muted),
        Span::styled("Level: ", muted),
        Span::styled(snapshot.level.to_string(), accent),
        Span::styled(SEPARATOR, muted),
        Span::styled(info.difficulty.label(), accent),
        Span::styled(SEPARATOR, muted),
        Span::styled("Hi: ", muted),
        Span::styled(high_score.to_string(), high_style),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::split_area;

    #[test]
    fn hud_takes_the_bottom_row() {
        let (play, hud) = split_area(Rect::new(0, 0, 80, 24));

        assert_eq!(play, Rect::new(0, 0, 80, 23));
        assert_eq!(hud, Rect::new(0, 23, 80, 1));
    }
}
