use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::game::DeathReason;
use crate::renderer::to_color;
use crate::ui::hud::HudInfo;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, info: &HudInfo<'_>) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let lines = vec![
        title_line("NEON SNAKE", info.theme),
        Line::from(""),
        Line::from(format!("Difficulty: {}", info.difficulty)),
        Line::from(format!("High score: {}", info.high_score)),
        Line::from(format!("Games played: {}", info.games_played)),
        Line::from(""),
        Line::from("[Enter] Start"),
        Line::from("Arrows/WASD or drag to steer"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    render_popup(frame, popup, lines, " start ", info.theme);
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let popup = centered_popup(area, 60, 35);
    frame.render_widget(Clear, popup);

    let lines = vec![
        title_line("PAUSED", theme),
        Line::from(""),
        Line::from("[P]/[Space] Resume"),
        Line::from("[R] Restart"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    render_popup(frame, popup, lines, " pause ", theme);
}

/// Draws the game-over screen as a centered popup.
///
/// `high_score` is the best score before this game ended.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    high_score: u32,
    death_reason: Option<DeathReason>,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let is_new_high = score > high_score;
    let lines = vec![
        title_line("GAME OVER", theme),
        Line::from(""),
        Line::from(format!("Final score: {score}")),
        Line::from(format!("High score: {}", high_score.max(score))),
        Line::from(match death_reason {
            Some(DeathReason::WallCollision) => "Cause: hit the wall",
            Some(DeathReason::SelfCollision) => "Cause: bit yourself",
            Some(DeathReason::BoardFilled) => "The board is full!",
            None => "",
        }),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Enter]/[R] Play again"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    render_popup(frame, popup, lines, " game over ", theme);
}

fn title_line(text: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(text).style(
        Style::default()
            .fg(to_color(theme.snake_head))
            .add_modifier(Modifier::BOLD),
    )
}

fn render_popup(
    frame: &mut Frame<'_>,
    popup: Rect,
    lines: Vec<Line<'static>>,
    title: &'static str,
    theme: &Theme,
) {
    let style = Style::default()
        .fg(to_color(theme.hud_accent))
        .bg(to_color(theme.background));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::bordered().title(title).border_style(style)),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
