use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::PALETTE;
use crate::game::{DeathReason, GameState, GameStatus};

/// Rows taken by the HUD below the board.
pub const HUD_HEIGHT: u16 = 2;

const KEY_HELP: &str = "←↑↓→/wasd move · space step · r restart · q quit";
const ELLIPSIS: char = '…';

/// Supplemental values displayed by the HUD rows.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub tick_interval: Duration,
}

/// Renders the status row and the key-help row into `area`.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState, info: &HudInfo) {
    let [status_row, help_row] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);
    let width = usize::from(area.width);

    let status = fit_to_width(&status_text(state, info), width);
    let outcome_style = match state.status() {
        GameStatus::Running => Style::new().fg(PALETTE.hud_text),
        GameStatus::Won => Style::new()
            .fg(PALETTE.border_won)
            .add_modifier(Modifier::BOLD),
        GameStatus::Lost => Style::new()
            .fg(PALETTE.border_lost)
            .add_modifier(Modifier::BOLD),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(status, outcome_style))).alignment(Alignment::Left),
        status_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from(fit_to_width(KEY_HELP, width)))
            .style(Style::new().fg(PALETTE.hud_muted)),
        help_row,
    );
}

/// Formats the status row: length, tick counter, speed and outcome.
#[must_use]
pub fn status_text(state: &GameState, info: &HudInfo) -> String {
    let outcome = match (state.status(), state.death_reason()) {
        (GameStatus::Running, _) => "running",
        (GameStatus::Won, _) => "won: board filled",
        (GameStatus::Lost, Some(DeathReason::WallCollision)) => "lost: hit wall",
        (GameStatus::Lost, Some(DeathReason::SelfCollision)) => "lost: hit yourself",
        (GameStatus::Lost, None) => "lost",
    };

    format!(
        "len {} · tick {} · {}ms · {outcome}",
        state.snake().len(),
        state.tick_count(),
        info.tick_interval.as_millis(),
    )
}

/// Truncates `text` to `max_width` terminal columns, marking cuts with `…`.
#[must_use]
pub fn fit_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }

    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut fitted = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        fitted.push(ch);
    }

    fitted.push(ELLIPSIS);
    fitted
}
