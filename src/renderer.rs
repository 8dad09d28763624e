use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::board::Cell;
use crate::config::{BORDER_HALF_BLOCK, GLYPH_HALF_UPPER, GridSize, PALETTE};
use crate::game::{GameState, GameStatus};
use crate::ui::hud::{HUD_HEIGHT, HudInfo, render_hud};

/// What occupies a board cell, as far as drawing is concerned.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CellKind {
    Empty,
    Snake,
    Food,
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState, hud_info: &HudInfo) {
    let (board_area, hud_area) = layout(frame.area(), state.bounds());

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(border_color(state.status())));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_cells(frame, inner, state);
    render_hud(frame, hud_area, state, hud_info);
}

/// Splits `area` into the bordered board rect and the HUD rect below it.
///
/// Two logical rows share one terminal row, so the board needs
/// `cols + 2` by `ceil(rows / 2) + 2` cells including the border.
#[must_use]
pub fn layout(area: Rect, bounds: GridSize) -> (Rect, Rect) {
    let board_width = bounds.cols.saturating_add(2);
    let board_height = bounds.rows.div_ceil(2).saturating_add(2);

    let [column] = Layout::horizontal([Constraint::Length(board_width)])
        .flex(Flex::Center)
        .areas(area);
    let [board, hud] = Layout::vertical([
        Constraint::Length(board_height),
        Constraint::Length(HUD_HEIGHT),
    ])
    .flex(Flex::Center)
    .areas(column);

    (board, hud)
}

/// Classifies `cell`; food wins over snake when both apply.
#[must_use]
pub fn cell_kind(state: &GameState, cell: Cell) -> CellKind {
    if state.food() == Some(cell) {
        CellKind::Food
    } else if state.snake().occupies(cell) {
        CellKind::Snake
    } else {
        CellKind::Empty
    }
}

fn cell_color(kind: CellKind) -> Color {
    match kind {
        CellKind::Empty => PALETTE.empty,
        CellKind::Snake => PALETTE.snake,
        CellKind::Food => PALETTE.food,
    }
}

fn border_color(status: GameStatus) -> Color {
    match status {
        GameStatus::Running => PALETTE.border,
        GameStatus::Won => PALETTE.border_won,
        GameStatus::Lost => PALETTE.border_lost,
    }
}

fn render_cells(frame: &mut Frame<'_>, inner: Rect, state: &GameState) {
    let bounds = state.bounds();
    let buffer = frame.buffer_mut();

    for term_row in 0..inner.height {
        let upper_row = i32::from(term_row) * 2;
        if upper_row >= i32::from(bounds.rows) {
            break;
        }

        for term_col in 0..inner.width.min(bounds.cols) {
            let col = i32::from(term_col);
            let upper = cell_color(cell_kind(state, Cell::new(upper_row, col)));
            let lower_cell = Cell::new(upper_row + 1, col);
            let lower = if lower_cell.is_within_bounds(bounds) {
                cell_color(cell_kind(state, lower_cell))
            } else {
                Color::Reset
            };

            buffer.set_string(
                inner.x + term_col,
                inner.y + term_row,
                GLYPH_HALF_UPPER,
                Style::new().fg(upper).bg(lower),
            );
        }
    }
}
