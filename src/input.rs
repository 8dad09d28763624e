use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::board::Cell;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(d_row, d_col)` displacement for one step.
    #[must_use]
    pub fn displacement(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Returns the neighbour of `cell` in this direction.
    #[must_use]
    pub fn step(self, cell: Cell) -> Cell {
        cell.offset(self.displacement())
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Restart,
    /// Advance exactly one tick right away.
    Step,
    Quit,
    /// The terminal was resized and the board must be redrawn.
    Resize,
}

/// Translates a key event into a game input.
///
/// Only presses count. Keys held together with Ctrl, Alt, Super, Hyper or
/// Meta are ignored, as are Shift-modified non-character keys; `Ctrl+C`
/// is the one exception and always quits.
#[must_use]
pub fn map_key_event(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let blocking = KeyModifiers::CONTROL
        | KeyModifiers::ALT
        | KeyModifiers::SUPER
        | KeyModifiers::HYPER
        | KeyModifiers::META;
    if key.modifiers.intersects(blocking) {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_)) {
        return None;
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => GameInput::Direction(Direction::Right),
        KeyCode::Char('r' | 'R') => GameInput::Restart,
        KeyCode::Char(' ') => GameInput::Step,
        KeyCode::Char('q') | KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

/// Polls crossterm for keyboard and resize events.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits at most `timeout` for one event and translates it.
    ///
    /// Returns `Ok(None)` on timeout or for events the game ignores.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let input = match event::read()? {
            Event::Key(key) => map_key_event(key),
            Event::Resize(_, _) => Some(GameInput::Resize),
            _ => None,
        };

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{Direction, GameInput, direction_change_is_valid, map_key_event};
    use crate::board::Cell;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn step_moves_one_cell_in_row_col_space() {
        let origin = Cell::new(5, 5);

        assert_eq!(Direction::Up.step(origin), Cell::new(4, 5));
        assert_eq!(Direction::Down.step(origin), Cell::new(6, 5));
        assert_eq!(Direction::Left.step(origin), Cell::new(5, 4));
        assert_eq!(Direction::Right.step(origin), Cell::new(5, 6));
    }

    #[test]
    fn reversal_is_the_only_invalid_change() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(Direction::Right, Direction::Left));

        assert!(direction_change_is_valid(Direction::Up, Direction::Up));
        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Right, Direction::Down));
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(
            map_key_event(press(KeyCode::Left)),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(
            map_key_event(press(KeyCode::Char('w'))),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_key_event(press(KeyCode::Char('d'))),
            Some(GameInput::Direction(Direction::Right))
        );
    }

    #[test]
    fn control_keys_map_to_restart_step_and_quit() {
        assert_eq!(map_key_event(press(KeyCode::Char('r'))), Some(GameInput::Restart));
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Some(GameInput::Restart)
        );
        assert_eq!(map_key_event(press(KeyCode::Char(' '))), Some(GameInput::Step));
        assert_eq!(map_key_event(press(KeyCode::Esc)), Some(GameInput::Quit));
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(GameInput::Quit)
        );
    }

    #[test]
    fn modified_keys_are_ignored() {
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT)),
            None
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT)),
            None
        );
        assert_eq!(
            map_key_event(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn key_releases_are_ignored() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );

        assert_eq!(map_key_event(release), None);
    }
}
