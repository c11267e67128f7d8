use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

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

    /// Returns the unit `(dx, dy)` step; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// High-level input events consumed by the session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Confirm,
    Restart,
    Quit,
    /// Terminal resized to `(columns, rows)`.
    Resize(u16, u16),
}

/// Returns whether a direction change is legal (no immediate 180° turns).
///
/// Without a current heading every direction is legal.
#[must_use]
pub fn direction_change_is_valid(current: Option<Direction>, next: Direction) -> bool {
    current.is_none_or(|current| next != current.opposite())
}

/// Polls crossterm for key and resize events.
#[derive(Debug, Clone)]
pub struct InputHandler {
    poll_timeout: Duration,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl InputHandler {
    #[must_use]
    pub fn new(poll_timeout: Duration) -> Self {
        Self { poll_timeout }
    }

    /// Returns the next mapped input, or `None` when nothing relevant is pending.
    pub fn poll_input(&mut self) -> io::Result<Option<GameInput>> {
        while event::poll(self.poll_timeout)? {
            let mapped = match event::read()? {
                Event::Key(key) => map_key(key),
                Event::Resize(columns, rows) => Some(GameInput::Resize(columns, rows)),
                _ => None,
            };

            if mapped.is_some() {
                return Ok(mapped);
            }
        }

        Ok(None)
    }
}

/// Maps one key press to a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Some(GameInput::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => {
            Some(GameInput::Direction(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => {
            Some(GameInput::Direction(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => {
            Some(GameInput::Direction(Direction::Right))
        }
        KeyCode::Char('p' | 'P' | ' ') => Some(GameInput::Pause),
        KeyCode::Enter => Some(GameInput::Confirm),
        KeyCode::Char('r' | 'R') => Some(GameInput::Restart),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(GameInput::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{Direction, GameInput, direction_change_is_valid, map_key};

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn opposite_deltas_cancel_out() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn direction_change_rejects_reverse() {
        assert!(!direction_change_is_valid(
            Some(Direction::Up),
            Direction::Down
        ));
        assert!(!direction_change_is_valid(
            Some(Direction::Right),
            Direction::Left
        ));

        assert!(direction_change_is_valid(
            Some(Direction::Up),
            Direction::Left
        ));
        assert!(direction_change_is_valid(Some(Direction::Up), Direction::Up));
    }

    #[test]
    fn any_direction_is_valid_without_heading() {
        for direction in Direction::ALL {
            assert!(direction_change_is_valid(None, direction));
        }
    }

    #[test]
    fn keys_map_to_inputs() {
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('w'))),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(map_key(press(KeyCode::Char('r'))), Some(GameInput::Restart));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(GameInput::Quit));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = press(KeyCode::Up);
        key.kind = KeyEventKind::Release;

        assert_eq!(map_key(key), None);
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }
}
