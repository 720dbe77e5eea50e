use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What a key press asks the front-end to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Buffer a heading for the next tick
    Move(Direction),
    /// Begin a game from the title screen or after game over
    Start,
    /// Abandon the current game and begin a new one
    Restart,
    Quit,
    None,
}

/// Translates terminal key events; holds no state of its own
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = Self::direction_for(key.code) {
            return KeyAction::Move(direction);
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => KeyAction::Start,
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => KeyAction::Quit,
                'r' => KeyAction::Restart,
                _ => KeyAction::None,
            },
            _ => KeyAction::None,
        }
    }

    /// Arrow keys and WASD, either case
    fn direction_for(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Some(Direction::Up),
                's' => Some(Direction::Down),
                'a' => Some(Direction::Left),
                'd' => Some(Direction::Right),
                _ => None,
            },
            _ => None,
        }
    }
}
