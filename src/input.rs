use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    /// Starts a game when none is running, toggles pause otherwise.
    StartOrPause,
    /// Toggles pause, never starts a game.
    Pause,
    /// Starts over once the current game has ended.
    Restart,
    Quit,
}

/// Anything that yields key presses between two ticks.
pub trait KeySource {
    type Error;

    /// Blocks for at most `wait` and returns the keys pressed meanwhile.
    fn read_keys(&mut self, wait: Duration) -> Result<Vec<KeyEvent>, Self::Error>;
}

/// Maps raw key events to engine commands.
#[derive(Copy, Clone, Debug, Default)]
pub struct InputAdapter;

impl InputAdapter {
    pub fn new() -> Self {
        InputAdapter
    }

    pub fn translate(&self, ev: &KeyEvent) -> Option<Command> {
        if is_ctrl_c(ev) {
            return Some(Command::Quit);
        }

        match ev.code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Turn(Up)),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Turn(Left)),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Turn(Down)),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Turn(Right)),
            KeyCode::Char(' ') => Some(Command::StartOrPause),
            KeyCode::Esc => Some(Command::Pause),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
            _ => None,
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
