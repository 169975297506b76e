//! Snapshot renderers.
//!
//! The engine never draws. A [`Renderer`] receives a [`GameState`] after
//! every successful `initialize` and `tick` and after pause changes.

use std::convert::TryFrom;

use crate::config::ConfigError;
use crate::engine::{GameState, GameStatus};
use crate::term::{TermCoords, TermInt, TermManager};
use crate::{Cell, GridInt};

const SNAKE_BODY_STR: &str = "██";
const APPLE_STR: &str = "()";
const DEAD_SNAKE_STR: &str = "XX";
const EMPTY_STR: &str = "  ";

/// Terminal columns per grid cell; characters are about twice as tall as
/// they are wide.
const CELL_COLUMNS: TermInt = 2;

pub trait Renderer {
    type Error;

    fn render(&mut self, state: &GameState) -> Result<(), Self::Error>;
}

/// Draws the board inside a border, with a status line underneath.
pub struct TermRenderer {
    term: TermManager,
    grid_size: GridInt,
    last: Option<GameState>,
}

impl TermRenderer {
    pub fn new(mut term: TermManager, grid_size: GridInt) -> Result<Self, ConfigError> {
        let available = term.get_terminal_size();
        let needed = match Self::needed_size(grid_size) {
            Some(needed) if needed.0 <= available.0 && needed.1 <= available.1 => needed,
            Some(needed) => return Err(ConfigError::TerminalTooSmall { needed, available }),
            None => {
                let needed = (TermInt::MAX, TermInt::MAX);
                return Err(ConfigError::TerminalTooSmall { needed, available });
            }
        };

        term.set_message_center((needed.0 / 2, (needed.1 - 1) / 2));
        Ok(TermRenderer { term, grid_size, last: None })
    }

    /// Border plus one status row. `None` when the board cannot be
    /// addressed in terminal coordinates at all.
    pub fn needed_size(grid_size: GridInt) -> Option<TermCoords> {
        let (width, height) = Self::board_size(grid_size)?;
        Some((width, height.checked_add(1)?))
    }

    pub fn term_mut(&mut self) -> &mut TermManager {
        &mut self.term
    }

    ///////////////////////////////////////////////////////////////////////////

    fn board_size(grid_size: GridInt) -> Option<TermCoords> {
        let cells = TermInt::try_from(grid_size.max(0)).ok()?;
        let width = cells.checked_mul(CELL_COLUMNS)?.checked_add(2)?;
        Some((width, cells.checked_add(2)?))
    }

    fn screen_pos(cell: Cell) -> TermCoords {
        (cell.0 as TermInt * CELL_COLUMNS + 1, cell.1 as TermInt + 1)
    }

    fn in_grid(&self, cell: Cell) -> bool {
        cell.0 >= 0 && cell.1 >= 0 && cell.0 < self.grid_size && cell.1 < self.grid_size
    }

    fn print_cell(&mut self, cell: Cell, text: &str) -> crossterm::Result<()> {
        if self.in_grid(cell) {
            self.term.print_str_at(Self::screen_pos(cell), text)?;
        }
        Ok(())
    }

    fn redraw_board(&mut self) -> crossterm::Result<()> {
        self.term.clear()?;
        if let Some(size) = Self::board_size(self.grid_size) {
            self.term.draw_borders(Some(size))?;
        }
        self.last = None;
        Ok(())
    }

    fn erase_last(&mut self) -> crossterm::Result<()> {
        if let Some(last) = self.last.take() {
            for cell in last.snake.iter() {
                self.print_cell(*cell, EMPTY_STR)?;
            }
            if let Some(food) = last.food {
                self.print_cell(food, EMPTY_STR)?;
            }
        }
        Ok(())
    }

    fn draw_pieces(&mut self, state: &GameState, body: &str) -> crossterm::Result<()> {
        if let Some(food) = state.food {
            self.print_cell(food, APPLE_STR)?;
        }

        for (i, cell) in state.snake.iter().enumerate() {
            if i == 0 && state.status != GameStatus::GameOver {
                let head: String = std::iter::repeat(state.heading.head_char()).take(CELL_COLUMNS as usize).collect();
                self.print_cell(*cell, &head)?;
            } else {
                self.print_cell(*cell, body)?;
            }
        }

        Ok(())
    }

    fn draw_status_line(&mut self, state: &GameState) -> crossterm::Result<()> {
        // The size was checked against the terminal in `new`
        let (width, height) = match Self::board_size(self.grid_size) {
            Some(size) => size,
            None => return Ok(()),
        };
        let text = format!(" Score: {}  {}", state.score, status_text(state.status));
        let line: String = format!("{:<width$}", text, width = width as usize).chars().take(width as usize).collect();
        self.term.print_str_at((0, height), &line)
    }
}

impl Renderer for TermRenderer {
    type Error = crossterm::ErrorKind;

    fn render(&mut self, state: &GameState) -> crossterm::Result<()> {
        let prev_status = self.last.as_ref().map(|last| last.status);

        match state.status {
            GameStatus::NotStarted => {
                self.redraw_board()?;
                self.term.show_message(&[
                    "Arrow keys or WASD to move",
                    "Space to start or pause",
                    "q or CTRL+C to quit",
                    "",
                    "Press Space to begin",
                ])?;
            }
            GameStatus::Running => {
                match prev_status {
                    Some(GameStatus::Running) => {}
                    Some(GameStatus::Paused) => self.term.hide_message()?,
                    _ => self.redraw_board()?,
                }
                self.erase_last()?;
                self.draw_pieces(state, SNAKE_BODY_STR)?;
            }
            GameStatus::Paused => {
                self.term.show_message(&["Paused", "Press Space or Esc to resume", "or q to quit"])?;
            }
            GameStatus::GameOver | GameStatus::Won => {
                let (title, body) = if state.status == GameStatus::Won {
                    ("You won!", SNAKE_BODY_STR)
                } else {
                    ("Game over!", DEAD_SNAKE_STR)
                };
                self.erase_last()?;
                self.draw_pieces(state, body)?;

                let score = format!("Score: {}", state.score);
                self.term.show_message(&[
                    title,
                    &*score,
                    "",
                    "Press Space or r to play again,",
                    "or q to quit.",
                ])?;
            }
        }

        self.draw_status_line(state)?;
        self.last = Some(state.clone());
        self.term.flush()
    }
}

pub fn status_text(status: GameStatus) -> &'static str {
    match status {
        GameStatus::NotStarted => "Press Space to start",
        GameStatus::Running => "Running",
        GameStatus::Paused => "Paused",
        GameStatus::GameOver => "Game over, Space to restart",
        GameStatus::Won => "Grid filled, Space to restart",
    }
}
