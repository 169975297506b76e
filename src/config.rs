//! Engine configuration.
//!
//! All values are fixed once a [`GameEngine`](crate::engine::GameEngine) is
//! built. The grid is square; its side can be given directly or derived from
//! a board extent and a cell extent (`400 / 20 = 20` cells by default).

use std::time::Duration;

use crate::GridInt;

pub const DEFAULT_BOARD_EXTENT: u32 = 400;
pub const DEFAULT_CELL_EXTENT: u32 = 20;
pub const DEFAULT_GRID_SIZE: GridInt = (DEFAULT_BOARD_EXTENT / DEFAULT_CELL_EXTENT) as GridInt;
pub const DEFAULT_GAME_SPEED_MS: u64 = 150;
pub const DEFAULT_INITIAL_LENGTH: usize = 3;
pub const SCORE_INCREMENT: u32 = 10;

/// Smallest grid that leaves room for a snake and a food cell.
const MIN_GRID_SIZE: GridInt = 2;
/// Largest grid the engine accepts; every cell is kept in memory.
pub const MAX_GRID_SIZE: GridInt = 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cell extent must be greater than zero")]
    ZeroCellExtent,

    #[error("Grid size {0} is too small, it must be at least {}", MIN_GRID_SIZE)]
    GridTooSmall(GridInt),

    #[error("Grid size {0} is too large, it must be at most {}", MAX_GRID_SIZE)]
    GridTooLarge(GridInt),

    #[error("Game speed must be greater than zero")]
    ZeroSpeed,

    #[error("Initial length {length} does not fit a grid of size {grid_size}")]
    InitialLength { length: usize, grid_size: GridInt },

    #[error("Cell {0:?} lies outside the grid")]
    OutOfBounds((GridInt, GridInt)),

    #[error("Food cell {0:?} overlaps the snake")]
    FoodOnSnake((GridInt, GridInt)),

    #[error("Terminal is {available:?} but the board needs {needed:?}")]
    TerminalTooSmall { needed: (u16, u16), available: (u16, u16) },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Cells per axis.
    pub grid_size: GridInt,
    /// Interval between two ticks.
    pub game_speed: Duration,
    pub initial_length: usize,
    pub score_increment: u32,
    /// Fixed RNG seed for reproducible food placement.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: DEFAULT_GRID_SIZE,
            game_speed: Duration::from_millis(DEFAULT_GAME_SPEED_MS),
            initial_length: DEFAULT_INITIAL_LENGTH,
            score_increment: SCORE_INCREMENT,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default configuration with the grid derived from `board_extent /
    /// cell_extent`.
    pub fn from_extents(board_extent: u32, cell_extent: u32) -> Result<Self, ConfigError> {
        if cell_extent == 0 {
            return Err(ConfigError::ZeroCellExtent);
        }

        let config = GameConfig {
            grid_size: (board_extent / cell_extent) as GridInt,
            ..GameConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_grid_size(mut self, grid_size: GridInt) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_game_speed(mut self, game_speed: Duration) -> Self {
        self.game_speed = game_speed;
        self
    }

    pub fn with_initial_length(mut self, initial_length: usize) -> Self {
        self.initial_length = initial_length;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Column and row of the starting head.
    pub fn center(&self) -> GridInt {
        self.grid_size / 2
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }

        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }

        if self.game_speed.is_zero() {
            return Err(ConfigError::ZeroSpeed);
        }

        // The starting snake trails left from the center, so it needs
        // center + 1 columns.
        let room = (self.center() + 1) as usize;
        if self.initial_length == 0 || self.initial_length > room {
            return Err(ConfigError::InitialLength {
                length: self.initial_length,
                grid_size: self.grid_size,
            });
        }

        Ok(())
    }
}
