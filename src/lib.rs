//! Grid snake: a headless game engine plus a crossterm front end.
//!
//! The [`engine::GameEngine`] owns all game state and advances it one
//! [`tick`](engine::GameEngine::tick) at a time. Rendering and input live in
//! [`render`] and [`input`], and [`game::SnakeGame`] drives the engine on a
//! fixed interval.

pub mod config;
pub mod engine;
pub mod game;
pub mod input;
pub mod render;
pub mod snake;
pub mod term;

pub type GridInt = i32;
pub type Cell = (GridInt, GridInt);

pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, GameState, GameStatus, TickOutcome};
pub use snake::{Collision, Direction, Snake};
