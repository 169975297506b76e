//! Headless game state machine.
//!
//! ```text
//! NotStarted --initialize--> Running <--pause/resume--> Paused
//!                               |
//!                               +--failed tick--> GameOver --initialize--> Running
//!                               +--grid full----> Won      --initialize--> Running
//! ```
//!
//! Nothing here knows about timers or terminals: callers invoke
//! [`GameEngine::tick`] at whatever pace they like and hand
//! [`GameEngine::state`] to a renderer.

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::{ConfigError, GameConfig};
use crate::snake::{Collision, Direction, MoveResult, Snake};
use crate::{Cell, GridInt};

const DEFAULT_HEADING: Direction = Direction::Right;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    Paused,
    GameOver,
    /// The snake fills the whole grid, no cell is left for food.
    Won,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Won)
    }
}

/// Read-only snapshot handed to renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Head first.
    pub snake: Vec<Cell>,
    pub food: Option<Cell>,
    pub score: u32,
    pub status: GameStatus,
    pub heading: Direction,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running; nothing changed.
    Idle,
    Moved,
    Ate,
    Crashed(Collision),
    Won,
}

pub struct GameEngine {
    config: GameConfig,
    snake: Snake,
    food: Option<Cell>,
    pending: Direction,
    score: u32,
    status: GameStatus,
    rng: StdRng,
    game_positions: Vec<Cell>,
    ticks: u64,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let size = config.grid_size;
        let game_positions = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .collect();

        let snake = Self::starting_snake(&config);

        Ok(GameEngine {
            config,
            snake,
            food: None,
            pending: DEFAULT_HEADING,
            score: 0,
            status: GameStatus::NotStarted,
            rng,
            game_positions,
            ticks: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn heading(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn pending_heading(&self) -> Direction {
        self.pending
    }

    /// Ticks advanced since the last `initialize`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Resets to the start-of-game position and starts running. Can be
    /// called again at any time to restart.
    pub fn initialize(&mut self) -> GameState {
        self.snake = Self::starting_snake(&self.config);
        self.pending = DEFAULT_HEADING;
        self.score = 0;
        self.ticks = 0;
        self.status = GameStatus::Running;
        self.food = None;
        self.spawn_food();

        debug!("Game initialized, snake {:?}, food {:?}", self.snake.body(), self.food);
        self.state()
    }

    /// Starts running from an arbitrary position instead of the canonical
    /// one. Every cell has to be on the grid and `food` must not overlap the
    /// snake. A snake covering the whole grid starts out as `Won`.
    pub fn initialize_with(&mut self, snake: Snake, food: Option<Cell>) -> Result<GameState, ConfigError> {
        if let Some(cell) = snake.body().iter().find(|cell| !self.in_bounds(**cell)) {
            return Err(ConfigError::OutOfBounds(*cell));
        }

        if let Some(cell) = food {
            if !self.in_bounds(cell) {
                return Err(ConfigError::OutOfBounds(cell));
            }
            if snake.contains(&cell) {
                return Err(ConfigError::FoodOnSnake(cell));
            }
        }

        self.pending = snake.get_direction();
        self.snake = snake;
        self.score = 0;
        self.ticks = 0;
        self.status = GameStatus::Running;
        self.food = food;
        if self.food.is_none() && !self.spawn_food() {
            self.status = GameStatus::Won;
            info!("Layout already fills the grid, score {}", self.score);
        }

        debug!("Game initialized from layout, snake {:?}, food {:?}", self.snake.body(), self.food);
        Ok(self.state())
    }

    /// Queues a turn for the next tick. Reversals of the current heading
    /// and calls outside `Running` are ignored.
    pub fn set_intended_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }

        if direction.is_reverse_of(self.heading()) {
            debug!("Ignoring reversal to {:?} while heading {:?}", direction, self.heading());
            return false;
        }

        self.pending = direction;
        true
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Idle;
        }

        self.ticks += 1;
        self.snake.set_direction(self.pending);

        match self.snake.move_step(self.config.grid_size, self.food) {
            MoveResult::Crashed(collision) => {
                self.status = GameStatus::GameOver;
                info!("Game over after {} ticks ({:?} collision), score {}", self.ticks, collision, self.score);
                TickOutcome::Crashed(collision)
            }
            MoveResult::Moved { new_head, old_tail: Some(_) } => {
                trace!("Tick {}: head {:?}", self.ticks, new_head);
                TickOutcome::Moved
            }
            MoveResult::Moved { new_head, old_tail: None } => {
                self.score += self.config.score_increment;
                debug!("Food eaten at {:?}, score {}", new_head, self.score);

                if self.spawn_food() {
                    TickOutcome::Ate
                } else {
                    self.status = GameStatus::Won;
                    info!("Grid filled after {} ticks, score {}", self.ticks, self.score);
                    TickOutcome::Won
                }
            }
        }
    }

    /// Returns whether the game is now paused.
    pub fn pause(&mut self) -> bool {
        if self.status == GameStatus::Running {
            self.status = GameStatus::Paused;
            info!("Game paused");
        }
        self.status == GameStatus::Paused
    }

    /// Returns whether the game is now running.
    pub fn resume(&mut self) -> bool {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Running;
            info!("Game resumed");
        }
        self.status == GameStatus::Running
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Running => { self.pause(); },
            GameStatus::Paused => { self.resume(); },
            _ => {}
        }
    }

    /// Single start/pause control: starts a new game when none is in
    /// progress, otherwise toggles pause.
    pub fn start(&mut self) -> GameState {
        match self.status {
            GameStatus::NotStarted | GameStatus::GameOver | GameStatus::Won => {
                self.initialize();
            }
            GameStatus::Running | GameStatus::Paused => self.toggle_pause(),
        }
        self.state()
    }

    pub fn state(&self) -> GameState {
        GameState {
            snake: self.snake.body().iter().copied().collect(),
            food: self.food,
            score: self.score,
            status: self.status,
            heading: self.heading(),
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn starting_snake(config: &GameConfig) -> Snake {
        let center = config.center();
        Snake::new((center, center), config.initial_length, DEFAULT_HEADING)
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        let size: GridInt = self.config.grid_size;
        (0..size).contains(&cell.0) && (0..size).contains(&cell.1)
    }

    /// Places food on a uniformly chosen free cell. Returns `false` when the
    /// snake covers the whole grid.
    fn spawn_food(&mut self) -> bool {
        let snake = &self.snake;
        let choices: Vec<&Cell> = self.game_positions.iter().filter(|pos| !snake.contains(pos)).collect();
        self.food = choices.choose(&mut self.rng).copied().copied();
        self.food.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;

    fn engine() -> GameEngine {
        GameEngine::new(GameConfig::default().with_seed(Some(7))).unwrap()
    }

    #[test]
    fn new_engine_is_not_started() {
        let mut engine = engine();
        assert_eq!(engine.status(), GameStatus::NotStarted);
        assert_eq!(engine.food(), None);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.set_intended_direction(Up));
    }

    #[test]
    fn initialize_places_canonical_snake() {
        let mut engine = engine();
        let state = engine.initialize();

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake, vec![(10, 10), (9, 10), (8, 10)]);
        assert_eq!(state.heading, Right);
        assert_eq!(engine.pending_heading(), Right);

        let food = state.food.unwrap();
        assert!(!state.snake.contains(&food));
    }

    #[test]
    fn pending_heading_applies_on_tick() {
        let mut engine = engine();
        engine.initialize();

        assert!(engine.set_intended_direction(Up));
        assert_eq!(engine.heading(), Right);

        engine.tick();
        assert_eq!(engine.heading(), Up);
        assert_eq!(engine.snake().head(), (10, 9));
    }

    #[test]
    fn reversal_checked_against_committed_heading() {
        let mut engine = engine();
        engine.initialize();

        // Up is queued but heading is still Right, so Left is a reversal
        assert!(engine.set_intended_direction(Up));
        assert!(!engine.set_intended_direction(Left));
        assert_eq!(engine.pending_heading(), Up);

        // Down is not a reversal of Right, it replaces the queued Up
        assert!(engine.set_intended_direction(Down));
        assert_eq!(engine.pending_heading(), Down);
    }

    #[test]
    fn pause_and_resume_only_between_running_and_paused() {
        let mut engine = engine();
        assert!(!engine.pause());
        assert!(!engine.resume());
        assert_eq!(engine.status(), GameStatus::NotStarted);

        engine.initialize();
        assert!(engine.pause());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.set_intended_direction(Up));

        engine.toggle_pause();
        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.tick(), TickOutcome::Moved);
    }

    #[test]
    fn start_key_cycle() {
        let mut engine = engine();
        assert_eq!(engine.start().status, GameStatus::Running);
        assert_eq!(engine.start().status, GameStatus::Paused);
        assert_eq!(engine.start().status, GameStatus::Running);

        let snake = Snake::from_cells(vec![(19, 0)], Right).unwrap();
        engine.initialize_with(snake, None).unwrap();
        engine.tick();
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert!(!engine.pause());

        let state = engine.start();
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn initialize_with_rejects_bad_layouts() {
        let mut engine = engine();

        let snake = Snake::from_cells(vec![(20, 0)], Right).unwrap();
        assert_eq!(engine.initialize_with(snake, None), Err(ConfigError::OutOfBounds((20, 0))));

        let snake = Snake::from_cells(vec![(1, 1), (0, 1)], Right).unwrap();
        assert_eq!(
            engine.initialize_with(snake, Some((0, 1))),
            Err(ConfigError::FoodOnSnake((0, 1)))
        );
        assert_eq!(engine.status(), GameStatus::NotStarted);
    }

    #[test]
    fn filling_the_grid_wins() {
        let config = GameConfig::default().with_grid_size(2).with_initial_length(1).with_seed(Some(1));
        let mut engine = GameEngine::new(config).unwrap();

        let snake = Snake::from_cells(vec![(0, 1), (0, 0), (1, 0)], Right).unwrap();
        let state = engine.initialize_with(snake, None).unwrap();
        assert_eq!(state.food, Some((1, 1)));

        assert_eq!(engine.tick(), TickOutcome::Won);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.food(), None);
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn layout_covering_the_grid_is_won() {
        let config = GameConfig::default().with_grid_size(2).with_initial_length(1).with_seed(Some(1));
        let mut engine = GameEngine::new(config).unwrap();

        let snake = Snake::from_cells(vec![(1, 1), (0, 1), (0, 0), (1, 0)], Up).unwrap();
        let state = engine.initialize_with(snake, None).unwrap();
        assert_eq!(state.status, GameStatus::Won);
        assert_eq!(state.food, None);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.pause());

        // A fresh game is still reachable
        assert_eq!(engine.start().status, GameStatus::Running);
    }
}
