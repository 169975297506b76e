use std::time::{Duration, Instant};

use log::{debug, info};

use crate::engine::{GameEngine, GameStatus, TickOutcome};
use crate::input::{Command, InputAdapter, KeySource};
use crate::render::Renderer;

/// Input poll interval while no tick timer is armed.
const IDLE_POLL_MS: u64 = 50;

/// Fixed-interval driver: reads keys between ticks, advances the engine once
/// per `game_speed` while it runs and renders every change.
pub struct SnakeGame<R, K> {
    engine: GameEngine,
    renderer: R,
    keys: K,
    input: InputAdapter,
    tick_interval: Duration,
    next_tick: Option<Instant>,
}

impl<R, K> SnakeGame<R, K>
where
    R: Renderer,
    K: KeySource<Error = R::Error>,
{
    pub fn new(engine: GameEngine, renderer: R, keys: K) -> Self {
        let tick_interval = engine.config().game_speed;
        SnakeGame { engine, renderer, keys, input: InputAdapter::new(), tick_interval, next_tick: None }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Runs until the player quits.
    pub fn play(&mut self) -> Result<(), R::Error> {
        self.renderer.render(&self.engine.state())?;

        loop {
            let wait = match self.next_tick {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => Duration::from_millis(IDLE_POLL_MS),
            };

            for key_ev in self.keys.read_keys(wait)? {
                match self.input.translate(&key_ev) {
                    Some(Command::Quit) => {
                        info!("Quit requested");
                        return Ok(());
                    }
                    Some(command) => self.apply(command)?,
                    None => {}
                }
            }

            self.sync_timer();

            if let Some(deadline) = self.next_tick {
                if Instant::now() >= deadline {
                    self.step()?;
                }
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn apply(&mut self, command: Command) -> Result<(), R::Error> {
        let before = self.engine.status();

        match command {
            Command::Turn(dir) => {
                self.engine.set_intended_direction(dir);
            }
            Command::StartOrPause => {
                self.engine.start();
            }
            Command::Pause => self.engine.toggle_pause(),
            Command::Restart => {
                if before.is_over() {
                    self.engine.initialize();
                }
            }
            Command::Quit => {}
        }

        let after = self.engine.status();
        if before != after {
            debug!("Status {:?} -> {:?}", before, after);
            // Restart or resume: the timer starts over from now
            self.next_tick = None;
            self.sync_timer();
            self.renderer.render(&self.engine.state())?;
        }

        Ok(())
    }

    fn step(&mut self) -> Result<(), R::Error> {
        match self.engine.tick() {
            TickOutcome::Idle => {}
            _ => self.renderer.render(&self.engine.state())?,
        }

        self.next_tick = None;
        self.sync_timer();
        Ok(())
    }

    /// Arms the tick timer while running and stops it otherwise.
    fn sync_timer(&mut self) {
        if self.engine.status() != GameStatus::Running {
            self.next_tick = None;
        } else if self.next_tick.is_none() {
            self.next_tick = Some(Instant::now() + self.tick_interval);
        }
    }
}
