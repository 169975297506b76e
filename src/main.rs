use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use gridsnake::config::{DEFAULT_BOARD_EXTENT, DEFAULT_CELL_EXTENT, DEFAULT_GAME_SPEED_MS, DEFAULT_INITIAL_LENGTH};
use gridsnake::game::SnakeGame;
use gridsnake::render::TermRenderer;
use gridsnake::term::{TermKeys, TermManager};
use gridsnake::{GameConfig, GameEngine, GridInt};

/// Classic snake in the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Cells per side of the square grid. Overrides the extents.
    #[arg(long, conflicts_with_all = ["board_extent", "cell_extent"])]
    grid_size: Option<GridInt>,

    /// Board extent the grid is derived from (board / cell).
    #[arg(long, default_value_t = DEFAULT_BOARD_EXTENT)]
    board_extent: u32,

    /// Extent of a single cell.
    #[arg(long, default_value_t = DEFAULT_CELL_EXTENT)]
    cell_extent: u32,

    /// Milliseconds between two ticks.
    #[arg(long, default_value_t = DEFAULT_GAME_SPEED_MS)]
    speed_ms: u64,

    /// Length of the snake at the start of a game.
    #[arg(long, default_value_t = DEFAULT_INITIAL_LENGTH)]
    initial_length: usize,

    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file. The terminal is busy with the game.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let base = match self.grid_size {
            Some(size) => GameConfig::default().with_grid_size(size),
            None => GameConfig::from_extents(self.board_extent, self.cell_extent)?,
        };

        let config = base
            .with_game_speed(Duration::from_millis(self.speed_ms))
            .with_initial_length(self.initial_length)
            .with_seed(self.seed);
        config.validate()?;
        Ok(config)
    }
}

const DEFAULT_STDERR_LEVEL: log::LevelFilter = log::LevelFilter::Warn;
const DEFAULT_FILE_LEVEL: log::LevelFilter = log::LevelFilter::Info;

/// Level used when `RUST_LOG` is unset. Only warnings reach stderr, anything
/// chattier would tear up the board.
fn default_log_level(log_file: Option<&Path>) -> log::LevelFilter {
    match log_file {
        Some(_) => DEFAULT_FILE_LEVEL,
        None => DEFAULT_STDERR_LEVEL,
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_log_level(log_file));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.parse_default_env().init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    info!("Starting with {:?}", config);

    let engine = GameEngine::new(config.clone())?;
    let term = TermManager::new().map_err(|e| anyhow::anyhow!("Terminal error: {}", e))?;
    let renderer = TermRenderer::new(term, config.grid_size)?;
    let mut game = SnakeGame::new(engine, renderer, TermKeys);

    game.renderer_mut().term_mut().setup().map_err(|e| anyhow::anyhow!("Terminal setup failed: {}", e))?;
    let res = game.play();
    // Restore the terminal even when the game loop failed
    game.renderer_mut().term_mut().restore().map_err(|e| anyhow::anyhow!("Terminal restore failed: {}", e))?;
    res.map_err(|e| anyhow::anyhow!("Game loop error: {}", e))?;

    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_logging_defaults_to_warn() {
        assert_eq!(default_log_level(None), log::LevelFilter::Warn);
        assert_eq!(default_log_level(Some(Path::new("snake.log"))), log::LevelFilter::Info);
    }

    #[test]
    fn cli_rejects_huge_grid() {
        let cli = Cli::parse_from(["gridsnake", "--grid-size", "40000"]);
        assert!(cli.game_config().is_err());

        let cli = Cli::parse_from(["gridsnake", "--grid-size", "30"]);
        assert_eq!(cli.game_config().unwrap().grid_size, 30);
    }
}
