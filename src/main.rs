mod config;
mod food;
mod game;
mod snake;
mod state;
mod term;
mod timer;

use std::fs::File;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};

use config::GameConfig;

pub type TermInt = u16;
pub type Coords = (u16, u16);
/// Grid cell as (x, y). Signed so a head that leaves the grid is representable.
pub type Cell = (i32, i32);

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Terminal snake")]
struct Cli {
    /// Cells per side of the square grid
    #[arg(long, default_value = "25")]
    cell_count: i32,

    /// Terminal columns per cell
    #[arg(long, default_value = "2")]
    cell_width: TermInt,

    /// Margin around the grid; 0 hides the border and title
    #[arg(long, default_value = "2")]
    offset: TermInt,

    /// Seconds between snake moves
    #[arg(long, default_value = "0.2")]
    tick_interval: f64,

    /// Frames per second for input and drawing
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Where to write the log, since the terminal is taken by the game
    #[arg(long, default_value = "snake.log")]
    log_file: String,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level: LevelFilter = cli.log_level.parse()
        .map_err(|_| anyhow!("unknown log level '{}'", cli.log_level))?;
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file))?;
    WriteLogger::init(level, Config::default(), log_file).context("Failed to initialize logger")?;

    let config = GameConfig {
        cell_count: cli.cell_count,
        cell_width: cli.cell_width,
        offset: cli.offset,
        tick_interval: cli.tick_interval,
        fps: cli.fps,
    };
    info!("starting with {:?}", config);

    let mut game = game::SnakeGame::new(config)?;
    game.run()?;

    info!("bye");
    Ok(())
}
