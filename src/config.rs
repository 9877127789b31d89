use anyhow::{bail, Result};

use crate::TermInt;

/// Grid and pacing constants, fixed for the lifetime of a game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Cells per side of the square grid
    pub cell_count: i32,
    /// Terminal columns per cell; every cell is one row tall
    pub cell_width: TermInt,
    /// Margin around the grid. Zero disables the border and title
    pub offset: TermInt,
    /// Seconds between logical updates
    pub tick_interval: f64,
    /// Target frames per second for input polling and drawing
    pub fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { cell_count: 25, cell_width: 2, offset: 2, tick_interval: 0.2, fps: 60 }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cell_count < 4 {
            bail!("cell count must be at least 4, got {}", self.cell_count);
        }
        if self.cell_count > TermInt::MAX as i32 {
            bail!("cell count {} is too large", self.cell_count);
        }
        if self.cell_width == 0 {
            bail!("cell width must be positive");
        }
        if !self.tick_interval.is_finite() || self.tick_interval <= 0.0 {
            bail!("tick interval must be a positive number of seconds, got {}", self.tick_interval);
        }
        if self.fps == 0 {
            bail!("fps must be positive");
        }
        Ok(())
    }

    /// Terminal columns and rows needed to show the grid and its margin.
    pub fn screen_size(&self) -> (u32, u32) {
        let margin = 2 * self.offset as u32;
        let cells = self.cell_count.max(0) as u32;
        (margin + cells * self.cell_width as u32, margin + cells)
    }

    pub fn has_border(&self) -> bool {
        self.offset >= 1
    }

    pub fn has_title(&self) -> bool {
        self.offset >= 2
    }
}
