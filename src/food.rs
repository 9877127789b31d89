use rand::seq::SliceRandom;
use rand::Rng;

use crate::snake::Body;
use crate::Cell;

/// Picks food cells uniformly over a square grid, avoiding the snake.
pub struct Spawner<R: Rng> {
    cell_count: i32,
    rng: R,
}

impl<R: Rng> Spawner<R> {
    pub fn new(cell_count: i32, rng: R) -> Self {
        Spawner { cell_count, rng }
    }

    /// Draws random cells until one falls outside `exclude`. After a bounded
    /// number of misses it falls back to choosing among the free cells, so it
    /// returns `None` only when the grid is full.
    pub fn generate(&mut self, exclude: &Body) -> Option<Cell> {
        for _ in 0..self.max_attempts() {
            let candidate = self.random_cell();
            if !exclude.contains(candidate) {
                return Some(candidate);
            }
        }

        let free: Vec<Cell> = self.all_cells().filter(|c| !exclude.contains(*c)).collect();
        free.choose(&mut self.rng).copied()
    }

    fn random_cell(&mut self) -> Cell {
        let x = self.rng.gen_range(0..self.cell_count);
        let y = self.rng.gen_range(0..self.cell_count);
        (x, y)
    }

    fn max_attempts(&self) -> usize {
        let cells = self.cell_count.max(0) as usize;
        cells.saturating_mul(cells).saturating_mul(2).max(8)
    }

    fn all_cells(&self) -> impl Iterator<Item = Cell> {
        let n = self.cell_count;
        (0..n).flat_map(move |y| (0..n).map(move |x| (x, y)))
    }
}
