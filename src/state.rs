use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::food::Spawner;
use crate::snake::{Body, Direction};
use crate::Cell;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeathCause {
    OutOfBounds,
    SelfCollision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Paused,
    Moved { ate: bool },
    Died(DeathCause),
    /// The snake ate and no free cell was left for the next food.
    BoardFilled,
}

pub struct GameState<R: Rng = ThreadRng> {
    cell_count: i32,
    body: Body,
    direction: Direction,
    /// Direction of the last completed move
    moved_direction: Direction,
    food: Option<Cell>,
    running: bool,
    spawner: Spawner<R>,
}

impl GameState<ThreadRng> {
    pub fn new(cell_count: i32) -> Self {
        GameState::with_rng(cell_count, rand::thread_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(cell_count: i32, rng: R) -> Self {
        let body = Body::initial(cell_count);
        let mut spawner = Spawner::new(cell_count, rng);
        let food = spawner.generate(&body);

        GameState {
            cell_count,
            body,
            direction: Direction::Right,
            moved_direction: Direction::Right,
            food,
            running: true,
            spawner,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn cell_count(&self) -> i32 {
        self.cell_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
        debug!("running = {}", self.running);
    }

    /// Accepts any direction except the exact reverse of the current one or
    /// of the last move, so several presses between two ticks cannot turn
    /// the snake back onto its neck. Returns whether the direction changed.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction
            || new_direction.is_opposite(self.direction)
            || new_direction.is_opposite(self.moved_direction)
        {
            return false;
        }
        self.direction = new_direction;
        true
    }

    /// Advances the game by one logical step.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Paused;
        }

        let head = self.body.advance(self.direction);
        self.moved_direction = self.direction;

        let ate = self.food == Some(head);
        if ate {
            self.body.grow();
        }
        self.body.resolve_growth();

        if ate {
            self.food = self.spawner.generate(&self.body);
            match self.food {
                Some(food) => debug!("ate at {:?}, length {}, next food at {:?}", head, self.body.len(), food),
                None => {
                    info!("no free cell left at length {}, resetting", self.body.len());
                    self.reset();
                    return TickOutcome::BoardFilled;
                }
            }
        }

        if !self.in_bounds(head) {
            return self.die(DeathCause::OutOfBounds);
        }

        if self.body.head_collides() {
            return self.die(DeathCause::SelfCollision);
        }

        TickOutcome::Moved { ate }
    }

    fn in_bounds(&self, (x, y): Cell) -> bool {
        (0..self.cell_count).contains(&x) && (0..self.cell_count).contains(&y)
    }

    fn die(&mut self, cause: DeathCause) -> TickOutcome {
        info!("snake died ({:?}) at {:?} with length {}", cause, self.body.head(), self.body.len());
        self.reset();
        TickOutcome::Died(cause)
    }

    /// Puts the snake back at the start, places fresh food and pauses.
    fn reset(&mut self) {
        self.body = Body::initial(self.cell_count);
        self.direction = Direction::Right;
        self.moved_direction = Direction::Right;
        self.food = self.spawner.generate(&self.body);
        self.running = false;
    }
}

#[cfg(test)]
impl<R: Rng> GameState<R> {
    pub(crate) fn place(&mut self, body: Body, direction: Direction, food: Option<Cell>) {
        self.body = body;
        self.direction = direction;
        self.moved_direction = direction;
        self.food = food;
    }
}
