use std::collections::VecDeque;

use crate::Cell;
use Direction::*;

pub const INITIAL_SNAKE_LENGTH: i32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> Cell {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

/// The snake's segments, head first. Never empty.
#[derive(Clone, Debug)]
pub struct Body {
    cells: VecDeque<Cell>,
    grow_pending: bool,
}

impl Body {
    /// Builds a straight body of `size` cells with its head at `head`,
    /// trailing away from `direction`.
    pub fn new(head: Cell, size: i32, direction: Direction) -> Self {
        let diff = direction.delta();

        let cells = (0..size.max(1))
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Body { cells, grow_pending: false }
    }

    /// The canonical starting body for a square grid: three cells in a row,
    /// head in the centre, facing right.
    pub fn initial(cell_count: i32) -> Self {
        let center = (cell_count / 2, cell_count / 2);
        Body::new(center, INITIAL_SNAKE_LENGTH, Right)
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Cell]) -> Self {
        assert!(!cells.is_empty(), "a body needs at least one cell");
        Body { cells: cells.iter().copied().collect(), grow_pending: false }
    }

    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    pub fn tail(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    pub fn to_vec(&self) -> Vec<Cell> {
        self.cells.iter().copied().collect()
    }

    /// Pushes a new head one step in `direction` and returns it. The tail is
    /// left in place until `resolve_growth` runs.
    pub fn advance(&mut self, direction: Direction) -> Cell {
        let (head, diff) = (self.head(), direction.delta());
        let new_head = (head.0 + diff.0, head.1 + diff.1);
        self.cells.push_front(new_head);
        new_head
    }

    pub fn grow(&mut self) {
        self.grow_pending = true;
    }

    #[cfg(test)]
    pub fn is_growth_pending(&self) -> bool {
        self.grow_pending
    }

    /// Drops the tail unless a growth is pending, in which case the flag is
    /// consumed and the tail kept. Returns the removed tail, if any.
    pub fn resolve_growth(&mut self) -> Option<Cell> {
        if self.grow_pending {
            self.grow_pending = false;
            None
        } else if self.cells.len() > 1 {
            self.cells.pop_back()
        } else {
            None
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.iter().any(|c| *c == cell)
    }

    /// Whether the head overlaps any other segment.
    pub fn head_collides(&self) -> bool {
        let head = self.head();
        self.cells.iter().skip(1).any(|c| *c == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_body_is_horizontal_row() {
        let body = Body::initial(25);
        assert_eq!(body.to_vec(), vec![(12, 12), (11, 12), (10, 12)]);
        assert_eq!(body.tail(), (10, 12));
        assert!(!body.is_growth_pending());
    }

    #[test]
    fn advance_then_resolve_keeps_length() {
        let mut body = Body::initial(25);
        assert_eq!(body.advance(Right), (13, 12));
        assert_eq!(body.len(), 4);
        assert_eq!(body.resolve_growth(), Some((10, 12)));
        assert_eq!(body.to_vec(), vec![(13, 12), (12, 12), (11, 12)]);
    }

    #[test]
    fn pending_growth_keeps_tail_once() {
        let mut body = Body::initial(25);
        body.advance(Down);
        body.grow();
        assert_eq!(body.resolve_growth(), None);
        assert!(!body.is_growth_pending());
        assert_eq!(body.len(), 4);

        body.advance(Down);
        assert_eq!(body.resolve_growth(), Some((10, 12)));
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn single_cell_body_never_shrinks() {
        let mut body = Body::from_cells(&[(0, 0)]);
        assert_eq!(body.resolve_growth(), None);
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn contains_and_head_collision() {
        let mut body = Body::from_cells(&[(2, 1), (1, 1), (1, 2), (2, 2), (3, 2)]);
        assert!(body.contains((1, 2)));
        assert!(!body.contains((0, 0)));
        assert!(!body.head_collides());

        body.advance(Down);
        body.resolve_growth();
        assert_eq!(body.head(), (2, 2));
        assert!(body.head_collides());
    }

    #[test]
    fn opposites() {
        assert!(Up.is_opposite(Down));
        assert!(Left.is_opposite(Right));
        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }
}
