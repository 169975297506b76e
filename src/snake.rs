use std::collections::VecDeque;

use crate::{Cell, GridInt};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn reverse(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_reverse_of(self, other: Direction) -> bool {
        self.reverse() == other
    }

    /// Offset of one step along this direction. `y` grows downwards.
    pub fn delta(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the snake grew instead of translating.
    Moved { new_head: Cell, old_tail: Option<Cell> },
    Crashed(Collision),
}

/// Ordered chain of cells, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    /// Straight snake of `size` cells with its head at `head`, trailing
    /// behind it opposite to `direction`.
    pub fn new(head: Cell, size: usize, direction: Direction) -> Self {
        let diff = direction.delta();

        let body = (0..size as GridInt)
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Snake { body, direction }
    }

    /// Builds a snake from explicit cells (head first). Returns `None` unless
    /// the cells are non-empty, pairwise distinct and orthogonally chained.
    pub fn from_cells(cells: Vec<Cell>, direction: Direction) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }

        for (i, cell) in cells.iter().enumerate() {
            if cells[i + 1..].contains(cell) {
                return None;
            }
        }

        let chained = cells.windows(2)
            .all(|pair| (pair[0].0 - pair[1].0).abs() + (pair[0].1 - pair[1].1).abs() == 1);
        if !chained {
            return None;
        }

        Some(Snake { body: cells.into(), direction })
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        // Every constructor guarantees at least one cell
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    pub fn next_head(&self) -> Cell {
        let head = self.head();
        let diff = self.direction.delta();
        (head.0 + diff.0, head.1 + diff.1)
    }

    /// Moves one cell along the current direction on a `grid_size` square
    /// grid. Landing on `food` keeps the tail. On a crash the body is left
    /// untouched.
    pub fn move_step(&mut self, grid_size: GridInt, food: Option<Cell>) -> MoveResult {
        let new_head = self.next_head();

        if new_head.0 < 0 || new_head.1 < 0 || new_head.0 >= grid_size || new_head.1 >= grid_size {
            return Crashed(Collision::Wall);
        }

        if self.contains(&new_head) {
            return Crashed(Collision::Body);
        }

        self.body.push_front(new_head);

        if food == Some(new_head) {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }

    /// Turns unless `new_direction` is a 180 degree reversal. Returns whether
    /// the direction was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_reverse_of(self.direction) {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snake_trails_behind_head() {
        let snake = Snake::new((10, 10), 3, Right);
        let cells: Vec<Cell> = snake.body().iter().copied().collect();
        assert_eq!(cells, vec![(10, 10), (9, 10), (8, 10)]);

        let snake = Snake::new((4, 4), 2, Up);
        assert_eq!(snake.body().back(), Some(&(4, 5)));
    }

    #[test]
    fn reversal_is_rejected() {
        let mut snake = Snake::new((5, 5), 3, Right);
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Right);
        assert!(snake.set_direction(Up));
        assert!(!snake.set_direction(Down));
        assert_eq!(snake.get_direction(), Up);
    }

    #[test]
    fn move_translates_or_grows() {
        let mut snake = Snake::new((5, 5), 3, Right);

        let res = snake.move_step(20, None);
        assert_eq!(res, Moved { new_head: (6, 5), old_tail: Some((3, 5)) });
        assert_eq!(snake.len(), 3);

        let res = snake.move_step(20, Some((7, 5)));
        assert_eq!(res, Moved { new_head: (7, 5), old_tail: None });
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), (7, 5));
    }

    #[test]
    fn crash_leaves_body_untouched() {
        let mut snake = Snake::new((0, 3), 1, Left);
        assert_eq!(snake.move_step(20, None), Crashed(Collision::Wall));
        assert_eq!(snake.head(), (0, 3));
    }

    #[test]
    fn tail_cell_counts_as_body() {
        // 2x2 loop: the head steps onto the cell the tail still occupies
        let mut snake = Snake::from_cells(vec![(1, 0), (1, 1), (0, 1), (0, 0)], Left).unwrap();
        assert_eq!(snake.move_step(20, None), Crashed(Collision::Body));
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn from_cells_validates_shape() {
        assert!(Snake::from_cells(vec![], Right).is_none());
        assert!(Snake::from_cells(vec![(1, 1), (1, 1)], Right).is_none());
        assert!(Snake::from_cells(vec![(1, 1), (3, 1)], Right).is_none());
        assert!(Snake::from_cells(vec![(2, 1), (1, 1), (1, 2)], Right).is_some());
    }

    #[test]
    fn reverse_pairs() {
        for dir in [Up, Down, Left, Right].iter() {
            assert!(dir.reverse().is_reverse_of(*dir));
            assert!(!dir.is_reverse_of(*dir));
        }
    }
}
