use std::collections::VecDeque;

use crate::grid::{Direction, GridPoint, direction_change_is_valid};

/// Snake body plus committed and pending heading.
///
/// Movement is split in two: [`Snake::advance`] only computes the candidate
/// head, then the caller applies it with [`Snake::grow`] or [`Snake::slide`]
/// once collisions have been ruled out.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<GridPoint>,
    current_direction: Direction,
    pending_direction: Direction,
}

impl Snake {
    /// Creates a one-cell snake at `start` heading `direction`.
    #[must_use]
    pub fn new(start: GridPoint, direction: Direction) -> Self {
        Self::from_segments(vec![start], direction)
    }

    /// Creates a straight snake of `length` cells with the head at `head`
    /// and the body trailing behind it.
    #[must_use]
    pub fn straight(head: GridPoint, direction: Direction, length: usize) -> Self {
        let trailing = direction.opposite();
        let mut segments = Vec::with_capacity(length.max(1));
        let mut cell = head;
        segments.push(cell);
        for _ in 1..length {
            cell = cell.step(trailing);
            segments.push(cell);
        }

        Self::from_segments(segments, direction)
    }

    /// Creates a snake from explicit segments (front is head).
    ///
    /// An empty list yields a single segment at the origin.
    #[must_use]
    pub fn from_segments(segments: Vec<GridPoint>, direction: Direction) -> Self {
        let mut body = VecDeque::from(segments);
        if body.is_empty() {
            body.push_back(GridPoint::new(0, 0));
        }

        Self {
            body,
            current_direction: direction,
            pending_direction: direction,
        }
    }

    /// Commits the pending heading and returns the candidate head one cell
    /// ahead. The body is left untouched.
    pub fn advance(&mut self) -> GridPoint {
        self.current_direction = self.pending_direction;
        self.head().step(self.current_direction)
    }

    /// Prepends `new_head` and keeps the tail.
    pub fn grow(&mut self, new_head: GridPoint) {
        self.body.push_front(new_head);
    }

    /// Prepends `new_head` and drops the tail.
    pub fn slide(&mut self, new_head: GridPoint) {
        self.body.push_front(new_head);
        let _ = self.body.pop_back();
    }

    /// Buffers the heading for the next tick. Reversals of the committed
    /// heading are dropped; otherwise the latest request wins.
    pub fn request_direction(&mut self, direction: Direction) {
        if direction_change_is_valid(self.current_direction, direction) {
            self.pending_direction = direction;
        }
    }

    /// Returns the current head.
    #[must_use]
    pub fn head(&self) -> GridPoint {
        // `body` is never empty: constructors seed it and `slide` always
        // pushes before popping.
        self.body[0]
    }

    /// Returns true if any segment occupies `point`.
    #[must_use]
    pub fn occupies(&self, point: GridPoint) -> bool {
        self.body.contains(&point)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn current_direction(&self) -> Direction {
        self.current_direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &GridPoint> {
        self.body.iter()
    }
}
