use crate::config::GridSize;

/// Cell coordinate on the play field. `y` grows downwards.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the point lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Canonical movement directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit cell delta for one step.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Returns whether a heading change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

#[cfg(test)]
mod tests {
    use crate::config::GridSize;

    use super::{Direction, GridPoint, direction_change_is_valid};

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn reversal_is_the_only_invalid_change() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(Direction::Down, Direction::Up));

        assert!(direction_change_is_valid(Direction::Up, Direction::Up));
        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Left, Direction::Down));
    }

    #[test]
    fn step_moves_one_cell() {
        let origin = GridPoint::new(3, 3);

        assert_eq!(origin.step(Direction::Up), GridPoint::new(3, 2));
        assert_eq!(origin.step(Direction::Down), GridPoint::new(3, 4));
        assert_eq!(origin.step(Direction::Left), GridPoint::new(2, 3));
        assert_eq!(origin.step(Direction::Right), GridPoint::new(4, 3));
    }

    #[test]
    fn bounds_check_is_half_open() {
        let bounds = GridSize {
            width: 10,
            height: 10,
        };

        assert!(GridPoint::new(0, 0).is_within_bounds(bounds));
        assert!(GridPoint::new(9, 9).is_within_bounds(bounds));
        assert!(!GridPoint::new(10, 5).is_within_bounds(bounds));
        assert!(!GridPoint::new(5, -1).is_within_bounds(bounds));
    }
}
