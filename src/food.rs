use std::collections::HashSet;

use rand::Rng;

use crate::config::{GridSize, MAX_PLACEMENT_ATTEMPTS};
use crate::error::GameError;
use crate::grid::GridPoint;

/// Picks a uniformly random free cell.
///
/// Draws cells at random until one is not in `occupied`. When every cell is
/// taken this returns [`GameError::BoardFull`] instead of spinning; after
/// [`MAX_PLACEMENT_ATTEMPTS`] rejections it picks among the enumerated free
/// cells so a crowded board stays cheap.
pub fn place<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    occupied: &HashSet<GridPoint>,
) -> Result<GridPoint, GameError> {
    let taken = occupied
        .iter()
        .filter(|cell| cell.is_within_bounds(bounds))
        .count();
    if taken >= bounds.total_cells() {
        return Err(GameError::BoardFull);
    }

    let width = i32::from(bounds.width);
    let height = i32::from(bounds.height);

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = GridPoint::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if !occupied.contains(&candidate) {
            return Ok(candidate);
        }
    }

    let free: Vec<GridPoint> = (0..height)
        .flat_map(|y| (0..width).map(move |x| GridPoint::new(x, y)))
        .filter(|cell| !occupied.contains(cell))
        .collect();

    if free.is_empty() {
        return Err(GameError::BoardFull);
    }

    Ok(free[rng.gen_range(0..free.len())])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::error::GameError;
    use crate::grid::GridPoint;

    use super::place;

    fn grid(width: u16, height: u16) -> GridSize {
        GridSize { width, height }
    }

    #[test]
    fn placement_never_overlaps_occupied_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let occupied: HashSet<_> = [
            GridPoint::new(0, 0),
            GridPoint::new(1, 0),
            GridPoint::new(2, 0),
        ]
        .into_iter()
        .collect();

        for _ in 0..200 {
            let food = place(&mut rng, grid(8, 6), &occupied).expect("board has room");
            assert!(!occupied.contains(&food));
            assert!(food.is_within_bounds(grid(8, 6)));
        }
    }

    #[test]
    fn full_board_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let occupied: HashSet<_> = (0..3)
            .flat_map(|y| (0..3).map(move |x| GridPoint::new(x, y)))
            .collect();

        assert_eq!(
            place(&mut rng, grid(3, 3), &occupied),
            Err(GameError::BoardFull)
        );
    }

    #[test]
    fn single_free_cell_is_found() {
        let mut rng = StdRng::seed_from_u64(3);
        let hole = GridPoint::new(4, 2);
        let occupied: HashSet<_> = (0..5)
            .flat_map(|y| (0..5).map(move |x| GridPoint::new(x, y)))
            .filter(|cell| *cell != hole)
            .collect();

        for _ in 0..10 {
            assert_eq!(place(&mut rng, grid(5, 5), &occupied), Ok(hole));
        }
    }

    #[test]
    fn off_board_cells_do_not_count_as_taken() {
        let mut rng = StdRng::seed_from_u64(5);
        let occupied: HashSet<_> = [GridPoint::new(-1, 0), GridPoint::new(0, 0)]
            .into_iter()
            .collect();

        assert_eq!(
            place(&mut rng, grid(2, 1), &occupied),
            Ok(GridPoint::new(1, 0))
        );
    }
}
