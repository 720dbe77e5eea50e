use rand::{Rng, seq::SliceRandom};

use super::state::{Position, Snake};

/// Rejection sampling gives up after this many hits on the snake and
/// enumerates the free cells instead.
const MAX_RESAMPLES: usize = 32;

/// Places food on a cell the snake does not occupy
#[derive(Debug, Clone)]
pub struct FoodSpawner<R> {
    rng: R,
}

impl<R: Rng> FoodSpawner<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Pick a free cell uniformly at random from the `grid_size²` board.
    ///
    /// Samples the whole board and retries while the pick lands on the
    /// snake. Once the snake covers at least half the board, or the retries
    /// run out, the free cells are listed and one is chosen directly, so
    /// this always terminates. Returns `None` when the board is full.
    pub fn spawn(&mut self, snake: &Snake, grid_size: usize) -> Option<Position> {
        let cells = grid_size * grid_size;
        if snake.len() >= cells {
            return None;
        }

        if snake.len() * 2 < cells {
            for _ in 0..MAX_RESAMPLES {
                let pos = Position::new(
                    self.rng.gen_range(0..grid_size) as i32,
                    self.rng.gen_range(0..grid_size) as i32,
                );
                if !snake.occupies(pos) {
                    return Some(pos);
                }
            }
        }

        self.spawn_from_free_cells(snake, grid_size)
    }

    fn spawn_from_free_cells(&mut self, snake: &Snake, grid_size: usize) -> Option<Position> {
        let n = grid_size as i32;
        let free: Vec<Position> = (0..n)
            .flat_map(|y| (0..n).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use rand::{SeedableRng, rngs::StdRng};

    fn spawner(seed: u64) -> FoodSpawner<StdRng> {
        FoodSpawner::new(StdRng::seed_from_u64(seed))
    }

    /// Fill the board row by row, leaving `free` cells uncovered at the end
    fn snake_covering(grid_size: usize, free: usize) -> Snake {
        let n = grid_size as i32;
        let cells: Vec<Position> = (0..n)
            .flat_map(|y| (0..n).map(move |x| Position::new(x, y)))
            .take(grid_size * grid_size - free)
            .collect();
        Snake::from_cells(cells, Direction::Right).unwrap()
    }

    #[test]
    fn test_spawn_avoids_snake() {
        let mut spawner = spawner(7);
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);

        for _ in 0..500 {
            let food = spawner.spawn(&snake, 10).unwrap();
            assert!(!snake.occupies(food));
            assert!((0..10).contains(&food.x));
            assert!((0..10).contains(&food.y));
        }
    }

    #[test]
    fn test_spawn_finds_last_free_cell() {
        let mut spawner = spawner(1);
        let snake = snake_covering(5, 1);

        for _ in 0..20 {
            assert_eq!(spawner.spawn(&snake, 5), Some(Position::new(4, 4)));
        }
    }

    #[test]
    fn test_spawn_on_nearly_full_board() {
        let mut spawner = spawner(3);
        let snake = snake_covering(25, 3);

        for _ in 0..50 {
            let food = spawner.spawn(&snake, 25).unwrap();
            assert!(!snake.occupies(food));
            assert_eq!(food.y, 24);
        }
    }

    #[test]
    fn test_spawn_on_full_board() {
        let mut spawner = spawner(9);
        let snake = snake_covering(4, 0);
        assert_eq!(spawner.spawn(&snake, 4), None);
    }

    #[test]
    fn test_spawn_reaches_every_free_cell() {
        let mut spawner = spawner(42);
        let snake = Snake::new(Position::new(1, 1), Direction::Right, 1);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..2000 {
            seen.insert(spawner.spawn(&snake, 3).unwrap());
        }
        assert_eq!(seen.len(), 8);
    }
}
