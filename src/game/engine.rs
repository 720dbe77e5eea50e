use rand::{SeedableRng, rngs::StdRng};

use super::{
    action::Direction,
    config::GameConfig,
    food::FoodSpawner,
    state::{CollisionType, GameOverReason, GameState, Phase, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the game ended, if it ended on this step
    pub game_over: Option<GameOverReason>,
    /// New tick interval when this step reached a speed milestone
    pub new_interval_ms: Option<u64>,
}

impl StepInfo {
    pub fn collision_type(&self) -> Option<CollisionType> {
        match self.game_over {
            Some(GameOverReason::Collision(collision)) => Some(collision),
            _ => None,
        }
    }
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// Collision and scoring rules. Owns the food RNG; the state it drives is
/// passed in so callers can snapshot or replace it freely.
pub struct GameEngine {
    config: GameConfig,
    spawner: FoodSpawner<StdRng>,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Engine with a reproducible food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            config,
            spawner: FoodSpawner::new(rng),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn center(&self) -> Position {
        let center = (self.config.grid_size / 2) as i32;
        Position::new(center, center)
    }

    /// A board waiting for the player: centered one-cell snake, no food yet
    pub fn idle(&self) -> GameState {
        GameState {
            snake: Snake::new(self.center(), Direction::Right, 1),
            food: None,
            grid_size: self.config.grid_size,
            score: 0,
            steps: 0,
            phase: Phase::Idle,
            tick_interval_ms: self.config.base_interval_ms(),
            speed_bonus_ms: 0,
        }
    }

    /// Fresh running game: one segment in the center heading right, base
    /// interval, zero score, first food placed.
    pub fn reset(&mut self) -> GameState {
        let mut state = self.idle();
        state.food = self.spawner.spawn(&state.snake, state.grid_size);
        state.phase = Phase::Running;
        state
    }

    /// Move `state` into `Running`. A game already running is left alone.
    /// Returns whether a new game was started.
    pub fn start(&mut self, state: &mut GameState) -> bool {
        if state.is_alive() {
            return false;
        }
        *state = self.reset();
        true
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_alive() {
            return StepResult {
                terminated: state.is_over(),
                info: StepInfo::default(),
            };
        }

        let heading = state.snake.resolved_direction();
        let new_head = state.snake.head().moved_in_direction(heading);

        if let Some(collision) = self.check_collision(state, new_head) {
            let reason = GameOverReason::Collision(collision);
            state.phase = Phase::GameOver(reason);
            state.steps += 1;

            return StepResult {
                terminated: true,
                info: StepInfo {
                    game_over: Some(reason),
                    ..Default::default()
                },
            };
        }

        let ate_food = state.food == Some(new_head);
        state.snake = state.snake.advance(heading, ate_food);
        state.steps += 1;

        let mut info = StepInfo {
            ate_food,
            ..Default::default()
        };

        if ate_food {
            state.score += 1;
            info.new_interval_ms = self.escalate_speed(state);

            state.food = self.spawner.spawn(&state.snake, state.grid_size);
            if state.food.is_none() {
                state.phase = Phase::GameOver(GameOverReason::BoardFull);
                info.game_over = Some(GameOverReason::BoardFull);
            }
        }

        debug_assert!(state.snake.is_self_disjoint());

        StepResult {
            terminated: info.game_over.is_some(),
            info,
        }
    }

    /// Check if the new head position causes a collision.
    /// The tail has not moved yet, so stepping onto it counts as a hit.
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Shorten the interval on every milestone score until the floor is hit.
    /// Returns the new interval when it changed.
    fn escalate_speed(&self, state: &mut GameState) -> Option<u64> {
        let config = &self.config;
        if state.score % config.points_per_speedup != 0
            || state.tick_interval_ms <= config.min_interval_ms
        {
            return None;
        }

        state.speed_bonus_ms += config.speed_step_ms;
        let next = config
            .base_interval_ms()
            .saturating_sub(state.speed_bonus_ms)
            .max(config.min_interval_ms);

        if next == state.tick_interval_ms {
            return None;
        }
        state.tick_interval_ms = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Difficulty;
    use rand::Rng;

    fn cells(list: &[(i32, i32)]) -> Vec<Position> {
        list.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    fn state_with(snake: Snake, food: (i32, i32), grid_size: usize) -> GameState {
        GameState::new(snake, Position::new(food.0, food.1), grid_size, 150)
    }

    /// Put food on the cell the snake will enter next
    fn feed_ahead(state: &mut GameState) {
        let ahead = state
            .snake
            .head()
            .moved_in_direction(state.snake.resolved_direction());
        state.food = Some(ahead);
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let state = engine.reset();

        assert!(state.is_alive());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(12, 12));
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.tick_interval_ms, 150);
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let mut state = engine.idle();
        let before = state.clone();

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(state, before);
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_start_from_idle_and_ignore_when_running() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let mut state = engine.idle();

        assert!(engine.start(&mut state));
        assert!(state.is_alive());

        engine.step(&mut state);
        let steps = state.steps;
        assert!(!engine.start(&mut state));
        assert_eq!(state.steps, steps);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 2);
        let snake = Snake::new(Position::new(12, 12), Direction::Right, 1);
        let mut state = state_with(snake, (0, 0), 25);

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.body, cells(&[(13, 12)]));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);
        let snake = Snake::new(Position::new(12, 12), Direction::Right, 1);
        let mut state = state_with(snake, (13, 12), 25);

        let result = engine.step(&mut state);

        assert!(result.info.ate_food);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.body, cells(&[(13, 12), (12, 12)]));
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
        assert_eq!(result.info.new_interval_ms, None);
    }

    #[test]
    fn test_reversal_request_is_rejected() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 4);
        let snake =
            Snake::from_cells(cells(&[(5, 5), (5, 4), (5, 3)]), Direction::Down).unwrap();
        let mut state = state_with(snake, (20, 20), 25);

        assert!(!state.request_direction(Direction::Up));
        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Position::new(5, 6));
        assert_eq!(state.snake.direction, Direction::Down);
    }

    #[test]
    fn test_one_cell_snake_cannot_reverse() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 4);
        let snake = Snake::new(Position::new(12, 12), Direction::Right, 1);
        let mut state = state_with(snake, (0, 0), 25);

        state.request_direction(Direction::Left);
        engine.step(&mut state);

        assert_eq!(state.snake.head(), Position::new(13, 12));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 5);
        let snake = Snake::new(Position::new(24, 10), Direction::Right, 1);
        let mut state = state_with(snake.clone(), (0, 0), 25);

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert!(!state.is_alive());
        assert_eq!(result.info.collision_type(), Some(CollisionType::Wall));
        assert_eq!(
            state.phase,
            Phase::GameOver(GameOverReason::Collision(CollisionType::Wall))
        );
        // Terminal tick leaves the body where it was
        assert_eq!(state.snake.body, snake.body);
    }

    #[test]
    fn test_wall_collision_on_every_side() {
        let cases = [
            ((0, 5), Direction::Left),
            ((5, 0), Direction::Up),
            ((9, 5), Direction::Right),
            ((5, 9), Direction::Down),
        ];
        for ((x, y), dir) in cases {
            let mut engine = GameEngine::with_seed(GameConfig::small(), 6);
            let mut state = state_with(Snake::new(Position::new(x, y), dir, 1), (3, 3), 10);
            let result = engine.step(&mut state);
            assert_eq!(result.info.collision_type(), Some(CollisionType::Wall));
        }
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 7);

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = state_with(snake, (8, 8), 10);

        engine.step(&mut state);
        state.request_direction(Direction::Down);
        engine.step(&mut state);
        state.request_direction(Direction::Left);
        engine.step(&mut state);
        state.request_direction(Direction::Up);
        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type(),
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_moving_onto_tail_is_a_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 8);
        let snake = Snake::from_cells(cells(&[(1, 1), (1, 2), (2, 2), (2, 1)]), Direction::Up)
            .unwrap();
        let mut state = state_with(snake, (8, 8), 10);

        state.request_direction(Direction::Right);
        let result = engine.step(&mut state);

        assert_eq!(
            result.info.collision_type(),
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_speed_escalates_every_third_point() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 9);
        let snake = Snake::new(Position::new(0, 12), Direction::Right, 1);
        let mut state = state_with(snake, (1, 12), 25);

        let mut intervals = Vec::new();
        for _ in 0..9 {
            feed_ahead(&mut state);
            let result = engine.step(&mut state);
            assert!(result.info.ate_food);
            intervals.push((state.score, result.info.new_interval_ms));
        }

        assert_eq!(
            intervals,
            vec![
                (1, None),
                (2, None),
                (3, Some(145)),
                (4, None),
                (5, None),
                (6, Some(140)),
                (7, None),
                (8, None),
                (9, Some(135)),
            ]
        );
        assert_eq!(state.tick_interval_ms, 135);
    }

    #[test]
    fn test_speed_is_floored() {
        let config = GameConfig::new(25, Difficulty::VeryFast);
        let mut engine = GameEngine::with_seed(config, 10);
        let mut state = engine.reset();
        state.snake = Snake::new(Position::new(0, 0), Direction::Right, 1);

        let mut changes = Vec::new();
        for _ in 0..18 {
            feed_ahead(&mut state);
            if let Some(ms) = engine.step(&mut state).info.new_interval_ms {
                changes.push(ms);
            }
            assert!(state.tick_interval_ms >= 30);
        }

        assert_eq!(changes, vec![45, 40, 35, 30]);
        assert_eq!(state.tick_interval_ms, 30);
        assert_eq!(state.score, 18);
    }

    #[test]
    fn test_board_full_ends_game() {
        let mut engine = GameEngine::with_seed(GameConfig::new(2, Difficulty::Medium), 11);
        let snake =
            Snake::from_cells(cells(&[(0, 1), (0, 0), (1, 0)]), Direction::Down).unwrap();
        let mut state = state_with(snake, (1, 1), 2);

        state.request_direction(Direction::Right);
        let result = engine.step(&mut state);

        assert!(result.info.ate_food);
        assert!(result.terminated);
        assert_eq!(result.info.game_over, Some(GameOverReason::BoardFull));
        assert_eq!(state.food, None);
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 12);
        let mut state = engine.reset();
        state.phase = Phase::GameOver(GameOverReason::Collision(CollisionType::Wall));
        let steps_before = state.steps;

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(state.steps, steps_before);
    }

    #[test]
    fn test_invariants_under_random_play() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 13);
        let mut input = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            let mut state = engine.reset();
            for _ in 0..2_000 {
                let dir = Direction::ALL[input.gen_range(0..4)];
                state.request_direction(dir);

                let before = state.clone();
                let result = engine.step(&mut state);

                assert!(state.tick_interval_ms <= before.tick_interval_ms);
                assert!(state.score >= before.score);

                if result.info.collision_type().is_some() {
                    assert_eq!(state.snake, before.snake);
                    break;
                }

                let grown = usize::from(result.info.ate_food);
                assert_eq!(state.snake.len(), before.snake.len() + grown);
                assert_eq!(state.score, before.score + grown as u32);
                assert!(state.snake.is_self_disjoint());
                assert_ne!(
                    state.snake.direction,
                    before.snake.direction.opposite(),
                );
                if let Some(food) = state.food {
                    assert!(!state.snake.occupies(food));
                }
                if result.terminated {
                    break;
                }
            }
        }
    }
}
