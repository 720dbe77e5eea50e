use std::collections::{HashSet, VecDeque};

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake: body cells plus the heading it travelled on the last tick and
/// the heading buffered for the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    pub body: VecDeque<Position>,
    /// Heading applied on the most recent tick
    pub direction: Direction,
    /// Heading that the next tick will try to apply
    pub pending_direction: Direction,
}

impl Snake {
    /// Create a snake whose extra segments trail behind the head.
    /// A length of zero is treated as one.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self {
            body,
            direction,
            pending_direction: direction,
        }
    }

    /// Build a snake from explicit cells, head first.
    /// Returns `None` for an empty body.
    pub fn from_cells<I>(cells: I, direction: Direction) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let body: VecDeque<Position> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            body,
            direction,
            pending_direction: direction,
        })
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Buffer a heading for the next tick. A reversal of the current heading
    /// is dropped and the buffer keeps what it held. Returns whether the
    /// request was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// The heading the next tick will travel: the pending one unless it
    /// would reverse the snake onto its neck.
    pub fn resolved_direction(&self) -> Direction {
        if self.direction.is_opposite(self.pending_direction) {
            self.direction
        } else {
            self.pending_direction
        }
    }

    /// Pure transition: step one cell along `heading`, growing by one when
    /// `ate_food` is set. Collisions are not checked here.
    pub fn advance(&self, heading: Direction, ate_food: bool) -> Snake {
        let mut body = self.body.clone();
        body.push_front(self.head().moved_in_direction(heading));
        if !ate_food {
            body.pop_back();
        }

        Snake {
            body,
            direction: heading,
            pending_direction: self.pending_direction,
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Whether no two segments share a cell
    pub fn is_self_disjoint(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.body.len());
        self.body.iter().all(|pos| seen.insert(*pos))
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    Collision(CollisionType),
    /// Every cell is snake; nowhere left to put food
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    GameOver(GameOverReason),
}

/// Complete game state. Renderers receive it by shared reference after
/// every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only once the board is full
    pub food: Option<Position>,
    pub grid_size: usize,
    pub score: u32,
    pub steps: u32,
    pub phase: Phase,
    /// Current time between ticks
    pub tick_interval_ms: u64,
    /// Accumulated speed-up subtracted from the base interval
    pub speed_bonus_ms: u64,
}

impl GameState {
    /// Create a running game state
    pub fn new(snake: Snake, food: Position, grid_size: usize, tick_interval_ms: u64) -> Self {
        Self {
            snake,
            food: Some(food),
            grid_size,
            score: 0,
            steps: 0,
            phase: Phase::Running,
            tick_interval_ms,
            speed_bonus_ms: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let n = self.grid_size as i32;
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y)
    }

    /// Buffer a heading change. Ignored unless the game is running.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.snake.request_direction(direction)
    }
}
