use std::collections::VecDeque;

use super::action::Direction;

/// A position on the game grid
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

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The snake in the game
///
/// Segments are stored tail-first: the front of the deque is the oldest
/// cell, the back is the head. Segments never repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Create a straight snake whose head is at `head`, facing `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length)
            .rev()
            .map(|back| {
                let back = back as i32;
                head.moved_by(-dx * back, -dy * back)
            })
            .collect();

        Self { body }
    }

    /// Create a snake from explicit segments, tail first and head last
    pub fn from_segments<I, P>(segments: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        Self {
            body: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get the tail position (oldest segment)
    pub fn tail(&self) -> Position {
        self.body[0]
    }

    /// Segments from tail to head
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Position> + ExactSizeIterator {
        self.body.iter()
    }

    /// Check if any segment, tail included, occupies `pos`
    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.push_back(pos);
    }

    pub(crate) fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_front()
    }
}

/// Type of collision that ended a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into one of its own segments
    SelfCollision,
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    GameOver,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }
}

/// Complete game state
///
/// Owned by [`GameEngine`](super::GameEngine); everything outside the engine
/// only ever sees a shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub(crate) snake: Snake,
    pub(crate) food: Option<Position>,
    pub(crate) direction: Direction,
    pub(crate) pending_direction: Direction,
    pub(crate) grid_width: usize,
    pub(crate) grid_height: usize,
    pub(crate) score: u32,
    pub(crate) ticks: u32,
    pub(crate) run_state: RunState,
}

impl GameState {
    /// Create a running state with the snake moving in `direction`
    pub fn new(
        snake: Snake,
        food: Option<Position>,
        direction: Direction,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        Self {
            snake,
            food,
            direction,
            pending_direction: direction,
            grid_width,
            grid_height,
            score: 0,
            ticks: 0,
            run_state: RunState::Running,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    /// Direction applied on the most recent tick
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Direction that the next tick will commit
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Effective ticks since the session started
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        usize::try_from(pos.x).is_ok_and(|x| x < self.grid_width)
            && usize::try_from(pos.y).is_ok_and(|y| y < self.grid_height)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }
}
