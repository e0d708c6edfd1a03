use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    action::{Direction, Intent},
    config::{ConfigError, GameConfig, INITIAL_SNAKE_LENGTH},
    state::{CollisionType, GameState, Position, RunState, Snake},
};

/// What a single tick did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The session is over; nothing changed
    Idle,
    /// The snake advanced one cell
    Moved,
    /// The snake advanced onto the food and grew
    Ate { score: u32 },
    /// The snake collided and the session ended
    GameOver {
        cause: CollisionType,
        final_score: u32,
    },
}

impl TickResult {
    /// Whether the tick changed anything a renderer would show
    pub fn changed_state(&self) -> bool {
        !matches!(self, TickResult::Idle)
    }
}

/// The game engine that owns the session state and applies all rules
///
/// Randomness is injected so tests can drive food placement from a seeded
/// source.
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    state: GameState,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create an engine and start the first session
    ///
    /// Food placement is seeded from `config.seed` when set, otherwise from
    /// OS entropy.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine with a caller-supplied random source
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = fresh_state(&config, &mut rng);
        info!(
            "Session started on {}x{} grid, food at {:?}",
            config.grid_width, config.grid_height, state.food
        );

        Ok(Self { config, state, rng })
    }

    #[cfg(test)]
    pub(crate) fn with_state(config: GameConfig, state: GameState, rng: R) -> Self {
        Self { config, state, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    /// Reset to a fresh running session: centred snake, new food, zero score
    pub fn start(&mut self) {
        self.state = fresh_state(&self.config, &mut self.rng);
        info!("Session started, food at {:?}", self.state.food);
    }

    /// Buffer a direction for the next tick
    ///
    /// Rejected when it reverses the committed direction or when the session
    /// is over. Returns whether the intent was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.state.is_running() {
            return false;
        }
        if self.state.direction.is_opposite(direction) {
            debug!(
                "Ignoring {:?}: reverses committed {:?}",
                direction, self.state.direction
            );
            return false;
        }

        self.state.pending_direction = direction;
        true
    }

    /// Start a new session if the current one is over. Returns whether it did.
    pub fn request_restart(&mut self) -> bool {
        if self.state.is_running() {
            return false;
        }

        self.start();
        true
    }

    /// Route an input intent to the matching operation
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Turn(direction) => self.set_direction(direction),
            Intent::Restart => self.request_restart(),
        }
    }

    /// Advance the simulation by one cell
    pub fn tick(&mut self) -> TickResult {
        if !self.state.is_running() {
            return TickResult::Idle;
        }

        self.state.direction = self.state.pending_direction;
        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.direction);

        if let Some(cause) = self.check_collision(new_head) {
            self.state.run_state = RunState::GameOver;
            info!(
                "Game over ({:?}) at {:?}, final score {}",
                cause, new_head, self.state.score
            );

            return TickResult::GameOver {
                cause,
                final_score: self.state.score,
            };
        }

        self.state.snake.push_head(new_head);
        self.state.ticks += 1;

        if self.state.food == Some(new_head) {
            self.state.score += 1;
            self.state.food = spawn_food(
                &mut self.rng,
                &self.state.snake,
                self.config.grid_width,
                self.config.grid_height,
            );
            debug!(
                "Ate food, score {}, next food at {:?}",
                self.state.score, self.state.food
            );

            TickResult::Ate {
                score: self.state.score,
            }
        } else {
            self.state.snake.pop_tail();
            TickResult::Moved
        }
    }

    /// Check if the new head position causes a collision
    ///
    /// The whole pre-move body counts, including the tail cell that a
    /// non-growing move is about to vacate.
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.contains(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }
}

/// Running state with a length-3 snake centred on the grid, heading right
fn fresh_state<R: Rng>(config: &GameConfig, rng: &mut R) -> GameState {
    // Validated dimensions fit in u16, so the casts are lossless
    let head = Position::new(
        (config.grid_width / 2) as i32 + 1,
        (config.grid_height / 2) as i32,
    );
    let snake = Snake::new(head, Direction::Right, INITIAL_SNAKE_LENGTH);
    let food = spawn_food(rng, &snake, config.grid_width, config.grid_height);

    GameState::new(
        snake,
        food,
        Direction::Right,
        config.grid_width,
        config.grid_height,
    )
}

/// Pick a uniformly random cell not covered by the snake
///
/// Rejection sampling over the whole grid. Returns `None` only when the
/// snake fills every cell.
fn spawn_food<R: Rng>(
    rng: &mut R,
    snake: &Snake,
    width: usize,
    height: usize,
) -> Option<Position> {
    if snake.len() >= width * height {
        warn!("Snake fills the {}x{} grid, no room for food", width, height);
        return None;
    }

    // Callers only pass validated dimensions, which fit in u16
    loop {
        let x = rng.gen_range(0..width) as i32;
        let y = rng.gen_range(0..height) as i32;
        let pos = Position::new(x, y);

        if !snake.contains(pos) {
            return Some(pos);
        }
    }
}
