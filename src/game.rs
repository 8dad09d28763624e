use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::board::Cell;
use crate::config::GridSize;
use crate::error::LayoutError;
use crate::food::spawn_cell;
use crate::input::Direction;
use crate::snake::Snake;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Won,
    Lost,
}

/// Why a game ended in a loss.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// What a single call to [`GameState::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The snake moved without eating.
    Moved,
    /// The snake ate and new food was placed.
    Ate,
    /// The snake ate the last food; the board is full.
    Won,
    /// The head left the board or ran into the body.
    Lost(DeathReason),
    /// The game had already ended; nothing changed.
    Idle,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    snake: Snake,
    food: Option<Cell>,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    tick_count: u64,
    bounds: GridSize,
    rng: StdRng,
}

impl GameState {
    /// Starts a game with an entropy-seeded RNG.
    pub fn new(bounds: GridSize) -> Result<Self, LayoutError> {
        Self::start(bounds, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(bounds: GridSize, seed: u64) -> Result<Self, LayoutError> {
        Self::start(bounds, StdRng::seed_from_u64(seed))
    }

    fn start(bounds: GridSize, mut rng: StdRng) -> Result<Self, LayoutError> {
        let snake = Snake::initial(bounds)?;
        let food = place_food(&mut rng, &snake);
        info!(rows = bounds.rows, cols = bounds.cols, ?food, "game started");

        Ok(Self {
            snake,
            food,
            status: status_for_food(food),
            death_reason: None,
            tick_count: 0,
            bounds,
            rng,
        })
    }

    /// Builds a running state from an explicit layout.
    ///
    /// `food` of `None` places food at random on a vacant cell.
    pub fn with_layout(
        bounds: GridSize,
        segments: Vec<Cell>,
        direction: Direction,
        food: Option<Cell>,
        seed: u64,
    ) -> Result<Self, LayoutError> {
        let snake = Snake::from_segments(segments, direction, bounds)?;
        let mut rng = StdRng::seed_from_u64(seed);

        let food = match food {
            Some(cell) if !cell.is_within_bounds(bounds) => {
                return Err(LayoutError::FoodOutOfBounds(cell));
            }
            Some(cell) if snake.occupies(cell) => return Err(LayoutError::FoodOnSnake(cell)),
            Some(cell) => Some(cell),
            None => place_food(&mut rng, &snake),
        };

        Ok(Self {
            snake,
            food,
            status: status_for_food(food),
            death_reason: None,
            tick_count: 0,
            bounds,
            rng,
        })
    }

    /// Resets snake, food and queue to a fresh game on the same board.
    ///
    /// The RNG carries on, so a seeded session stays reproducible across restarts.
    pub fn restart(&mut self) -> Result<(), LayoutError> {
        self.snake = Snake::initial(self.bounds)?;
        self.food = place_food(&mut self.rng, &self.snake);
        self.status = status_for_food(self.food);
        self.death_reason = None;
        self.tick_count = 0;
        info!("game restarted");
        Ok(())
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Idle;
        }

        self.tick_count += 1;
        self.snake.resolve_direction();
        let next_head = self.snake.next_head();

        if !next_head.is_within_bounds(self.bounds) {
            return self.lose(DeathReason::WallCollision);
        }

        // The tail has not moved yet, so stepping onto it is a collision too.
        if self.snake.occupies(next_head) {
            return self.lose(DeathReason::SelfCollision);
        }

        let ate = self.food == Some(next_head);
        self.snake.advance(next_head, ate);
        if !ate {
            return TickOutcome::Moved;
        }

        debug!(cell = %next_head, length = self.snake.len(), "food eaten");
        if self.snake.occupancy().vacant_count() == 0 {
            self.food = None;
            self.terminate(true);
            return TickOutcome::Won;
        }

        self.food = Some(spawn_cell(&mut self.rng, self.snake.occupancy()));
        TickOutcome::Ate
    }

    fn lose(&mut self, reason: DeathReason) -> TickOutcome {
        self.death_reason = Some(reason);
        self.terminate(false);
        TickOutcome::Lost(reason)
    }

    /// Ends the game with the given outcome.
    pub fn terminate(&mut self, won: bool) {
        self.status = if won {
            GameStatus::Won
        } else {
            GameStatus::Lost
        };

        info!(
            won,
            reason = ?self.death_reason,
            length = self.snake.len(),
            ticks = self.tick_count,
            "game over"
        );
    }

    /// Queues a direction request; ignored once the game has ended.
    pub fn apply_direction(&mut self, direction: Direction) {
        if self.status == GameStatus::Running {
            self.snake.buffer_direction(direction);
        }
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Running
    }
}

/// Spawns food unless the snake already covers the whole board.
fn place_food(rng: &mut StdRng, snake: &Snake) -> Option<Cell> {
    (snake.occupancy().vacant_count() > 0).then(|| spawn_cell(rng, snake.occupancy()))
}

/// A board with no room for food is already won.
fn status_for_food(food: Option<Cell>) -> GameStatus {
    if food.is_some() {
        GameStatus::Running
    } else {
        GameStatus::Won
    }
}
