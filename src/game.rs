use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{GameConfig, GridSize};
use crate::error::SetupError;
use crate::food::FoodSet;
use crate::grid::MapModel;
use crate::input::Direction;
use crate::snake::Snake;
use crate::snapshot::Snapshot;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    /// Waiting for the first direction the start cell permits.
    Idle,
    Running,
    /// Terminal until the session is rebuilt.
    GameOver,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    /// Left the grid or entered a cell that cannot be entered from that side.
    Topology,
    SelfCollision,
}

/// What one call to [`GameState::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// No direction committed yet; nothing moved.
    Idle,
    Moved,
    /// The head landed on food; `score` is the new total.
    Ate { score: u32 },
    /// This tick ended the session.
    Collided(DeathReason),
    /// The session was already over.
    Finished,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: FoodSet,
    pub score: u32,
    pub tick_interval_ms: u64,
    /// Remaining powered-up ticks; zero when not powered up.
    pub power_up_ticks: u32,
    pub tick_count: u64,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    map: MapModel,
    config: GameConfig,
    rng: StdRng,
}

impl GameState {
    /// Sets up a session, seeding food placement from `config.seed` or entropy.
    pub fn new(config: GameConfig) -> Result<Self, SetupError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, SetupError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, SetupError> {
        config.validate()?;

        let map = MapModel::build(config.grid, config.topology);
        let start = map
            .find_safe_spot(config.safe_spot_origin, &HashSet::new())
            .ok_or(SetupError::NoTraversableCell {
                width: config.grid.width,
                height: config.grid.height,
            })?;

        let snake = Snake::new(start);
        let mut food = FoodSet::new();
        let _ = food.refill(
            &mut rng,
            &map,
            &snake,
            config.target_food_count(0),
            config.food_spawn_attempts,
        );

        Ok(Self {
            snake,
            food,
            score: 0,
            tick_interval_ms: config.tick_interval_ms(0),
            power_up_ticks: 0,
            tick_count: 0,
            status: GameStatus::Idle,
            death_reason: None,
            map,
            config,
            rng,
        })
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status == GameStatus::GameOver {
            return TickOutcome::Finished;
        }

        if let Some(exits) = self.map.exits(self.snake.head()) {
            self.snake.commit_direction(exits);
        }

        let Some(direction) = self.snake.direction() else {
            return TickOutcome::Idle;
        };

        if self.status == GameStatus::Idle {
            self.status = GameStatus::Running;
            debug!(?direction, head = ?self.snake.head(), "path started moving");
        }

        self.tick_count += 1;
        self.power_up_ticks = self.power_up_ticks.saturating_sub(1);

        let next_head = self.snake.head().step(direction);

        // The destination must accept entry from the side the path arrives on.
        let can_enter = self
            .map
            .exits(next_head)
            .is_some_and(|exits| exits.allows(direction.opposite()));
        if !can_enter {
            return self.end(DeathReason::Topology);
        }

        if self.snake.occupies(next_head) {
            return self.end(DeathReason::SelfCollision);
        }

        self.snake.push_head(next_head);

        if self.food.take(next_head) {
            self.consume_food();
            TickOutcome::Ate { score: self.score }
        } else {
            self.snake.drop_tail();
            TickOutcome::Moved
        }
    }

    /// Stores the latest player intent; it is applied on the next tick the
    /// map permits it.
    pub fn set_desired_direction(&mut self, direction: Direction) {
        if self.status != GameStatus::GameOver {
            self.snake.request_direction(direction);
        }
    }

    fn consume_food(&mut self) {
        self.score += 1;
        self.power_up_ticks = self.config.power_up_duration_ticks;

        let interval = self.config.tick_interval_ms(self.score);
        if interval != self.tick_interval_ms {
            debug!(
                score = self.score,
                from_ms = self.tick_interval_ms,
                to_ms = interval,
                "tick interval changed"
            );
            self.tick_interval_ms = interval;
        }

        let _ = self.food.refill(
            &mut self.rng,
            &self.map,
            &self.snake,
            self.config.target_food_count(self.score),
            self.config.food_spawn_attempts,
        );
    }

    fn end(&mut self, reason: DeathReason) -> TickOutcome {
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);
        info!(
            ?reason,
            score = self.score,
            length = self.snake.len(),
            ticks = self.tick_count,
            "game over"
        );
        TickOutcome::Collided(reason)
    }

    #[must_use]
    pub fn is_powered_up(&self) -> bool {
        self.power_up_ticks > 0
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.map.size()
    }

    #[must_use]
    pub fn map(&self) -> &MapModel {
        &self.map
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }
}
