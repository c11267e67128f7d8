use crate::config::FRENZY_SCORE;
use crate::game::{DeathReason, GameState, GameStatus};
use crate::input::Direction;
use crate::snake::Position;

/// Read-only copy of everything a renderer needs after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Head first.
    pub path: Vec<Position>,
    pub food: Vec<Position>,
    pub score: u32,
    pub tick_interval_ms: u64,
    pub is_powered_up: bool,
    /// Remaining powered-up ticks.
    pub power_up_ticks: u32,
    pub is_over: bool,
    pub status: GameStatus,
    pub current_direction: Option<Direction>,
    pub death_reason: Option<DeathReason>,
}

impl Snapshot {
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.path.first().copied()
    }

    /// Cosmetic high-score state.
    #[must_use]
    pub fn is_frenzy(&self) -> bool {
        self.score >= FRENZY_SCORE
    }

    /// Returns true before the first committed move.
    #[must_use]
    pub fn is_start_screen(&self) -> bool {
        self.status == GameStatus::Idle
    }
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Self {
            path: state.snake.segments().copied().collect(),
            food: state.food.iter().copied().collect(),
            score: state.score,
            tick_interval_ms: state.tick_interval_ms,
            is_powered_up: state.is_powered_up(),
            power_up_ticks: state.power_up_ticks,
            is_over: state.is_over(),
            status: state.status,
            current_direction: state.snake.direction(),
            death_reason: state.death_reason,
        }
    }
}
