//! Session lifecycle: setup, start on first direction, tick cadence, pause,
//! termination and reset.
//!
//! The session never owns a timer. Callers pass `now` in and the session
//! decides whether a tick is due, so tests can step time by hand.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{GameConfig, GridSize, Topology};
use crate::error::SetupError;
use crate::game::{GameState, TickOutcome};
use crate::grid::MapModel;
use crate::input::GameInput;
use crate::snapshot::Snapshot;

/// Play time that only advances while the session is running.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayClock {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl PlayClock {
    pub fn start(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn stop(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .running_since
                .map_or(Duration::ZERO, |since| now.saturating_duration_since(since))
    }
}

/// Owns one game session and decides when the engine ticks.
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    state: GameState,
    /// Time of the last tick; `None` while the cadence is stopped.
    last_tick: Option<Instant>,
    paused: bool,
    clock: PlayClock,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, SetupError> {
        let state = GameState::new(config.clone())?;
        info!(
            width = config.grid.width,
            height = config.grid.height,
            topology = config.topology.label(),
            "session set up"
        );

        Ok(Self {
            config,
            state,
            last_tick: None,
            paused: false,
            clock: PlayClock::default(),
        })
    }

    /// Rebuilds map and state for new dimensions or topology. Cancels any
    /// pending tick.
    pub fn reset(&mut self, grid: GridSize, topology: Topology) -> Result<(), SetupError> {
        let config = GameConfig {
            grid,
            topology,
            ..self.config.clone()
        };
        let state = GameState::new(config.clone())?;

        info!(
            width = grid.width,
            height = grid.height,
            topology = topology.label(),
            "session reset"
        );
        self.config = config;
        self.state = state;
        self.last_tick = None;
        self.paused = false;
        self.clock = PlayClock::default();
        Ok(())
    }

    /// Starts over with the current dimensions and topology.
    pub fn restart(&mut self) -> Result<(), SetupError> {
        self.reset(self.config.grid, self.config.topology)
    }

    /// Applies one input event. Quit is left to the caller.
    ///
    /// A resize rebuilds the session at the configured size; callers that
    /// fit the grid to the terminal call [`Session::reset`] instead.
    pub fn handle_input(&mut self, input: GameInput, now: Instant) -> Result<(), SetupError> {
        match input {
            GameInput::Direction(direction) => {
                if self.paused || self.state.is_over() {
                    return Ok(());
                }

                self.state.set_desired_direction(direction);
                if self.last_tick.is_none() {
                    info!(?direction, "session started");
                    self.last_tick = Some(now);
                    self.clock.start(now);
                }
            }
            GameInput::Pause => self.toggle_pause(now),
            GameInput::Confirm if self.state.is_over() => self.restart()?,
            GameInput::Restart | GameInput::Resize(..) => self.restart()?,
            GameInput::Confirm | GameInput::Quit => {}
        }

        Ok(())
    }

    fn toggle_pause(&mut self, now: Instant) {
        if self.last_tick.is_none() || self.state.is_over() {
            return;
        }

        self.paused = !self.paused;
        if self.paused {
            self.clock.stop(now);
        } else {
            // Resume with a full interval before the next move.
            self.last_tick = Some(now);
            self.clock.start(now);
        }
        debug!(paused = self.paused, "pause toggled");
    }

    /// Runs one engine tick when the current interval has elapsed since the
    /// previous one.
    pub fn tick_if_due(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.paused {
            return None;
        }

        let last_tick = self.last_tick?;
        if now.saturating_duration_since(last_tick) < self.tick_interval() {
            return None;
        }

        let outcome = self.state.tick();
        self.last_tick = Some(now);

        if self.state.is_over() {
            self.last_tick = None;
            self.clock.stop(now);
        }

        Some(outcome)
    }

    /// Interval the host should wait between ticks at the current score.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.tick_interval_ms)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Per-tick view for renderers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn map(&self) -> &MapModel {
        self.state.map()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True while ticks are being scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.clock.elapsed(now)
    }
}
