use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::ExitFlags;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one cell towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The moving path: head-first segments plus committed and desired headings.
///
/// `direction` is `None` until the first accepted input; the path does not
/// move while it stays `None`.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Option<Direction>,
    desired_direction: Option<Direction>,
}

impl Snake {
    /// Creates a stationary one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Position) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self {
            body,
            direction: None,
            desired_direction: None,
        }
    }

    /// Creates a one-cell snake already heading `direction`.
    #[must_use]
    pub fn moving(start: Position, direction: Direction) -> Self {
        Self::from_segments(vec![start], direction)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            direction: Some(direction),
            desired_direction: None,
        }
    }

    /// Stores the latest player intent, overwriting any unconsumed one.
    pub fn request_direction(&mut self, direction: Direction) {
        self.desired_direction = Some(direction);
    }

    /// Commits the desired direction when the head cell lets the path leave
    /// that way and it does not reverse the current heading.
    ///
    /// An intent that is not legal yet stays stored and is re-evaluated on
    /// the next call.
    pub fn commit_direction(&mut self, head_exits: ExitFlags) {
        let Some(desired) = self.desired_direction else {
            return;
        };

        if head_exits.allows(desired) && direction_change_is_valid(self.direction, desired) {
            self.direction = Some(desired);
        }
    }

    /// Returns where the head would land this tick, if the snake is moving.
    #[must_use]
    pub fn next_head_position(&self) -> Option<Position> {
        self.direction.map(|direction| self.head().step(direction))
    }

    /// Puts a new head in front of the current one.
    pub fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    /// Drops the last segment, keeping at least the head.
    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when the body has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the committed movement direction.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Returns the latest stored player intent.
    #[must_use]
    pub fn desired_direction(&self) -> Option<Direction> {
        self.desired_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
