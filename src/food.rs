use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::grid::MapModel;
use crate::snake::{Position, Snake};

/// Picks a uniformly random traversable cell that is not in `occupied`.
///
/// Returns `None` when every traversable cell is taken.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    map: &MapModel,
    occupied: &HashSet<Position>,
) -> Option<Position> {
    let candidates: Vec<Position> = map
        .traversable_cells()
        .filter(|position| !occupied.contains(position))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Food items currently on the board, in spawn order, without duplicates.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FoodSet {
    items: Vec<Position>,
}

impl FoodSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from explicit positions, dropping repeats.
    #[must_use]
    pub fn from_positions<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        let mut set = Self::new();
        for position in positions {
            set.insert(position);
        }
        set
    }

    /// Adds `position`; returns false when it was already present.
    pub fn insert(&mut self, position: Position) -> bool {
        if self.contains(position) {
            return false;
        }
        self.items.push(position);
        true
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.items.contains(&position)
    }

    /// Removes the item at `position`; returns whether one was there.
    pub fn take(&mut self, position: Position) -> bool {
        let Some(index) = self.items.iter().position(|item| *item == position) else {
            return false;
        };
        let _ = self.items.remove(index);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.items.iter()
    }

    /// Spawns food until `target` items are on the board, `attempts` spawns
    /// have been tried, or no free cell is left. Returns how many were added.
    ///
    /// Falling short of `target` is not an error; the next refill tries again.
    pub fn refill<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        map: &MapModel,
        snake: &Snake,
        target: usize,
        attempts: u32,
    ) -> usize {
        let mut occupied: HashSet<Position> = snake.segments().copied().collect();
        occupied.extend(self.items.iter().copied());

        let mut added = 0;
        for _ in 0..attempts {
            if self.items.len() >= target {
                break;
            }

            let Some(position) = spawn_position(rng, map, &occupied) else {
                debug!(
                    food = self.items.len(),
                    target, "no free cell left for food"
                );
                break;
            };

            let _ = occupied.insert(position);
            self.items.push(position);
            added += 1;
        }

        added
    }
}
