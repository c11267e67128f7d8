//! Static per-cell traversability for one session.
//!
//! Each cell records the directions the path may leave it by. A cell with no
//! exits is a wall. The map is built once per session and never mutated.

use std::collections::HashSet;

use crate::config::{GridSize, Topology};
use crate::input::Direction;
use crate::snake::Position;

/// Directions the path may leave a cell by.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct ExitFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ExitFlags {
    pub const CLOSED: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub const OPEN: Self = Self {
        up: true,
        down: true,
        left: true,
        right: true,
    };

    #[must_use]
    pub fn allows(self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// A cell with at least one exit can hold the path.
    #[must_use]
    pub fn is_traversable(self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Immutable grid of [`ExitFlags`], stored row-major.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MapModel {
    size: GridSize,
    topology: Topology,
    cells: Vec<ExitFlags>,
}

impl MapModel {
    /// Builds the map for `size` under `topology`. Deterministic.
    #[must_use]
    pub fn build(size: GridSize, topology: Topology) -> Self {
        let mut cells = Vec::with_capacity(size.total_cells());

        for y in 0..i32::from(size.height) {
            for x in 0..i32::from(size.width) {
                let position = Position { x, y };
                let exits = match topology {
                    Topology::Open => open_exits(size, position),
                    Topology::Rail => rail_exits(size, position),
                };
                cells.push(exits);
            }
        }

        Self {
            size,
            topology,
            cells,
        }
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Exit flags of `position`, or `None` when it lies outside the grid.
    #[must_use]
    pub fn exits(&self, position: Position) -> Option<ExitFlags> {
        self.index_of(position).map(|index| self.cells[index])
    }

    #[must_use]
    pub fn is_traversable(&self, position: Position) -> bool {
        self.exits(position).is_some_and(ExitFlags::is_traversable)
    }

    /// Iterates over traversable cells in row-major order.
    pub fn traversable_cells(&self) -> impl Iterator<Item = Position> + '_ {
        let width = usize::from(self.size.width);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, exits)| exits.is_traversable())
            .map(move |(index, _)| position_at(index, width))
    }

    /// Counts traversable cells.
    #[must_use]
    pub fn traversable_count(&self) -> usize {
        self.cells.iter().filter(|exits| exits.is_traversable()).count()
    }

    /// Returns the first traversable cell not in `excluding`, scanning in
    /// row-major order from `origin` and wrapping past the last cell.
    ///
    /// `None` means every traversable cell is excluded. An origin outside the
    /// grid starts the scan at the first cell.
    #[must_use]
    pub fn find_safe_spot(
        &self,
        origin: Position,
        excluding: &HashSet<Position>,
    ) -> Option<Position> {
        let total = self.cells.len();
        let width = usize::from(self.size.width);
        let start = self.index_of(origin).unwrap_or(0);

        (0..total)
            .map(|offset| (start + offset) % total)
            .filter(|&index| self.cells[index].is_traversable())
            .map(|index| position_at(index, width))
            .find(|position| !excluding.contains(position))
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        if !self.size.contains(position) {
            return None;
        }

        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        Some(y * usize::from(self.size.width) + x)
    }
}

fn position_at(index: usize, width: usize) -> Position {
    // Grid sides are u16, so both coordinates fit in i32.
    Position {
        x: (index % width) as i32,
        y: (index / width) as i32,
    }
}

fn is_border(size: GridSize, position: Position) -> bool {
    position.x == 0
        || position.y == 0
        || position.x == i32::from(size.width) - 1
        || position.y == i32::from(size.height) - 1
}

fn open_exits(size: GridSize, position: Position) -> ExitFlags {
    if is_border(size, position) {
        ExitFlags::CLOSED
    } else {
        ExitFlags::OPEN
    }
}

/// Rails run along every column and row whose index is `1 mod 3`.
fn is_rail(position: Position) -> bool {
    (position.x - 1).rem_euclid(3) == 0 || (position.y - 1).rem_euclid(3) == 0
}

fn rail_exits(size: GridSize, position: Position) -> ExitFlags {
    if !is_rail(position) || is_border(size, position) {
        return ExitFlags::CLOSED;
    }

    // An exit needs an in-bounds rail neighbour that is not on the border ring.
    let opens = |direction: Direction| {
        let neighbour = position.step(direction);
        size.contains(neighbour) && !is_border(size, neighbour) && is_rail(neighbour)
    };

    ExitFlags {
        up: opens(Direction::Up),
        down: opens(Direction::Down),
        left: opens(Direction::Left),
        right: opens(Direction::Right),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::{GridSize, Topology};
    use crate::input::Direction;
    use crate::snake::Position;

    use super::{ExitFlags, MapModel};

    fn size(width: u16, height: u16) -> GridSize {
        GridSize { width, height }
    }

    #[test]
    fn open_map_closes_border_and_opens_interior() {
        let map = MapModel::build(size(6, 5), Topology::Open);

        assert_eq!(map.exits(Position::new(0, 2)), Some(ExitFlags::CLOSED));
        assert_eq!(map.exits(Position::new(5, 2)), Some(ExitFlags::CLOSED));
        assert_eq!(map.exits(Position::new(3, 0)), Some(ExitFlags::CLOSED));
        assert_eq!(map.exits(Position::new(3, 4)), Some(ExitFlags::CLOSED));
        assert_eq!(map.exits(Position::new(1, 1)), Some(ExitFlags::OPEN));
        assert_eq!(map.exits(Position::new(4, 3)), Some(ExitFlags::OPEN));
        assert_eq!(map.traversable_count(), 4 * 3);
    }

    #[test]
    fn out_of_bounds_has_no_exits() {
        let map = MapModel::build(size(6, 5), Topology::Open);

        assert_eq!(map.exits(Position::new(-1, 2)), None);
        assert_eq!(map.exits(Position::new(6, 2)), None);
        assert_eq!(map.exits(Position::new(2, 5)), None);
        assert!(!map.is_traversable(Position::new(2, -1)));
    }

    #[test]
    fn rail_map_has_corridors_and_junctions() {
        let map = MapModel::build(size(10, 10), Topology::Rail);

        // Junction of column rail 1 and row rail 4.
        assert_eq!(map.exits(Position::new(1, 4)), Some(ExitFlags {
            up: true,
            down: true,
            left: false,
            right: true,
        }));

        // Row corridor between column rails.
        assert_eq!(map.exits(Position::new(2, 4)), Some(ExitFlags {
            up: false,
            down: false,
            left: true,
            right: true,
        }));

        // Column corridor between row rails.
        assert_eq!(map.exits(Position::new(4, 5)), Some(ExitFlags {
            up: true,
            down: true,
            left: false,
            right: false,
        }));

        // Gap between rails.
        assert_eq!(map.exits(Position::new(2, 2)), Some(ExitFlags::CLOSED));
    }

    #[test]
    fn rail_exits_never_point_into_border_ring() {
        let map = MapModel::build(size(10, 10), Topology::Rail);

        // (1, 1) is a rail cell next to the border on two sides.
        let corner = map.exits(Position::new(1, 1)).expect("in bounds");
        assert!(!corner.up);
        assert!(!corner.left);
        assert!(corner.down);
        assert!(corner.right);

        // Column 7 is a rail; the border row below it stays closed.
        let bottom = map.exits(Position::new(7, 8)).expect("in bounds");
        assert!(!bottom.down);
        assert_eq!(map.exits(Position::new(7, 9)), Some(ExitFlags::CLOSED));
    }

    #[test]
    fn rail_exits_are_symmetric_between_neighbours() {
        let map = MapModel::build(size(13, 11), Topology::Rail);

        for position in map.traversable_cells() {
            let exits = map.exits(position).expect("traversable cell is in bounds");
            for direction in Direction::ALL {
                if exits.allows(direction) {
                    let neighbour = map
                        .exits(position.step(direction))
                        .expect("exit leads to an in-bounds cell");
                    assert!(
                        neighbour.allows(direction.opposite()),
                        "{position:?} -> {direction:?} is one-way"
                    );
                }
            }
        }
    }

    #[test]
    fn build_is_deterministic() {
        let first = MapModel::build(size(20, 17), Topology::Rail);
        let second = MapModel::build(size(20, 17), Topology::Rail);

        assert_eq!(first, second);
    }

    #[test]
    fn safe_spot_scans_row_major_from_origin() {
        let map = MapModel::build(size(10, 10), Topology::Rail);
        let none = HashSet::new();

        assert_eq!(
            map.find_safe_spot(Position::new(1, 1), &none),
            Some(Position::new(1, 1))
        );

        let excluded = HashSet::from([Position::new(1, 1)]);
        assert_eq!(
            map.find_safe_spot(Position::new(1, 1), &excluded),
            Some(Position::new(2, 1))
        );

        assert_eq!(
            map.find_safe_spot(Position::new(2, 2), &none),
            Some(Position::new(4, 2))
        );
    }

    #[test]
    fn safe_spot_continues_on_later_rows_from_column_zero() {
        // 5x5 rail map: traversable cells are (1,1), (2,1), (3,1), (1,2), (1,3).
        let map = MapModel::build(size(5, 5), Topology::Rail);
        let none = HashSet::new();

        assert_eq!(map.traversable_count(), 5);
        assert_eq!(
            map.find_safe_spot(Position::new(2, 2), &none),
            Some(Position::new(1, 3))
        );
    }

    #[test]
    fn safe_spot_wraps_to_cells_before_origin() {
        let map = MapModel::build(size(5, 5), Topology::Rail);

        assert_eq!(
            map.find_safe_spot(Position::new(3, 3), &HashSet::new()),
            Some(Position::new(1, 1))
        );

        let excluded: HashSet<_> = map
            .traversable_cells()
            .filter(|position| *position != Position::new(3, 1))
            .collect();
        assert_eq!(
            map.find_safe_spot(Position::new(1, 3), &excluded),
            Some(Position::new(3, 1))
        );

        let everything: HashSet<_> = map.traversable_cells().collect();
        assert_eq!(map.find_safe_spot(Position::new(1, 3), &everything), None);
    }

    #[test]
    fn safe_spot_is_none_without_traversable_cells() {
        let map = MapModel::build(size(3, 3), Topology::Rail);
        let excluded = HashSet::from([Position::new(1, 1)]);

        assert_eq!(map.traversable_count(), 0);
        assert_eq!(map.find_safe_spot(Position::new(0, 0), &excluded), None);
        assert_eq!(map.find_safe_spot(Position::new(0, 0), &HashSet::new()), None);
    }
}
