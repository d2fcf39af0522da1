#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bounded breadth-first reachability used to preview unit movement.
//!
//! A preview answers "where can this unit go this turn": every cell reachable
//! from the unit's position in at most `max_distance` orthogonal steps without
//! entering walls, leaving the board, or passing through another unit. The
//! unit's own cell is always included at distance zero. Previews are computed
//! from scratch whenever the board changes and are never patched.

use std::collections::{BTreeMap, HashSet, VecDeque};

use iso_tactics_core::{Direction, GridPosition, Level, Unit};

/// Reachable cells and their step distances for a single unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovementPreview {
    origin: GridPosition,
    max_distance: u32,
    distances: BTreeMap<GridPosition, u32>,
}

impl MovementPreview {
    /// Computes the preview for `selected`.
    ///
    /// Units in `friendlies` other than `selected` (matched by id) and every
    /// deployed unit in `enemies` block movement. Returns `None` when the
    /// selected unit is not deployed or the budget is zero.
    #[must_use]
    pub fn calculate(
        level: &Level,
        selected: &Unit,
        friendlies: &[Unit],
        enemies: &[Unit],
        max_distance: u32,
    ) -> Option<Self> {
        let origin = selected.position()?;
        if max_distance == 0 {
            return None;
        }

        let occupied: HashSet<GridPosition> = friendlies
            .iter()
            .filter(|unit| unit.id() != selected.id())
            .chain(enemies)
            .filter_map(Unit::position)
            .collect();

        let mut distances = BTreeMap::new();
        let _ = distances.insert(origin, 0);
        let mut queue = VecDeque::from([(origin, 0_u32)]);

        while let Some((cell, distance)) = queue.pop_front() {
            if distance >= max_distance {
                continue;
            }

            let next_distance = distance + 1;
            for direction in Direction::ALL {
                let neighbor = cell.offset(direction);
                if !level.is_walkable(neighbor)
                    || occupied.contains(&neighbor)
                    || distances.contains_key(&neighbor)
                {
                    continue;
                }

                let _ = distances.insert(neighbor, next_distance);
                queue.push_back((neighbor, next_distance));
            }
        }

        Some(Self {
            origin,
            max_distance,
            distances,
        })
    }

    /// Cell the preview was computed from.
    #[must_use]
    pub const fn origin(&self) -> GridPosition {
        self.origin
    }

    /// Step budget used for the computation.
    #[must_use]
    pub const fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Reports whether the cell can be reached this turn.
    #[must_use]
    pub fn is_reachable(&self, position: GridPosition) -> bool {
        self.distances.contains_key(&position)
    }

    /// Number of steps needed to reach the cell, if it is reachable.
    #[must_use]
    pub fn distance_to(&self, position: GridPosition) -> Option<u32> {
        self.distances.get(&position).copied()
    }

    /// Every reachable cell, including the origin, in row-major order.
    pub fn reachable_tiles(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.distances.keys().copied()
    }

    /// Reachable cells other than the origin, in row-major order.
    pub fn destinations(&self) -> impl Iterator<Item = GridPosition> + '_ {
        let origin = self.origin;
        self.reachable_tiles().filter(move |cell| *cell != origin)
    }

    /// Reachable cells paired with their distances, in row-major order.
    pub fn distances(&self) -> impl Iterator<Item = (GridPosition, u32)> + '_ {
        self.distances
            .iter()
            .map(|(cell, distance)| (*cell, *distance))
    }

    /// Number of reachable cells, including the origin.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Always `false`: the origin is part of every preview.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}
