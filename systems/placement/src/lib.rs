#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deployment rules for putting the player squad onto its spawn tiles.

use std::collections::HashSet;

use iso_tactics_core::{GridPosition, PlacementRejection, PlacementResult, Squad};

/// Validates and performs deployments during the placement phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementController {
    spawn_tiles: HashSet<GridPosition>,
    squad_size: usize,
    placed_units: usize,
}

impl PlacementController {
    /// Creates a controller accepting deployments onto the provided tiles.
    #[must_use]
    pub fn new(spawn_tiles: &[GridPosition], squad_size: usize) -> Self {
        Self {
            spawn_tiles: spawn_tiles.iter().copied().collect(),
            squad_size,
            placed_units: 0,
        }
    }

    /// Deploys the squad's next waiting unit onto the cursor cell.
    ///
    /// Binding that unit's position is the only side effect; a rejected
    /// attempt changes nothing.
    pub fn attempt_placement(&mut self, cursor: GridPosition, squad: &mut Squad) -> PlacementResult {
        if let Err(reason) = self.validate(cursor, squad) {
            return PlacementResult::Invalid(reason);
        }

        let Some(unit) = squad.next_unplaced_unit_mut() else {
            return PlacementResult::Invalid(PlacementRejection::SquadDeployed);
        };
        unit.place_at(cursor);
        self.placed_units += 1;

        if self.placed_units >= self.squad_size || squad.all_units_placed() {
            PlacementResult::Completed
        } else {
            PlacementResult::Placed
        }
    }

    /// Checks whether a deployment onto the cursor cell would be accepted.
    pub fn validate(&self, cursor: GridPosition, squad: &Squad) -> Result<(), PlacementRejection> {
        if !self.is_spawn_tile(cursor) {
            return Err(PlacementRejection::NotSpawnTile);
        }
        if squad.index_at(cursor).is_some() {
            return Err(PlacementRejection::Occupied);
        }
        if squad.next_unplaced_unit().is_none() {
            return Err(PlacementRejection::SquadDeployed);
        }
        Ok(())
    }

    /// Reports whether the cell accepts deployments.
    #[must_use]
    pub fn is_spawn_tile(&self, position: GridPosition) -> bool {
        self.spawn_tiles.contains(&position)
    }

    /// Number of units still waiting for deployment.
    #[must_use]
    pub fn remaining_units(&self) -> usize {
        self.squad_size.saturating_sub(self.placed_units)
    }

    /// Reports whether the whole squad has been deployed.
    #[must_use]
    pub fn all_units_placed(&self) -> bool {
        self.remaining_units() == 0
    }
}
