#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy decision making for the turn that follows the player's.
//!
//! Each deployed enemy, in squad order, computes a fresh movement preview
//! that treats its own squad and the player squad as obstacles, then walks to
//! a cell drawn uniformly from the reachable destinations. Later enemies see
//! the new positions of earlier ones. An enemy with nowhere to go stays put.

use iso_tactics_core::{GridPosition, Level, Squad, UnitId};
use iso_tactics_system_movement::MovementPreview;
use rand::{seq::SliceRandom, Rng};

/// Outcome of a single enemy's move attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyMoveAttempt {
    /// Identifier of the enemy that acted.
    pub unit: UnitId,
    /// Cell occupied before the attempt.
    pub from: GridPosition,
    /// Destination chosen, or `None` when the enemy stayed in place.
    pub to: Option<GridPosition>,
}

/// Pure system that repositions the enemy squad.
#[derive(Clone, Copy, Debug)]
pub struct EnemyTurn {
    movement_range: u32,
}

impl EnemyTurn {
    /// Creates a system granting every enemy the provided step budget.
    #[must_use]
    pub const fn new(movement_range: u32) -> Self {
        Self { movement_range }
    }

    /// Moves every deployed enemy once and clears the enemy moved flags.
    ///
    /// Returns one attempt per deployed enemy in squad order.
    pub fn execute<R>(
        &self,
        level: &Level,
        enemies: &mut Squad,
        players: &Squad,
        rng: &mut R,
    ) -> Vec<EnemyMoveAttempt>
    where
        R: Rng + ?Sized,
    {
        let mut attempts = Vec::new();

        for index in 0..enemies.len() {
            let Some(enemy) = enemies.unit(index) else {
                continue;
            };
            let Some(from) = enemy.position() else {
                continue;
            };

            let destinations: Vec<GridPosition> = MovementPreview::calculate(
                level,
                enemy,
                enemies.units(),
                players.units(),
                self.movement_range,
            )
            .map(|preview| preview.destinations().collect())
            .unwrap_or_default();
            let to = destinations.choose(rng).copied();
            let unit = enemy.id().clone();

            if let (Some(destination), Some(enemy)) = (to, enemies.unit_mut(index)) {
                enemy.place_at(destination);
                enemy.set_moved_this_turn(true);
            }

            tracing::debug!(unit = %unit, ?from, ?to, "enemy move attempt");
            attempts.push(EnemyMoveAttempt { unit, from, to });
        }

        enemies.reset_moved_flags();
        attempts
    }
}
