#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Iso Tactics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative battle world, and pure systems. Adapters decode raw input into
//! [`Command`] values, the world executes those commands via its `apply` entry
//! point, and then reports [`Event`] values describing what changed or why a
//! request was refused. Systems borrow immutable snapshots such as [`Level`]
//! and [`Squad`] and respond with freshly computed values.

mod level;
mod settings;
mod unit;
pub mod weapons;

use serde::{Deserialize, Serialize};

pub use level::{IsoProjection, Level, LevelError, PixelPoint, TileColor, TileType};
pub use settings::LevelSettings;
pub use unit::{Faction, Squad, SquadError, Unit, UnitId};
pub use weapons::WeaponId;

/// Number of units in the player squad when the spawn zone has room for all of them.
pub const PLAYER_SQUAD_SIZE: usize = 4;

/// Number of units in the enemy squad when the spawn zone has room for all of them.
pub const ENEMY_SQUAD_SIZE: usize = 4;

/// Movement budget, in orthogonal steps, granted to every unit each turn.
pub const MOVEMENT_RANGE: u32 = 4;

/// Commands that express all permissible battle mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Moves the board cursor one cell in the provided direction.
    MoveCursor {
        /// Direction of travel for the cursor.
        direction: Direction,
    },
    /// Confirms the action implied by the current phase and cursor position.
    Confirm,
    /// Cycles the active selection through units that can still act.
    CycleUnit {
        /// Direction of the cycle through the squad order.
        step: CycleStep,
    },
    /// Restarts the battle, optionally generating a fresh level first.
    Reset {
        /// Whether a new level should be generated before the battle restarts.
        regenerate: bool,
    },
    /// Replaces the level settings and regenerates the battle with them.
    ApplySettings {
        /// Settings used for the regenerated level.
        settings: LevelSettings,
    },
    /// Locks or unlocks the current seed without touching the battle.
    LockSeed {
        /// Whether regeneration must reuse the current seed.
        locked: bool,
    },
    /// Equips a catalog weapon on a player unit.
    EquipWeapon {
        /// Identifier of the unit receiving the weapon.
        unit: UnitId,
        /// Identifier of the catalog weapon to equip.
        weapon: WeaponId,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new level replaced the previous one.
    LevelGenerated {
        /// Seed that produced the level.
        seed: u64,
        /// Number of columns in the generated level.
        columns: u32,
        /// Number of rows in the generated level.
        rows: u32,
    },
    /// Announces that fresh squads were created and deployment began.
    PlacementStarted {
        /// Number of player units awaiting deployment.
        squad_size: usize,
    },
    /// Confirms that the cursor moved between two cells.
    CursorMoved {
        /// Cell highlighted before the move.
        from: GridPosition,
        /// Cell highlighted after the move.
        to: GridPosition,
    },
    /// Confirms that the deployment briefing was acknowledged.
    BriefingDismissed,
    /// Confirms that a player unit was deployed onto a spawn tile.
    UnitPlaced {
        /// Identifier of the deployed unit.
        unit: UnitId,
        /// Spawn tile now occupied by the unit.
        cell: GridPosition,
        /// Number of units still awaiting deployment.
        remaining: usize,
    },
    /// Reports that a deployment attempt was refused.
    PlacementRejected {
        /// Cell the deployment targeted.
        cell: GridPosition,
        /// Specific reason the deployment failed.
        reason: PlacementRejection,
    },
    /// Announces that the battle entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: BattlePhase,
    },
    /// Confirms that a player unit became the active selection.
    UnitSelected {
        /// Identifier of the selected unit.
        unit: UnitId,
        /// Cell occupied by the selected unit.
        cell: GridPosition,
    },
    /// Reports that a selection request was refused.
    SelectionRejected {
        /// Cursor cell at the time of the request.
        cell: GridPosition,
        /// Specific reason the selection failed.
        reason: SelectionRejection,
    },
    /// Confirms that the selected player unit moved.
    UnitMoved {
        /// Identifier of the unit that moved.
        unit: UnitId,
        /// Cell occupied before the move.
        from: GridPosition,
        /// Cell occupied after the move.
        to: GridPosition,
    },
    /// Reports that the requested destination lies outside the movement preview.
    MoveRejected {
        /// Identifier of the selected unit.
        unit: UnitId,
        /// Destination that could not be reached.
        target: GridPosition,
    },
    /// Confirms that an enemy unit repositioned during the enemy turn.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        unit: UnitId,
        /// Cell occupied before the move.
        from: GridPosition,
        /// Cell occupied after the move.
        to: GridPosition,
    },
    /// Reports that an enemy unit had no reachable destination and stayed put.
    EnemyHeld {
        /// Identifier of the enemy that stayed in place.
        unit: UnitId,
        /// Cell the enemy continues to occupy.
        cell: GridPosition,
    },
    /// Announces that every player unit may act again.
    TurnAdvanced {
        /// One-based index of the turn that just began.
        turn: u32,
    },
    /// Confirms that the seed lock changed.
    SeedLockChanged {
        /// Seed the lock applies to.
        seed: u64,
        /// Whether regeneration now reuses the seed.
        locked: bool,
    },
    /// Confirms that a unit equipped a new weapon.
    WeaponEquipped {
        /// Identifier of the unit that changed loadout.
        unit: UnitId,
        /// Identifier of the weapon now equipped.
        weapon: WeaponId,
    },
    /// Reports that an equip request was refused.
    EquipRejected {
        /// Identifier of the unit named by the request.
        unit: UnitId,
        /// Identifier of the weapon named by the request.
        weapon: WeaponId,
        /// Specific reason the request failed.
        reason: EquipRejection,
    },
}

/// Phase of the battle flow exposed to adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    /// The player deploys squad members onto spawn tiles.
    Placement,
    /// Units take turns moving across the board.
    Active,
}

/// Direction used when cycling the active selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CycleStep {
    /// Advances to the next unit in squad order.
    Forward,
    /// Retreats to the previous unit in squad order.
    Backward,
}

impl CycleStep {
    /// Signed index offset applied for each step of the cycle.
    #[must_use]
    pub const fn delta(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Outcome of a single deployment attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementResult {
    /// Nothing changed because the attempt was not allowed.
    Invalid(PlacementRejection),
    /// A unit was deployed and more units remain.
    Placed,
    /// The final unit of the squad was deployed.
    Completed,
}

/// Reasons a deployment attempt may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementRejection {
    /// The cursor is not on a player spawn tile, or no spawn tiles exist.
    NotSpawnTile,
    /// Another squad member already occupies the tile.
    Occupied,
    /// Every squad member has already been deployed.
    SquadDeployed,
}

/// Reasons a selection request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionRejection {
    /// The unit under the cursor already moved this turn.
    AlreadyMoved,
    /// No deployed friendly unit occupies the cursor cell.
    NoFriendlyUnit,
    /// No deployed unit is left to act this turn.
    NoUnitAvailable,
}

/// Reasons an equip request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipRejection {
    /// No player unit carries the requested identifier.
    UnknownUnit,
    /// The weapon catalog has no entry with the requested identifier.
    UnknownWeapon,
}

/// Cardinal movement directions on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// Every direction in the fixed order used for traversal.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Column and row offsets produced by a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }
}

/// Location of a single board cell expressed as column and row coordinates.
///
/// Coordinates are signed so neighbour arithmetic at the board edge never
/// wraps; cells outside the level simply read as walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    row: i32,
    column: i32,
}

impl GridPosition {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Cell reached by taking a single step in the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            row: self.row.saturating_add(dy),
            column: self.column.saturating_add(dx),
        }
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: GridPosition) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

#[cfg(test)]
mod tests {
    use super::{BattlePhase, CycleStep, Direction, Faction, GridPosition};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = GridPosition::new(1, 1);
        let destination = GridPosition::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn offset_follows_direction_deltas() {
        let origin = GridPosition::new(3, 3);
        assert_eq!(origin.offset(Direction::North), GridPosition::new(3, 2));
        assert_eq!(origin.offset(Direction::South), GridPosition::new(3, 4));
        assert_eq!(origin.offset(Direction::West), GridPosition::new(2, 3));
        assert_eq!(origin.offset(Direction::East), GridPosition::new(4, 3));
    }

    #[test]
    fn offset_can_leave_the_board_without_wrapping() {
        let corner = GridPosition::new(0, 0);
        assert_eq!(corner.offset(Direction::West), GridPosition::new(-1, 0));
        assert_eq!(corner.offset(Direction::North), GridPosition::new(0, -1));
    }

    #[test]
    fn positions_order_row_major() {
        let mut cells = vec![
            GridPosition::new(2, 1),
            GridPosition::new(0, 2),
            GridPosition::new(1, 1),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                GridPosition::new(1, 1),
                GridPosition::new(2, 1),
                GridPosition::new(0, 2),
            ]
        );
    }

    #[test]
    fn cycle_step_deltas_are_opposite() {
        assert_eq!(CycleStep::Forward.delta(), -CycleStep::Backward.delta());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn board_values_round_trip_through_bincode() {
        assert_round_trip(&GridPosition::new(-1, 7));
        assert_round_trip(&Faction::Enemy);
        assert_round_trip(&BattlePhase::Active);
    }
}
