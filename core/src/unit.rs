//! Units, squads, and the faction invariant that binds them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{weapons, GridPosition, WeaponId};

const DEFAULT_MAX_HP: u32 = 30;
const DEFAULT_MAX_SP: u32 = 10;

/// Side a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Units controlled by the player.
    Player,
    /// Units controlled by the enemy turn.
    Enemy,
}

impl Faction {
    /// Prefix used when generating unit identifiers.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
        }
    }
}

/// Stable identifier assigned to a unit, such as `player-1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(String);

impl UnitId {
    /// Creates a unit identifier from its textual form.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Identifier of the `ordinal`-th (one-based) member of a faction's squad.
    #[must_use]
    pub fn for_member(faction: Faction, ordinal: usize) -> Self {
        Self(format!("{}-{ordinal}", faction.id_prefix()))
    }

    /// Textual form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single combatant on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    faction: Faction,
    position: Option<GridPosition>,
    moved_this_turn: bool,
    max_hp: u32,
    hp: u32,
    max_sp: u32,
    sp: u32,
    weapon: WeaponId,
}

impl Unit {
    /// Creates an undeployed unit with default pools and its faction's weapon.
    #[must_use]
    pub fn new(id: UnitId, faction: Faction) -> Self {
        Self::with_stats(id, faction, DEFAULT_MAX_HP, DEFAULT_MAX_SP)
    }

    /// Creates an undeployed unit with explicit pool sizes.
    ///
    /// Health is raised to at least one point.
    #[must_use]
    pub fn with_stats(id: UnitId, faction: Faction, max_hp: u32, max_sp: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            id,
            faction,
            position: None,
            moved_this_turn: false,
            max_hp,
            hp: max_hp,
            max_sp,
            sp: max_sp,
            weapon: weapons::default_for(faction).weapon_id(),
        }
    }

    /// Identifier of the unit.
    #[must_use]
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Side the unit fights for.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Cell occupied by the unit, if deployed.
    #[must_use]
    pub const fn position(&self) -> Option<GridPosition> {
        self.position
    }

    /// Reports whether the unit is on the board.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    /// Moves the unit onto the provided cell.
    pub fn place_at(&mut self, position: GridPosition) {
        self.position = Some(position);
    }

    /// Removes the unit from the board.
    pub fn clear_placement(&mut self) {
        self.position = None;
    }

    /// Reports whether the unit already moved during the current turn.
    #[must_use]
    pub const fn has_moved_this_turn(&self) -> bool {
        self.moved_this_turn
    }

    /// Records whether the unit moved during the current turn.
    pub fn set_moved_this_turn(&mut self, moved: bool) {
        self.moved_this_turn = moved;
    }

    /// Maximum health pool.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Current health.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Maximum skill pool.
    #[must_use]
    pub const fn max_sp(&self) -> u32 {
        self.max_sp
    }

    /// Current skill points.
    #[must_use]
    pub const fn sp(&self) -> u32 {
        self.sp
    }

    /// Identifier of the equipped catalog weapon.
    #[must_use]
    pub fn weapon(&self) -> &WeaponId {
        &self.weapon
    }

    /// Replaces the equipped weapon.
    pub fn equip(&mut self, weapon: WeaponId) {
        self.weapon = weapon;
    }

    /// Human-readable name, turning `player-1` into `Player 1`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.id
            .as_str()
            .split('-')
            .filter(|part| !part.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Errors raised when assembling a squad.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SquadError {
    /// A unit belongs to a different faction than the squad.
    #[error("unit {unit} fights for {actual:?} but the squad is {expected:?}")]
    FactionMismatch {
        /// Identifier of the offending unit.
        unit: UnitId,
        /// Faction of the squad.
        expected: Faction,
        /// Faction of the offending unit.
        actual: Faction,
    },
}

/// Fixed-size ordered group of units sharing one faction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Squad {
    faction: Faction,
    units: Vec<Unit>,
}

impl Squad {
    /// Creates a squad of `count` undeployed units named `<faction>-1..=count`.
    #[must_use]
    pub fn create(faction: Faction, count: usize) -> Self {
        Self {
            faction,
            units: (1..=count)
                .map(|ordinal| Unit::new(UnitId::for_member(faction, ordinal), faction))
                .collect(),
        }
    }

    /// Wraps existing units, rejecting any unit of another faction.
    pub fn new(faction: Faction, units: Vec<Unit>) -> Result<Self, SquadError> {
        if let Some(stranger) = units.iter().find(|unit| unit.faction() != faction) {
            return Err(SquadError::FactionMismatch {
                unit: stranger.id().clone(),
                expected: faction,
                actual: stranger.faction(),
            });
        }
        Ok(Self { faction, units })
    }

    /// Side every member fights for.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Members in squad order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Reports whether the squad has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Member at the provided index.
    #[must_use]
    pub fn unit(&self, index: usize) -> Option<&Unit> {
        self.units.get(index)
    }

    /// Mutable access to the member at the provided index.
    pub fn unit_mut(&mut self, index: usize) -> Option<&mut Unit> {
        self.units.get_mut(index)
    }

    /// Index of the member carrying the provided identifier.
    #[must_use]
    pub fn index_of(&self, id: &UnitId) -> Option<usize> {
        self.units.iter().position(|unit| unit.id() == id)
    }

    /// Index of the deployed member standing on the provided cell.
    #[must_use]
    pub fn index_at(&self, position: GridPosition) -> Option<usize> {
        self.units
            .iter()
            .position(|unit| unit.position() == Some(position))
    }

    /// First member still waiting for deployment.
    #[must_use]
    pub fn next_unplaced_unit(&self) -> Option<&Unit> {
        self.units.iter().find(|unit| !unit.is_placed())
    }

    /// Mutable access to the first member still waiting for deployment.
    pub fn next_unplaced_unit_mut(&mut self) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| !unit.is_placed())
    }

    /// Reports whether every member is on the board.
    #[must_use]
    pub fn all_units_placed(&self) -> bool {
        self.units.iter().all(Unit::is_placed)
    }

    /// Reports whether every deployed member has moved this turn.
    #[must_use]
    pub fn all_placed_units_moved(&self) -> bool {
        self.units
            .iter()
            .filter(|unit| unit.is_placed())
            .all(Unit::has_moved_this_turn)
    }

    /// Removes every member from the board.
    pub fn clear_placements(&mut self) {
        self.units.iter_mut().for_each(Unit::clear_placement);
    }

    /// Allows every member to move again.
    pub fn reset_moved_flags(&mut self) {
        for unit in &mut self.units {
            unit.set_moved_this_turn(false);
        }
    }
}
