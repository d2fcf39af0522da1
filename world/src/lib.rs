#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state management for Iso Tactics.
//!
//! The [`World`] owns the level, both squads, the cursor and the phase state;
//! everything else borrows it. Adapters feed [`Command`] values through
//! [`apply`] and read the outcome back through [`Event`] values and the
//! [`query`] module.

use iso_tactics_core::{
    weapons, BattlePhase, Command, CycleStep, EquipRejection, Event, Faction, GridPosition, Level,
    LevelSettings, PlacementResult, SelectionRejection, Squad, UnitId, WeaponId,
    ENEMY_SQUAD_SIZE, MOVEMENT_RANGE, PLAYER_SQUAD_SIZE,
};
use iso_tactics_system_enemy_turn::EnemyTurn;
use iso_tactics_system_level_generation::{GenerationError, LevelGenerator};
use iso_tactics_system_placement::PlacementController;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use iso_tactics_system_movement::MovementPreview;

/// Stream separating battle decisions from the level generator's draws.
const BATTLE_RNG_STREAM: u64 = 0x6261_7474_6c65;

const BRIEFING_MESSAGE: &str = "Press Enter to acknowledge the briefing, then deploy your squad.";
const PLACEMENT_REJECTED_MESSAGE: &str = "Select an empty blue spawn tile and press Enter to deploy.";
const NO_FRIENDLY_MESSAGE: &str = "Move the cursor onto one of your units and press Enter to select it.";
const NO_UNIT_AVAILABLE_MESSAGE: &str = "No unit is ready to act.";
const OUT_OF_RANGE_MESSAGE: &str = "Cannot move there - tile not in range.";
const ENEMY_TURN_MESSAGE: &str = "Enemy units repositioned. Player phase refreshed.";

/// Represents the authoritative battle state.
#[derive(Debug)]
pub struct World {
    settings: LevelSettings,
    level: Level,
    cursor: GridPosition,
    player_squad: Squad,
    enemy_squad: Squad,
    state: BattleState,
    turn: u32,
    status: String,
    rng: ChaCha8Rng,
}

/// Phase-specific state; a selection always carries its preview.
#[derive(Debug)]
enum BattleState {
    Placement {
        controller: PlacementController,
        briefing_visible: bool,
    },
    Active {
        selection: Option<Selection>,
    },
}

#[derive(Debug)]
struct Selection {
    index: usize,
    preview: MovementPreview,
}

impl World {
    /// Generates the first level described by `settings` and opens deployment.
    pub fn new(settings: LevelSettings) -> Result<Self, GenerationError> {
        let level = LevelGenerator::from_settings(&settings)?.generate()?;
        let mut world = Self {
            settings,
            cursor: level.start(),
            level,
            player_squad: Squad::create(Faction::Player, 0),
            enemy_squad: Squad::create(Faction::Enemy, 0),
            state: BattleState::Active { selection: None },
            turn: 1,
            status: String::new(),
            rng: battle_rng(settings.seed()),
        };

        let mut events = Vec::new();
        world.begin_placement(&mut events);
        tracing::info!(
            seed = settings.seed(),
            columns = settings.width(),
            rows = settings.height(),
            "battle world created"
        );
        Ok(world)
    }

    fn regenerate(&mut self, settings: LevelSettings, out_events: &mut Vec<Event>) {
        let level = match LevelGenerator::from_settings(&settings).and_then(|request| request.generate())
        {
            Ok(level) => level,
            Err(error) => {
                tracing::error!(%error, "level generation failed; keeping current level");
                return;
            }
        };

        self.settings = settings;
        self.level = level;
        tracing::info!(
            seed = settings.seed(),
            columns = self.level.columns(),
            rows = self.level.rows(),
            "level regenerated"
        );
        out_events.push(Event::LevelGenerated {
            seed: settings.seed(),
            columns: self.level.columns(),
            rows: self.level.rows(),
        });
        self.begin_placement(out_events);
    }

    fn begin_placement(&mut self, out_events: &mut Vec<Event>) {
        self.rng = battle_rng(self.settings.seed());

        let player_spawns = self.level.player_spawn_tiles();
        let enemy_spawns = self.level.enemy_spawn_tiles();
        let player_size = PLAYER_SQUAD_SIZE.min(player_spawns.len());
        let enemy_size = ENEMY_SQUAD_SIZE.min(enemy_spawns.len()).max(1);

        self.player_squad = Squad::create(Faction::Player, player_size);
        self.enemy_squad = Squad::create(Faction::Enemy, enemy_size);
        for index in 0..enemy_size {
            let cell = enemy_spawns.get(index).copied().unwrap_or(self.level.exit());
            if let Some(enemy) = self.enemy_squad.unit_mut(index) {
                enemy.place_at(cell);
            }
        }

        self.cursor = player_spawns.first().copied().unwrap_or(self.level.start());
        self.state = BattleState::Placement {
            controller: PlacementController::new(player_spawns, player_size),
            briefing_visible: true,
        };
        self.turn = 1;
        self.status = BRIEFING_MESSAGE.to_owned();

        tracing::info!(player_size, enemy_size, "deployment started");
        out_events.push(Event::PlacementStarted {
            squad_size: player_size,
        });
    }

    fn confirm_placement(&mut self, out_events: &mut Vec<Event>) {
        let BattleState::Placement {
            controller,
            briefing_visible,
        } = &mut self.state
        else {
            return;
        };

        if *briefing_visible {
            *briefing_visible = false;
            self.status = format!("Place {} units on blue tiles.", controller.remaining_units());
            out_events.push(Event::BriefingDismissed);
            return;
        }

        let cell = self.cursor;
        let result = controller.attempt_placement(cell, &mut self.player_squad);
        let remaining = controller.remaining_units();

        let reason = match result {
            PlacementResult::Invalid(reason) => reason,
            PlacementResult::Placed | PlacementResult::Completed => {
                let unit = self
                    .player_squad
                    .index_at(cell)
                    .and_then(|index| self.player_squad.unit(index))
                    .map(|unit| unit.id().clone());
                if let Some(unit) = unit {
                    tracing::debug!(unit = %unit, ?cell, remaining, "unit deployed");
                    out_events.push(Event::UnitPlaced {
                        unit,
                        cell,
                        remaining,
                    });
                }

                if result == PlacementResult::Completed {
                    self.enter_active_phase(out_events);
                } else {
                    self.status = format!("Unit deployed. {remaining} remaining.");
                }
                return;
            }
        };

        tracing::debug!(?cell, ?reason, "deployment rejected");
        self.status = PLACEMENT_REJECTED_MESSAGE.to_owned();
        out_events.push(Event::PlacementRejected { cell, reason });
    }

    fn enter_active_phase(&mut self, out_events: &mut Vec<Event>) {
        self.state = BattleState::Active { selection: None };
        tracing::info!("all units deployed; battle active");
        out_events.push(Event::PhaseChanged {
            phase: BattlePhase::Active,
        });
        self.select_unit(0, out_events);
    }

    fn confirm_active(&mut self, out_events: &mut Vec<Event>) {
        let cursor = self.cursor;
        if let Some(index) = self.player_squad.index_at(cursor) {
            self.select_unit(index, out_events);
            return;
        }

        let BattleState::Active {
            selection: Some(selection),
        } = &self.state
        else {
            self.status = NO_FRIENDLY_MESSAGE.to_owned();
            out_events.push(Event::SelectionRejected {
                cell: cursor,
                reason: SelectionRejection::NoFriendlyUnit,
            });
            return;
        };

        let index = selection.index;
        if selection.preview.is_reachable(cursor) {
            self.move_selected(index, cursor, out_events);
            return;
        }

        if let Some(unit) = self.player_squad.unit(index) {
            tracing::debug!(unit = %unit.id(), target = ?cursor, "move out of range");
            out_events.push(Event::MoveRejected {
                unit: unit.id().clone(),
                target: cursor,
            });
        }
        self.status = OUT_OF_RANGE_MESSAGE.to_owned();
    }

    fn select_unit(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let cursor = self.cursor;
        let Some(unit) = self.player_squad.unit(index) else {
            return;
        };

        if unit.has_moved_this_turn() {
            self.status = format!("{} already moved this turn.", unit.display_name());
            out_events.push(Event::SelectionRejected {
                cell: cursor,
                reason: SelectionRejection::AlreadyMoved,
            });
            return;
        }

        let preview = MovementPreview::calculate(
            &self.level,
            unit,
            self.player_squad.units(),
            self.enemy_squad.units(),
            MOVEMENT_RANGE,
        );
        let Some(preview) = preview else {
            self.status = NO_UNIT_AVAILABLE_MESSAGE.to_owned();
            out_events.push(Event::SelectionRejected {
                cell: cursor,
                reason: SelectionRejection::NoUnitAvailable,
            });
            return;
        };

        let id = unit.id().clone();
        self.status = format!("Selected {} - press Q/E to cycle units.", unit.display_name());
        self.cursor = preview.origin();
        out_events.push(Event::UnitSelected {
            unit: id,
            cell: preview.origin(),
        });
        self.state = BattleState::Active {
            selection: Some(Selection { index, preview }),
        };
    }

    fn cycle_selection(&mut self, step: CycleStep, out_events: &mut Vec<Event>) {
        let BattleState::Active { selection } = &self.state else {
            return;
        };
        let start = selection.as_ref().map_or(0, |selection| selection.index);

        let candidate = cycle_order(start, step, self.player_squad.len()).find(|index| {
            self.player_squad
                .unit(*index)
                .is_some_and(|unit| unit.is_placed() && !unit.has_moved_this_turn())
        });

        match candidate {
            Some(index) => self.select_unit(index, out_events),
            None => {
                self.status = NO_UNIT_AVAILABLE_MESSAGE.to_owned();
                out_events.push(Event::SelectionRejected {
                    cell: self.cursor,
                    reason: SelectionRejection::NoUnitAvailable,
                });
            }
        }
    }

    fn move_selected(&mut self, index: usize, target: GridPosition, out_events: &mut Vec<Event>) {
        let Some(unit) = self.player_squad.unit_mut(index) else {
            return;
        };
        let Some(from) = unit.position() else {
            return;
        };

        unit.place_at(target);
        unit.set_moved_this_turn(true);
        let id = unit.id().clone();
        self.status = format!("{} moved.", unit.display_name());
        self.state = BattleState::Active { selection: None };

        tracing::debug!(unit = %id, ?from, to = ?target, "unit moved");
        out_events.push(Event::UnitMoved {
            unit: id,
            from,
            to: target,
        });

        if self.player_squad.all_placed_units_moved() {
            self.run_enemy_turn(out_events);
        }
    }

    fn run_enemy_turn(&mut self, out_events: &mut Vec<Event>) {
        let attempts = EnemyTurn::new(MOVEMENT_RANGE).execute(
            &self.level,
            &mut self.enemy_squad,
            &self.player_squad,
            &mut self.rng,
        );

        for attempt in attempts {
            out_events.push(match attempt.to {
                Some(to) => Event::EnemyMoved {
                    unit: attempt.unit,
                    from: attempt.from,
                    to,
                },
                None => Event::EnemyHeld {
                    unit: attempt.unit,
                    cell: attempt.from,
                },
            });
        }

        self.player_squad.reset_moved_flags();
        self.turn = self.turn.saturating_add(1);
        self.status = ENEMY_TURN_MESSAGE.to_owned();
        tracing::info!(turn = self.turn, "player turn begins");
        out_events.push(Event::TurnAdvanced { turn: self.turn });
    }

    fn reset(&mut self, regenerate: bool, out_events: &mut Vec<Event>) {
        if !regenerate {
            self.begin_placement(out_events);
            return;
        }

        let settings = if self.settings.seed_locked() {
            self.settings
        } else {
            self.settings.with_random_seed(self.rng.next_u64())
        };
        self.regenerate(settings, out_events);
    }

    fn lock_seed(&mut self, locked: bool, out_events: &mut Vec<Event>) {
        self.settings = self.settings.with_seed_lock(locked);
        let seed = self.settings.seed();
        self.status = if locked {
            format!("Seed {seed} locked; new levels reuse it.")
        } else {
            format!("Seed {seed} unlocked; new levels draw a fresh seed.")
        };
        tracing::debug!(seed, locked, "seed lock changed");
        out_events.push(Event::SeedLockChanged { seed, locked });
    }

    fn equip(&mut self, unit: UnitId, weapon: WeaponId, out_events: &mut Vec<Event>) {
        let reason = if weapons::lookup(&weapon).is_none() {
            Some(EquipRejection::UnknownWeapon)
        } else if let Some(member) = self
            .player_squad
            .index_of(&unit)
            .and_then(|index| self.player_squad.unit_mut(index))
        {
            member.equip(weapon.clone());
            self.status = format!("{} equipped {weapon}.", member.display_name());
            None
        } else {
            Some(EquipRejection::UnknownUnit)
        };

        out_events.push(match reason {
            None => Event::WeaponEquipped { unit, weapon },
            Some(reason) => Event::EquipRejected {
                unit,
                weapon,
                reason,
            },
        });
    }
}

fn battle_rng(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(BATTLE_RNG_STREAM);
    rng
}

/// Squad indices visited when cycling from `start`, ending back at `start`.
fn cycle_order(start: usize, step: CycleStep, len: usize) -> impl Iterator<Item = usize> {
    (1..=len).map(move |offset| {
        let len = len as isize;
        (start as isize + step.delta() * offset as isize).rem_euclid(len) as usize
    })
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MoveCursor { direction } => {
            let from = world.cursor;
            let to = from.offset(direction);
            if world.level.contains(to) {
                world.cursor = to;
                out_events.push(Event::CursorMoved { from, to });
            }
        }
        Command::Confirm => match world.state {
            BattleState::Placement { .. } => world.confirm_placement(out_events),
            BattleState::Active { .. } => world.confirm_active(out_events),
        },
        Command::CycleUnit { step } => world.cycle_selection(step, out_events),
        Command::Reset { regenerate } => world.reset(regenerate, out_events),
        Command::ApplySettings { settings } => world.regenerate(settings, out_events),
        Command::LockSeed { locked } => world.lock_seed(locked, out_events),
        Command::EquipWeapon { unit, weapon } => world.equip(unit, weapon, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use iso_tactics_core::{BattlePhase, GridPosition, Level, LevelSettings, Squad, Unit};

    use super::{BattleState, MovementPreview, World};

    /// Settings that produced the current level.
    #[must_use]
    pub fn settings(world: &World) -> &LevelSettings {
        &world.settings
    }

    /// Provides read-only access to the current level.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Phase the battle is currently in.
    #[must_use]
    pub fn phase(world: &World) -> BattlePhase {
        match world.state {
            BattleState::Placement { .. } => BattlePhase::Placement,
            BattleState::Active { .. } => BattlePhase::Active,
        }
    }

    /// Reports whether the deployment briefing still awaits acknowledgement.
    #[must_use]
    pub fn briefing_visible(world: &World) -> bool {
        matches!(
            world.state,
            BattleState::Placement {
                briefing_visible: true,
                ..
            }
        )
    }

    /// Cell highlighted by the board cursor.
    #[must_use]
    pub fn cursor(world: &World) -> GridPosition {
        world.cursor
    }

    /// Squad controlled by the player.
    #[must_use]
    pub fn player_squad(world: &World) -> &Squad {
        &world.player_squad
    }

    /// Squad controlled by the enemy turn.
    #[must_use]
    pub fn enemy_squad(world: &World) -> &Squad {
        &world.enemy_squad
    }

    /// Index of the selected player unit, if any.
    #[must_use]
    pub fn selected_unit_index(world: &World) -> Option<usize> {
        match &world.state {
            BattleState::Active {
                selection: Some(selection),
            } => Some(selection.index),
            _ => None,
        }
    }

    /// Selected player unit, if any.
    #[must_use]
    pub fn selected_unit(world: &World) -> Option<&Unit> {
        selected_unit_index(world).and_then(|index| world.player_squad.unit(index))
    }

    /// Movement preview of the selected unit, if any.
    #[must_use]
    pub fn movement_preview(world: &World) -> Option<&MovementPreview> {
        match &world.state {
            BattleState::Active {
                selection: Some(selection),
            } => Some(&selection.preview),
            _ => None,
        }
    }

    /// Number of player units still awaiting deployment.
    #[must_use]
    pub fn remaining_placements(world: &World) -> usize {
        match &world.state {
            BattleState::Placement { controller, .. } => controller.remaining_units(),
            BattleState::Active { .. } => 0,
        }
    }

    /// One-based index of the current player turn.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Latest contextual message for the HUD.
    #[must_use]
    pub fn status_message(world: &World) -> &str {
        &world.status
    }

    /// Deployed unit of either faction standing on the cell.
    #[must_use]
    pub fn unit_at(world: &World, cell: GridPosition) -> Option<&Unit> {
        [&world.player_squad, &world.enemy_squad]
            .into_iter()
            .find_map(|squad| squad.index_at(cell).and_then(|index| squad.unit(index)))
    }

    /// Player unit whose loadout the HUD describes.
    ///
    /// Prefers the selection, then the unit under the cursor, then the first
    /// squad member.
    #[must_use]
    pub fn loadout_target(world: &World) -> Option<&Unit> {
        selected_unit(world)
            .or_else(|| {
                world
                    .player_squad
                    .index_at(world.cursor)
                    .and_then(|index| world.player_squad.unit(index))
            })
            .or_else(|| world.player_squad.unit(0))
    }
}
