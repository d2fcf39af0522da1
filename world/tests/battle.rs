use iso_tactics_core::{
    BattlePhase, Command, CycleStep, Direction, EquipRejection, Event, GridPosition,
    LevelSettings, PlacementRejection, SelectionRejection, UnitId, WeaponId,
};
use iso_tactics_world::{self as world, query, World};

fn example_world() -> World {
    World::new(LevelSettings::new(9, 9, 48, 0.0).with_seed(42)).expect("valid settings")
}

fn send(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn move_cursor_to(world: &mut World, target: GridPosition) {
    loop {
        let cursor = query::cursor(world);
        let direction = if cursor.column() < target.column() {
            Direction::East
        } else if cursor.column() > target.column() {
            Direction::West
        } else if cursor.row() < target.row() {
            Direction::South
        } else if cursor.row() > target.row() {
            Direction::North
        } else {
            return;
        };
        let events = send(world, Command::MoveCursor { direction });
        assert!(!events.is_empty(), "cursor should move toward {target:?}");
    }
}

fn deploy_squad(world: &mut World) -> Vec<Event> {
    let _ = send(world, Command::Confirm);
    let spawns = query::level(world).player_spawn_tiles().to_vec();
    let mut events = Vec::new();
    for cell in spawns.into_iter().take(query::player_squad(world).len()) {
        move_cursor_to(world, cell);
        events.extend(send(world, Command::Confirm));
    }
    events
}

/// Moves every ready player unit once, returning the events of the final move.
fn play_player_turn(world: &mut World) -> Vec<Event> {
    let turn = query::turn(world);
    for _ in 0..query::player_squad(world).len() * 2 {
        let ready = query::player_squad(world)
            .units()
            .iter()
            .find(|unit| unit.is_placed() && !unit.has_moved_this_turn())
            .and_then(|unit| unit.position());
        let Some(cell) = ready else {
            break;
        };

        move_cursor_to(world, cell);
        let _ = send(world, Command::Confirm);
        let destination = query::movement_preview(world)
            .expect("selected unit has a preview")
            .destinations()
            .next();
        let Some(destination) = destination else {
            continue;
        };

        move_cursor_to(world, destination);
        let events = send(world, Command::Confirm);
        if query::turn(world) != turn {
            return events;
        }
    }
    panic!("player turn did not complete");
}

#[test]
fn new_battle_opens_deployment_with_briefing() {
    let world = example_world();
    let level = query::level(&world);

    assert_eq!(query::phase(&world), BattlePhase::Placement);
    assert!(query::briefing_visible(&world));
    assert_eq!(query::cursor(&world), level.player_spawn_tiles()[0]);
    assert_eq!(query::remaining_placements(&world), 4);
    assert!(query::player_squad(&world).units().iter().all(|unit| !unit.is_placed()));

    let enemy_cells: Vec<GridPosition> = query::enemy_squad(&world)
        .units()
        .iter()
        .filter_map(|unit| unit.position())
        .collect();
    assert_eq!(enemy_cells, level.enemy_spawn_tiles().to_vec());
    assert_eq!(
        query::status_message(&world),
        "Press Enter to acknowledge the briefing, then deploy your squad."
    );
}

#[test]
fn first_confirm_only_dismisses_briefing() {
    let mut world = example_world();

    let events = send(&mut world, Command::Confirm);

    assert_eq!(events, vec![Event::BriefingDismissed]);
    assert!(!query::briefing_visible(&world));
    assert!(query::player_squad(&world).next_unplaced_unit().is_some());
    assert_eq!(query::remaining_placements(&world), 4);
    assert_eq!(query::status_message(&world), "Place 4 units on blue tiles.");
}

#[test]
fn deployment_outside_spawn_zone_is_rejected() {
    let mut world = example_world();
    let _ = send(&mut world, Command::Confirm);
    let start = query::level(&world).start();
    move_cursor_to(&mut world, start);

    let events = send(&mut world, Command::Confirm);

    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            cell: start,
            reason: PlacementRejection::NotSpawnTile,
        }]
    );
    assert_eq!(query::remaining_placements(&world), 4);
}

#[test]
fn occupied_spawn_tile_is_rejected() {
    let mut world = example_world();
    let _ = send(&mut world, Command::Confirm);
    let cell = query::cursor(&world);

    let placed = send(&mut world, Command::Confirm);
    assert_eq!(
        placed,
        vec![Event::UnitPlaced {
            unit: UnitId::new("player-1"),
            cell,
            remaining: 3,
        }]
    );

    let rejected = send(&mut world, Command::Confirm);
    assert_eq!(
        rejected,
        vec![Event::PlacementRejected {
            cell,
            reason: PlacementRejection::Occupied,
        }]
    );
    assert_eq!(query::status_message(&world), "Select an empty blue spawn tile and press Enter to deploy.");
}

#[test]
fn completing_deployment_activates_battle_and_selects_first_unit() {
    let mut world = example_world();

    let events = deploy_squad(&mut world);

    let tail = &events[events.len() - 3..];
    assert!(matches!(tail[0], Event::UnitPlaced { remaining: 0, .. }));
    assert_eq!(
        tail[1],
        Event::PhaseChanged {
            phase: BattlePhase::Active,
        }
    );
    assert!(matches!(&tail[2], Event::UnitSelected { unit, .. } if unit.as_str() == "player-1"));

    assert_eq!(query::phase(&world), BattlePhase::Active);
    assert_eq!(query::selected_unit_index(&world), Some(0));
    let first = query::player_squad(&world).unit(0).expect("first unit");
    let preview = query::movement_preview(&world).expect("selection carries a preview");
    assert_eq!(Some(preview.origin()), first.position());
    assert_eq!(preview.max_distance(), 4);
    assert_eq!(query::cursor(&world), preview.origin());
}

#[test]
fn example_preview_stays_within_budget_on_walkable_cells() {
    let mut world = example_world();
    let _ = deploy_squad(&mut world);
    let level = query::level(&world);
    let preview = query::movement_preview(&world).expect("selection carries a preview");

    for (cell, distance) in preview.distances() {
        assert!(distance <= 4, "{cell:?} is {distance} steps away");
        assert!(level.is_walkable(cell));
        assert!(
            distance == 0 || query::unit_at(&world, cell).is_none(),
            "{cell:?} is occupied"
        );
    }
}

#[test]
fn unreachable_destination_is_rejected_without_changes() {
    let mut world = example_world();
    let _ = deploy_squad(&mut world);
    let before = query::player_squad(&world).clone();
    let corner = GridPosition::new(0, 0);
    move_cursor_to(&mut world, corner);

    let events = send(&mut world, Command::Confirm);

    assert_eq!(
        events,
        vec![Event::MoveRejected {
            unit: UnitId::new("player-1"),
            target: corner,
        }]
    );
    assert_eq!(query::player_squad(&world), &before);
    assert_eq!(query::selected_unit_index(&world), Some(0));
    assert_eq!(query::status_message(&world), "Cannot move there - tile not in range.");
}

#[test]
fn confirm_on_empty_cell_without_selection_is_rejected() {
    let mut world = example_world();
    let _ = deploy_squad(&mut world);
    let destination = query::movement_preview(&world)
        .and_then(|preview| preview.destinations().next())
        .expect("first unit can move");
    move_cursor_to(&mut world, destination);
    let _ = send(&mut world, Command::Confirm);
    assert_eq!(query::selected_unit_index(&world), None);

    move_cursor_to(&mut world, GridPosition::new(0, 0));
    let events = send(&mut world, Command::Confirm);

    assert_eq!(
        events,
        vec![Event::SelectionRejected {
            cell: GridPosition::new(0, 0),
            reason: SelectionRejection::NoFriendlyUnit,
        }]
    );
}

#[test]
fn moved_unit_cannot_be_selected_again() {
    let mut world = example_world();
    let _ = deploy_squad(&mut world);
    let destination = query::movement_preview(&world)
        .and_then(|preview| preview.destinations().next())
        .expect("first unit can move");
    move_cursor_to(&mut world, destination);

    let moved = send(&mut world, Command::Confirm);
    assert!(matches!(&moved[0], Event::UnitMoved { to, .. } if *to == destination));
    assert!(query::player_squad(&world)
        .unit(0)
        .expect("first unit")
        .has_moved_this_turn());
    assert!(query::movement_preview(&world).is_none());

    let events = send(&mut world, Command::Confirm);
    assert_eq!(
        events,
        vec![Event::SelectionRejected {
            cell: destination,
            reason: SelectionRejection::AlreadyMoved,
        }]
    );
    assert_eq!(query::status_message(&world), "Player 1 already moved this turn.");
}

#[test]
fn cycling_skips_units_that_already_moved() {
    let mut world = example_world();
    let _ = deploy_squad(&mut world);
    let destination = query::movement_preview(&world)
        .and_then(|preview| preview.destinations().next())
        .expect("first unit can move");
    move_cursor_to(&mut world, destination);
    let _ = send(&mut world, Command::Confirm);

    let _ = send(
        &mut world,
        Command::CycleUnit {
            step: CycleStep::Backward,
        },
    );
    assert_eq!(query::selected_unit_index(&world), Some(3));

    let _ = send(
        &mut world,
        Command::CycleUnit {
            step: CycleStep::Forward,
        },
    );
    assert_eq!(
        query::selected_unit_index(&world),
        Some(1),
        "forward from the last unit wraps past the moved first unit"
    );
    let selected = query::selected_unit(&world).expect("selection");
    assert_eq!(selected.position(), Some(query::cursor(&world)));
}

#[test]
fn cycling_is_ignored_during_deployment() {
    let mut world = example_world();

    let events = send(
        &mut world,
        Command::CycleUnit {
            step: CycleStep::Forward,
        },
    );

    assert!(events.is_empty());
    assert_eq!(query::phase(&world), BattlePhase::Placement);
}

#[test]
fn finishing_player_turn_runs_enemy_turn() {
    let mut world = example_world();
    let _ = deploy_squad(&mut world);
    let enemies_before = query::enemy_squad(&world).len();

    let events = play_player_turn(&mut world);

    let enemy_attempts = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyMoved { .. } | Event::EnemyHeld { .. }))
        .count();
    assert_eq!(enemy_attempts, enemies_before, "each enemy acts exactly once");
    assert_eq!(events.last(), Some(&Event::TurnAdvanced { turn: 2 }));
    assert_eq!(query::turn(&world), 2);
    assert!(query::player_squad(&world)
        .units()
        .iter()
        .all(|unit| !unit.has_moved_this_turn()));
    assert_eq!(
        query::status_message(&world),
        "Enemy units repositioned. Player phase refreshed."
    );

    let mut occupied: Vec<GridPosition> = query::player_squad(&world)
        .units()
        .iter()
        .chain(query::enemy_squad(&world).units())
        .filter_map(|unit| unit.position())
        .collect();
    let count = occupied.len();
    occupied.sort();
    occupied.dedup();
    assert_eq!(occupied.len(), count, "no two units share a cell");
}

#[test]
fn cursor_stays_on_the_board() {
    let mut world = example_world();
    move_cursor_to(&mut world, GridPosition::new(0, 0));

    let west = send(
        &mut world,
        Command::MoveCursor {
            direction: Direction::West,
        },
    );
    let north = send(
        &mut world,
        Command::MoveCursor {
            direction: Direction::North,
        },
    );

    assert!(west.is_empty());
    assert!(north.is_empty());
    assert_eq!(query::cursor(&world), GridPosition::new(0, 0));
}

#[test]
fn reset_without_regeneration_keeps_level() {
    let mut world = example_world();
    let _ = deploy_squad(&mut world);
    let layout = query::level(&world).to_layout();

    let events = send(&mut world, Command::Reset { regenerate: false });

    assert_eq!(events, vec![Event::PlacementStarted { squad_size: 4 }]);
    assert_eq!(query::level(&world).to_layout(), layout);
    assert_eq!(query::phase(&world), BattlePhase::Placement);
    assert!(query::briefing_visible(&world));
    assert!(query::player_squad(&world).next_unplaced_unit().is_some());
}

#[test]
fn regeneration_with_locked_seed_reproduces_level() {
    let mut world = example_world();
    let layout = query::level(&world).to_layout();

    let events = send(&mut world, Command::Reset { regenerate: true });

    assert_eq!(
        events[0],
        Event::LevelGenerated {
            seed: 42,
            columns: 9,
            rows: 9,
        }
    );
    assert_eq!(query::level(&world).to_layout(), layout);
}

#[test]
fn regeneration_with_unlocked_seed_draws_new_seed() {
    let settings = LevelSettings::new(9, 9, 48, 0.0).with_random_seed(42);
    let mut world = World::new(settings).expect("valid settings");

    let _ = send(&mut world, Command::Reset { regenerate: true });

    let regenerated = query::settings(&world);
    assert_ne!(regenerated.seed(), 42);
    assert!(!regenerated.seed_locked());
}

#[test]
fn applying_settings_regenerates_with_new_dimensions() {
    let mut world = example_world();
    let settings = LevelSettings::new(13, 11, 32, 0.1).with_seed(7);

    let events = send(&mut world, Command::ApplySettings { settings });

    assert_eq!(
        events[0],
        Event::LevelGenerated {
            seed: 7,
            columns: 13,
            rows: 11,
        }
    );
    assert_eq!(query::settings(&world), &settings);
    assert_eq!(query::level(&world).tile_size(), 32);
    assert_eq!(query::phase(&world), BattlePhase::Placement);
}

#[test]
fn toggling_seed_lock_keeps_the_battle_in_progress() {
    let mut world = example_world();
    let _ = deploy_squad(&mut world);
    let layout = query::level(&world).to_layout();
    let positions: Vec<_> = query::player_squad(&world)
        .units()
        .iter()
        .map(|unit| unit.position())
        .collect();

    let events = send(&mut world, Command::LockSeed { locked: false });

    assert_eq!(
        events,
        vec![Event::SeedLockChanged {
            seed: 42,
            locked: false,
        }]
    );
    assert!(!query::settings(&world).seed_locked());
    assert_eq!(query::settings(&world).seed(), 42);
    assert_eq!(query::phase(&world), BattlePhase::Active);
    assert_eq!(query::level(&world).to_layout(), layout);
    let after: Vec<_> = query::player_squad(&world)
        .units()
        .iter()
        .map(|unit| unit.position())
        .collect();
    assert_eq!(after, positions);
    assert_eq!(
        query::status_message(&world),
        "Seed 42 unlocked; new levels draw a fresh seed."
    );

    let _ = send(&mut world, Command::Reset { regenerate: true });
    assert_ne!(query::settings(&world).seed(), 42);
}

#[test]
fn equipping_weapons_validates_unit_and_weapon() {
    let mut world = example_world();
    let unit = UnitId::new("player-2");
    let pistol = WeaponId::new("enemy-pistol");

    let accepted = send(
        &mut world,
        Command::EquipWeapon {
            unit: unit.clone(),
            weapon: pistol.clone(),
        },
    );
    assert_eq!(
        accepted,
        vec![Event::WeaponEquipped {
            unit: unit.clone(),
            weapon: pistol.clone(),
        }]
    );
    assert_eq!(query::player_squad(&world).unit(1).map(|unit| unit.weapon()), Some(&pistol));

    let unknown_weapon = send(
        &mut world,
        Command::EquipWeapon {
            unit: unit.clone(),
            weapon: WeaponId::new("rubber-duck"),
        },
    );
    assert!(matches!(
        unknown_weapon[0],
        Event::EquipRejected {
            reason: EquipRejection::UnknownWeapon,
            ..
        }
    ));

    let unknown_unit = send(
        &mut world,
        Command::EquipWeapon {
            unit: UnitId::new("enemy-1"),
            weapon: pistol,
        },
    );
    assert!(matches!(
        unknown_unit[0],
        Event::EquipRejected {
            reason: EquipRejection::UnknownUnit,
            ..
        }
    ));
}

#[test]
fn identical_command_streams_replay_identically() {
    fn replay() -> (Vec<Event>, Vec<Option<GridPosition>>) {
        let mut world = example_world();
        let mut log = deploy_squad(&mut world);
        for _ in 0..3 {
            log.extend(play_player_turn(&mut world));
        }
        log.extend(send(&mut world, Command::Reset { regenerate: false }));
        log.extend(deploy_squad(&mut world));
        log.extend(play_player_turn(&mut world));

        let positions = query::player_squad(&world)
            .units()
            .iter()
            .chain(query::enemy_squad(&world).units())
            .map(|unit| unit.position())
            .collect();
        (log, positions)
    }

    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(
        first.0.iter().filter(|event| matches!(event, Event::TurnAdvanced { .. })).count(),
        4
    );
}
