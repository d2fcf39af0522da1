//! Scripted player that deploys the squad and wanders for a number of turns.

use iso_tactics_core::{Command, Direction, Event, GridPosition};
use iso_tactics_world::{self as world, query, World};
use rand::{seq::IteratorRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Keeps the scripted player's draws apart from the world's own streams.
const AUTOPLAY_RNG_STREAM: u64 = 0x6175_746f;

/// Plays `turns` full player turns, returning every event the world emitted.
///
/// Stops early when deployment fails or a unit has nowhere to go.
pub(crate) fn run(world: &mut World, turns: u32) -> Vec<Event> {
    let mut rng = ChaCha8Rng::seed_from_u64(query::settings(world).seed());
    rng.set_stream(AUTOPLAY_RNG_STREAM);

    let mut events = Vec::new();
    if !deploy(world, &mut events) {
        tracing::warn!("autoplay could not deploy the squad");
        return events;
    }

    for _ in 0..turns {
        if !play_turn(world, &mut rng, &mut events) {
            tracing::warn!(turn = query::turn(world), "autoplay stalled");
            break;
        }
    }
    events
}

/// Dismisses the briefing and fills the player spawn zone in order.
pub(crate) fn deploy(world: &mut World, events: &mut Vec<Event>) -> bool {
    if query::briefing_visible(world) {
        world::apply(world, Command::Confirm, events);
    }

    let spawns = query::level(world).player_spawn_tiles().to_vec();
    for cell in spawns {
        if query::remaining_placements(world) == 0 {
            break;
        }
        steer(world, cell, events);
        world::apply(world, Command::Confirm, events);
    }
    query::remaining_placements(world) == 0
}

/// Moves every ready unit to a random reachable cell until the turn advances.
fn play_turn<R: Rng>(world: &mut World, rng: &mut R, events: &mut Vec<Event>) -> bool {
    let turn = query::turn(world);
    let attempts = query::player_squad(world).len();

    for _ in 0..attempts {
        let ready = query::player_squad(world)
            .units()
            .iter()
            .find(|unit| unit.is_placed() && !unit.has_moved_this_turn())
            .and_then(|unit| unit.position());
        let Some(cell) = ready else {
            break;
        };

        steer(world, cell, events);
        world::apply(world, Command::Confirm, events);
        let destination = query::movement_preview(world)
            .and_then(|preview| preview.destinations().choose(rng));
        let Some(destination) = destination else {
            return false;
        };

        steer(world, destination, events);
        world::apply(world, Command::Confirm, events);
        if query::turn(world) != turn {
            return true;
        }
    }
    query::turn(world) != turn
}

/// Issues cursor moves until the cursor rests on `target`.
pub(crate) fn steer(world: &mut World, target: GridPosition, events: &mut Vec<Event>) {
    for direction in cursor_path(query::cursor(world), target) {
        world::apply(world, Command::MoveCursor { direction }, events);
    }
}

/// Directions leading from `from` to `to`, columns first.
fn cursor_path(from: GridPosition, to: GridPosition) -> impl Iterator<Item = Direction> {
    let columns = to.column() - from.column();
    let rows = to.row() - from.row();
    let horizontal = if columns < 0 {
        Direction::West
    } else {
        Direction::East
    };
    let vertical = if rows < 0 {
        Direction::North
    } else {
        Direction::South
    };

    std::iter::repeat(horizontal)
        .take(columns.unsigned_abs() as usize)
        .chain(std::iter::repeat(vertical).take(rows.unsigned_abs() as usize))
}
