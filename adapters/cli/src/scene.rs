//! Translates world queries into the backend-agnostic scene.

use iso_tactics_core::{BattlePhase, IsoProjection, Squad};
use iso_tactics_rendering::{
    to_vec2, HighlightKind, Loadout, Scene, TileHighlight, UnitPresentation,
};
use iso_tactics_system_hud::Hud;
use iso_tactics_world::{query, World};

/// Builds the scene shown for the current world state.
pub(crate) fn build(world: &World, hud: &Hud) -> Scene {
    let level = query::level(world);
    let mut scene = Scene::from_level(level, *query::settings(world));

    match query::phase(world) {
        BattlePhase::Placement => {
            scene.highlights.extend(
                level
                    .player_spawn_tiles()
                    .iter()
                    .filter(|cell| query::unit_at(world, **cell).is_none())
                    .map(|cell| TileHighlight::new(*cell, HighlightKind::PlayerSpawn)),
            );
            scene.highlights.extend(
                level
                    .enemy_spawn_tiles()
                    .iter()
                    .map(|cell| TileHighlight::new(*cell, HighlightKind::EnemySpawn)),
            );
        }
        BattlePhase::Active => {
            if let Some(preview) = query::movement_preview(world) {
                let max_distance = preview.max_distance();
                scene
                    .highlights
                    .extend(preview.distances().map(|(cell, distance)| {
                        TileHighlight::new(
                            cell,
                            HighlightKind::Reachable {
                                distance,
                                max_distance,
                            },
                        )
                    }));
            }
            if let Some(cell) = query::selected_unit(world).and_then(|unit| unit.position()) {
                scene
                    .highlights
                    .push(TileHighlight::new(cell, HighlightKind::SelectedUnit));
            }
        }
    }
    scene.highlights.push(TileHighlight::new(
        query::cursor(world),
        HighlightKind::Cursor,
    ));

    for squad in [query::enemy_squad(world), query::player_squad(world)] {
        scene.units.extend(presentations(squad, level.projection()));
    }

    scene.hud_lines = hud.lines(world);
    scene.banner = hud.banner(world);
    scene.roster = hud.roster(world);
    scene.loadout = query::loadout_target(world).map(|unit| Loadout {
        unit: unit.id().clone(),
        weapon: unit.weapon().clone(),
    });
    scene
}

fn presentations<'a>(
    squad: &'a Squad,
    projection: &'a IsoProjection,
) -> impl Iterator<Item = UnitPresentation> + 'a {
    squad.units().iter().filter_map(move |unit| {
        let cell = unit.position()?;
        Some(UnitPresentation::new(
            unit.id().clone(),
            unit.faction(),
            cell,
            to_vec2(projection.cell_ground(cell)),
            unit.has_moved_this_turn(),
        ))
    })
}
