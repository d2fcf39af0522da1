#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that derives the heads-up display text from the battle state.

use iso_tactics_core::{weapons, BattlePhase, Unit};
use iso_tactics_world::{query, World};

/// Objective reminder shown whenever the briefing is dismissed.
pub const OBJECTIVE_TEXT: &str =
    "Reach the exit (G) without touching hazards (X). WASD moves the cursor. Press R to restart.";

const BRIEFING_PROMPT: &str = "Press Enter to dismiss the tactical briefing.";

const BRIEFING_TITLE: &str = "ISOMETRIC SRPG DEPLOYMENT";
const BRIEFING_INTRO: &str =
    "Drag the cursor across luminous blue tiles and press Enter to drop each unit.";
const BRIEFING_TIPS: [&str; 3] = [
    "Tips:",
    "- WASD shifts the tactical cursor",
    "- Enter confirms placement on an unoccupied spawn tile",
];

/// Produces the text overlays drawn above the board.
#[derive(Debug, Default)]
pub struct Hud;

impl Hud {
    /// Lines drawn in the HUD band, top to bottom.
    ///
    /// While the briefing is up only its prompt is shown; afterwards the
    /// objective and the latest status message take its place. The loadout
    /// line is always last.
    #[must_use]
    pub fn lines(&self, world: &World) -> Vec<String> {
        let mut lines = if query::briefing_visible(world) {
            vec![BRIEFING_PROMPT.to_owned()]
        } else {
            vec![
                OBJECTIVE_TEXT.to_owned(),
                query::status_message(world).to_owned(),
            ]
        };
        lines.push(self.loadout(world));
        lines
    }

    /// Deployment briefing, present only until it is acknowledged.
    #[must_use]
    pub fn banner(&self, world: &World) -> Option<Vec<String>> {
        let deploying = query::phase(world) == BattlePhase::Placement;
        if !(deploying && query::briefing_visible(world)) {
            return None;
        }

        let mut lines = vec![
            BRIEFING_TITLE.to_owned(),
            BRIEFING_INTRO.to_owned(),
            squad_requirement(query::remaining_placements(world)),
        ];
        lines.extend(BRIEFING_TIPS.iter().map(|line| (*line).to_owned()));
        Some(lines)
    }

    /// One row per player unit with its vitals and weapon.
    #[must_use]
    pub fn roster(&self, world: &World) -> Vec<String> {
        query::player_squad(world)
            .units()
            .iter()
            .map(roster_row)
            .collect()
    }

    /// Describes the weapon carried by the unit the loadout applies to.
    #[must_use]
    pub fn loadout(&self, world: &World) -> String {
        let Some(unit) = query::loadout_target(world) else {
            return "Loadout: press V to open the weapon menu.".to_owned();
        };
        match weapons::lookup(unit.weapon()) {
            Some(weapon) => format!(
                "Loadout for {}: [{}] - {}  DMG {} / DEF {} (V to change)",
                unit.display_name(),
                weapon.tag.symbol(),
                weapon.display_name,
                weapon.damage,
                weapon.defense
            ),
            None => format!("Loadout for {}: press V to open the weapon menu.", unit.display_name()),
        }
    }
}

fn squad_requirement(remaining: usize) -> String {
    match remaining {
        1 => "1 operative must be placed before we can advance on the enemy squad.".to_owned(),
        count => format!("{count} operatives must be placed before we can advance on the enemy squad."),
    }
}

fn roster_row(unit: &Unit) -> String {
    let weapon = weapons::lookup(unit.weapon()).map_or("-", |weapon| weapon.display_name);
    format!(
        "{}   HP {}/{}   SP {}/{}   Weapon {}",
        unit.display_name(),
        unit.hp(),
        unit.max_hp(),
        unit.sp(),
        unit.max_sp(),
        weapon
    )
}
