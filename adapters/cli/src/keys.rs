//! Keyboard decoding for the terminal adapter.
//!
//! Every character of an input line is one key press; an empty line stands
//! for Enter.

use iso_tactics_core::{weapons::WeaponMenu, Command, CycleStep, Direction};
use iso_tactics_rendering::Scene;

/// Board growth applied per resize key press.
const RESIZE_STEP: i32 = 2;

/// Action requested by a single key press.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum KeyAction {
    /// Forward the command to the world.
    Command(Command),
    /// Leave the game.
    Quit,
}

/// Decodes one key press; unmapped keys yield `None`.
///
/// Keys that edit settings or the loadout read their current values from the
/// scene.
pub(crate) fn decode(key: char, scene: &Scene) -> Option<KeyAction> {
    let command = match key.to_ascii_lowercase() {
        'w' => Command::MoveCursor {
            direction: Direction::North,
        },
        's' => Command::MoveCursor {
            direction: Direction::South,
        },
        'a' => Command::MoveCursor {
            direction: Direction::West,
        },
        'd' => Command::MoveCursor {
            direction: Direction::East,
        },
        'f' | ' ' | '\n' => Command::Confirm,
        'q' => Command::CycleUnit {
            step: CycleStep::Backward,
        },
        'e' => Command::CycleUnit {
            step: CycleStep::Forward,
        },
        'r' => Command::Reset { regenerate: false },
        'n' => Command::Reset { regenerate: true },
        'v' => {
            let loadout = scene.loadout.as_ref()?;
            let mut menu = WeaponMenu::open_at(&loadout.weapon);
            menu.move_selection(1);
            Command::EquipWeapon {
                unit: loadout.unit.clone(),
                weapon: menu.selected().weapon_id(),
            }
        }
        '+' => Command::ApplySettings {
            settings: scene
                .settings
                .with_width_delta(RESIZE_STEP)
                .with_height_delta(RESIZE_STEP),
        },
        '-' => Command::ApplySettings {
            settings: scene
                .settings
                .with_width_delta(-RESIZE_STEP)
                .with_height_delta(-RESIZE_STEP),
        },
        'l' => Command::LockSeed {
            locked: !scene.settings.seed_locked(),
        },
        'x' => return Some(KeyAction::Quit),
        _ => return None,
    };
    Some(KeyAction::Command(command))
}

/// Key presses typed on one input line; an empty line is a single Enter.
pub(crate) fn presses(line: &str) -> Vec<char> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if line.is_empty() {
        vec!['\n']
    } else {
        line.chars().collect()
    }
}

#[cfg(test)]
mod tests {
    use iso_tactics_core::{Level, LevelSettings, UnitId, WeaponId};
    use iso_tactics_rendering::Loadout;

    use super::*;

    fn scene() -> Scene {
        let level = Level::from_layout(&["#####", "#SPG#", "#####"], 48).expect("valid layout");
        let mut scene = Scene::from_level(&level, LevelSettings::new(9, 9, 48, 0.0).with_seed(3));
        scene.loadout = Some(Loadout {
            unit: UnitId::new("player-1"),
            weapon: WeaponId::new("player-lance"),
        });
        scene
    }

    #[test]
    fn movement_keys_map_to_cursor_directions() {
        let scene = scene();

        assert_eq!(
            decode('W', &scene),
            Some(KeyAction::Command(Command::MoveCursor {
                direction: Direction::North
            }))
        );
        assert_eq!(
            decode('d', &scene),
            Some(KeyAction::Command(Command::MoveCursor {
                direction: Direction::East
            }))
        );
    }

    #[test]
    fn cycle_and_reset_keys() {
        let scene = scene();

        assert_eq!(
            decode('e', &scene),
            Some(KeyAction::Command(Command::CycleUnit {
                step: CycleStep::Forward
            }))
        );
        assert_eq!(
            decode('n', &scene),
            Some(KeyAction::Command(Command::Reset { regenerate: true }))
        );
        assert_eq!(decode('x', &scene), Some(KeyAction::Quit));
        assert_eq!(decode('?', &scene), None);
    }

    #[test]
    fn weapon_key_equips_next_catalog_entry() {
        let scene = scene();

        assert_eq!(
            decode('v', &scene),
            Some(KeyAction::Command(Command::EquipWeapon {
                unit: UnitId::new("player-1"),
                weapon: WeaponId::new("enemy-pistol"),
            }))
        );
    }

    #[test]
    fn weapon_key_is_ignored_without_loadout() {
        let mut scene = scene();
        scene.loadout = None;

        assert_eq!(decode('v', &scene), None);
    }

    #[test]
    fn resize_keys_keep_dimensions_odd() {
        let scene = scene();

        let Some(KeyAction::Command(Command::ApplySettings { settings })) = decode('+', &scene) else {
            panic!("resize key should apply settings");
        };
        assert_eq!((settings.width(), settings.height()), (11, 11));
        assert_eq!(settings.seed(), 3);
    }

    #[test]
    fn lock_key_toggles_the_lock_without_new_settings() {
        let scene = scene();

        assert_eq!(
            decode('l', &scene),
            Some(KeyAction::Command(Command::LockSeed { locked: false }))
        );
    }

    #[test]
    fn empty_line_is_one_enter_press() {
        assert_eq!(presses("\n"), vec!['\n']);
        assert_eq!(presses("\r\n"), vec!['\n']);
        assert_eq!(
            decode('\n', &scene()),
            Some(KeyAction::Command(Command::Confirm))
        );
    }

    #[test]
    fn line_splits_into_presses() {
        assert_eq!(presses("ddxs\n"), vec!['d', 'd', 'x', 's']);
    }
}
