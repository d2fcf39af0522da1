//! Static weapon catalog and the menu used to browse it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Faction;

/// Rock-paper-scissors affinity carried by a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponTag {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
}

impl WeaponTag {
    /// Single-letter badge shown next to the weapon name.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Rock => 'R',
            Self::Paper => 'P',
            Self::Scissors => 'S',
        }
    }
}

/// Shape of the area a skill affects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillPattern {
    /// A single tile.
    SingleTarget,
    /// A widening wedge in front of the user.
    Cone,
    /// A straight line of tiles.
    Line,
}

/// Skill granted by a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponSkill {
    /// Stable identifier of the skill.
    pub id: &'static str,
    /// Name shown in menus.
    pub display_name: &'static str,
    /// Area the skill affects.
    pub pattern: SkillPattern,
    /// Maximum distance, in tiles, the skill reaches.
    pub range: u32,
    /// Width, in tiles, of the affected area.
    pub width: u32,
    /// Menu description.
    pub description: &'static str,
}

/// Catalog entry describing an equippable weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weapon {
    /// Stable identifier of the weapon.
    pub id: &'static str,
    /// Name shown in menus and the HUD.
    pub display_name: &'static str,
    /// Affinity of the weapon.
    pub tag: WeaponTag,
    /// Base damage dealt.
    pub damage: u32,
    /// Base defence granted.
    pub defense: u32,
    /// Skills the weapon unlocks.
    pub skills: &'static [WeaponSkill],
}

impl Weapon {
    /// Owned identifier referencing this catalog entry.
    #[must_use]
    pub fn weapon_id(&self) -> WeaponId {
        WeaponId::new(self.id)
    }
}

/// Identifier referencing a catalog weapon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(String);

impl WeaponId {
    /// Creates a weapon identifier from its textual form.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Textual form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const AEGIS_LANCE: Weapon = Weapon {
    id: "player-lance",
    display_name: "Aegis Lance",
    tag: WeaponTag::Rock,
    damage: 8,
    defense: 5,
    skills: &[
        WeaponSkill {
            id: "lance-thrust",
            display_name: "Focused Thrust",
            pattern: SkillPattern::SingleTarget,
            range: 3,
            width: 1,
            description: "Stab a single tile up to 3 spaces away.",
        },
        WeaponSkill {
            id: "lance-sweep",
            display_name: "Shield Sweep",
            pattern: SkillPattern::Cone,
            range: 2,
            width: 2,
            description: "Push foes in a short cone while dealing light damage.",
        },
    ],
};

const PULSE_PISTOL: Weapon = Weapon {
    id: "enemy-pistol",
    display_name: "Pulse Pistol",
    tag: WeaponTag::Scissors,
    damage: 6,
    defense: 3,
    skills: &[
        WeaponSkill {
            id: "pistol-shot",
            display_name: "Pulse Shot",
            pattern: SkillPattern::SingleTarget,
            range: 4,
            width: 1,
            description: "Single target ranged shot.",
        },
        WeaponSkill {
            id: "pistol-burst",
            display_name: "Line Burst",
            pattern: SkillPattern::Line,
            range: 3,
            width: 1,
            description: "Fires a piercing beam through aligned tiles.",
        },
    ],
};

static CATALOG: [Weapon; 2] = [AEGIS_LANCE, PULSE_PISTOL];

/// Every weapon available to units, in menu order.
#[must_use]
pub fn catalog() -> &'static [Weapon] {
    &CATALOG
}

/// Catalog entry carrying the provided identifier.
#[must_use]
pub fn lookup(id: &WeaponId) -> Option<&'static Weapon> {
    CATALOG.iter().find(|weapon| weapon.id == id.as_str())
}

/// Weapon issued to new units of the provided faction.
#[must_use]
pub fn default_for(faction: Faction) -> &'static Weapon {
    match faction {
        Faction::Player => &CATALOG[0],
        Faction::Enemy => &CATALOG[1],
    }
}

/// Cursor over the weapon catalog that wraps at both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeaponMenu {
    selected: usize,
}

impl WeaponMenu {
    /// Opens the menu with the provided weapon highlighted, or the first entry.
    #[must_use]
    pub fn open_at(weapon: &WeaponId) -> Self {
        let selected = CATALOG
            .iter()
            .position(|entry| entry.id == weapon.as_str())
            .unwrap_or(0);
        Self { selected }
    }

    /// Moves the highlight by `delta` entries, wrapping around the catalog.
    pub fn move_selection(&mut self, delta: i32) {
        let len = CATALOG.len() as i64;
        let next = (self.selected as i64 + i64::from(delta)).rem_euclid(len);
        self.selected = next as usize;
    }

    /// Index of the highlighted entry.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Highlighted catalog entry.
    #[must_use]
    pub fn selected(&self) -> &'static Weapon {
        &CATALOG[self.selected]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factions_receive_their_default_weapons() {
        assert_eq!(default_for(Faction::Player).display_name, "Aegis Lance");
        assert_eq!(default_for(Faction::Enemy).tag, WeaponTag::Scissors);
    }

    #[test]
    fn lookup_finds_catalog_entries_only() {
        let lance = lookup(&WeaponId::new("player-lance")).expect("lance in catalog");
        assert_eq!(lance.damage, 8);
        assert_eq!(lance.skills.len(), 2);
        assert!(lookup(&WeaponId::new("wooden-spoon")).is_none());
    }

    #[test]
    fn menu_selection_wraps_in_both_directions() {
        let mut menu = WeaponMenu::open_at(&WeaponId::new("enemy-pistol"));
        assert_eq!(menu.selected_index(), 1);

        menu.move_selection(1);
        assert_eq!(menu.selected().id, "player-lance");

        menu.move_selection(-1);
        assert_eq!(menu.selected().id, "enemy-pistol");

        menu.move_selection(-3);
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn unknown_weapon_opens_menu_at_first_entry() {
        let menu = WeaponMenu::open_at(&WeaponId::new("missing"));
        assert_eq!(menu.selected_index(), 0);
    }
}
