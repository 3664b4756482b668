//! # Items Module
//!
//! The item catalog: consumables, keycards, weapons, and the floor
//! objective. Inventory entries are [`ItemInstance`]s so that per-copy state
//! (remaining uses) can diverge from the catalog defaults.

use crate::game::GridPos;
use serde::{Deserialize, Serialize};

/// Broad item category, driving how an item can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemClass {
    /// Consumed from the inventory for an immediate effect
    Consumable,
    /// Presented to locked objects; never consumed
    Key,
    /// Usable for ranged attacks
    Weapon,
    /// Deposited at the strongbox to complete the floor objective
    Objective,
}

/// Distance metric a weapon uses for its range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMetric {
    /// Taxicab distance; thrown weapons
    Manhattan,
    /// King-move distance; adjacency-class weapons
    Chebyshev,
}

/// Combat profile for a weapon-class item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Damage per hit
    pub damage: i32,
    /// Maximum attack distance under `metric`
    pub range: u32,
    /// Distance metric for the range check
    pub metric: RangeMetric,
    /// Whether a surviving target is stunned for one turn
    pub stuns: bool,
}

impl WeaponSpec {
    /// Whether a target tile is within this weapon's reach.
    pub fn in_range(&self, from: GridPos, to: GridPos) -> bool {
        let dist = match self.metric {
            RangeMetric::Manhattan => from.manhattan_distance(to),
            RangeMetric::Chebyshev => from.chebyshev_distance(to),
        };
        dist <= self.range
    }
}

/// Every item kind in the tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores hit points and washes away burnout
    Coffee,
    /// Generic key-class card; opens standard locked doors
    AccessCard,
    /// Blue clearance; opens locked doors and security barriers
    BlueKeycard,
    /// Red clearance; arms the elevator
    RedKeycard,
    /// The floor objective, deposited at the strongbox
    Report,
    /// Thrown weapon with a stumpy arc and a stunning finish
    Stapler,
    /// Adjacent-only weapon, mean in close quarters
    LetterOpener,
}

impl ItemKind {
    /// Display name used in messages and inventories.
    pub fn display_name(self) -> &'static str {
        match self {
            ItemKind::Coffee => "Stale Coffee",
            ItemKind::AccessCard => "Access Card",
            ItemKind::BlueKeycard => "Blue Keycard",
            ItemKind::RedKeycard => "Red Keycard",
            ItemKind::Report => "Quarterly Report",
            ItemKind::Stapler => "Red Stapler",
            ItemKind::LetterOpener => "Letter Opener",
        }
    }

    /// Sprite key for frontends.
    pub fn sprite_key(self) -> &'static str {
        match self {
            ItemKind::Coffee => "item_coffee",
            ItemKind::AccessCard => "item_access_card",
            ItemKind::BlueKeycard => "item_keycard_blue",
            ItemKind::RedKeycard => "item_keycard_red",
            ItemKind::Report => "item_report",
            ItemKind::Stapler => "item_stapler",
            ItemKind::LetterOpener => "item_letter_opener",
        }
    }

    /// The item's broad category.
    pub fn class(self) -> ItemClass {
        match self {
            ItemKind::Coffee => ItemClass::Consumable,
            ItemKind::AccessCard | ItemKind::BlueKeycard | ItemKind::RedKeycard => ItemClass::Key,
            ItemKind::Report => ItemClass::Objective,
            ItemKind::Stapler | ItemKind::LetterOpener => ItemClass::Weapon,
        }
    }

    /// Catalog default for use tracking. None means unlimited.
    pub fn default_uses(self) -> Option<u32> {
        match self {
            ItemKind::Coffee => Some(1),
            ItemKind::Stapler => Some(5),
            _ => None,
        }
    }

    /// Combat profile, for weapon-class items only.
    pub fn weapon_spec(self) -> Option<WeaponSpec> {
        match self {
            ItemKind::Stapler => Some(WeaponSpec {
                damage: 8,
                range: 4,
                metric: RangeMetric::Manhattan,
                stuns: true,
            }),
            ItemKind::LetterOpener => Some(WeaponSpec {
                damage: 7,
                range: 1,
                metric: RangeMetric::Chebyshev,
                stuns: false,
            }),
            _ => None,
        }
    }
}

/// One inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Which catalog item this is
    pub kind: ItemKind,
    /// Remaining uses, when the catalog tracks them
    pub uses: Option<u32>,
}

impl ItemInstance {
    /// Creates an instance with the catalog's default use count.
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            uses: kind.default_uses(),
        }
    }

    /// Spends one use. Returns true when the instance is now depleted and
    /// should be removed from the inventory.
    pub fn expend_use(&mut self) -> bool {
        match self.uses.as_mut() {
            Some(uses) => {
                *uses = uses.saturating_sub(1);
                *uses == 0
            }
            None => false,
        }
    }
}
