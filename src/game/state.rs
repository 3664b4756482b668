//! # Game State Module
//!
//! Central game state for one run: the floor's room map, the player's
//! position and stats, the ranked inventory, and the run's terminal phase.
//!
//! `GameState` is the single mutable aggregate. The generator produces one
//! per floor; the turn engine, behavior engine, and interaction resolver all
//! borrow it and mutate it in place. Everything on it serializes, so a save
//! is just the struct as JSON.

use crate::config::{DEFAULT_MAX_HP, MAX_BURNOUT};
use crate::game::world::{parse_room_id, room_id};
use crate::game::{EntityId, GridPos, ItemClass, ItemInstance, ItemKind, Room};
use crate::{OvertimeError, OvertimeResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Terminal phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// The run is in progress
    Playing,
    /// The player rode the elevator out; advance to the next floor
    FloorCleared,
    /// The player's hit points reached zero
    Defeated,
}

/// Relative weight of a message event, for frontends that filter or style
/// their log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageImportance {
    Low,
    Normal,
    High,
    Critical,
}

/// Notification emitted by the simulation for frontends to consume.
///
/// The core never talks to a renderer or HUD directly; every observable
/// consequence of a turn is carried in these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Narrative or feedback text for the message log
    Message {
        text: String,
        importance: MessageImportance,
    },
    /// The player moved to a new tile in the current room
    PlayerMoved { to: GridPos },
    /// Hit points, burnout, or credits changed
    StatsChanged { hp: i32, burnout: i32, credits: u32 },
    /// The inventory list changed
    InventoryChanged,
    /// The player entered a room
    RoomEntered { room_id: String },
    /// An enemy took damage
    EnemyDamaged { enemy_id: EntityId, damage: i32 },
    /// An enemy was defeated
    EnemyDefeated {
        enemy_id: EntityId,
        credits_dropped: u32,
    },
    /// The player took damage
    PlayerDamaged { damage: i32 },
    /// A consumable was used from the inventory
    ItemUsed { kind: ItemKind },
    /// The quarterly report was deposited at the strongbox
    ObjectiveSecured,
    /// The elevator accepted the player; the floor is cleared
    FloorCleared { tower_level: u32 },
    /// The player's hit points reached zero
    PlayerDied,
}

impl GameEvent {
    /// Shorthand for a normal-importance message event.
    pub fn message(text: impl Into<String>) -> Self {
        GameEvent::Message {
            text: text.into(),
            importance: MessageImportance::Normal,
        }
    }
}

/// Central game state for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// `"x_y"` identifier of the room the player is in. Always a key of
    /// `rooms`.
    pub current_room_id: String,
    /// Player tile position within the current room
    pub player: GridPos,
    /// Current hit points, clamped to `[0, max_hp]`
    pub hp: i32,
    /// Maximum hit points
    pub max_hp: i32,
    /// Stress meter, clamped to `[0, 100]`
    pub burnout: i32,
    /// Ranked inventory; order is presentation order
    pub inventory: Vec<ItemInstance>,
    /// Currency counter
    pub credits: u32,
    /// Every room on this floor, keyed by `"x_y"` identifier
    pub rooms: HashMap<String, Room>,
    /// Rooms the player has entered at least once
    pub visited_rooms: HashSet<String>,
    /// Current floor number; drives difficulty scaling
    pub tower_level: u32,
    /// Whether the quarterly report has been filed this floor
    pub objective_complete: bool,
    /// Terminal phase of the run
    pub completion: RunPhase,
    /// Seed recorded for diagnostics and saves
    pub rng_seed: u64,
}

impl GameState {
    /// Creates an empty state with default player stats and no rooms.
    ///
    /// Mostly useful for tests that assemble rooms by hand; real runs come
    /// from the floor generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::GameState;
    ///
    /// let state = GameState::new(12345);
    /// assert_eq!(state.hp, 20);
    /// assert_eq!(state.burnout, 0);
    /// assert_eq!(state.rng_seed, 12345);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            current_room_id: room_id(0, 0),
            player: GridPos::new(5, 5),
            hp: DEFAULT_MAX_HP,
            max_hp: DEFAULT_MAX_HP,
            burnout: 0,
            inventory: Vec::new(),
            credits: 0,
            rooms: HashMap::new(),
            visited_rooms: HashSet::new(),
            tower_level: 1,
            objective_complete: false,
            completion: RunPhase::Playing,
            rng_seed: seed,
        }
    }

    /// The room the player is currently in.
    pub fn current_room(&self) -> OvertimeResult<&Room> {
        self.rooms.get(&self.current_room_id).ok_or_else(|| {
            OvertimeError::InvalidState(format!(
                "current room {} missing from room map",
                self.current_room_id
            ))
        })
    }

    /// The room the player is currently in, mutably.
    pub fn current_room_mut(&mut self) -> OvertimeResult<&mut Room> {
        let id = self.current_room_id.clone();
        self.rooms.get_mut(&id).ok_or_else(|| {
            OvertimeError::InvalidState(format!("current room {} missing from room map", id))
        })
    }

    /// Applies damage to the player, flooring hit points at zero.
    pub fn apply_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    /// Heals the player up to the hit point cap.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Adjusts burnout by a signed delta, clamped to `[0, 100]`.
    pub fn add_burnout(&mut self, delta: i32) {
        self.burnout = (self.burnout + delta).clamp(0, MAX_BURNOUT);
    }

    /// Whether the run has reached a terminal phase.
    pub fn is_run_over(&self) -> bool {
        self.completion != RunPhase::Playing
    }

    /// Whether any inventory entry is of the given kind.
    pub fn has_item(&self, kind: ItemKind) -> bool {
        self.inventory.iter().any(|item| item.kind == kind)
    }

    /// Index of the first inventory entry of the given kind.
    pub fn find_item(&self, kind: ItemKind) -> Option<usize> {
        self.inventory.iter().position(|item| item.kind == kind)
    }

    /// Whether the player carries any key-class card.
    pub fn has_any_keycard(&self) -> bool {
        self.inventory
            .iter()
            .any(|item| item.kind.class() == ItemClass::Key)
    }

    /// Appends an item to the inventory.
    pub fn add_item(&mut self, item: ItemInstance) {
        self.inventory.push(item);
    }

    /// Removes and returns the first inventory entry of the given kind.
    pub fn take_item(&mut self, kind: ItemKind) -> Option<ItemInstance> {
        let idx = self.find_item(kind)?;
        Some(self.inventory.remove(idx))
    }

    /// Room-graph coordinates of the current room.
    pub fn current_room_coords(&self) -> OvertimeResult<(i32, i32)> {
        parse_room_id(&self.current_room_id).ok_or_else(|| {
            OvertimeError::InvalidState(format!(
                "room id {} is not of the form x_y",
                self.current_room_id
            ))
        })
    }

    /// Identifier of the neighboring room in a direction, if it exists on
    /// this floor.
    pub fn neighbor_room_id(&self, dir: crate::game::Direction) -> OvertimeResult<Option<String>> {
        let (x, y) = self.current_room_coords()?;
        let delta = dir.to_delta();
        let id = room_id(x + delta.x, y + delta.y);
        Ok(self.rooms.contains_key(&id).then_some(id))
    }

    /// Moves the player into a room, marking it visited.
    ///
    /// The caller decides the entry tile (room transitions use the door on
    /// the opposite edge).
    pub fn enter_room(&mut self, id: String, entry: GridPos) -> OvertimeResult<()> {
        if !self.rooms.contains_key(&id) {
            return Err(OvertimeError::InvalidState(format!(
                "cannot enter unknown room {}",
                id
            )));
        }
        self.current_room_id = id.clone();
        self.visited_rooms.insert(id);
        self.player = entry;
        Ok(())
    }

    /// Current stats snapshot as an event.
    pub fn stats_event(&self) -> GameEvent {
        GameEvent::StatsChanged {
            hp: self.hp,
            burnout: self.burnout,
            credits: self.credits,
        }
    }

    /// Saves the game state to JSON.
    pub fn save_to_json(&self) -> OvertimeResult<String> {
        serde_json::to_string_pretty(self).map_err(OvertimeError::from)
    }

    /// Loads game state from JSON.
    pub fn load_from_json(json: &str) -> OvertimeResult<Self> {
        let state: Self = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }

    /// Checks structural integrity: the current room must exist, the player
    /// must be inside the grid, and stats must be within their ranges.
    pub fn validate(&self) -> OvertimeResult<()> {
        let room = self.current_room()?;
        if !room.in_bounds(self.player) {
            return Err(OvertimeError::InvalidState(format!(
                "player at {:?} is outside the room grid",
                self.player
            )));
        }
        if self.hp < 0 || self.hp > self.max_hp {
            return Err(OvertimeError::InvalidState(format!(
                "hp {} outside [0, {}]",
                self.hp, self.max_hp
            )));
        }
        if self.burnout < 0 || self.burnout > MAX_BURNOUT {
            return Err(OvertimeError::InvalidState(format!(
                "burnout {} outside [0, {}]",
                self.burnout, MAX_BURNOUT
            )));
        }
        Ok(())
    }
}
