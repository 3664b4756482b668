//! # Objects Module
//!
//! Interactive furniture and fixtures. Everything the player can bump into
//! that isn't an enemy is an [`InteractionObject`]: pickups, doors, vending
//! machines, the elevator, and plain flavor blockers.
//!
//! Object behavior lives in one place, the `kind` sum type, so the
//! interaction resolver can match exhaustively and the compiler flags any
//! variant a new feature forgets to handle.

use crate::game::{new_entity_id, EntityId, GridPos, ItemKind};
use serde::{Deserialize, Serialize};

/// Behavior-bearing variant of an interaction object.
///
/// Each variant carries only the fields its behavior needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// An item lying on the floor; picked up on bump
    Pickup { item: ItemKind },
    /// Generic locked door; accepts any key-class card
    LockedDoor,
    /// Security barrier; demands blue clearance specifically
    Barrier,
    /// Floor exit; requires a red keycard and a filed report
    Elevator,
    /// Objective deposit point for the quarterly report
    Strongbox,
    /// Dispenses a random outcome for a flat fee, then breaks
    Vending { cost: u32 },
    /// Limited-use heal and stress relief
    WaterCooler { uses: u32 },
    /// Prints its text when bumped
    Readable { text: String },
    /// Flavor blocker
    Desk,
    /// Flavor blocker
    Plant,
    /// Humming flavor blocker that frays nerves on contact
    ServerRack,
    /// Large flavor blocker used by macro layouts
    MeetingTable,
}

impl ObjectKind {
    /// Default footprint (width, height) for this kind.
    fn default_size(&self) -> (u32, u32) {
        match self {
            ObjectKind::MeetingTable => (3, 2),
            ObjectKind::ServerRack => (2, 1),
            _ => (1, 1),
        }
    }

    /// Default sprite key for this kind.
    fn default_sprite(&self) -> String {
        match self {
            ObjectKind::Pickup { item } => item.sprite_key().to_string(),
            ObjectKind::LockedDoor => "locked_door".to_string(),
            ObjectKind::Barrier => "barrier".to_string(),
            ObjectKind::Elevator => "elevator".to_string(),
            ObjectKind::Strongbox => "strongbox".to_string(),
            ObjectKind::Vending { .. } => "vending_machine".to_string(),
            ObjectKind::WaterCooler { .. } => "water_cooler".to_string(),
            ObjectKind::Readable { .. } => "sign".to_string(),
            ObjectKind::Desk => "desk".to_string(),
            ObjectKind::Plant => "plant".to_string(),
            ObjectKind::ServerRack => "server_rack".to_string(),
            ObjectKind::MeetingTable => "meeting_table".to_string(),
        }
    }
}

/// An interactive, movement-blocking fixture in a room.
///
/// Objects occupy a rectangle of tiles anchored at `pos` (top-left). Most
/// are a single tile; macro furniture spans several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionObject {
    /// Unique identifier
    pub id: EntityId,
    /// Top-left anchor tile
    pub pos: GridPos,
    /// Footprint width in tiles
    pub width: u32,
    /// Footprint height in tiles
    pub height: u32,
    /// Sprite key for frontends
    pub sprite: String,
    /// Behavior variant
    pub kind: ObjectKind,
}

impl InteractionObject {
    /// Creates an object with its kind's default footprint and sprite.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::{GridPos, InteractionObject, ObjectKind};
    ///
    /// let table = InteractionObject::new(ObjectKind::MeetingTable, GridPos::new(4, 4));
    /// assert_eq!((table.width, table.height), (3, 2));
    /// assert!(table.occupies(GridPos::new(6, 5)));
    /// assert!(!table.occupies(GridPos::new(7, 4)));
    /// ```
    pub fn new(kind: ObjectKind, pos: GridPos) -> Self {
        let (width, height) = kind.default_size();
        let sprite = kind.default_sprite();
        Self {
            id: new_entity_id(),
            pos,
            width,
            height,
            sprite,
            kind,
        }
    }

    /// Convenience constructor for a floor pickup.
    pub fn pickup(item: ItemKind, pos: GridPos) -> Self {
        Self::new(ObjectKind::Pickup { item }, pos)
    }

    /// Overrides the default footprint.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Whether this object's footprint covers a tile.
    pub fn occupies(&self, tile: GridPos) -> bool {
        tile.x >= self.pos.x
            && tile.y >= self.pos.y
            && tile.x < self.pos.x + self.width as i32
            && tile.y < self.pos.y + self.height as i32
    }

    /// All tiles covered by this object's footprint.
    pub fn footprint(&self) -> Vec<GridPos> {
        let mut tiles = Vec::with_capacity((self.width * self.height) as usize);
        for dy in 0..self.height as i32 {
            for dx in 0..self.width as i32 {
                tiles.push(GridPos::new(self.pos.x + dx, self.pos.y + dy));
            }
        }
        tiles
    }

    /// Whether two objects' footprints share any tile.
    pub fn overlaps(&self, other: &InteractionObject) -> bool {
        !(self.pos.x >= other.pos.x + other.width as i32
            || other.pos.x >= self.pos.x + self.width as i32
            || self.pos.y >= other.pos.y + other.height as i32
            || other.pos.y >= self.pos.y + self.height as i32)
    }
}
