//! # Game Module
//!
//! Core world representation, entities, and the turn engine.
//!
//! This module contains the fundamental building blocks of Overtime:
//! - Game state management and persistence
//! - Room grids, enemies, interaction objects, and items
//! - Enemy behavior and interaction resolution
//! - The turn pipeline that ties a player action to a finished turn

pub mod ai;
pub mod entities;
pub mod interaction;
pub mod items;
pub mod objects;
pub mod state;
pub mod turn;
pub mod world;

pub use ai::*;
pub use entities::*;
pub use interaction::*;
pub use items::*;
pub use objects::*;
pub use state::*;
pub use turn::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tile coordinate inside a room's collision grid.
///
/// Also reused for room-graph coordinates, where each unit is one room
/// instead of one tile.
///
/// # Examples
///
/// ```
/// use overtime::GridPos;
///
/// let pos = GridPos::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let neighbors = pos.cardinal_neighbors();
/// assert_eq!(neighbors.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::GridPos;
    ///
    /// let a = GridPos::new(0, 0);
    /// let b = GridPos::new(3, 4);
    /// assert_eq!(a.manhattan_distance(b), 7);
    /// ```
    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Calculates the Chebyshev (king-move) distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::GridPos;
    ///
    /// let a = GridPos::new(0, 0);
    /// let b = GridPos::new(3, 4);
    /// assert_eq!(a.chebyshev_distance(b), 4);
    /// ```
    pub fn chebyshev_distance(self, other: GridPos) -> u32 {
        (self.x - other.x).abs().max((self.y - other.y).abs()) as u32
    }

    /// Returns the 4 cardinal neighbor positions.
    pub fn cardinal_neighbors(self) -> Vec<GridPos> {
        vec![
            GridPos::new(self.x, self.y - 1), // N
            GridPos::new(self.x - 1, self.y), // W
            GridPos::new(self.x + 1, self.y), // E
            GridPos::new(self.x, self.y + 1), // S
        ]
    }

    /// Checks whether another position is exactly one cardinal step away.
    pub fn is_cardinal_adjacent(self, other: GridPos) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Rotates this position 90 degrees clockwise when treated as a step
    /// delta. Used for patrol direction changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::GridPos;
    ///
    /// let east = GridPos::new(1, 0);
    /// assert_eq!(east.rotated_clockwise(), GridPos::new(0, 1));
    /// ```
    pub fn rotated_clockwise(self) -> GridPos {
        GridPos::new(-self.y, self.x)
    }

    /// Reduces this delta to a per-axis unit step.
    pub fn signum(self) -> GridPos {
        GridPos::new(self.x.signum(), self.y.signum())
    }
}

impl std::ops::Add for GridPos {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for GridPos {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Cardinal movement directions.
///
/// Movement in the tower is 4-way; there is no diagonal stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a unit position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::{Direction, GridPos};
    ///
    /// assert_eq!(Direction::North.to_delta(), GridPos::new(0, -1));
    /// ```
    pub fn to_delta(self) -> GridPos {
        match self {
            Direction::North => GridPos::new(0, -1),
            Direction::South => GridPos::new(0, 1),
            Direction::East => GridPos::new(1, 0),
            Direction::West => GridPos::new(-1, 0),
        }
    }

    /// Converts a unit position delta to a direction.
    ///
    /// Returns None if the delta is not a single cardinal step.
    pub fn from_delta(delta: GridPos) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// Returns the opposite direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Returns all 4 cardinal directions.
    pub fn all() -> Vec<Direction> {
        vec![
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

/// Unique identifier for enemies and interaction objects.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}
