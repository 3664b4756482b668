//! # Overtime
//!
//! Simulation core for a turn-based office-tower roguelike. You climb a
//! corporate tower one floor at a time, dodging interns, roombas, managers,
//! and possessed printers while your hit points and burnout meter fight over
//! who gets to end the run first.
//!
//! ## Architecture Overview
//!
//! The crate is split along the seams a frontend would consume it through:
//!
//! - **Game State**: one mutable [`GameState`] aggregate owning the room map,
//!   the player's stats and inventory, and the run's terminal phase
//! - **Floor Generation**: procedural floor layout with a guaranteed-solvable
//!   critical path and per-room generate-and-validate content placement
//! - **Turn Engine**: a linear pipeline that validates player input, applies
//!   movement/combat/interaction, then advances every enemy archetype
//! - **Persistence**: a [`SaveStore`] trait with a JSON file implementation
//!
//! Rendering, audio, and HUD work live in frontends. The core communicates
//! outward exclusively through [`GameEvent`] values returned from each turn.

pub mod game;
pub mod generation;
pub mod input;
pub mod save;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use save::*;

// Explicit re-exports for commonly used types
pub use game::{
    // From ai
    advance_enemies,
    is_threatening,
    // From entities
    Archetype,
    BehaviorState,
    // From world
    Cell,
    Direction,
    Enemy,
    EntityId,
    // From state
    GameEvent,
    GameState,
    GridPos,
    // From objects / items
    InteractionObject,
    ItemClass,
    ItemInstance,
    ItemKind,
    MessageImportance,
    ObjectKind,
    // From turn
    Game,
    PlayerAction,
    Room,
    RunPhase,
    TurnOutcome,
    TurnReport,
};

pub use generation::{FloorGenerator, GenerationConfig, Generator};

pub use save::{JsonFileStore, MemoryStore, SaveStore};

/// Core error type for the Overtime engine.
#[derive(thiserror::Error, Debug)]
pub enum OvertimeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Overtime codebase.
pub type OvertimeResult<T> = Result<T, OvertimeError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Side length of every room's collision grid, in tiles
    pub const ROOM_GRID_SIZE: i32 = 11;

    /// Index of the door tile along each room edge
    pub const DOOR_MIDPOINT: i32 = 5;

    /// Player starting and maximum hit points
    pub const DEFAULT_MAX_HP: i32 = 20;

    /// Upper bound of the burnout stress meter
    pub const MAX_BURNOUT: i32 = 100;

    /// Burnout level at which enemy contact damage doubles
    pub const HIGH_BURNOUT_THRESHOLD: i32 = 50;

    /// Damage dealt by the player's bare melee bump (rolled-up newspaper)
    pub const BASE_MELEE_DAMAGE: i32 = 5;

    /// Burnout gained every time an enemy lands a hit
    pub const BURNOUT_PER_HIT: i32 = 5;

    /// Burnout cost of a sprint action
    pub const SPRINT_BURNOUT_COST: i32 = 4;

    /// Hard cap on enemies spawned in a single room
    pub const MAX_ENEMIES_PER_ROOM: u32 = 12;

    /// Floor of the per-room enemy count, regardless of tower level
    pub const MIN_ENEMIES_PER_ROOM: u32 = 2;
}
