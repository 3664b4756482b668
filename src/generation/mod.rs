//! # Generation Module
//!
//! Procedural floor generation for the tower.
//!
//! Each floor is a rectangular grid of rooms. Generation first pins the
//! critical-path rooms (start, keycards, objective, elevator), then carves
//! and populates every room, validating door-to-door reachability with a
//! retry loop. All randomness flows through one injected [`StdRng`] so a
//! seed reproduces a floor exactly.

pub mod encounters;
pub mod floor;
pub mod loot;

pub use encounters::*;
pub use floor::*;
pub use loot::*;

use crate::OvertimeResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls the world dimensions, difficulty level, and the density knobs
/// for per-room content placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// World width in rooms
    pub world_width: i32,
    /// World height in rooms
    pub world_height: i32,
    /// Tower level being generated (difficulty scale)
    pub tower_level: u32,
    /// Probability of a vending machine per generic room (0.0 to 1.0)
    pub vending_chance: f64,
    /// Probability a generic room becomes a meeting room (0.0 to 1.0)
    pub meeting_room_chance: f64,
    /// Macro obstacle budget per room (meeting tables, server racks)
    pub max_macro_obstacles: u32,
    /// Minimum single-tile decorations per room
    pub min_decorations: u32,
    /// Maximum single-tile decorations per room
    pub max_decorations: u32,
    /// Layout attempts per room before giving up on obstacles
    pub room_validation_attempts: u32,
    /// Rejection-sampling attempts per critical-path node
    pub critical_path_attempts: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert!(config.world_width * config.world_height >= 5);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            world_width: 6,
            world_height: 6,
            tower_level: 1,
            vending_chance: 0.2,
            meeting_room_chance: 0.10,
            max_macro_obstacles: 2,
            min_decorations: 2,
            max_decorations: 4,
            room_validation_attempts: 3,
            critical_path_attempts: 128,
        }
    }

    /// Creates a configuration for testing with a smaller, simpler world.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            world_width: 5,
            world_height: 5,
            tower_level: 1,
            vending_chance: 0.1,
            meeting_room_chance: 0.0,
            max_macro_obstacles: 1,
            min_decorations: 1,
            max_decorations: 2,
            room_validation_attempts: 3,
            critical_path_attempts: 128,
        }
    }

    /// Creates a configuration for a specific tower level, keeping the
    /// standard world size.
    pub fn for_tower_level(seed: u64, tower_level: u32) -> Self {
        Self {
            tower_level,
            ..Self::new(seed)
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// All generation systems implement this trait, so every generator takes
/// its configuration and RNG explicitly and can be validated after the
/// fact.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> OvertimeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> OvertimeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Creates a seeded random number generator from a bare seed.
    pub fn seeded_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert!(config.world_width >= 2);
        assert!(config.world_height >= 2);
        assert!(config.min_decorations <= config.max_decorations);
        assert!((0.0..=1.0).contains(&config.vending_chance));
        assert!((0.0..=1.0).contains(&config.meeting_room_chance));
    }

    #[test]
    fn test_default_config_seed() {
        let config = GenerationConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.tower_level, 1);
    }

    #[test]
    fn test_testing_config_is_smaller() {
        let config = GenerationConfig::for_testing(7);
        assert!(config.world_width <= GenerationConfig::new(7).world_width);
        assert_eq!(config.meeting_room_chance, 0.0);
    }

    #[test]
    fn test_level_config_keeps_world_size() {
        let config = GenerationConfig::for_tower_level(7, 12);
        assert_eq!(config.tower_level, 12);
        assert_eq!(config.world_width, GenerationConfig::new(7).world_width);
    }

    #[test]
    fn test_utils_rng_creation() {
        let config = GenerationConfig::new(12345);
        let _rng = utils::create_rng(&config);
        // RNG creation should not panic
    }
}
