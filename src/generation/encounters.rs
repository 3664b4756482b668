//! # Encounter Tables
//!
//! Enemy spawn counts and archetype picks, scaled by tower level.

use crate::config::{MAX_ENEMIES_PER_ROOM, MIN_ENEMIES_PER_ROOM};
use crate::game::Archetype;
use rand::rngs::StdRng;
use rand::Rng;

/// How many enemies a generic room gets at a given tower level.
///
/// Grows by two enemies every five levels, clamped to the per-room bounds.
///
/// # Examples
///
/// ```
/// use overtime::generation::encounters::enemy_count_for_level;
///
/// assert_eq!(enemy_count_for_level(1), 2);
/// assert_eq!(enemy_count_for_level(10), 6);
/// assert_eq!(enemy_count_for_level(100), 12);
/// ```
pub fn enemy_count_for_level(tower_level: u32) -> u32 {
    (tower_level * 2 / 5 + 2).clamp(MIN_ENEMIES_PER_ROOM, MAX_ENEMIES_PER_ROOM)
}

/// Uniform archetype pick for generic room spawns.
pub fn random_archetype(rng: &mut StdRng) -> Archetype {
    match rng.gen_range(0..4) {
        0 => Archetype::Intern,
        1 => Archetype::Roomba,
        2 => Archetype::Printer,
        _ => Archetype::Manager,
    }
}

/// Guard for the objective alcove, scaled with depth: interns early,
/// managers in the mid-game, a coin flip between the heavies afterwards.
pub fn guard_archetype(tower_level: u32, rng: &mut StdRng) -> Archetype {
    if tower_level < 3 {
        Archetype::Intern
    } else if tower_level < 6 {
        Archetype::Manager
    } else if rng.gen_bool(0.5) {
        Archetype::Printer
    } else {
        Archetype::Manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_enemy_count_scales_with_level() {
        assert_eq!(enemy_count_for_level(0), 2);
        assert_eq!(enemy_count_for_level(1), 2);
        assert_eq!(enemy_count_for_level(5), 4);
        assert_eq!(enemy_count_for_level(20), 10);
        assert_eq!(enemy_count_for_level(25), 12);
        assert_eq!(enemy_count_for_level(500), 12);
    }

    #[test]
    fn test_random_archetype_covers_all_four() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(random_archetype(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_guard_scales_with_depth() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(guard_archetype(1, &mut rng), Archetype::Intern);
        assert_eq!(guard_archetype(2, &mut rng), Archetype::Intern);
        assert_eq!(guard_archetype(3, &mut rng), Archetype::Manager);
        assert_eq!(guard_archetype(5, &mut rng), Archetype::Manager);

        for _ in 0..100 {
            let pick = guard_archetype(9, &mut rng);
            assert!(matches!(pick, Archetype::Printer | Archetype::Manager));
        }
    }
}
