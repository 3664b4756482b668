//! # Loot Tables
//!
//! Credit rewards, defeat drops, and the vending machine roll.

use crate::game::{Archetype, ItemKind};
use rand::rngs::StdRng;
use rand::Rng;

/// Chance a defeated enemy leaves an item behind.
const DROP_CHANCE: f64 = 0.5;

/// Credits paid out for a defeat, drawn uniformly from the archetype's
/// bounty range. Roombas pay the most; nobody said the tower was fair.
pub fn credit_reward(archetype: Archetype, rng: &mut StdRng) -> u32 {
    match archetype {
        Archetype::Intern => rng.gen_range(2..=4),
        Archetype::Manager => rng.gen_range(4..=8),
        Archetype::Printer => rng.gen_range(5..=10),
        Archetype::Roomba => rng.gen_range(8..=15),
    }
}

/// Coin-flip drop with a per-archetype item bias. Managers tend to drop
/// their access cards; printers shed staplers.
pub fn roll_drop(archetype: Archetype, rng: &mut StdRng) -> Option<ItemKind> {
    if !rng.gen_bool(DROP_CHANCE) {
        return None;
    }

    let roll = rng.gen_range(0..100);
    let item = match archetype {
        Archetype::Intern => {
            if roll < 70 {
                ItemKind::Coffee
            } else {
                ItemKind::AccessCard
            }
        }
        Archetype::Roomba => {
            if roll < 50 {
                ItemKind::Coffee
            } else {
                ItemKind::Stapler
            }
        }
        Archetype::Manager => {
            if roll < 70 {
                ItemKind::AccessCard
            } else {
                ItemKind::Coffee
            }
        }
        Archetype::Printer => {
            if roll < 60 {
                ItemKind::Stapler
            } else {
                ItemKind::Coffee
            }
        }
    };
    Some(item)
}

/// What falls out of the vending machine after the money goes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendingOutcome {
    /// Money gone, nothing dispensed, machine broken.
    Jammed,
    /// The machine whirrs and produces nothing.
    Nothing,
    /// An actual product.
    Dispensed(ItemKind),
}

/// One d100 pull: 1-10 jams, 11-50 nothing, 51-90 coffee, 91-100 stapler.
pub fn roll_vending(rng: &mut StdRng) -> VendingOutcome {
    let roll = rng.gen_range(1..=100);
    if roll <= 10 {
        VendingOutcome::Jammed
    } else if roll <= 50 {
        VendingOutcome::Nothing
    } else if roll <= 90 {
        VendingOutcome::Dispensed(ItemKind::Coffee)
    } else {
        VendingOutcome::Dispensed(ItemKind::Stapler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_credit_rewards_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            assert!((2..=4).contains(&credit_reward(Archetype::Intern, &mut rng)));
            assert!((4..=8).contains(&credit_reward(Archetype::Manager, &mut rng)));
            assert!((5..=10).contains(&credit_reward(Archetype::Printer, &mut rng)));
            assert!((8..=15).contains(&credit_reward(Archetype::Roomba, &mut rng)));
        }
    }

    #[test]
    fn test_drop_rate_is_roughly_half() {
        let mut rng = StdRng::seed_from_u64(9);
        let drops = (0..2000)
            .filter(|_| roll_drop(Archetype::Intern, &mut rng).is_some())
            .count();
        assert!((800..=1200).contains(&drops), "drop count {}", drops);
    }

    #[test]
    fn test_intern_drops_favor_coffee() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut coffee = 0;
        let mut cards = 0;
        for _ in 0..2000 {
            match roll_drop(Archetype::Intern, &mut rng) {
                Some(ItemKind::Coffee) => coffee += 1,
                Some(ItemKind::AccessCard) => cards += 1,
                Some(other) => panic!("intern dropped {:?}", other),
                None => {}
            }
        }
        assert!(coffee > cards, "coffee {} cards {}", coffee, cards);
    }

    #[test]
    fn test_manager_drops_favor_access_cards() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut coffee = 0;
        let mut cards = 0;
        for _ in 0..2000 {
            match roll_drop(Archetype::Manager, &mut rng) {
                Some(ItemKind::Coffee) => coffee += 1,
                Some(ItemKind::AccessCard) => cards += 1,
                Some(other) => panic!("manager dropped {:?}", other),
                None => {}
            }
        }
        assert!(cards > coffee, "cards {} coffee {}", cards, coffee);
    }

    #[test]
    fn test_vending_distribution_is_sane() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut jams = 0;
        let mut nothing = 0;
        let mut coffee = 0;
        let mut staplers = 0;
        for _ in 0..10_000 {
            match roll_vending(&mut rng) {
                VendingOutcome::Jammed => jams += 1,
                VendingOutcome::Nothing => nothing += 1,
                VendingOutcome::Dispensed(ItemKind::Coffee) => coffee += 1,
                VendingOutcome::Dispensed(ItemKind::Stapler) => staplers += 1,
                VendingOutcome::Dispensed(other) => panic!("machine produced {:?}", other),
            }
        }
        assert!((500..=1500).contains(&jams), "jams {}", jams);
        assert!((3500..=4500).contains(&nothing), "nothing {}", nothing);
        assert!((3500..=4500).contains(&coffee), "coffee {}", coffee);
        assert!((500..=1500).contains(&staplers), "staplers {}", staplers);
    }
}
