//! # Entities Module
//!
//! Enemy definitions: the four behavior archetypes the tower throws at you
//! and the per-enemy state the behavior engine mutates.

use crate::game::{new_entity_id, EntityId, GridPos};
use serde::{Deserialize, Serialize};

/// Enemy behavior archetype.
///
/// The archetype fixes an enemy's stats at spawn and selects its movement
/// logic each turn:
/// - [`Archetype::Intern`] chases the player one step at a time
/// - [`Archetype::Roomba`] patrols in a straight line, turning clockwise on
///   collision
/// - [`Archetype::Printer`] is stationary and fires down clear rows/columns
/// - [`Archetype::Manager`] kites at mid range and shouts to raise burnout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Intern,
    Roomba,
    Printer,
    Manager,
}

impl Archetype {
    /// Display name used in log messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Archetype::Intern => "Intern",
            Archetype::Roomba => "Roomba",
            Archetype::Printer => "Haunted Printer",
            Archetype::Manager => "Middle Manager",
        }
    }

    /// Starting hit points for this archetype.
    pub fn base_hp(self) -> i32 {
        match self {
            Archetype::Intern => 10,
            Archetype::Roomba => 999,
            Archetype::Printer => 30,
            Archetype::Manager => 15,
        }
    }

    /// Contact damage for this archetype.
    ///
    /// For the Printer this is also its ranged volley damage.
    pub fn base_damage(self) -> i32 {
        match self {
            Archetype::Intern => 2,
            Archetype::Roomba => 5,
            Archetype::Printer => 4,
            Archetype::Manager => 3,
        }
    }

    /// Whether this archetype attacks at range instead of moving.
    pub fn is_ranged(self) -> bool {
        matches!(self, Archetype::Printer)
    }
}

/// Transient behavior state for a single enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Acting normally
    Idle,
    /// Skips its next activation, then recovers to Idle
    Stunned,
}

/// One enemy instance inside a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique identifier
    pub id: EntityId,
    /// Behavior archetype
    pub archetype: Archetype,
    /// Current tile position
    pub pos: GridPos,
    /// Current hit points
    pub hp: i32,
    /// Maximum hit points
    pub max_hp: i32,
    /// Contact damage dealt when bumping the player
    pub damage: i32,
    /// Transient behavior state
    pub state: BehaviorState,
    /// Persisted patrol direction. Only patrollers carry one.
    pub patrol_dir: Option<GridPos>,
}

impl Enemy {
    /// Spawns an enemy of the given archetype with its canonical stats.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::{Archetype, Enemy, GridPos};
    ///
    /// let roomba = Enemy::new(Archetype::Roomba, GridPos::new(3, 3));
    /// assert_eq!(roomba.hp, 999);
    /// assert_eq!(roomba.patrol_dir, Some(GridPos::new(1, 0)));
    ///
    /// let intern = Enemy::new(Archetype::Intern, GridPos::new(2, 2));
    /// assert_eq!(intern.patrol_dir, None);
    /// ```
    pub fn new(archetype: Archetype, pos: GridPos) -> Self {
        let patrol_dir = match archetype {
            Archetype::Roomba => Some(GridPos::new(1, 0)),
            _ => None,
        };

        Self {
            id: new_entity_id(),
            archetype,
            pos,
            hp: archetype.base_hp(),
            max_hp: archetype.base_hp(),
            damage: archetype.base_damage(),
            state: BehaviorState::Idle,
            patrol_dir,
        }
    }

    /// Whether the enemy is still alive.
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies damage, flooring hit points at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    /// Stuns the enemy for its next activation.
    pub fn stun(&mut self) {
        self.state = BehaviorState::Stunned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_stat_table() {
        assert_eq!(Archetype::Intern.base_hp(), 10);
        assert_eq!(Archetype::Intern.base_damage(), 2);
        assert_eq!(Archetype::Roomba.base_hp(), 999);
        assert_eq!(Archetype::Roomba.base_damage(), 5);
        assert_eq!(Archetype::Printer.base_hp(), 30);
        assert_eq!(Archetype::Printer.base_damage(), 4);
        assert_eq!(Archetype::Manager.base_hp(), 15);
        assert_eq!(Archetype::Manager.base_damage(), 3);
    }

    #[test]
    fn test_only_roomba_patrols() {
        for archetype in [Archetype::Intern, Archetype::Printer, Archetype::Manager] {
            assert!(Enemy::new(archetype, GridPos::origin()).patrol_dir.is_none());
        }
        let roomba = Enemy::new(Archetype::Roomba, GridPos::origin());
        assert_eq!(roomba.patrol_dir, Some(GridPos::new(1, 0)));
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut intern = Enemy::new(Archetype::Intern, GridPos::origin());
        intern.take_damage(7);
        assert_eq!(intern.hp, 3);
        assert!(intern.is_alive());

        intern.take_damage(50);
        assert_eq!(intern.hp, 0);
        assert!(!intern.is_alive());
    }

    #[test]
    fn test_stun_sets_state() {
        let mut printer = Enemy::new(Archetype::Printer, GridPos::origin());
        assert_eq!(printer.state, BehaviorState::Idle);
        printer.stun();
        assert_eq!(printer.state, BehaviorState::Stunned);
    }
}
