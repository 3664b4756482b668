//! # Input Module
//!
//! Normalized player input and its translation into turn actions.
//!
//! Device polling belongs to the presentation layer; it feeds normalized
//! [`PlayerInput`] values here, and [`InputHandler`] maps them onto
//! [`PlayerAction`]s the turn pipeline understands. Inputs that only drive
//! the UI translate to no action at all.

use crate::game::{Direction, GameState, GridPos, ItemKind, PlayerAction};
use crate::{OvertimeError, OvertimeResult};

/// Player input types produced by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    /// Move one tile; `sprint` requests the two-tile dash
    Move { delta: GridPos, sprint: bool },
    /// Wait/rest for one turn
    Wait,
    /// Attack a tile with an inventory weapon
    Fire { target: GridPos, weapon: ItemKind },
    /// Use the inventory item at the given slot
    UseItem { index: usize },
    /// Show inventory
    ShowInventory,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
    /// Confirm current UI prompt
    Confirm,
    /// Cancel current UI prompt
    Cancel,
    /// Start a new run (when the current one has ended)
    NewGame,
}

/// Translates normalized input into game actions.
///
/// Gameplay outcomes (out of range, nothing there, no key) stay with the
/// resolvers; this layer only rejects input that no well-behaved UI should
/// produce.
pub struct InputHandler {
    /// Whether sprint requests are honored
    pub allow_sprint: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::InputHandler;
    ///
    /// let handler = InputHandler::new();
    /// assert!(handler.allow_sprint);
    /// ```
    pub fn new() -> Self {
        Self { allow_sprint: true }
    }

    /// Converts player input to a concrete game action.
    ///
    /// Returns `Ok(None)` for UI-only inputs. Malformed input (diagonal
    /// deltas, off-grid targets, non-weapon fire, dangling inventory slots)
    /// is an error, not a message.
    pub fn input_to_action(
        &self,
        input: PlayerInput,
        state: &GameState,
    ) -> OvertimeResult<Option<PlayerAction>> {
        match input {
            PlayerInput::Move { delta, sprint } => {
                if Direction::from_delta(delta).is_none() {
                    return Err(OvertimeError::InvalidAction(
                        "movement must be one cardinal step".to_string(),
                    ));
                }
                Ok(Some(PlayerAction::Move {
                    delta,
                    sprint: sprint && self.allow_sprint,
                }))
            }

            PlayerInput::Wait => Ok(Some(PlayerAction::Wait)),

            PlayerInput::Fire { target, weapon } => {
                if weapon.weapon_spec().is_none() {
                    return Err(OvertimeError::InvalidAction(format!(
                        "{} is not a weapon",
                        weapon.display_name()
                    )));
                }
                if !state.current_room()?.in_bounds(target) {
                    return Err(OvertimeError::InvalidAction(format!(
                        "fire target ({}, {}) is off the grid",
                        target.x, target.y
                    )));
                }
                Ok(Some(PlayerAction::Ranged { target, weapon }))
            }

            PlayerInput::UseItem { index } => {
                if index >= state.inventory.len() {
                    return Err(OvertimeError::InvalidAction(format!(
                        "no inventory slot {}",
                        index
                    )));
                }
                Ok(Some(PlayerAction::UseItem { index }))
            }

            // Other inputs don't translate directly to game actions
            PlayerInput::ShowInventory
            | PlayerInput::Help
            | PlayerInput::Quit
            | PlayerInput::Confirm
            | PlayerInput::Cancel
            | PlayerInput::NewGame => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ItemInstance, Room};

    fn state() -> GameState {
        let mut state = GameState::new(2);
        state.rooms.insert("0_0".to_string(), Room::new(0, 0));
        state
    }

    #[test]
    fn test_move_input_maps_to_move_action() {
        let handler = InputHandler::new();
        let action = handler
            .input_to_action(
                PlayerInput::Move {
                    delta: GridPos::new(1, 0),
                    sprint: true,
                },
                &state(),
            )
            .unwrap();
        assert_eq!(
            action,
            Some(PlayerAction::Move {
                delta: GridPos::new(1, 0),
                sprint: true,
            })
        );
    }

    #[test]
    fn test_sprint_can_be_disabled() {
        let handler = InputHandler {
            allow_sprint: false,
        };
        let action = handler
            .input_to_action(
                PlayerInput::Move {
                    delta: GridPos::new(0, 1),
                    sprint: true,
                },
                &state(),
            )
            .unwrap();
        assert_eq!(
            action,
            Some(PlayerAction::Move {
                delta: GridPos::new(0, 1),
                sprint: false,
            })
        );
    }

    #[test]
    fn test_diagonal_movement_rejected() {
        let handler = InputHandler::new();
        let result = handler.input_to_action(
            PlayerInput::Move {
                delta: GridPos::new(1, 1),
                sprint: false,
            },
            &state(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_fire_requires_a_weapon_kind() {
        let handler = InputHandler::new();
        let result = handler.input_to_action(
            PlayerInput::Fire {
                target: GridPos::new(4, 4),
                weapon: ItemKind::Coffee,
            },
            &state(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_fire_target_must_be_on_grid() {
        let handler = InputHandler::new();
        let result = handler.input_to_action(
            PlayerInput::Fire {
                target: GridPos::new(40, 4),
                weapon: ItemKind::Stapler,
            },
            &state(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_use_item_checks_the_slot() {
        let handler = InputHandler::new();
        let mut state = state();
        assert!(handler
            .input_to_action(PlayerInput::UseItem { index: 0 }, &state)
            .is_err());

        state.add_item(ItemInstance::new(ItemKind::Coffee));
        let action = handler
            .input_to_action(PlayerInput::UseItem { index: 0 }, &state)
            .unwrap();
        assert_eq!(action, Some(PlayerAction::UseItem { index: 0 }));
    }

    #[test]
    fn test_ui_inputs_produce_no_action() {
        let handler = InputHandler::new();
        let state = state();
        for input in [
            PlayerInput::ShowInventory,
            PlayerInput::Help,
            PlayerInput::Quit,
            PlayerInput::Confirm,
            PlayerInput::Cancel,
            PlayerInput::NewGame,
        ] {
            assert_eq!(handler.input_to_action(input, &state).unwrap(), None);
        }
    }
}
