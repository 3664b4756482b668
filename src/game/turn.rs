//! # Turn Orchestration
//!
//! The linear phase pipeline that resolves one player turn: validate the
//! action, apply it, advance the enemies, then check terminal conditions.
//! Each phase is a named function so the order is visible in one place.
//!
//! [`Game`] wraps the pipeline with an owned RNG, the floor generator, and
//! an optional save store written at clean turn boundaries.

use crate::config::SPRINT_BURNOUT_COST;
use crate::game::{
    ai, interaction, Cell, Direction, GameEvent, GameState, GridPos, ItemClass, ItemKind,
    MessageImportance, Room, RunPhase,
};
use crate::generation::{utils, FloorGenerator, GenerationConfig, Generator};
use crate::save::SaveStore;
use crate::{OvertimeError, OvertimeResult};
use rand::rngs::StdRng;

/// A normalized player action, one per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Step one tile; with `sprint` the step repeats once and costs burnout.
    Move { delta: GridPos, sprint: bool },
    /// Pass the turn.
    Wait,
    /// Attack `target` with an inventory weapon.
    Ranged { target: GridPos, weapon: ItemKind },
    /// Use the inventory item at `index`.
    UseItem { index: usize },
}

/// How a submitted turn resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The action was rejected or fizzled; enemies did not move.
    NotConsumed,
    /// A full turn elapsed.
    Consumed,
    /// The elevator opened this turn.
    FloorCleared,
    /// The player ran out of hit points this turn.
    Defeated,
}

/// Everything a caller needs to present one resolved turn.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub events: Vec<GameEvent>,
}

/// How a single movement step resolved inside the player phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepResult {
    /// Plain move onto a free tile.
    Moved,
    /// Walked through a door into a neighboring room.
    ChangedRoom,
    /// An interaction consumed the turn.
    Interacted,
    /// Wall, window, missing door, or a blocked interaction; no turn.
    Blocked,
}

/// Resolves one full turn against `state`.
///
/// Phase order: validate, apply the player action, advance enemies (only
/// when a turn was actually consumed and the run is still live), then the
/// terminal check.
///
/// # Examples
///
/// ```
/// use overtime::{GameState, GridPos, PlayerAction, TurnOutcome};
/// use overtime::game::{turn, Room};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut state = GameState::new(11);
/// state.rooms.insert("0_0".to_string(), Room::new(0, 0));
/// let mut rng = StdRng::seed_from_u64(11);
///
/// let report = turn::play_turn(&mut state, &PlayerAction::Wait, &mut rng).unwrap();
/// assert_eq!(report.outcome, TurnOutcome::Consumed);
/// ```
pub fn play_turn(
    state: &mut GameState,
    action: &PlayerAction,
    rng: &mut StdRng,
) -> OvertimeResult<TurnReport> {
    let mut events = Vec::new();

    if let Some(outcome) = validate_action(state, action, &mut events) {
        return Ok(TurnReport { outcome, events });
    }

    let consumed = apply_player_action(state, action, rng, &mut events)?;

    if consumed && state.completion == RunPhase::Playing {
        ai::advance_enemies(state, rng, &mut events)?;
    }

    let outcome = resolve_outcome(state, consumed, &mut events);
    Ok(TurnReport { outcome, events })
}

/// Phase 1: reject turns on finished runs and malformed move deltas before
/// anything mutates.
fn validate_action(
    state: &GameState,
    action: &PlayerAction,
    events: &mut Vec<GameEvent>,
) -> Option<TurnOutcome> {
    match state.completion {
        RunPhase::Defeated => {
            events.push(GameEvent::message("You burned out. This run is over."));
            return Some(TurnOutcome::NotConsumed);
        }
        RunPhase::FloorCleared => {
            events.push(GameEvent::message("Floor cleared. Ride the elevator up."));
            return Some(TurnOutcome::NotConsumed);
        }
        RunPhase::Playing => {}
    }

    if let PlayerAction::Move { delta, .. } = action {
        if delta.x.abs() + delta.y.abs() != 1 {
            events.push(GameEvent::message("Invalid move."));
            return Some(TurnOutcome::NotConsumed);
        }
    }
    None
}

/// Phase 2: apply the player action. Returns whether a turn was consumed.
fn apply_player_action(
    state: &mut GameState,
    action: &PlayerAction,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<bool> {
    match action {
        PlayerAction::Wait => {
            events.push(GameEvent::Message {
                text: "You wait.".to_string(),
                importance: MessageImportance::Low,
            });
            Ok(true)
        }

        PlayerAction::UseItem { index } => interaction::use_item(state, *index, events),

        PlayerAction::Ranged { target, weapon } => {
            interaction::resolve_ranged_attack(state, *target, *weapon, rng, events)
        }

        PlayerAction::Move { delta, sprint } => {
            let first = step_player(state, *delta, rng, events)?;

            if *sprint && first == StepResult::Moved {
                let target = state.player + *delta;
                if state.current_room()?.is_cell_free(target) {
                    state.player = target;
                    events.push(GameEvent::PlayerMoved { to: target });
                }
                state.add_burnout(SPRINT_BURNOUT_COST);
                events.push(GameEvent::message(format!(
                    "Sprinting. (+{} Burnout)",
                    SPRINT_BURNOUT_COST
                )));
                events.push(state.stats_event());
            }

            Ok(first != StepResult::Blocked)
        }
    }
}

/// One movement step: door transitions off-grid, bonk messages on solid
/// cells, bump resolution on occupied ones, otherwise a plain move.
fn step_player(
    state: &mut GameState,
    delta: GridPos,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<StepResult> {
    let target = state.player + delta;

    let cell = {
        let room = state.current_room()?;
        if !room.in_bounds(target) {
            return resolve_edge_exit(state, delta, events);
        }
        room.cell(target)
    };

    match cell {
        Some(Cell::Wall) => {
            events.push(GameEvent::message("Bonk! That's a wall."));
            Ok(StepResult::Blocked)
        }
        Some(Cell::Window) => {
            events.push(GameEvent::message("That's a window. It does not open."));
            Ok(StepResult::Blocked)
        }
        Some(Cell::Walkable) => {
            let occupied = {
                let room = state.current_room()?;
                room.object_index_at(target).is_some()
                    || room.living_enemy_index_at(target).is_some()
            };
            if occupied {
                let consumed = interaction::resolve_bump(state, target, rng, events)?;
                Ok(if consumed {
                    StepResult::Interacted
                } else {
                    StepResult::Blocked
                })
            } else {
                state.player = target;
                events.push(GameEvent::PlayerMoved { to: target });
                Ok(StepResult::Moved)
            }
        }
        None => Ok(StepResult::Blocked),
    }
}

/// Stepping off the grid: through a door it becomes a room transition, with
/// the player arriving on the opposite edge's door cell.
fn resolve_edge_exit(
    state: &mut GameState,
    delta: GridPos,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<StepResult> {
    let exit = Direction::from_delta(delta)
        .filter(|dir| state.player == Room::door_position(*dir))
        .filter(|dir| {
            state
                .current_room()
                .map(|room| room.has_door(*dir))
                .unwrap_or(false)
        });

    let dir = match exit {
        Some(dir) => dir,
        None => {
            events.push(GameEvent::message("There is no door there."));
            return Ok(StepResult::Blocked);
        }
    };
    let next_id = match state.neighbor_room_id(dir)? {
        Some(id) => id,
        None => {
            events.push(GameEvent::message("There is no door there."));
            return Ok(StepResult::Blocked);
        }
    };

    let entry = Room::door_position(dir.opposite());
    state.enter_room(next_id.clone(), entry)?;
    events.push(GameEvent::RoomEntered {
        room_id: next_id.clone(),
    });
    events.push(GameEvent::message(format!("Moved to Room {}", next_id)));
    Ok(StepResult::ChangedRoom)
}

/// Phase 4: fold hit points and the run phase into the turn outcome.
fn resolve_outcome(
    state: &mut GameState,
    consumed: bool,
    events: &mut Vec<GameEvent>,
) -> TurnOutcome {
    if state.hp <= 0 && state.completion == RunPhase::Playing {
        state.completion = RunPhase::Defeated;
        events.push(GameEvent::Message {
            text: "You burned out completely.".to_string(),
            importance: MessageImportance::Critical,
        });
        events.push(GameEvent::PlayerDied);
        return TurnOutcome::Defeated;
    }

    match state.completion {
        RunPhase::Defeated => TurnOutcome::Defeated,
        RunPhase::FloorCleared => TurnOutcome::FloorCleared,
        RunPhase::Playing => {
            if consumed {
                TurnOutcome::Consumed
            } else {
                TurnOutcome::NotConsumed
            }
        }
    }
}

/// A full run: the game state, its RNG, the generation settings, and an
/// optional save store.
///
/// # Examples
///
/// ```
/// use overtime::{Game, GenerationConfig, PlayerAction, TurnOutcome};
///
/// let mut game = Game::new(GenerationConfig::for_testing(7)).unwrap();
/// let report = game.submit(PlayerAction::Wait).unwrap();
/// assert_eq!(report.outcome, TurnOutcome::Consumed);
/// ```
pub struct Game {
    pub state: GameState,
    pub config: GenerationConfig,
    rng: StdRng,
    save: Option<Box<dyn SaveStore>>,
}

impl Game {
    /// Generates the first floor and readies the run.
    pub fn new(config: GenerationConfig) -> OvertimeResult<Self> {
        let mut rng = utils::create_rng(&config);
        let state = FloorGenerator::new().generate(&config, &mut rng)?;
        Ok(Self {
            state,
            config,
            rng,
            save: None,
        })
    }

    /// Resumes from a previously saved state. The RNG is reseeded from the
    /// recorded seed, so a resumed run diverges from an uninterrupted one.
    pub fn from_state(state: GameState, config: GenerationConfig) -> Self {
        let rng = utils::seeded_rng(state.rng_seed);
        Self {
            state,
            config,
            rng,
            save: None,
        }
    }

    /// Attaches a save store written after every consumed turn.
    pub fn with_save_store(mut self, store: Box<dyn SaveStore>) -> Self {
        self.save = Some(store);
        self
    }

    /// Plays one turn and autosaves at the clean boundary afterwards.
    /// Defeated and rejected turns are not saved.
    pub fn submit(&mut self, action: PlayerAction) -> OvertimeResult<TurnReport> {
        let report = play_turn(&mut self.state, &action, &mut self.rng)?;
        if matches!(
            report.outcome,
            TurnOutcome::Consumed | TurnOutcome::FloorCleared
        ) {
            if let Some(store) = self.save.as_mut() {
                store.save(&self.state)?;
            }
        }
        Ok(report)
    }

    /// Regenerates the world for the next tower level once the elevator has
    /// opened, carrying the player's condition and loadout across.
    ///
    /// Keycards and the objective item stay behind; every floor issues
    /// fresh ones on its own critical path.
    pub fn advance_floor(&mut self) -> OvertimeResult<u32> {
        if self.state.completion != RunPhase::FloorCleared {
            return Err(OvertimeError::InvalidAction(
                "cannot advance before the elevator opens".to_string(),
            ));
        }

        let next_level = self.state.tower_level + 1;
        let mut config = self.config.clone();
        config.tower_level = next_level;
        config.seed = self
            .state
            .rng_seed
            .wrapping_add(u64::from(next_level) * 1000);

        let mut rng = utils::create_rng(&config);
        let mut next = FloorGenerator::new().generate(&config, &mut rng)?;

        next.hp = self.state.hp;
        next.max_hp = self.state.max_hp;
        next.burnout = self.state.burnout;
        next.credits = self.state.credits;
        next.inventory = self
            .state
            .inventory
            .iter()
            .filter(|item| {
                !matches!(item.kind.class(), ItemClass::Key | ItemClass::Objective)
            })
            .cloned()
            .collect();

        self.state = next;
        self.config = config;
        self.rng = rng;

        if let Some(store) = self.save.as_mut() {
            store.save(&self.state)?;
        }
        Ok(next_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Archetype, Enemy, InteractionObject, ItemInstance, ObjectKind};
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    fn single_room_state() -> GameState {
        let mut state = GameState::new(5);
        state.rooms.insert("0_0".to_string(), Room::new(0, 0));
        state
    }

    fn two_room_state() -> GameState {
        let mut state = GameState::new(5);
        let mut west = Room::new(0, 0);
        west.carve_door(Direction::East);
        let mut east = Room::new(1, 0);
        east.carve_door(Direction::West);
        state.rooms.insert(west.room_id.clone(), west);
        state.rooms.insert(east.room_id.clone(), east);
        state
    }

    fn step(delta: (i32, i32)) -> PlayerAction {
        PlayerAction::Move {
            delta: GridPos::new(delta.0, delta.1),
            sprint: false,
        }
    }

    #[test]
    fn test_move_onto_free_cell() {
        let mut state = single_room_state();
        let report = play_turn(&mut state, &step((1, 0)), &mut rng()).unwrap();

        assert_eq!(report.outcome, TurnOutcome::Consumed);
        assert_eq!(state.player, GridPos::new(6, 5));
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerMoved { to } if *to == GridPos::new(6, 5))));
    }

    #[test]
    fn test_wall_bump_costs_no_turn() {
        let mut state = single_room_state();
        state.player = GridPos::new(1, 1);
        let report = play_turn(&mut state, &step((0, -1)), &mut rng()).unwrap();

        assert_eq!(report.outcome, TurnOutcome::NotConsumed);
        assert_eq!(state.player, GridPos::new(1, 1));
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text.starts_with("Bonk"))));
    }

    #[test]
    fn test_window_does_not_open() {
        let mut state = single_room_state();
        state
            .current_room_mut()
            .unwrap()
            .seal_edge_with_windows(Direction::North);
        state.player = GridPos::new(5, 1);

        let report = play_turn(&mut state, &step((0, -1)), &mut rng()).unwrap();
        assert_eq!(report.outcome, TurnOutcome::NotConsumed);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text.contains("window"))));
    }

    #[test]
    fn test_invalid_delta_rejected() {
        let mut state = single_room_state();
        for delta in [(0, 0), (1, 1), (2, 0)] {
            let report = play_turn(&mut state, &step(delta), &mut rng()).unwrap();
            assert_eq!(report.outcome, TurnOutcome::NotConsumed);
            assert_eq!(state.player, GridPos::new(5, 5));
        }
    }

    #[test]
    fn test_door_transition_lands_on_opposite_door() {
        let mut state = two_room_state();
        state.player = Room::door_position(Direction::East);

        let report = play_turn(&mut state, &step((1, 0)), &mut rng()).unwrap();

        assert_eq!(report.outcome, TurnOutcome::Consumed);
        assert_eq!(state.current_room_id, "1_0");
        assert_eq!(state.player, Room::door_position(Direction::West));
        assert!(state.visited_rooms.contains("1_0"));
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text == "Moved to Room 1_0")));
    }

    #[test]
    fn test_door_without_neighbor_blocks() {
        let mut state = single_room_state();
        // Carved door on the world edge: nothing on the other side.
        state
            .current_room_mut()
            .unwrap()
            .carve_door(Direction::North);
        state.player = Room::door_position(Direction::North);

        let report = play_turn(&mut state, &step((0, -1)), &mut rng()).unwrap();
        assert_eq!(report.outcome, TurnOutcome::NotConsumed);
        assert_eq!(state.current_room_id, "0_0");
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Message { text, .. } if text == "There is no door there.")));
    }

    #[test]
    fn test_sprint_covers_two_tiles() {
        let mut state = single_room_state();
        state.player = GridPos::new(3, 5);

        let action = PlayerAction::Move {
            delta: GridPos::new(1, 0),
            sprint: true,
        };
        let report = play_turn(&mut state, &action, &mut rng()).unwrap();

        assert_eq!(report.outcome, TurnOutcome::Consumed);
        assert_eq!(state.player, GridPos::new(5, 5));
        assert_eq!(state.burnout, SPRINT_BURNOUT_COST);
    }

    #[test]
    fn test_sprint_second_step_stops_at_wall() {
        let mut state = single_room_state();
        state.player = GridPos::new(8, 5);

        let action = PlayerAction::Move {
            delta: GridPos::new(1, 0),
            sprint: true,
        };
        play_turn(&mut state, &action, &mut rng()).unwrap();

        // First step lands at (9,5); the wall at (10,5) swallows the second.
        assert_eq!(state.player, GridPos::new(9, 5));
        assert_eq!(state.burnout, SPRINT_BURNOUT_COST);
    }

    #[test]
    fn test_sprint_into_wall_costs_nothing() {
        let mut state = single_room_state();
        state.player = GridPos::new(1, 1);

        let action = PlayerAction::Move {
            delta: GridPos::new(0, -1),
            sprint: true,
        };
        let report = play_turn(&mut state, &action, &mut rng()).unwrap();

        assert_eq!(report.outcome, TurnOutcome::NotConsumed);
        assert_eq!(state.burnout, 0);
    }

    #[test]
    fn test_enemies_advance_after_consumed_turn() {
        let mut state = single_room_state();
        state
            .current_room_mut()
            .unwrap()
            .enemies
            .push(Enemy::new(Archetype::Intern, GridPos::new(5, 2)));

        play_turn(&mut state, &PlayerAction::Wait, &mut rng()).unwrap();
        assert_eq!(
            state.current_room().unwrap().enemies[0].pos,
            GridPos::new(5, 3)
        );
    }

    #[test]
    fn test_enemies_hold_when_turn_not_consumed() {
        let mut state = single_room_state();
        state.player = GridPos::new(1, 1);
        state
            .current_room_mut()
            .unwrap()
            .enemies
            .push(Enemy::new(Archetype::Intern, GridPos::new(5, 2)));

        play_turn(&mut state, &step((0, -1)), &mut rng()).unwrap();
        assert_eq!(
            state.current_room().unwrap().enemies[0].pos,
            GridPos::new(5, 2)
        );
    }

    #[test]
    fn test_clearing_the_floor_skips_the_enemy_phase() {
        let mut state = single_room_state();
        state.add_item(ItemInstance::new(ItemKind::RedKeycard));
        state.objective_complete = true;
        state.player = GridPos::new(4, 5);
        {
            let room = state.current_room_mut().unwrap();
            room.objects
                .push(InteractionObject::new(ObjectKind::Elevator, GridPos::new(5, 5)));
            // Adjacent enemy that would certainly attack if the phase ran.
            room.enemies
                .push(Enemy::new(Archetype::Roomba, GridPos::new(3, 5)));
        }

        let report = play_turn(&mut state, &step((1, 0)), &mut rng()).unwrap();

        assert_eq!(report.outcome, TurnOutcome::FloorCleared);
        assert_eq!(state.completion, RunPhase::FloorCleared);
        assert_eq!(state.hp, state.max_hp);
    }

    #[test]
    fn test_defeat_is_reported_once() {
        let mut state = single_room_state();
        state.hp = 2;
        state
            .current_room_mut()
            .unwrap()
            .enemies
            .push(Enemy::new(Archetype::Intern, GridPos::new(4, 5)));

        let report = play_turn(&mut state, &PlayerAction::Wait, &mut rng()).unwrap();
        assert_eq!(report.outcome, TurnOutcome::Defeated);
        assert_eq!(state.hp, 0);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerDied)));

        // Further turns are rejected without touching the state.
        let report = play_turn(&mut state, &PlayerAction::Wait, &mut rng()).unwrap();
        assert_eq!(report.outcome, TurnOutcome::NotConsumed);
        assert!(!report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerDied)));
    }

    #[test]
    fn test_turns_rejected_after_floor_clear() {
        let mut state = single_room_state();
        state.completion = RunPhase::FloorCleared;

        let report = play_turn(&mut state, &step((1, 0)), &mut rng()).unwrap();
        assert_eq!(report.outcome, TurnOutcome::NotConsumed);
        assert_eq!(state.player, GridPos::new(5, 5));
    }

    #[test]
    fn test_use_item_failure_costs_no_turn() {
        let mut state = single_room_state();
        state
            .current_room_mut()
            .unwrap()
            .enemies
            .push(Enemy::new(Archetype::Intern, GridPos::new(5, 2)));

        let report =
            play_turn(&mut state, &PlayerAction::UseItem { index: 9 }, &mut rng()).unwrap();
        assert_eq!(report.outcome, TurnOutcome::NotConsumed);
        assert_eq!(
            state.current_room().unwrap().enemies[0].pos,
            GridPos::new(5, 2)
        );
    }

    #[test]
    fn test_game_advance_floor_requires_cleared_run() {
        let mut game = Game::new(GenerationConfig::for_testing(21)).unwrap();
        assert!(game.advance_floor().is_err());

        game.state.add_item(ItemInstance::new(ItemKind::BlueKeycard));
        game.state.add_item(ItemInstance::new(ItemKind::Coffee));
        game.state.completion = RunPhase::FloorCleared;

        let level = game.advance_floor().unwrap();
        assert_eq!(level, 2);
        assert_eq!(game.state.tower_level, 2);
        assert_eq!(game.state.completion, RunPhase::Playing);

        // Consumables ride along; keycards are surrendered at the elevator.
        assert!(game.state.has_item(ItemKind::Coffee));
        assert!(!game.state.has_item(ItemKind::BlueKeycard));
    }

    #[test]
    fn test_game_advance_floor_carries_condition() {
        let mut game = Game::new(GenerationConfig::for_testing(33)).unwrap();
        game.state.hp = 7;
        game.state.burnout = 42;
        game.state.credits = 19;
        game.state.completion = RunPhase::FloorCleared;

        game.advance_floor().unwrap();
        assert_eq!(game.state.hp, 7);
        assert_eq!(game.state.burnout, 42);
        assert_eq!(game.state.credits, 19);
    }
}
