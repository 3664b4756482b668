//! # Enemy Behavior Module
//!
//! Advances every enemy in the active room once per consumed player turn.
//!
//! Each activation runs in two steps: an immutable `decide` pass that reads
//! the room and picks an [`AiAction`], then a mutable `apply` pass that
//! executes it. Enemies are processed in room list order, so later enemies
//! see the moves earlier ones already made.

use crate::config::{BURNOUT_PER_HIT, HIGH_BURNOUT_THRESHOLD};
use crate::game::{
    Archetype, BehaviorState, Enemy, GameEvent, GameState, GridPos, MessageImportance, Room,
};
use crate::OvertimeResult;
use rand::rngs::StdRng;
use rand::Rng;

/// Attack range of a stationary turret, in tiles along a row or column.
pub const TURRET_RANGE: u32 = 6;

/// Kiters hold position at this Manhattan distance or greater.
const KITE_MIN_DISTANCE: u32 = 3;

/// Kiters close in beyond this Manhattan distance.
const KITE_MAX_DISTANCE: u32 = 5;

/// Kiters only shout from this distance or closer.
const SHOUT_MAX_DISTANCE: u32 = 4;

/// Per-turn chance of a holding kiter shouting.
const SHOUT_CHANCE: f64 = 0.25;

/// Burnout inflicted by a shout.
const SHOUT_BURNOUT: i32 = 8;

/// What one enemy does with its activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AiAction {
    /// No movement, no attack
    Wait,
    /// Step to an adjacent open tile
    Step(GridPos),
    /// Melee the player in place
    Attack,
    /// Change patrol direction without moving
    Turn(GridPos),
    /// Ranged hit on the player for the given damage
    Volley(i32),
    /// Stress attack with no hit point damage
    Shout,
    /// Spend the activation shaking off a stun
    Recover,
}

/// Advances all enemies in the current room, in list order.
///
/// Dead enemies are skipped; stunned enemies recover instead of acting.
/// Stops early once the player's hit points reach zero.
pub fn advance_enemies(
    state: &mut GameState,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<()> {
    let count = state.current_room()?.enemies.len();
    for idx in 0..count {
        if !state.current_room()?.enemies[idx].is_alive() {
            continue;
        }
        let action = decide(state, idx, rng)?;
        apply(state, idx, action, events)?;
        if state.hp <= 0 {
            break;
        }
    }
    Ok(())
}

/// Whether an enemy poses an immediate danger to the player: standing in
/// cardinal contact, or a turret with a clear shot.
pub fn is_threatening(state: &GameState, enemy: &Enemy) -> bool {
    if !enemy.is_alive() {
        return false;
    }
    if enemy.pos.is_cardinal_adjacent(state.player) {
        return true;
    }
    if enemy.archetype.is_ranged() {
        if let Ok(room) = state.current_room() {
            return has_line_of_sight(room, enemy.pos, state.player, TURRET_RANGE);
        }
    }
    false
}

/// Straight row/column line of sight, blocked by walls, windows, and object
/// footprints. Other enemies do not block.
pub fn has_line_of_sight(room: &Room, from: GridPos, to: GridPos, range: u32) -> bool {
    if from.manhattan_distance(to) > range {
        return false;
    }

    let between: Vec<GridPos> = if from.x == to.x {
        let (lo, hi) = (from.y.min(to.y), from.y.max(to.y));
        ((lo + 1)..hi).map(|y| GridPos::new(from.x, y)).collect()
    } else if from.y == to.y {
        let (lo, hi) = (from.x.min(to.x), from.x.max(to.x));
        ((lo + 1)..hi).map(|x| GridPos::new(x, from.y)).collect()
    } else {
        return false;
    };

    between
        .into_iter()
        .all(|pos| room.is_cell_open(pos) && room.object_at(pos).is_none())
}

/// Whether an enemy at `mover` may step onto `target`.
///
/// The player's tile is excluded here; stepping into the player resolves as
/// an attack before this check runs.
fn step_is_open(room: &Room, player: GridPos, mover: usize, target: GridPos) -> bool {
    if target == player || !room.is_cell_open(target) {
        return false;
    }
    if room.object_at(target).is_some() {
        return false;
    }
    !room
        .enemies
        .iter()
        .enumerate()
        .any(|(i, e)| i != mover && e.is_alive() && e.pos == target)
}

fn decide(state: &GameState, idx: usize, rng: &mut StdRng) -> OvertimeResult<AiAction> {
    let room = state.current_room()?;
    let enemy = &room.enemies[idx];
    let player = state.player;

    if enemy.state == BehaviorState::Stunned {
        return Ok(AiAction::Recover);
    }

    let action = match enemy.archetype {
        Archetype::Intern => decide_chase(room, enemy, player, idx),
        Archetype::Roomba => decide_patrol(room, enemy, player, idx),
        Archetype::Printer => {
            if has_line_of_sight(room, enemy.pos, player, TURRET_RANGE) {
                AiAction::Volley(enemy.damage)
            } else {
                AiAction::Wait
            }
        }
        Archetype::Manager => decide_kite(room, enemy, player, idx, rng),
    };
    Ok(action)
}

/// One greedy step toward the player, closing the horizontal gap before the
/// vertical one. A blocked step is simply skipped.
fn decide_chase(room: &Room, enemy: &Enemy, player: GridPos, idx: usize) -> AiAction {
    let delta = player - enemy.pos;
    let step = if delta.x != 0 {
        GridPos::new(delta.x.signum(), 0)
    } else if delta.y != 0 {
        GridPos::new(0, delta.y.signum())
    } else {
        return AiAction::Wait;
    };

    let target = enemy.pos + step;
    if target == player {
        AiAction::Attack
    } else if step_is_open(room, player, idx, target) {
        AiAction::Step(target)
    } else {
        AiAction::Wait
    }
}

/// Straight-line patrol. Bumping the player attacks; any other blocker turns
/// the patroller 90 degrees clockwise.
fn decide_patrol(room: &Room, enemy: &Enemy, player: GridPos, idx: usize) -> AiAction {
    let dir = enemy.patrol_dir.unwrap_or(GridPos::new(1, 0));
    let target = enemy.pos + dir;

    if target == player {
        AiAction::Attack
    } else if step_is_open(room, player, idx, target) {
        AiAction::Step(target)
    } else {
        AiAction::Turn(dir.rotated_clockwise())
    }
}

/// Distance-band kiting: back off under the band, close in above it, and
/// occasionally shout while holding near the band's inner edge.
fn decide_kite(
    room: &Room,
    enemy: &Enemy,
    player: GridPos,
    idx: usize,
    rng: &mut StdRng,
) -> AiAction {
    let dist = enemy.pos.manhattan_distance(player);

    if dist < KITE_MIN_DISTANCE {
        let away = enemy.pos - player;
        let step = if away.x != 0 {
            GridPos::new(away.x.signum(), 0)
        } else {
            GridPos::new(0, away.y.signum())
        };
        let target = enemy.pos + step;
        if step_is_open(room, player, idx, target) {
            return AiAction::Step(target);
        }
        return AiAction::Wait;
    }

    if dist > KITE_MAX_DISTANCE {
        return decide_chase(room, enemy, player, idx);
    }

    if dist <= SHOUT_MAX_DISTANCE && rng.gen_bool(SHOUT_CHANCE) {
        return AiAction::Shout;
    }
    AiAction::Wait
}

fn apply(
    state: &mut GameState,
    idx: usize,
    action: AiAction,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<()> {
    match action {
        AiAction::Wait => {}

        AiAction::Step(target) => {
            state.current_room_mut()?.enemies[idx].pos = target;
        }

        AiAction::Turn(new_dir) => {
            state.current_room_mut()?.enemies[idx].patrol_dir = Some(new_dir);
        }

        AiAction::Attack => {
            let (name, base) = {
                let enemy = &state.current_room()?.enemies[idx];
                (enemy.archetype.display_name(), enemy.damage)
            };
            let doubled = state.burnout >= HIGH_BURNOUT_THRESHOLD;
            let damage = if doubled { base * 2 } else { base };
            state.apply_damage(damage);
            state.add_burnout(BURNOUT_PER_HIT);

            let text = if doubled {
                format!("{} attacked you for {} damage! (Burnout x2)", name, damage)
            } else {
                format!("{} attacked you for {} damage!", name, damage)
            };
            events.push(GameEvent::PlayerDamaged { damage });
            events.push(GameEvent::Message {
                text,
                importance: MessageImportance::High,
            });
            events.push(state.stats_event());
        }

        AiAction::Volley(damage) => {
            let name = state.current_room()?.enemies[idx].archetype.display_name();
            state.apply_damage(damage);
            state.add_burnout(BURNOUT_PER_HIT);
            events.push(GameEvent::PlayerDamaged { damage });
            events.push(GameEvent::Message {
                text: format!("{} fires a searing print job for {} damage!", name, damage),
                importance: MessageImportance::High,
            });
            events.push(state.stats_event());
        }

        AiAction::Shout => {
            let name = state.current_room()?.enemies[idx].archetype.display_name();
            state.add_burnout(SHOUT_BURNOUT);
            events.push(GameEvent::Message {
                text: format!(
                    "{} shouts about deadlines! (+{} Burnout)",
                    name, SHOUT_BURNOUT
                ),
                importance: MessageImportance::Normal,
            });
            events.push(state.stats_event());
        }

        AiAction::Recover => {
            let room = state.current_room_mut()?;
            room.enemies[idx].state = BehaviorState::Idle;
            let name = room.enemies[idx].archetype.display_name();
            events.push(GameEvent::Message {
                text: format!("{} is recovering from stun.", name),
                importance: MessageImportance::Low,
            });
        }
    }
    Ok(())
}
