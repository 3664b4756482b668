//! # Interaction & Combat Resolution
//!
//! Bump-to-interact semantics, ranged attacks, item usage, and enemy defeat
//! processing. Every function here reports what happened through a
//! [`GameEvent`] sink and returns whether the attempt consumed the turn.
//!
//! Gameplay failures (no key, no credits, out of range) are messages, never
//! errors; `Err` is reserved for corrupt state such as a dangling room id.

use crate::config::BASE_MELEE_DAMAGE;
use crate::game::{
    GameEvent, GameState, GridPos, InteractionObject, ItemClass, ItemInstance, ItemKind,
    MessageImportance, ObjectKind, RunPhase,
};
use crate::generation::loot::{self, VendingOutcome};
use crate::OvertimeResult;
use rand::rngs::StdRng;

/// Hit points restored by one pull at a water cooler.
const WATER_COOLER_HEAL: i32 = 3;

/// Burnout relieved by one pull at a water cooler.
const WATER_COOLER_CALM: i32 = 10;

/// Burnout inflicted by bumping a server rack.
const SERVER_RACK_BURNOUT: i32 = 2;

/// Hit points restored by drinking coffee.
const COFFEE_HEAL: i32 = 20;

/// Burnout relieved by drinking coffee.
const COFFEE_CALM: i32 = 20;

/// Resolves a bump onto `target`: an object footprint takes precedence, then
/// a living enemy, otherwise the tile is free and nothing happens here.
///
/// Returns whether the bump consumed the turn. Blocked interactions (missing
/// key, empty cooler, short on credits) leave the state untouched and do not
/// consume the turn.
pub fn resolve_bump(
    state: &mut GameState,
    target: GridPos,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<bool> {
    if let Some(idx) = state.current_room()?.object_index_at(target) {
        return apply_object_effect(state, idx, rng, events);
    }
    if let Some(idx) = state.current_room()?.living_enemy_index_at(target) {
        melee_attack(state, idx, rng, events)?;
        return Ok(true);
    }
    Ok(false)
}

/// Applies the effect of the object at index `idx` in the current room.
fn apply_object_effect(
    state: &mut GameState,
    idx: usize,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<bool> {
    // Clone the kind up front so the room borrow is released before mutation.
    let kind = state.current_room()?.objects[idx].kind.clone();

    match kind {
        ObjectKind::Pickup { item } => {
            state.current_room_mut()?.objects.remove(idx);
            state.add_item(ItemInstance::new(item));
            events.push(GameEvent::message(format!(
                "Picked up {}.",
                item.display_name()
            )));
            events.push(GameEvent::InventoryChanged);
            Ok(true)
        }

        ObjectKind::LockedDoor => {
            if state.has_any_keycard() {
                state.current_room_mut()?.objects.remove(idx);
                events.push(GameEvent::message(
                    "You swipe your card. The door unlocks.".to_string(),
                ));
                Ok(true)
            } else {
                events.push(GameEvent::message(
                    "The door is locked. It wants a keycard.".to_string(),
                ));
                Ok(false)
            }
        }

        ObjectKind::Barrier => {
            if state.has_item(ItemKind::BlueKeycard) {
                state.current_room_mut()?.objects.remove(idx);
                events.push(GameEvent::message(
                    "The barrier retracts with a beep.".to_string(),
                ));
                Ok(true)
            } else {
                events.push(GameEvent::message(
                    "A security barrier. It wants a Blue Keycard.".to_string(),
                ));
                Ok(false)
            }
        }

        ObjectKind::Elevator => resolve_elevator(state, events),

        ObjectKind::Strongbox => resolve_strongbox(state, events),

        ObjectKind::Vending { cost } => resolve_vending(state, idx, cost, rng, events),

        ObjectKind::WaterCooler { uses } => {
            if uses == 0 {
                events.push(GameEvent::message("The cooler is empty.".to_string()));
                return Ok(false);
            }
            state.heal(WATER_COOLER_HEAL);
            state.add_burnout(-WATER_COOLER_CALM);
            {
                let object = &mut state.current_room_mut()?.objects[idx];
                let remaining = uses - 1;
                object.kind = ObjectKind::WaterCooler { uses: remaining };
                if remaining == 0 {
                    object.sprite = "cooler_empty".to_string();
                }
            }
            events.push(GameEvent::message(format!(
                "Cold water. Refreshing. (+{} HP, -{} Burnout)",
                WATER_COOLER_HEAL, WATER_COOLER_CALM
            )));
            events.push(state.stats_event());
            Ok(true)
        }

        ObjectKind::ServerRack => {
            state.add_burnout(SERVER_RACK_BURNOUT);
            events.push(GameEvent::message(format!(
                "The server rack hums menacingly. (+{} Burnout)",
                SERVER_RACK_BURNOUT
            )));
            events.push(state.stats_event());
            Ok(true)
        }

        ObjectKind::Readable { text } => {
            events.push(GameEvent::message(text));
            Ok(false)
        }

        ObjectKind::Desk => {
            events.push(GameEvent::message(
                "It's a standing desk. Good cover.".to_string(),
            ));
            Ok(false)
        }

        ObjectKind::Plant => {
            events.push(GameEvent::message(
                "A plastic ficus. Somehow it's still dying.".to_string(),
            ));
            Ok(false)
        }

        ObjectKind::MeetingTable => {
            events.push(GameEvent::message(
                "The meeting table is covered in passive-aggressive sticky notes.".to_string(),
            ));
            Ok(false)
        }
    }
}

/// Elevator gating. Every unmet requirement reports its own message, Red
/// Keycard first; the doors open only once both are satisfied.
fn resolve_elevator(state: &mut GameState, events: &mut Vec<GameEvent>) -> OvertimeResult<bool> {
    let mut blocked = false;
    if !state.has_item(ItemKind::RedKeycard) {
        events.push(GameEvent::message(
            "The Elevator requires a Red Keycard.".to_string(),
        ));
        blocked = true;
    }
    if !state.objective_complete {
        events.push(GameEvent::message(
            "The Elevator won't move until the Quarterly Report is filed.".to_string(),
        ));
        blocked = true;
    }
    if blocked {
        return Ok(false);
    }

    state.completion = RunPhase::FloorCleared;
    events.push(GameEvent::Message {
        text: "DING! The Elevator doors open. Floor cleared!".to_string(),
        importance: MessageImportance::Critical,
    });
    events.push(GameEvent::FloorCleared {
        tower_level: state.tower_level,
    });
    Ok(true)
}

/// Deposits the Quarterly Report. A second deposit changes nothing.
fn resolve_strongbox(state: &mut GameState, events: &mut Vec<GameEvent>) -> OvertimeResult<bool> {
    if state.objective_complete {
        events.push(GameEvent::message(
            "The strongbox is already sealed.".to_string(),
        ));
        return Ok(false);
    }
    let idx = match state.find_item(ItemKind::Report) {
        Some(idx) => idx,
        None => {
            events.push(GameEvent::message(
                "The strongbox wants the Quarterly Report.".to_string(),
            ));
            return Ok(false);
        }
    };

    state.inventory.remove(idx);
    state.objective_complete = true;
    events.push(GameEvent::Message {
        text: "You file the Quarterly Report. The objective is secure.".to_string(),
        importance: MessageImportance::High,
    });
    events.push(GameEvent::ObjectiveSecured);
    events.push(GameEvent::InventoryChanged);
    Ok(true)
}

/// One coin-operated pull at the vending machine. The machine is removed
/// after any paid roll, jam included.
fn resolve_vending(
    state: &mut GameState,
    idx: usize,
    cost: u32,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<bool> {
    if state.credits < cost {
        events.push(GameEvent::message(format!("Need {} Credits.", cost)));
        return Ok(false);
    }

    state.credits -= cost;
    state.current_room_mut()?.objects.remove(idx);

    match loot::roll_vending(rng) {
        VendingOutcome::Jammed => {
            events.push(GameEvent::message(
                "Vending Machine Jammed! It ate your money.".to_string(),
            ));
        }
        VendingOutcome::Nothing => {
            events.push(GameEvent::message(
                "Vending Machine whirrs... but nothing falls out.".to_string(),
            ));
        }
        VendingOutcome::Dispensed(item) => {
            state.add_item(ItemInstance::new(item));
            events.push(GameEvent::message(format!(
                "The Vending Machine dispenses: {}.",
                item.display_name()
            )));
            events.push(GameEvent::InventoryChanged);
        }
    }
    events.push(state.stats_event());
    Ok(true)
}

/// Melee with the implicit base weapon (a rolled-up newspaper).
fn melee_attack(
    state: &mut GameState,
    idx: usize,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<()> {
    let (enemy_id, name) = {
        let enemy = &mut state.current_room_mut()?.enemies[idx];
        enemy.take_damage(BASE_MELEE_DAMAGE);
        (enemy.id, enemy.archetype.display_name())
    };

    events.push(GameEvent::EnemyDamaged {
        enemy_id,
        damage: BASE_MELEE_DAMAGE,
    });
    events.push(GameEvent::message(format!(
        "You hit the {} for {} damage!",
        name, BASE_MELEE_DAMAGE
    )));

    if !state.current_room()?.enemies[idx].is_alive() {
        process_defeat(state, idx, rng, events)?;
    }
    Ok(())
}

/// Throws or swings an inventory weapon at `target`.
///
/// Out-of-range attempts spend nothing and do not consume the turn. An
/// in-range throw at an empty tile still spends the ammo.
pub fn resolve_ranged_attack(
    state: &mut GameState,
    target: GridPos,
    weapon: ItemKind,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<bool> {
    let spec = match weapon.weapon_spec() {
        Some(spec) => spec,
        None => {
            events.push(GameEvent::message(format!(
                "Can't attack with {}.",
                weapon.display_name()
            )));
            return Ok(false);
        }
    };
    let item_idx = match state.find_item(weapon) {
        Some(idx) => idx,
        None => {
            events.push(GameEvent::message(format!(
                "You don't have a {}.",
                weapon.display_name()
            )));
            return Ok(false);
        }
    };
    if state.inventory[item_idx].uses == Some(0) {
        events.push(GameEvent::message(format!(
            "The {} is out of ammo.",
            weapon.display_name()
        )));
        return Ok(false);
    }
    if !spec.in_range(state.player, target) {
        events.push(GameEvent::message("Out of range.".to_string()));
        return Ok(false);
    }

    if state.inventory[item_idx].expend_use() {
        state.inventory.remove(item_idx);
        events.push(GameEvent::InventoryChanged);
    }

    let enemy_idx = match state.current_room()?.living_enemy_index_at(target) {
        Some(idx) => idx,
        None => {
            events.push(GameEvent::message(
                "The throw sails past. Nothing there.".to_string(),
            ));
            return Ok(true);
        }
    };

    let (enemy_id, name) = {
        let enemy = &mut state.current_room_mut()?.enemies[enemy_idx];
        enemy.take_damage(spec.damage);
        (enemy.id, enemy.archetype.display_name())
    };
    events.push(GameEvent::EnemyDamaged {
        enemy_id,
        damage: spec.damage,
    });
    events.push(GameEvent::message(format!(
        "You hurl the {} at the {} for {} damage!",
        weapon.display_name(),
        name,
        spec.damage
    )));

    if state.current_room()?.enemies[enemy_idx].is_alive() {
        if spec.stuns {
            state.current_room_mut()?.enemies[enemy_idx].stun();
            events.push(GameEvent::message(format!("The {} is stunned!", name)));
        }
    } else {
        process_defeat(state, enemy_idx, rng, events)?;
    }
    Ok(true)
}

/// Uses the inventory item at `index`. Only consumables do anything; the
/// turn is consumed only on success.
pub fn use_item(
    state: &mut GameState,
    index: usize,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<bool> {
    let kind = match state.inventory.get(index) {
        Some(instance) => instance.kind,
        None => {
            events.push(GameEvent::message("No such item.".to_string()));
            return Ok(false);
        }
    };

    if kind.class() != ItemClass::Consumable {
        events.push(GameEvent::message(format!(
            "Can't use {} right now.",
            kind.display_name()
        )));
        return Ok(false);
    }

    match kind {
        ItemKind::Coffee => {
            state.heal(COFFEE_HEAL);
            state.add_burnout(-COFFEE_CALM);
            events.push(GameEvent::message(
                "Slurped some coffee. Feeling jittery but alive.".to_string(),
            ));
        }
        _ => {
            events.push(GameEvent::message(format!(
                "Can't use {} right now.",
                kind.display_name()
            )));
            return Ok(false);
        }
    }

    events.push(GameEvent::ItemUsed { kind });
    if state.inventory[index].expend_use() {
        state.inventory.remove(index);
    }
    events.push(GameEvent::InventoryChanged);
    events.push(state.stats_event());
    Ok(true)
}

/// Pays out a defeated enemy: credits, a coin-flip loot drop at its former
/// tile, then removal from the room.
fn process_defeat(
    state: &mut GameState,
    idx: usize,
    rng: &mut StdRng,
    events: &mut Vec<GameEvent>,
) -> OvertimeResult<()> {
    let (enemy_id, archetype, pos) = {
        let enemy = &state.current_room()?.enemies[idx];
        (enemy.id, enemy.archetype, enemy.pos)
    };

    let reward = loot::credit_reward(archetype, rng);
    state.credits += reward;
    state.current_room_mut()?.enemies.remove(idx);

    events.push(GameEvent::EnemyDefeated {
        enemy_id,
        credits_dropped: reward,
    });
    events.push(GameEvent::Message {
        text: format!(
            "Defeated {}! (+{} Credits)",
            archetype.display_name(),
            reward
        ),
        importance: MessageImportance::High,
    });

    if let Some(item) = loot::roll_drop(archetype, rng) {
        state
            .current_room_mut()?
            .objects
            .push(InteractionObject::pickup(item, pos));
        events.push(GameEvent::message(format!(
            "The {} dropped something.",
            archetype.display_name()
        )));
    }
    events.push(state.stats_event());
    Ok(())
}
