//! Integration tests for procedural floor generation.
//!
//! These exercise whole floors through the public API and re-check the
//! engine's reachability guarantee with an independent flood fill.

use overtime::config::{DOOR_MIDPOINT, ROOM_GRID_SIZE};
use overtime::generation::utils;
use overtime::{
    generate_floor, Cell, FloorGenerator, GameState, GenerationConfig, Generator, GridPos,
    ItemKind, ObjectKind, Room,
};
use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};

fn generate(config: &GenerationConfig) -> GameState {
    let mut rng = utils::create_rng(config);
    FloorGenerator::new()
        .generate(config, &mut rng)
        .expect("Failed to generate floor")
}

/// The four edge-midpoint tiles that are carved open, located without going
/// through the engine's door helpers.
fn open_door_tiles(room: &Room) -> Vec<GridPos> {
    let last = ROOM_GRID_SIZE - 1;
    [
        GridPos::new(DOOR_MIDPOINT, 0),
        GridPos::new(DOOR_MIDPOINT, last),
        GridPos::new(0, DOOR_MIDPOINT),
        GridPos::new(last, DOOR_MIDPOINT),
    ]
    .into_iter()
    .filter(|&pos| room.cell(pos) == Some(Cell::Walkable))
    .collect()
}

/// Flood fill over walkable, object-free tiles. Deliberately written from
/// scratch rather than reusing the generator's own reachability check.
fn reachable_from(room: &Room, start: GridPos) -> HashSet<GridPos> {
    let mut seen = HashSet::new();
    let mut open = VecDeque::new();
    seen.insert(start);
    open.push_back(start);

    while let Some(pos) = open.pop_front() {
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            let next = GridPos::new(pos.x + dx, pos.y + dy);
            if seen.contains(&next) {
                continue;
            }
            if room.cell(next) != Some(Cell::Walkable) || room.object_at(next).is_some() {
                continue;
            }
            seen.insert(next);
            open.push_back(next);
        }
    }
    seen
}

fn room_holding(state: &GameState, pred: impl Fn(&ObjectKind) -> bool) -> Option<&Room> {
    state
        .rooms
        .values()
        .find(|room| room.objects.iter().any(|object| pred(&object.kind)))
}

/// Test that the five pinned rooms all exist and never coincide.
#[test]
fn test_critical_rooms_are_distinct() {
    for seed in [3u64, 41, 900] {
        let state = generate(&GenerationConfig::new(seed));

        let key = room_holding(&state, |k| {
            *k == ObjectKind::Pickup {
                item: ItemKind::BlueKeycard,
            }
        })
        .expect("no Blue Keycard room");
        let red_key = room_holding(&state, |k| {
            *k == ObjectKind::Pickup {
                item: ItemKind::RedKeycard,
            }
        })
        .expect("no Red Keycard room");
        let macguffin = room_holding(&state, |k| {
            *k == ObjectKind::Pickup {
                item: ItemKind::Report,
            }
        })
        .expect("no Quarterly Report room");
        let goal =
            room_holding(&state, |k| *k == ObjectKind::Elevator).expect("no elevator room");

        let mut ids = vec![
            state.current_room_id.clone(),
            key.room_id.clone(),
            red_key.room_id.clone(),
            macguffin.room_id.clone(),
            goal.room_id.clone(),
        ];
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5, "critical rooms collided at seed {}", seed);
    }
}

/// Test that no two entities or object tiles ever share a cell, and that
/// everything sits on walkable floor.
#[test]
fn test_nothing_overlaps_on_generated_floors() {
    for seed in [4u64, 19, 86] {
        let state = generate(&GenerationConfig::new(seed));

        for room in state.rooms.values() {
            let mut occupied: HashSet<GridPos> = HashSet::new();

            for enemy in &room.enemies {
                assert_eq!(
                    room.cell(enemy.pos),
                    Some(Cell::Walkable),
                    "enemy on solid cell in {} at seed {}",
                    room.room_id,
                    seed
                );
                assert!(
                    occupied.insert(enemy.pos),
                    "two entities share {:?} in {} at seed {}",
                    enemy.pos,
                    room.room_id,
                    seed
                );
            }
            for object in &room.objects {
                for cell in object.footprint() {
                    assert_eq!(
                        room.cell(cell),
                        Some(Cell::Walkable),
                        "object {} on solid cell in {} at seed {}",
                        object.sprite,
                        room.room_id,
                        seed
                    );
                    assert!(
                        occupied.insert(cell),
                        "object {} overlaps at {:?} in {} at seed {}",
                        object.sprite,
                        cell,
                        room.room_id,
                        seed
                    );
                }
            }
        }
    }
}

/// Test that tower level drives the enemy population up.
#[test]
fn test_enemy_totals_scale_with_tower_level() {
    let count = |level: u32| -> usize {
        let state = generate(&GenerationConfig::for_tower_level(5, level));
        state.rooms.values().map(|room| room.enemies.len()).sum()
    };

    let low = count(1);
    let high = count(20);
    assert!(
        high > low,
        "expected more enemies on floor 20 ({}) than floor 1 ({})",
        high,
        low
    );
}

/// Test that world-boundary edges carry windows instead of doors.
#[test]
fn test_boundary_edges_are_windowed() {
    let config = GenerationConfig::for_testing(64);
    let state = generate(&config);
    let last = ROOM_GRID_SIZE - 1;

    for room in state.rooms.values() {
        if room.grid_x == 0 {
            assert_eq!(room.cell(GridPos::new(0, DOOR_MIDPOINT)), Some(Cell::Window));
        }
        if room.grid_x == config.world_width - 1 {
            assert_eq!(
                room.cell(GridPos::new(last, DOOR_MIDPOINT)),
                Some(Cell::Window)
            );
        }
        if room.grid_y == 0 {
            assert_eq!(room.cell(GridPos::new(DOOR_MIDPOINT, 0)), Some(Cell::Window));
        }
        if room.grid_y == config.world_height - 1 {
            assert_eq!(
                room.cell(GridPos::new(DOOR_MIDPOINT, last)),
                Some(Cell::Window)
            );
        }
    }
}

/// Test that a generated floor survives a JSON save/load unchanged.
#[test]
fn test_generated_floor_survives_json_reload() {
    let state = generate(&GenerationConfig::for_testing(99));
    let json = state.save_to_json().expect("Failed to serialize state");
    let restored = GameState::load_from_json(&json).expect("Failed to restore state");
    assert_eq!(restored, state);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Every carved door must reach every other door in its room, for any
    /// world shape and tower level.
    #[test]
    fn doors_stay_mutually_reachable(
        seed in any::<u64>(),
        width in 2i32..=7,
        height in 2i32..=7,
        level in 1u32..=20,
    ) {
        prop_assume!(width * height >= 5);

        let state = generate_floor(seed, width, height, level)
            .expect("Failed to generate floor");

        for room in state.rooms.values() {
            let doors = open_door_tiles(room);
            if let Some(&first) = doors.first() {
                let seen = reachable_from(room, first);
                for door in &doors {
                    prop_assert!(
                        seen.contains(door),
                        "seed={}, room {}: door at {:?} cut off",
                        seed,
                        room.room_id,
                        door
                    );
                }
            }
        }
    }
}
