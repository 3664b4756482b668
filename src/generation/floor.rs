//! # Floor Generation
//!
//! Builds one tower floor as a complete [`GameState`]: critical-path
//! placement over the room graph, per-room carving, content population, and
//! door-to-door reachability validation.
//!
//! The critical path pins five rooms: the start, the Blue Keycard, the
//! Quarterly Report behind a locked alcove, the Red Keycard, and the goal
//! room holding the strongbox and the barricaded elevator. Every other room
//! is filled by a generate-and-validate loop that sheds obstacles until its
//! doors connect, or gives up and ships the room empty of objects.

use crate::config::{DOOR_MIDPOINT, ROOM_GRID_SIZE};
use crate::game::{
    world, Archetype, Cell, Direction, Enemy, GameState, GridPos, InteractionObject, ItemKind,
    ObjectKind, Room,
};
use crate::generation::{encounters, GenerationConfig, Generator};
use crate::{OvertimeError, OvertimeResult};
use log::{debug, info, warn};
use pathfinding::directed::bfs::bfs_reach;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

/// Placement attempts per enemy before skipping it.
const ENEMY_PLACEMENT_ATTEMPTS: u32 = 20;

/// Placement attempts per object before skipping it.
const OBJECT_PLACEMENT_ATTEMPTS: u32 = 20;

/// Credits one vending machine charges.
const VENDING_COST: u32 = 5;

/// Water capacity of a freshly placed cooler.
const WATER_COOLER_USES: u32 = 3;

/// The five pinned rooms of a floor, in room-graph coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalPath {
    pub start: GridPos,
    pub key: GridPos,
    pub macguffin: GridPos,
    pub red_key: GridPos,
    pub goal: GridPos,
}

/// Picks the critical-path rooms for a floor.
///
/// Each node is rejection-sampled under its distance constraint for a
/// bounded number of attempts; on exhaustion placement falls back to the
/// first unclaimed room at maximal distance from the start (row-major
/// scan). The fallback relaxes distances but never pairwise distinctness.
pub fn place_critical_path(config: &GenerationConfig, rng: &mut StdRng) -> CriticalPath {
    let w = config.world_width;
    let h = config.world_height;

    let start = match rng.gen_range(0..4) {
        0 => GridPos::new(rng.gen_range(0..w), 0),
        1 => GridPos::new(rng.gen_range(0..w), h - 1),
        2 => GridPos::new(0, rng.gen_range(0..h)),
        _ => GridPos::new(w - 1, rng.gen_range(0..h)),
    };

    let goal = sample_room(config, rng, start, 4, &[start]);
    let key = sample_room(config, rng, start, 2, &[start, goal]);
    let macguffin = sample_room(config, rng, start, 3, &[start, goal, key]);
    let red_key = sample_room(config, rng, start, 3, &[start, goal, key, macguffin]);

    CriticalPath {
        start,
        key,
        macguffin,
        red_key,
        goal,
    }
}

/// Samples one room farther than `min_distance` from `start` and distinct
/// from everything in `taken`, falling back deterministically when the
/// attempt budget runs out.
fn sample_room(
    config: &GenerationConfig,
    rng: &mut StdRng,
    start: GridPos,
    min_distance: u32,
    taken: &[GridPos],
) -> GridPos {
    let w = config.world_width;
    let h = config.world_height;

    for _ in 0..config.critical_path_attempts {
        let candidate = GridPos::new(rng.gen_range(0..w), rng.gen_range(0..h));
        if candidate.manhattan_distance(start) > min_distance && !taken.contains(&candidate) {
            return candidate;
        }
    }

    // Farthest free room wins, first one scanned breaks ties.
    let mut best: Option<(u32, GridPos)> = None;
    for y in 0..h {
        for x in 0..w {
            let pos = GridPos::new(x, y);
            if taken.contains(&pos) {
                continue;
            }
            let dist = pos.manhattan_distance(start);
            if best.map_or(true, |(bd, _)| dist > bd) {
                best = Some((dist, pos));
            }
        }
    }
    best.map(|(_, pos)| pos).unwrap_or(start)
}

/// Generates a complete floor for the given tower level.
///
/// # Examples
///
/// ```
/// use overtime::{FloorGenerator, GenerationConfig, Generator};
/// use overtime::generation::utils;
///
/// let config = GenerationConfig::for_testing(42);
/// let mut rng = utils::create_rng(&config);
/// let state = FloorGenerator::new().generate(&config, &mut rng).unwrap();
///
/// assert_eq!(state.rooms.len(), 25);
/// assert!(state.rooms.contains_key(&state.current_room_id));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FloorGenerator;

impl FloorGenerator {
    pub fn new() -> Self {
        Self
    }

    fn build_floor(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> OvertimeResult<GameState> {
        let room_count = config.world_width * config.world_height;
        if room_count < 5 {
            return Err(OvertimeError::InvalidState(format!(
                "world of {} rooms cannot hold the 5-room critical path",
                room_count
            )));
        }

        let path = place_critical_path(config, rng);
        debug!(
            "floor {} critical path: start {:?} key {:?} macguffin {:?} red-key {:?} goal {:?}",
            config.tower_level, path.start, path.key, path.macguffin, path.red_key, path.goal
        );

        let mut state = GameState::new(config.seed);
        state.tower_level = config.tower_level;

        for gy in 0..config.world_height {
            for gx in 0..config.world_width {
                let mut room = carve_room(config, gx, gy);
                populate_room(&mut room, GridPos::new(gx, gy), &path, config, rng);
                state.rooms.insert(room.room_id.clone(), room);
            }
        }

        state.current_room_id = world::room_id(path.start.x, path.start.y);
        state.player = GridPos::new(DOOR_MIDPOINT, DOOR_MIDPOINT);
        state.visited_rooms.insert(state.current_room_id.clone());

        info!(
            "generated floor {}: {} rooms, start room {}",
            config.tower_level,
            state.rooms.len(),
            state.current_room_id
        );
        Ok(state)
    }
}

impl Generator<GameState> for FloorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> OvertimeResult<GameState> {
        let state = self.build_floor(config, rng)?;
        self.validate(&state, config)?;
        Ok(state)
    }

    fn validate(&self, state: &GameState, config: &GenerationConfig) -> OvertimeResult<()> {
        state.validate()?;

        let expected = (config.world_width * config.world_height) as usize;
        if state.rooms.len() != expected {
            return Err(OvertimeError::GenerationFailed(format!(
                "expected {} rooms, generated {}",
                expected,
                state.rooms.len()
            )));
        }
        for room in state.rooms.values() {
            if !doors_connected(room) {
                return Err(OvertimeError::GenerationFailed(format!(
                    "room {} has disconnected doors",
                    room.room_id
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "FloorGenerator"
    }
}

/// Generates a floor from a bare seed, clamping the world dimensions so the
/// critical path always fits.
pub fn generate_floor(
    seed: u64,
    width: i32,
    height: i32,
    tower_level: u32,
) -> OvertimeResult<GameState> {
    let width = width.max(2);
    let mut height = height.max(2);
    if width * height < 5 {
        height = 3;
    }

    let config = GenerationConfig {
        world_width: width,
        world_height: height,
        tower_level,
        ..GenerationConfig::new(seed)
    };
    let mut rng = super::utils::create_rng(&config);
    FloorGenerator::new().generate(&config, &mut rng)
}

/// Carves a room shell: doors toward in-world neighbors, windows along
/// world boundaries.
fn carve_room(config: &GenerationConfig, gx: i32, gy: i32) -> Room {
    let mut room = Room::new(gx, gy);
    for dir in Direction::all() {
        let delta = dir.to_delta();
        let nx = gx + delta.x;
        let ny = gy + delta.y;
        if nx >= 0 && nx < config.world_width && ny >= 0 && ny < config.world_height {
            room.carve_door(dir);
        } else {
            room.seal_edge_with_windows(dir);
        }
    }
    room
}

fn populate_room(
    room: &mut Room,
    coords: GridPos,
    path: &CriticalPath,
    config: &GenerationConfig,
    rng: &mut StdRng,
) {
    if coords == path.start {
        populate_start_room(room, config);
    } else if coords == path.key {
        populate_key_room(room);
    } else if coords == path.red_key {
        populate_red_key_room(room);
    } else if coords == path.macguffin {
        populate_macguffin_room(room, config, rng);
    } else if coords == path.goal {
        populate_goal_room(room);
    } else {
        populate_generic_room(room, config, rng);
    }
}

/// The spawn room: one sign, no enemies.
fn populate_start_room(room: &mut Room, config: &GenerationConfig) {
    room.objects.push(InteractionObject::new(
        ObjectKind::Readable {
            text: format!(
                "Floor {}. Find the Blue Keycard to access the Elevator.",
                config.tower_level
            ),
        },
        GridPos::new(5, 4),
    ));
}

/// Blue Keycard room: one Manager guarding the pickup.
fn populate_key_room(room: &mut Room) {
    room.enemies
        .push(Enemy::new(Archetype::Manager, GridPos::new(5, 4)));
    room.objects
        .push(InteractionObject::pickup(ItemKind::BlueKeycard, GridPos::new(5, 8)));
}

/// Red Keycard room: one Printer covering the pickup.
fn populate_red_key_room(room: &mut Room) {
    room.enemies
        .push(Enemy::new(Archetype::Printer, GridPos::new(5, 4)));
    room.objects
        .push(InteractionObject::pickup(ItemKind::RedKeycard, GridPos::new(5, 8)));
}

/// The Quarterly Report sits in a one-cell alcove in the northeast corner,
/// behind a locked door, with a level-scaled guard in the open.
fn populate_macguffin_room(room: &mut Room, config: &GenerationConfig, rng: &mut StdRng) {
    let guard = encounters::guard_archetype(config.tower_level, rng);
    room.enemies.push(Enemy::new(guard, GridPos::new(5, 5)));

    room.set_cell(GridPos::new(9, 1), Cell::Wall);
    room.set_cell(GridPos::new(9, 3), Cell::Wall);
    room.objects.push(InteractionObject::new(
        ObjectKind::LockedDoor,
        GridPos::new(8, 2),
    ));
    room.objects
        .push(InteractionObject::pickup(ItemKind::Report, GridPos::new(9, 2)));
}

/// The goal room: strongbox in the open, elevator sealed in the alcove
/// behind a keycard barrier, two Printers on overwatch.
fn populate_goal_room(room: &mut Room) {
    room.enemies
        .push(Enemy::new(Archetype::Printer, GridPos::new(3, 3)));
    room.enemies
        .push(Enemy::new(Archetype::Printer, GridPos::new(7, 3)));

    room.set_cell(GridPos::new(9, 1), Cell::Wall);
    room.set_cell(GridPos::new(9, 3), Cell::Wall);
    room.objects
        .push(InteractionObject::new(ObjectKind::Barrier, GridPos::new(8, 2)));
    room.objects
        .push(InteractionObject::new(ObjectKind::Elevator, GridPos::new(9, 2)));
    room.objects
        .push(InteractionObject::new(ObjectKind::Strongbox, GridPos::new(2, 2)));
}

/// Fixed conference layout used for a fraction of generic rooms.
fn populate_meeting_room(room: &mut Room) {
    room.objects.push(
        InteractionObject::new(ObjectKind::MeetingTable, GridPos::new(4, 4)).with_size(4, 2),
    );
    room.enemies
        .push(Enemy::new(Archetype::Intern, GridPos::new(2, 2)));
    room.enemies
        .push(Enemy::new(Archetype::Intern, GridPos::new(8, 8)));
    room.enemies
        .push(Enemy::new(Archetype::Manager, GridPos::new(8, 2)));
    room.objects.push(InteractionObject::new(
        ObjectKind::Readable {
            text: "Agenda: synergy, alignment, circling back.".to_string(),
        },
        GridPos::new(2, 8),
    ));
}

/// Generic room: enemies first, then an object layout that keeps every door
/// reachable. Failed layouts retry with one less macro obstacle; after the
/// last failure the room ships with enemies only.
fn populate_generic_room(room: &mut Room, config: &GenerationConfig, rng: &mut StdRng) {
    if rng.gen_bool(config.meeting_room_chance) {
        populate_meeting_room(room);
        return;
    }

    let enemy_count = encounters::enemy_count_for_level(config.tower_level);
    place_enemies(room, enemy_count, rng);

    let mut budget = config.max_macro_obstacles;
    for attempt in 0..config.room_validation_attempts {
        let objects = roll_room_objects(room, budget, config, rng);
        room.objects = objects;
        if doors_connected(room) {
            if attempt > 0 {
                debug!(
                    "room {} layout accepted on attempt {} (macro budget {})",
                    room.room_id,
                    attempt + 1,
                    budget
                );
            }
            return;
        }
        room.objects.clear();
        budget = budget.saturating_sub(1);
    }

    warn!(
        "room {} failed layout validation {} times, shipping without objects",
        room.room_id, config.room_validation_attempts
    );
}

fn place_enemies(room: &mut Room, count: u32, rng: &mut StdRng) {
    for _ in 0..count {
        let archetype = encounters::random_archetype(rng);
        for _ in 0..ENEMY_PLACEMENT_ATTEMPTS {
            let pos = random_interior_cell(rng);
            if room.is_cell_free(pos) {
                room.enemies.push(Enemy::new(archetype, pos));
                break;
            }
        }
    }
}

/// Rolls one object layout for a generic room: macro obstacles under the
/// given budget, a few single-tile decorations, and maybe a vending
/// machine. Placements that collide are skipped, not retried forever.
fn roll_room_objects(
    room: &Room,
    macro_budget: u32,
    config: &GenerationConfig,
    rng: &mut StdRng,
) -> Vec<InteractionObject> {
    let mut objects: Vec<InteractionObject> = Vec::new();

    let macro_count = rng.gen_range(0..=macro_budget);
    for _ in 0..macro_count {
        let kind = if rng.gen_bool(0.5) {
            ObjectKind::MeetingTable
        } else {
            ObjectKind::ServerRack
        };
        try_place_object(room, &mut objects, kind, rng);
    }

    let deco_count = rng.gen_range(config.min_decorations..=config.max_decorations);
    for _ in 0..deco_count {
        let kind = match rng.gen_range(0..3) {
            0 => ObjectKind::Desk,
            1 => ObjectKind::Plant,
            _ => ObjectKind::WaterCooler {
                uses: WATER_COOLER_USES,
            },
        };
        try_place_object(room, &mut objects, kind, rng);
    }

    if rng.gen_bool(config.vending_chance) {
        try_place_object(room, &mut objects, ObjectKind::Vending { cost: VENDING_COST }, rng);
    }

    objects
}

fn try_place_object(
    room: &Room,
    objects: &mut Vec<InteractionObject>,
    kind: ObjectKind,
    rng: &mut StdRng,
) {
    for _ in 0..OBJECT_PLACEMENT_ATTEMPTS {
        let anchor = random_interior_cell(rng);
        let candidate = InteractionObject::new(kind.clone(), anchor);
        if object_fits(room, objects, &candidate) {
            objects.push(candidate);
            return;
        }
    }
}

/// An object fits when its whole footprint lies on open interior cells,
/// clear of door buffers, placed objects, and enemies.
fn object_fits(room: &Room, placed: &[InteractionObject], candidate: &InteractionObject) -> bool {
    for cell in candidate.footprint() {
        if cell.x < 1
            || cell.y < 1
            || cell.x >= ROOM_GRID_SIZE - 1
            || cell.y >= ROOM_GRID_SIZE - 1
        {
            return false;
        }
        if !room.is_cell_open(cell) || room.in_door_buffer(cell) {
            return false;
        }
        if room.living_enemy_at(cell).is_some() {
            return false;
        }
    }
    !placed.iter().any(|other| candidate.overlaps(other))
}

fn random_interior_cell(rng: &mut StdRng) -> GridPos {
    GridPos::new(
        rng.gen_range(1..ROOM_GRID_SIZE - 1),
        rng.gen_range(1..ROOM_GRID_SIZE - 1),
    )
}

/// Breadth-first reachability over open, object-free cells: every door must
/// reach every other door. Enemies do not block.
pub fn doors_connected(room: &Room) -> bool {
    let doors = room.door_positions();
    if doors.len() <= 1 {
        return true;
    }

    let reachable: HashSet<GridPos> = bfs_reach(doors[0], |&pos| {
        pos.cardinal_neighbors()
            .into_iter()
            .filter(|&next| room.is_cell_open(next) && room.object_at(next).is_none())
            .collect::<Vec<_>>()
    })
    .collect();

    doors.iter().all(|door| reachable.contains(door))
}
