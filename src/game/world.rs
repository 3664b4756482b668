//! # World Module
//!
//! Room representation: the fixed-size collision grid, door carving, and
//! occupancy queries used by movement, combat, and generation.
//!
//! Every room in the tower is an 11x11 grid of [`Cell`]s with solid border
//! walls. Rooms connect to their neighbors through single door tiles at the
//! midpoint of each shared edge; edges on the world boundary are lined with
//! windows instead.

use crate::config::{DOOR_MIDPOINT, ROOM_GRID_SIZE};
use crate::game::{Direction, Enemy, GridPos, InteractionObject};
use serde::{Deserialize, Serialize};

/// A single tile in a room's collision grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Open floor the player and enemies can occupy
    Walkable,
    /// Solid interior or border wall
    Wall,
    /// Boundary window. Blocks movement like a wall but renders and
    /// messages differently.
    Window,
}

impl Cell {
    /// Whether this cell can be stood on at all.
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Walkable)
    }
}

/// Builds the canonical `"x_y"` room identifier from room-graph coordinates.
pub fn room_id(x: i32, y: i32) -> String {
    format!("{}_{}", x, y)
}

/// Parses an `"x_y"` room identifier back into room-graph coordinates.
///
/// # Examples
///
/// ```
/// use overtime::game::world::parse_room_id;
///
/// assert_eq!(parse_room_id("3_7"), Some((3, 7)));
/// assert_eq!(parse_room_id("lobby"), None);
/// ```
pub fn parse_room_id(id: &str) -> Option<(i32, i32)> {
    let (x, y) = id.split_once('_')?;
    Some((x.parse().ok()?, y.parse().ok()?))
}

/// One floor room: an 11x11 collision grid plus its occupants.
///
/// The grid never changes after generation. Enemies and objects are removed
/// in place as the player defeats or consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Canonical `"x_y"` identifier, matching the key in the room map
    pub room_id: String,
    /// Room-graph x coordinate
    pub grid_x: i32,
    /// Room-graph y coordinate
    pub grid_y: i32,
    /// Collision grid, indexed `grid[y][x]`
    pub grid: Vec<Vec<Cell>>,
    /// Enemies currently in the room
    pub enemies: Vec<Enemy>,
    /// Interactive objects currently in the room
    pub objects: Vec<InteractionObject>,
}

impl Room {
    /// Creates an empty walled shell at the given room-graph coordinate.
    ///
    /// The border is solid wall and the interior open; doors and windows are
    /// carved afterwards by the generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use overtime::{Cell, GridPos, Room};
    ///
    /// let room = Room::new(2, 3);
    /// assert_eq!(room.room_id, "2_3");
    /// assert_eq!(room.cell(GridPos::new(0, 0)), Some(Cell::Wall));
    /// assert_eq!(room.cell(GridPos::new(5, 5)), Some(Cell::Walkable));
    /// ```
    pub fn new(grid_x: i32, grid_y: i32) -> Self {
        let size = ROOM_GRID_SIZE as usize;
        let mut grid = vec![vec![Cell::Walkable; size]; size];
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                    *cell = Cell::Wall;
                }
            }
        }

        Self {
            room_id: room_id(grid_x, grid_y),
            grid_x,
            grid_y,
            grid,
            enemies: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Whether a position lies inside the grid bounds.
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < ROOM_GRID_SIZE && pos.y < ROOM_GRID_SIZE
    }

    /// Gets the cell at a position, or None when out of bounds.
    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.grid[pos.y as usize][pos.x as usize])
    }

    /// Sets the cell at an in-bounds position.
    pub fn set_cell(&mut self, pos: GridPos, cell: Cell) {
        if self.in_bounds(pos) {
            self.grid[pos.y as usize][pos.x as usize] = cell;
        }
    }

    /// The door tile on this room's edge toward the given direction.
    pub fn door_position(dir: Direction) -> GridPos {
        let last = ROOM_GRID_SIZE - 1;
        match dir {
            Direction::North => GridPos::new(DOOR_MIDPOINT, 0),
            Direction::South => GridPos::new(DOOR_MIDPOINT, last),
            Direction::West => GridPos::new(0, DOOR_MIDPOINT),
            Direction::East => GridPos::new(last, DOOR_MIDPOINT),
        }
    }

    /// The open tile just inside the door in the given direction.
    pub fn door_approach(dir: Direction) -> GridPos {
        Self::door_position(dir) + dir.opposite().to_delta()
    }

    /// Opens a door at the edge midpoint toward the given direction.
    pub fn carve_door(&mut self, dir: Direction) {
        self.set_cell(Self::door_position(dir), Cell::Walkable);
    }

    /// Replaces a boundary edge (minus the corners) with window cells.
    pub fn seal_edge_with_windows(&mut self, dir: Direction) {
        let last = ROOM_GRID_SIZE - 1;
        for i in 1..last {
            let pos = match dir {
                Direction::North => GridPos::new(i, 0),
                Direction::South => GridPos::new(i, last),
                Direction::West => GridPos::new(0, i),
                Direction::East => GridPos::new(last, i),
            };
            self.set_cell(pos, Cell::Window);
        }
    }

    /// All carved door tiles in this room.
    pub fn door_positions(&self) -> Vec<GridPos> {
        Direction::all()
            .into_iter()
            .map(Self::door_position)
            .filter(|&pos| self.cell(pos) == Some(Cell::Walkable))
            .collect()
    }

    /// Whether the edge toward `dir` has an open door.
    pub fn has_door(&self, dir: Direction) -> bool {
        self.cell(Self::door_position(dir)) == Some(Cell::Walkable)
    }

    /// Whether a position sits in the 3x3 approach area of any carved door.
    ///
    /// Generation keeps obstacles out of these areas so doors never get
    /// walled in by furniture.
    pub fn in_door_buffer(&self, pos: GridPos) -> bool {
        Direction::all().into_iter().any(|dir| {
            self.has_door(dir) && Self::door_approach(dir).chebyshev_distance(pos) <= 1
        })
    }

    /// Index of the object whose footprint covers a position.
    pub fn object_index_at(&self, pos: GridPos) -> Option<usize> {
        self.objects.iter().position(|obj| obj.occupies(pos))
    }

    /// The object whose footprint covers a position.
    pub fn object_at(&self, pos: GridPos) -> Option<&InteractionObject> {
        self.object_index_at(pos).map(|idx| &self.objects[idx])
    }

    /// Index of the living enemy standing on a position.
    pub fn living_enemy_index_at(&self, pos: GridPos) -> Option<usize> {
        self.enemies
            .iter()
            .position(|e| e.is_alive() && e.pos == pos)
    }

    /// The living enemy standing on a position.
    pub fn living_enemy_at(&self, pos: GridPos) -> Option<&Enemy> {
        self.living_enemy_index_at(pos).map(|idx| &self.enemies[idx])
    }

    /// Whether the cell itself is open floor, ignoring occupants.
    pub fn is_cell_open(&self, pos: GridPos) -> bool {
        self.cell(pos).map(Cell::is_open).unwrap_or(false)
    }

    /// Whether a position is open floor with no object and no living enemy.
    pub fn is_cell_free(&self, pos: GridPos) -> bool {
        self.is_cell_open(pos)
            && self.object_at(pos).is_none()
            && self.living_enemy_at(pos).is_none()
    }

    /// All interior positions (excluding the border ring).
    pub fn interior_positions(&self) -> Vec<GridPos> {
        let mut positions = Vec::new();
        for y in 1..ROOM_GRID_SIZE - 1 {
            for x in 1..ROOM_GRID_SIZE - 1 {
                positions.push(GridPos::new(x, y));
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_shell_has_walled_border() {
        let room = Room::new(0, 0);
        let last = ROOM_GRID_SIZE - 1;
        for i in 0..ROOM_GRID_SIZE {
            assert_eq!(room.cell(GridPos::new(i, 0)), Some(Cell::Wall));
            assert_eq!(room.cell(GridPos::new(i, last)), Some(Cell::Wall));
            assert_eq!(room.cell(GridPos::new(0, i)), Some(Cell::Wall));
            assert_eq!(room.cell(GridPos::new(last, i)), Some(Cell::Wall));
        }
        assert_eq!(room.cell(GridPos::new(5, 5)), Some(Cell::Walkable));
    }

    #[test]
    fn test_room_id_round_trip() {
        assert_eq!(parse_room_id(&room_id(4, 9)), Some((4, 9)));
        assert_eq!(parse_room_id("nope"), None);
        assert_eq!(parse_room_id("a_b"), None);
    }

    #[test]
    fn test_carve_door_and_query() {
        let mut room = Room::new(1, 1);
        assert!(!room.has_door(Direction::East));

        room.carve_door(Direction::East);
        assert!(room.has_door(Direction::East));
        assert_eq!(room.door_positions(), vec![Room::door_position(Direction::East)]);
        assert_eq!(room.cell(GridPos::new(10, 5)), Some(Cell::Walkable));
    }

    #[test]
    fn test_window_edge_keeps_corners() {
        let mut room = Room::new(0, 0);
        room.seal_edge_with_windows(Direction::North);

        assert_eq!(room.cell(GridPos::new(0, 0)), Some(Cell::Wall));
        assert_eq!(room.cell(GridPos::new(10, 0)), Some(Cell::Wall));
        for x in 1..10 {
            assert_eq!(room.cell(GridPos::new(x, 0)), Some(Cell::Window));
        }
    }

    #[test]
    fn test_door_buffer_covers_approach_area() {
        let mut room = Room::new(0, 0);
        room.carve_door(Direction::North);

        // Approach cell for the north door is (5, 1).
        assert!(room.in_door_buffer(GridPos::new(5, 1)));
        assert!(room.in_door_buffer(GridPos::new(4, 2)));
        assert!(!room.in_door_buffer(GridPos::new(5, 4)));
        // No door on the south edge, so no buffer there.
        assert!(!room.in_door_buffer(GridPos::new(5, 9)));
    }

    #[test]
    fn test_out_of_bounds_queries() {
        let room = Room::new(0, 0);
        assert_eq!(room.cell(GridPos::new(-1, 5)), None);
        assert_eq!(room.cell(GridPos::new(5, 11)), None);
        assert!(!room.is_cell_open(GridPos::new(11, 11)));
    }
}
