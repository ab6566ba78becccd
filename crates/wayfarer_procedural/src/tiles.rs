//! Tile codes and tileset names.
//!
//! Tiles are small unsigned integers stored row-major in the terrain buffer.
//! The client maps them onto sprites from the tileset resolved by
//! [`tileset_name`].

use crate::kind::{RegionType, WorldRoot};

/// Tile code.
pub type Tile = u16;

// Field tiles.

/// Open grass.
pub const GRASS: Tile = 0;
/// Grass with flowers.
pub const FLOWERS: Tile = 1;
/// Sand / shoreline.
pub const SAND: Tile = 2;
/// Open water.
pub const WATER: Tile = 3;
/// Tree.
pub const TREE: Tile = 4;
/// Dirt path.
pub const PATH: Tile = 5;
/// Town plaza cobbles.
pub const PLAZA: Tile = 6;
/// Exterior house wall / roof.
pub const BUILDING: Tile = 7;
/// Exterior door.
pub const DOOR: Tile = 9;
/// Stairs leading down.
pub const STAIRS_DOWN: Tile = 10;
/// Stairs leading up.
pub const STAIRS_UP: Tile = 11;

/// Water edge tiles: `WATER_EDGE + mask`, where the low four bits flag which
/// of the N/E/S/W neighbours are dry land.
pub const WATER_EDGE: Tile = 16;

/// Edge mask bit: north neighbour is land.
pub const EDGE_N: Tile = 1;
/// Edge mask bit: east neighbour is land.
pub const EDGE_E: Tile = 2;
/// Edge mask bit: south neighbour is land.
pub const EDGE_S: Tile = 4;
/// Edge mask bit: west neighbour is land.
pub const EDGE_W: Tile = 8;

// Dungeon tiles.

/// Dungeon floor.
pub const DUNGEON_FLOOR: Tile = 32;
/// Dungeon wall.
pub const DUNGEON_WALL: Tile = 33;

// Interior tiles.

/// Wooden floor (overworld houses).
pub const FLOOR_WOOD: Tile = 40;
/// Stone floor (overworld shops).
pub const FLOOR_STONE: Tile = 41;
/// Ether-plane floor.
pub const FLOOR_ETHER: Tile = 42;
/// Interior wall.
pub const WALL: Tile = 43;
/// Shop counter.
pub const COUNTER: Tile = 44;
/// Bed.
pub const BED: Tile = 45;
/// Table.
pub const TABLE: Tile = 46;
/// Door mat leading back outside.
pub const EXIT_MAT: Tile = 47;

/// Marker: a shop chest is instantiated on this tile.
pub const CHEST_MARKER: Tile = 58;
/// Marker: a pot is instantiated on this tile.
pub const POT_MARKER: Tile = 59;

/// Returns whether a tile blocks placement and movement.
#[must_use]
pub const fn is_solid(tile: Tile) -> bool {
    matches!(
        tile,
        WATER
            | TREE
            | BUILDING
            | DUNGEON_WALL
            | WALL
            | COUNTER
            | BED
            | TABLE
            | CHEST_MARKER
            | POT_MARKER
    ) || is_water_edge(tile)
}

/// Returns whether a tile is one of the rounded water edge variants.
#[must_use]
pub const fn is_water_edge(tile: Tile) -> bool {
    tile > WATER_EDGE && tile < WATER_EDGE + 16
}

/// Returns whether a tile is water of any kind.
#[must_use]
pub const fn is_water(tile: Tile) -> bool {
    tile == WATER || is_water_edge(tile)
}

/// Resolves the tileset a region renders with.
///
/// Only the overworld has tilesets; any other root returns `None`.
#[must_use]
pub const fn tileset_name(root: WorldRoot, kind: RegionType) -> Option<&'static str> {
    match root {
        WorldRoot::Overworld => Some(match kind {
            RegionType::House | RegionType::Shop => "tileset_interiors",
            RegionType::Dungeon => "tileset_dungeons",
            RegionType::Field => "tileset_default",
        }),
        WorldRoot::Ether => None,
    }
}
