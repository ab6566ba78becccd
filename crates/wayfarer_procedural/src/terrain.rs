//! # Terrain
//!
//! Per-region tile buffer plus its matching occupancy grid.
//!
//! Terrain is generated exactly once, when its region is constructed, as a
//! pure function of a [`TerrainRequest`]. Generation dispatches on region
//! type:
//!
//! ```text
//! FIELD ───────► noise fill ─► rounding
//!                                  │
//!   town position? ───────────────►├─► town layout
//!   dungeon entrance? ────────────►├─► entrance stairway
//! DUNGEON ────────────────────────►├─► dungeon layout
//! HOUSE / SHOP ───────────────────►└─► building interior
//!                                        │
//!                                  hitmap rebuilt from tiles
//! ```
//!
//! The hitmap is derived from the finished tiles before the terrain is handed
//! back, so placement never observes a partially generated region.

use std::collections::BTreeSet;
use std::fmt;

use crate::buildings;
use crate::hitmap::Hitmap;
use crate::kind::{RegionType, WorldRoot};
use crate::noise::{FieldNoise, NoiseSeed};
use crate::rng::CoordRng;
use crate::rounding;
use crate::tiles::{self, Tile};
use crate::towns;

/// Where a portal leads, relative to the region that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortalTarget {
    /// Back out to the parent region.
    Parent,
    /// Into a child region of this one.
    Child {
        /// Child region type.
        kind: RegionType,
        /// Child x coordinate.
        x: i32,
        /// Child y coordinate.
        y: i32,
    },
}

impl fmt::Display for PortalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str(".."),
            Self::Child { kind, x, y } => write!(f, "{kind}:{x}:{y}"),
        }
    }
}

/// A rectangular trigger area that moves an entity to another region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Portal {
    /// Left tile.
    pub x: usize,
    /// Top tile.
    pub y: usize,
    /// Width in tiles.
    pub width: usize,
    /// Height in tiles.
    pub height: usize,
    /// Destination.
    pub target: PortalTarget,
}

/// Everything terrain generation depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainRequest {
    /// World the region's chain is rooted in.
    pub root: WorldRoot,
    /// Region type.
    pub kind: RegionType,
    /// Region x coordinate.
    pub x: i32,
    /// Region y coordinate.
    pub y: i32,
    /// The region sits at a town position.
    pub is_town: bool,
    /// The region sits at a dungeon entrance position.
    pub is_dungeon_entrance: bool,
    /// World-wide noise seed for field terrain.
    pub noise_seed: NoiseSeed,
}

/// Generated terrain of one region.
#[derive(Clone, Debug)]
pub struct Terrain {
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    tiles: Vec<Tile>,
    hitmap: Hitmap,
    portals: BTreeSet<Portal>,
    rounding: Option<BTreeSet<usize>>,
}

impl Terrain {
    /// Blank (all zero, all free) terrain of the given size.
    #[must_use]
    pub fn blank(width: usize, height: usize, x: i32, y: i32) -> Self {
        Self {
            width,
            height,
            x,
            y,
            tiles: vec![0; width * height],
            hitmap: Hitmap::new(width, height),
            portals: BTreeSet::new(),
            rounding: None,
        }
    }

    /// Generates the terrain for a region.
    #[must_use]
    pub fn generate(request: &TerrainRequest) -> Self {
        let (width, height) = request.kind.dimensions();
        let mut terrain = Self::blank(width, height, request.x, request.y);

        if request.kind == RegionType::Field {
            let field = FieldNoise::new(request.noise_seed);
            field.fill_grid(
                i64::from(request.x) * width as i64,
                i64::from(request.y) * height as i64,
                &mut terrain.tiles,
                width,
                height,
            );
            terrain.rounding = Some(rounding::round(&mut terrain.tiles, width, height));
        }

        if request.is_town {
            towns::apply(&mut terrain, request);
        } else if request.is_dungeon_entrance {
            terrain.apply_dungeon_entrance();
        } else if request.kind == RegionType::Dungeon {
            terrain.apply_dungeon(request);
        } else if request.kind.is_interior() {
            buildings::apply(&mut terrain, request);
        }

        terrain.rebuild_hitmap();
        tracing::debug!(
            kind = %request.kind,
            x = request.x,
            y = request.y,
            occupied = terrain.hitmap.occupied_count(),
            portals = terrain.portals.len(),
            "terrain generated"
        );
        terrain
    }

    /// Stairway down in the middle of the field, leading to the first level.
    fn apply_dungeon_entrance(&mut self) {
        let cx = self.width / 2 - 1;
        let cy = self.height / 2 - 1;
        self.fill_area(cx - 2, cy - 2, 6, 6, tiles::SAND);
        self.fill_area(cx, cy, 2, 2, tiles::STAIRS_DOWN);
        self.add_portal(Portal {
            x: cx,
            y: cy,
            width: 2,
            height: 2,
            target: PortalTarget::Child {
                kind: RegionType::Dungeon,
                x: 0,
                y: 0,
            },
        });
    }

    /// Walled dungeon level with stairs up at one corner and stairs down at a
    /// coordinate-seeded spot.
    fn apply_dungeon(&mut self, request: &TerrainRequest) {
        let (w, h) = (self.width, self.height);
        self.fill_area(0, 0, w, h, tiles::DUNGEON_WALL);
        self.fill_area(1, 1, w - 2, h - 2, tiles::DUNGEON_FLOOR);

        self.fill_area(2, 2, 1, 1, tiles::STAIRS_UP);
        self.add_portal(Portal {
            x: 2,
            y: 2,
            width: 1,
            height: 1,
            target: PortalTarget::Parent,
        });

        let mut rng = CoordRng::for_name(&format!("dungeon/{}/{}", request.x, request.y));
        let sx = rng.range(w as i64 / 2, w as i64 - 4) as usize;
        let sy = rng.range(h as i64 / 2, h as i64 - 4) as usize;
        self.fill_area(sx, sy, 1, 1, tiles::STAIRS_DOWN);
        self.add_portal(Portal {
            x: sx,
            y: sy,
            width: 1,
            height: 1,
            target: PortalTarget::Child {
                kind: RegionType::Dungeon,
                x: 0,
                y: 0,
            },
        });
    }

    /// Re-derives every occupancy bit from the tile buffer.
    pub fn rebuild_hitmap(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                if tiles::is_solid(self.tiles[y * self.width + x]) {
                    self.hitmap.set(x, y);
                } else {
                    self.hitmap.unset(x, y);
                }
            }
        }
    }

    /// Sets every tile of a rectangle (clipped to the buffer).
    pub fn fill_area(&mut self, x: usize, y: usize, width: usize, height: usize, tile: Tile) {
        let end_x = (x + width).min(self.width);
        let end_y = (y + height).min(self.height);
        for row in y..end_y {
            self.tiles[row * self.width + x.min(end_x)..row * self.width + end_x].fill(tile);
        }
    }

    /// Registers a portal.
    pub fn add_portal(&mut self, portal: Portal) {
        self.portals.insert(portal);
    }

    /// Tile at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        (x < self.width && y < self.height).then(|| self.tiles[y * self.width + x])
    }

    /// Row-major tile buffer.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Row-major 2-D rendering of the tile buffer.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<Tile>> {
        self.tiles.chunks(self.width).map(<[Tile]>::to_vec).collect()
    }

    /// Occupancy grid.
    #[must_use]
    pub fn hitmap(&self) -> &Hitmap {
        &self.hitmap
    }

    /// Mutable occupancy grid, for entity placement.
    pub fn hitmap_mut(&mut self) -> &mut Hitmap {
        &mut self.hitmap
    }

    /// Portals, in a stable order.
    pub fn portals(&self) -> impl Iterator<Item = &Portal> {
        self.portals.iter()
    }

    /// Indices rewritten by the rounding pass (fields only).
    #[must_use]
    pub fn rounding(&self) -> Option<&BTreeSet<usize>> {
        self.rounding.as_ref()
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Region x coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Region y coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}
