//! # WAYFARER Procedural Generation
//!
//! Deterministic region generation for a world that is never persisted.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: The same coordinate always produces the same region
//! 2. **Regenerable**: Nothing here is stored; evicted regions come back
//!    identical
//! 3. **Seamless**: Field noise is sampled at world-absolute tiles, so
//!    neighbouring fields line up
//!
//! ## Core Components
//!
//! - `CoordRng`: pairing-function seeded generator with `uniform`/`range`
//! - `Hitmap`: bit-packed occupancy grid with the corner-sampled `fits` test
//! - `FieldNoise`: two-layer simplex noise for open fields
//! - `Terrain`: per-region tiles, hitmap, portals and rounding metadata
//!
//! ## Example
//!
//! ```rust,ignore
//! use wayfarer_procedural::{NoiseSeed, RegionType, Terrain, TerrainRequest, WorldRoot};
//!
//! let terrain = Terrain::generate(&TerrainRequest {
//!     root: WorldRoot::Overworld,
//!     kind: RegionType::Field,
//!     x: 3,
//!     y: -2,
//!     is_town: false,
//!     is_dungeon_entrance: false,
//!     noise_seed: NoiseSeed::default(),
//! });
//!
//! assert!(terrain.hitmap().fits(10.0, 10.0, 1.0, 1.0) || terrain.hitmap().get(10, 10));
//! ```

#![deny(unsafe_code)]

pub mod buildings;
pub mod hitmap;
pub mod kind;
pub mod noise;
pub mod rng;
pub mod rounding;
pub mod terrain;
pub mod tiles;
pub mod towns;

pub use hitmap::{Hitmap, CORNER_EPSILON};
pub use kind::{RegionType, WorldRoot};
pub use noise::{FieldNoise, NoiseSeed, SimplexNoise};
pub use rng::{coord_option, name_chance, seed_from_coord, seed_from_name, CoordRng, CoordSeed};
pub use terrain::{Portal, PortalTarget, Terrain, TerrainRequest};
pub use tiles::{tileset_name, Tile};
