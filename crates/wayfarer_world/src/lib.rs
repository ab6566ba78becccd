//! # WAYFARER World Engine
//!
//! Server-side region lifecycle for a persistent, procedurally generated
//! world.
//!
//! ## Design Principles
//!
//! 1. **Regenerate, never persist**: a region is a pure function of its
//!    address, so eviction loses nothing
//! 2. **At most one instance**: concurrent lookups for one address build it
//!    once
//! 3. **Players keep regions alive**: idle regions expire after a grace
//!    period, and any player arrival cancels that
//! 4. **Bounded placement**: entity placement gives up after a fixed number
//!    of attempts instead of hanging construction
//!
//! ## Core Components
//!
//! - `RegionAddress`: hierarchical identifier plus its validity grammar
//! - `Region`: terrain, residents, entry/exit broadcasts
//! - `RegionCache`: get-or-create, per-region ticker, idle eviction
//! - `EntityFactory`: the boundary to the entity layer
//!
//! ## Example
//!
//! ```rust,ignore
//! use wayfarer_world::{Player, RegionCache, WorldConfig};
//!
//! let cache = RegionCache::new(WorldConfig::default(), tokio::runtime::Handle::current());
//! let town = cache.get_region_by_id("overworld,field:0:0").expect("valid address");
//!
//! let (player, events) = Player::new("ada");
//! town.lock().add_entity(Box::new(player));
//! ```

#![deny(unsafe_code)]

pub mod address;
pub mod archetypes;
pub mod cache;
pub mod config;
pub mod containers;
pub mod entity;
pub mod error;
pub mod events;
pub mod population;
pub mod region;
pub mod scheduler;
pub mod shops;
pub mod snapshot;

pub use address::{is_dungeon_pos, is_town_pos, AddressParent, RegionAddress, ODDS_DUNGEON, ODDS_TOWN};
pub use archetypes::{ArchetypeRegistry, ArchetypeSpec, EntityFactory};
pub use cache::{CacheStats, RegionCache, SharedRegion};
pub use config::{PopulationConfig, ShopConfig, WorldConfig};
pub use containers::{ChestEntity, PotEntity};
pub use entity::{Entity, EntityId, Player, VirtualEntity};
pub use error::{WorldError, WorldResult};
pub use events::{Event, EventKind};
pub use region::Region;
pub use scheduler::{RegionTasks, TickStats};
pub use snapshot::RegionSnapshot;

pub use wayfarer_procedural::{RegionType, WorldRoot};
