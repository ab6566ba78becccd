//! # Region
//!
//! A region owns its generated terrain and the entities currently inside
//! it. It is built once per cache slot: terrain is generated, then the
//! population pass places the initial residents, and only then is the region
//! published to anyone else.
//!
//! ## Entry Procedure
//!
//! Adding an entity `E`:
//!
//! 1. Every entity already present receives one `REGION_ENTRANCE` for `E`.
//! 2. `E` receives a private `REGION_ENTRANCE` for each entity already
//!    present, one event per occupant.
//! 3. `E` is registered.
//! 4. If `E` is a player, any pending idle eviction is cancelled.
//!
//! Broadcasts are synchronous fan-out; there is no queue.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use wayfarer_procedural::Terrain;

use crate::address::RegionAddress;
use crate::archetypes::EntityFactory;
use crate::config::WorldConfig;
use crate::entity::{Entity, EntityId};
use crate::error::{WorldError, WorldResult};
use crate::events::Event;
use crate::population;
use crate::scheduler::{RegionTasks, TickStats};
use crate::snapshot::RegionSnapshot;

/// A live region.
pub struct Region {
    address: RegionAddress,
    id: String,
    terrain: Terrain,
    entities: HashMap<EntityId, Box<dyn Entity>>,
    factory: Arc<dyn EntityFactory>,
    tasks: RegionTasks,
    tick_stats: TickStats,
}

impl Region {
    /// Generates and populates a region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidAddress`] when the address fails the
    /// nesting grammar.
    pub fn new(
        address: RegionAddress,
        config: &WorldConfig,
        factory: Arc<dyn EntityFactory>,
    ) -> WorldResult<Self> {
        if !address.is_valid() {
            return Err(WorldError::InvalidAddress(address.to_string()));
        }
        Ok(Self::generate(address, config, factory))
    }

    /// Generates and populates a region whose address was already
    /// validated.
    pub(crate) fn generate(
        address: RegionAddress,
        config: &WorldConfig,
        factory: Arc<dyn EntityFactory>,
    ) -> Self {
        let terrain = Terrain::generate(&address.terrain_request(config.noise_seed()));
        let mut region = Self {
            id: address.to_string(),
            address,
            terrain,
            entities: HashMap::new(),
            factory,
            tasks: RegionTasks::default(),
            tick_stats: TickStats::default(),
        };
        population::populate(&mut region, config);
        region
    }

    /// Serialized address; the cache key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Structured address.
    #[must_use]
    pub const fn address(&self) -> &RegionAddress {
        &self.address
    }

    /// Generated terrain.
    #[must_use]
    pub const fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Mutable terrain, for placement bookkeeping.
    pub fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.terrain
    }

    /// Creates an entity through the factory and brings it in at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownArchetype`] if the factory cannot build
    /// the archetype.
    pub fn spawn(&mut self, archetype: &str, x: f64, y: f64) -> WorldResult<EntityId> {
        let mut entity = self.factory.create(archetype)?;
        entity.set_position(x, y);
        Ok(self.add_entity(entity))
    }

    /// Builds an entity without adding it, so placement can read its
    /// footprint first.
    pub(crate) fn build_entity(&self, archetype: &str) -> WorldResult<Box<dyn Entity>> {
        self.factory.create(archetype)
    }

    /// Runs the entry procedure for `entity` and returns its id.
    ///
    /// A resident with the same id leaves first, with its exit broadcast.
    pub fn add_entity(&mut self, mut entity: Box<dyn Entity>) -> EntityId {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            tracing::warn!(region = %self.id, entity = %id, "id already resident, replacing");
            self.remove_entity(id);
        }

        let arrival = Event::entrance(&entity.descriptor(), entity.position(), Some(id));
        self.broadcast(&arrival);

        for existing in self.entities.values() {
            entity.on_event(&Event::entrance(&existing.descriptor(), existing.position(), None));
        }

        if entity.is_player() && self.tasks.cancel_eviction() {
            tracing::debug!(region = %self.id, player = %id, "player arrived, eviction cancelled");
        }

        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity and tells everyone else it left.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        let entity = self.entities.remove(&id)?;
        self.broadcast(&Event::exit(id));
        Some(entity)
    }

    /// Looks up a resident.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.get(&id).map(|entity| &**entity)
    }

    /// Mutable lookup.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut (dyn Entity + 'static)> {
        self.entities.get_mut(&id).map(|entity| &mut **entity)
    }

    /// Iterates residents in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> {
        self.entities.values().map(|entity| &**entity)
    }

    /// Number of residents.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of resident players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.entities.values().filter(|entity| entity.is_player()).count()
    }

    /// Residents per archetype.
    #[must_use]
    pub fn archetype_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entity in self.entities.values() {
            *counts.entry(entity.archetype().to_owned()).or_insert(0) += 1;
        }
        counts
    }

    /// Delivers `event` to every resident except its origin.
    pub fn broadcast(&mut self, event: &Event) {
        for entity in self.entities.values_mut() {
            if Some(entity.id()) == event.origin {
                continue;
            }
            entity.on_event(event);
        }
    }

    /// Advances every resident. Returns whether a player is present.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let mut has_players = false;
        for entity in self.entities.values_mut() {
            has_players |= entity.is_player();
            entity.tick(dt);
        }
        has_players
    }

    pub(crate) fn record_tick(&mut self, elapsed: Duration, budget: Duration) {
        self.tick_stats.record(elapsed, budget);
    }

    /// Tick timing so far.
    #[must_use]
    pub const fn tick_stats(&self) -> &TickStats {
        &self.tick_stats
    }

    /// Scheduled-task handles.
    #[must_use]
    pub const fn tasks(&self) -> &RegionTasks {
        &self.tasks
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut RegionTasks {
        &mut self.tasks
    }

    /// Whether an idle eviction is armed.
    #[must_use]
    pub fn has_pending_eviction(&self) -> bool {
        self.tasks.eviction_token().is_some()
    }

    /// Render/network snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnsupportedTileset`] for roots without a
    /// tileset.
    pub fn snapshot(&self) -> WorldResult<RegionSnapshot> {
        RegionSnapshot::capture(&self.address, &self.terrain)
    }

    /// Snapshot as JSON.
    ///
    /// # Errors
    ///
    /// As [`Region::snapshot`].
    pub fn to_json(&self) -> WorldResult<String> {
        self.snapshot()?.to_json()
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("id", &self.id)
            .field("entities", &self.entities.len())
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}
