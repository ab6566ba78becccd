//! # Region Cache
//!
//! The one process-wide table of live regions, keyed by serialized address.
//!
//! ## Get-or-Create
//!
//! Each address maps to a slot (`Arc<OnceLock<..>>`). A miss inserts an
//! empty slot under the table lock, releases the lock, then initializes the
//! slot. Concurrent lookups for the same address all wait on the same
//! `OnceLock`, so at most one region is ever built per address, while
//! lookups for other addresses proceed in parallel.
//!
//! ## Lock Order
//!
//! Cache table, then region. Lookups that hit and evictions both take the
//! table lock first, so a lookup never hands out a region that an eviction
//! is half-way through removing.
//!
//! ## Lifecycle
//!
//! ```text
//! lookup miss ─► build ─► publish ─► ticker running
//!                                      │ no players on a tick
//!                                      ▼
//!                           eviction pending (grace period)
//!                        player enters / lookup hit │  │ grace elapsed,
//!                             ◄── cancelled ────────┘  │ still no players
//!                                                      ▼
//!                                               removed from cache
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use wayfarer_procedural::RegionType;

use crate::address::{AddressParent, RegionAddress};
use crate::archetypes::{ArchetypeRegistry, EntityFactory};
use crate::config::WorldConfig;
use crate::error::{WorldError, WorldResult};
use crate::region::Region;
use crate::scheduler;

/// A published region.
pub type SharedRegion = Arc<Mutex<Region>>;

type Slot = Arc<OnceLock<SharedRegion>>;

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Regions currently cached.
    pub cached: usize,
    /// Regions built since start.
    pub created: u64,
    /// Regions evicted since start.
    pub evicted: u64,
    /// Lookups refused for invalid addresses.
    pub invalid: u64,
}

pub(crate) struct CacheInner {
    config: WorldConfig,
    factory: Arc<dyn EntityFactory>,
    runtime: Handle,
    slots: Mutex<HashMap<String, Slot>>,
    next_token: AtomicU64,
    created: AtomicU64,
    evicted: AtomicU64,
    invalid: AtomicU64,
}

impl CacheInner {
    pub(crate) const fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub(crate) const fn runtime(&self) -> &Handle {
        &self.runtime
    }

    pub(crate) fn next_eviction_token(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::Relaxed)
    }

    /// Removes `region` if its eviction `token` is still current and it has
    /// no players. Returns whether it was removed.
    pub(crate) fn evict_if_idle(&self, id: &str, region: &SharedRegion, token: u64) -> bool {
        let mut slots = self.slots.lock();
        let mut guard = region.lock();

        if guard.tasks().eviction_token() != Some(token) {
            return false;
        }
        guard.tasks_mut().clear_eviction();
        if guard.player_count() > 0 {
            return false;
        }

        let current = slots
            .get(id)
            .and_then(|slot| slot.get())
            .is_some_and(|cached| Arc::ptr_eq(cached, region));
        if !current {
            return false;
        }

        slots.remove(id);
        guard.tasks_mut().stop();
        self.evicted.fetch_add(1, Ordering::Relaxed);
        tracing::info!(region = %id, "region evicted");
        true
    }
}

/// Process-wide get-or-create service for regions.
///
/// Cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct RegionCache {
    inner: Arc<CacheInner>,
}

impl RegionCache {
    /// Creates a cache whose tasks run on `runtime`, with the standard
    /// archetypes.
    #[must_use]
    pub fn new(config: WorldConfig, runtime: Handle) -> Self {
        Self::with_factory(config, runtime, Arc::new(ArchetypeRegistry::standard()))
    }

    /// Creates a cache with a custom entity factory.
    #[must_use]
    pub fn with_factory(config: WorldConfig, runtime: Handle, factory: Arc<dyn EntityFactory>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                config,
                factory,
                runtime,
                slots: Mutex::new(HashMap::new()),
                next_token: AtomicU64::new(1),
                created: AtomicU64::new(0),
                evicted: AtomicU64::new(0),
                invalid: AtomicU64::new(0),
            }),
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.inner.config
    }

    /// Looks up or builds the region `(parent, kind, x, y)`.
    ///
    /// Returns `None`, and logs, when the address fails the nesting grammar.
    pub fn get_region(&self, parent: &AddressParent, kind: RegionType, x: i32, y: i32) -> Option<SharedRegion> {
        self.get(&RegionAddress::new(parent.clone(), kind, x, y))
    }

    /// Looks up or builds a region by serialized address.
    ///
    /// Returns `None`, and logs, for malformed or invalid addresses.
    pub fn get_region_by_id(&self, id: &str) -> Option<SharedRegion> {
        match RegionAddress::parse(id) {
            Ok(address) => self.get(&address),
            Err(err) => {
                self.inner.invalid.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(region = id, error = %err, "region lookup refused");
                None
            }
        }
    }

    /// Looks up or builds a region, logging and returning `None` when the
    /// address is invalid.
    pub fn get(&self, address: &RegionAddress) -> Option<SharedRegion> {
        match self.try_get(address) {
            Ok(region) => Some(region),
            Err(err) => {
                tracing::warn!(region = %address, error = %err, "region lookup refused");
                None
            }
        }
    }

    /// Looks up or builds a region.
    ///
    /// A hit cancels any pending idle eviction.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidAddress`] when the address fails the
    /// nesting grammar.
    pub fn try_get(&self, address: &RegionAddress) -> WorldResult<SharedRegion> {
        if !address.is_valid() {
            self.inner.invalid.fetch_add(1, Ordering::Relaxed);
            return Err(WorldError::InvalidAddress(address.to_string()));
        }

        let id = address.to_string();
        let slot = {
            let mut slots = self.inner.slots.lock();
            let slot = slots.entry(id.clone()).or_default();
            if let Some(region) = slot.get() {
                if region.lock().tasks_mut().cancel_eviction() {
                    tracing::debug!(region = %id, "lookup hit, eviction cancelled");
                }
                return Ok(Arc::clone(region));
            }
            Arc::clone(slot)
        };

        let mut built = false;
        let region = slot.get_or_init(|| {
            built = true;
            let region = Region::generate(address.clone(), &self.inner.config, Arc::clone(&self.inner.factory));
            Arc::new(Mutex::new(region))
        });

        if built {
            scheduler::start_ticker(&self.inner, region);
            self.inner.created.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                region = %id,
                entities = region.lock().entity_count(),
                "region created"
            );
        }

        Ok(Arc::clone(region))
    }

    /// Whether a region is cached, without touching its eviction state.
    #[must_use]
    pub fn is_cached(&self, address: &RegionAddress) -> bool {
        self.is_cached_id(&address.to_string())
    }

    /// As [`RegionCache::is_cached`], by serialized address.
    #[must_use]
    pub fn is_cached_id(&self, id: &str) -> bool {
        self.inner
            .slots
            .lock()
            .get(id)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of published regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .slots
            .lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Whether no region is published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached: self.len(),
            created: self.inner.created.load(Ordering::Relaxed),
            evicted: self.inner.evicted.load(Ordering::Relaxed),
            invalid: self.inner.invalid.load(Ordering::Relaxed),
        }
    }

    /// Removes a region immediately, players or not. Returns whether it was
    /// cached.
    pub fn evict_now(&self, address: &RegionAddress) -> bool {
        let id = address.to_string();
        let mut slots = self.inner.slots.lock();
        let Some(region) = slots.get(&id).and_then(|slot| slot.get()).map(Arc::clone) else {
            return false;
        };
        slots.remove(&id);
        region.lock().tasks_mut().stop();
        self.inner.evicted.fetch_add(1, Ordering::Relaxed);
        tracing::info!(region = %id, "region evicted on request");
        true
    }

    /// Stops every region's tasks and empties the table.
    pub fn shutdown(&self) {
        let drained: Vec<Slot> = self.inner.slots.lock().drain().map(|(_, slot)| slot).collect();
        let mut stopped = 0;
        for slot in drained {
            if let Some(region) = slot.get() {
                region.lock().tasks_mut().stop();
                stopped += 1;
            }
        }
        tracing::info!(regions = stopped, "region cache shut down");
    }
}

impl std::fmt::Debug for RegionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionCache").field("stats", &self.stats()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_procedural::WorldRoot;

    fn field(x: i32, y: i32) -> RegionAddress {
        RegionAddress::root_child(WorldRoot::Overworld, RegionType::Field, x, y)
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_returns_same_instance() {
        let cache = RegionCache::new(WorldConfig::default(), Handle::current());
        let a = cache.get(&field(2, 2)).unwrap();
        let b = cache.get(&field(2, 2)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats().created, 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_lookup_is_refused() {
        let cache = RegionCache::new(WorldConfig::default(), Handle::current());
        let root = AddressParent::Root(WorldRoot::Overworld);
        assert!(cache.get_region(&root, RegionType::House, 0, 0).is_none());
        assert!(cache.get_region_by_id("overworld,field:0:0,field:1:1").is_none());
        assert!(cache.get_region_by_id("not an address").is_none());
        assert_eq!(cache.stats().invalid, 3);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_by_id_matches_structured_lookup() {
        let cache = RegionCache::new(WorldConfig::default(), Handle::current());
        let by_id = cache.get_region_by_id("overworld,field:0:0,shop:0:0").unwrap();
        let shop = field(0, 0).child(RegionType::Shop, 0, 0);
        let structured = cache.get(&shop).unwrap();
        assert!(Arc::ptr_eq(&by_id, &structured));
        assert!(!cache.is_cached(&field(0, 0)), "children do not build parents");
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_now_and_shutdown() {
        let cache = RegionCache::new(WorldConfig::default(), Handle::current());
        assert!(cache.get(&field(4, 4)).is_some());
        assert!(cache.get(&field(5, 4)).is_some());
        assert!(cache.evict_now(&field(4, 4)));
        assert!(!cache.evict_now(&field(4, 4)));
        assert!(!cache.is_cached(&field(4, 4)));

        cache.shutdown();
        assert!(cache.is_empty());
    }
}
