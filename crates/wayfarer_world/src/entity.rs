//! # Entity Boundary
//!
//! The engine never looks inside an entity. It needs an id, a position, a
//! footprint for placement, and the ability to tick it and hand it events.
//! [`Entity::is_player`] is the one privileged distinction: only players
//! keep a region alive.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::events::Event;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique entity identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Anything that can live in a region.
pub trait Entity: Send {
    /// Stable id.
    fn id(&self) -> EntityId;

    /// Archetype name (`"sheep"`, `"player"`, `"chest"`, ...).
    fn archetype(&self) -> &str;

    /// Position in region tiles.
    fn position(&self) -> (f64, f64);

    /// Moves the entity within its region.
    fn set_position(&mut self, x: f64, y: f64);

    /// Placement footprint in tiles.
    fn footprint(&self) -> (f64, f64) {
        (1.0, 1.0)
    }

    /// Whether this entity keeps its region alive.
    fn is_player(&self) -> bool {
        false
    }

    /// Advances the entity by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Receives an event.
    fn on_event(&mut self, event: &Event);

    /// Stores an item code. Only containers hold items.
    fn add_item(&mut self, _code: &str) {}

    /// Hides an entity archetype inside. Only containers do this.
    fn add_entity(&mut self, _archetype: &str) {}

    /// Identity string carried in presence payloads.
    fn descriptor(&self) -> String {
        format!("{}:{}", self.archetype(), self.id())
    }
}

/// Registry-built non-player entity.
#[derive(Clone, Debug)]
pub struct VirtualEntity {
    id: EntityId,
    archetype: String,
    hostile: bool,
    footprint: (f64, f64),
    position: (f64, f64),
    age: Duration,
    events_seen: u64,
}

impl VirtualEntity {
    /// Creates an entity at the origin.
    #[must_use]
    pub fn new(archetype: impl Into<String>, footprint: (f64, f64), hostile: bool) -> Self {
        Self {
            id: EntityId::next(),
            archetype: archetype.into(),
            hostile,
            footprint,
            position: (0.0, 0.0),
            age: Duration::ZERO,
            events_seen: 0,
        }
    }

    /// Whether the archetype attacks players.
    #[must_use]
    pub const fn is_hostile(&self) -> bool {
        self.hostile
    }

    /// Total simulated lifetime.
    #[must_use]
    pub const fn age(&self) -> Duration {
        self.age
    }

    /// Events received so far.
    #[must_use]
    pub const fn events_seen(&self) -> u64 {
        self.events_seen
    }
}

impl Entity for VirtualEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn archetype(&self) -> &str {
        &self.archetype
    }

    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    fn footprint(&self) -> (f64, f64) {
        self.footprint
    }

    fn tick(&mut self, dt: Duration) {
        self.age += dt;
    }

    fn on_event(&mut self, _event: &Event) {
        self.events_seen += 1;
    }
}

/// A connected player. Events are forwarded to the session's receiver.
#[derive(Debug)]
pub struct Player {
    id: EntityId,
    name: String,
    position: (f64, f64),
    outbox: mpsc::UnboundedSender<Event>,
}

impl Player {
    /// Creates a player and the receiver its session drains.
    #[must_use]
    pub fn new(name: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let player = Self {
            id: EntityId::next(),
            name: name.into(),
            position: (0.0, 0.0),
            outbox,
        };
        (player, inbox)
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn archetype(&self) -> &str {
        "player"
    }

    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    fn is_player(&self) -> bool {
        true
    }

    fn tick(&mut self, _dt: Duration) {}

    fn on_event(&mut self, event: &Event) {
        if self.outbox.send(event.clone()).is_err() {
            tracing::trace!(player = %self.id, "session gone, dropping event");
        }
    }

    fn descriptor(&self) -> String {
        format!("player:{}:{}", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_ids_are_unique() {
        let a = EntityId::next();
        let b = EntityId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_player_forwards_events() {
        let (mut player, mut inbox) = Player::new("ada");
        assert!(player.is_player());
        player.on_event(&Event::new(EventKind::RegionEntrance, "x", None));
        let received = inbox.try_recv().unwrap();
        assert_eq!(received.kind, EventKind::RegionEntrance);
    }

    #[test]
    fn test_player_survives_closed_session() {
        let (mut player, inbox) = Player::new("ada");
        drop(inbox);
        player.on_event(&Event::new(EventKind::RegionExit, "x", None));
    }

    #[test]
    fn test_virtual_entity_ages() {
        let mut sheep = VirtualEntity::new("sheep", (1.0, 1.0), false);
        sheep.tick(Duration::from_millis(100));
        sheep.tick(Duration::from_millis(100));
        assert_eq!(sheep.age(), Duration::from_millis(200));
        assert!(!sheep.is_player());
        assert!(sheep.descriptor().starts_with("sheep:e"));
    }
}
