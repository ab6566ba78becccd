//! # Region Events
//!
//! Presence events fanned out synchronously to the entities of a region.
//! Only the kind and the origin matter to the engine; the payload is an
//! opaque string for the entity layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Event type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// An entity arrived. Payload: `"<descriptor>\n<x> <y>"`.
    RegionEntrance,
    /// An entity left. Payload: the entity id.
    RegionExit,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RegionEntrance => "REGION_ENTRANCE",
            Self::RegionExit => "REGION_EXIT",
        })
    }
}

/// A region event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Type tag.
    pub kind: EventKind,
    /// Opaque payload.
    pub payload: String,
    /// Entity that caused the event; never receives its own broadcast.
    pub origin: Option<EntityId>,
}

impl Event {
    /// Creates an event.
    #[must_use]
    pub fn new(kind: EventKind, payload: impl Into<String>, origin: Option<EntityId>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            origin,
        }
    }

    /// Entrance event describing an entity at a position.
    #[must_use]
    pub fn entrance(descriptor: &str, (x, y): (f64, f64), origin: Option<EntityId>) -> Self {
        Self::new(EventKind::RegionEntrance, format!("{descriptor}\n{x} {y}"), origin)
    }

    /// Exit event for an entity.
    #[must_use]
    pub fn exit(id: EntityId) -> Self {
        Self::new(EventKind::RegionExit, id.to_string(), Some(id))
    }
}
