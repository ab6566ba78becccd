//! Shop containers: chests hold a list of items, pots hold at most one item
//! or a hidden guard.

use std::time::Duration;

use crate::entity::{Entity, EntityId};
use crate::events::Event;

/// A shop chest at a marker tile.
#[derive(Clone, Debug)]
pub struct ChestEntity {
    id: EntityId,
    position: (f64, f64),
    items: Vec<String>,
}

impl ChestEntity {
    /// Creates an empty chest.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            id: EntityId::next(),
            position: (x, y),
            items: Vec::new(),
        }
    }

    /// Item codes, in stocking order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Entity for ChestEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn archetype(&self) -> &str {
        "chest"
    }

    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    fn tick(&mut self, _dt: Duration) {}

    fn on_event(&mut self, _event: &Event) {}

    fn add_item(&mut self, code: &str) {
        self.items.push(code.to_owned());
    }
}

/// A breakable pot at a marker tile.
#[derive(Clone, Debug)]
pub struct PotEntity {
    id: EntityId,
    position: (f64, f64),
    variant: u8,
    item: Option<String>,
    guard: Option<String>,
}

impl PotEntity {
    /// Creates an empty pot of the given sprite variant.
    #[must_use]
    pub fn new(x: f64, y: f64, variant: u8) -> Self {
        Self {
            id: EntityId::next(),
            position: (x, y),
            variant,
            item: None,
            guard: None,
        }
    }

    /// Sprite variant.
    #[must_use]
    pub const fn variant(&self) -> u8 {
        self.variant
    }

    /// Item inside, if any.
    #[must_use]
    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    /// Archetype that jumps out when the pot breaks, if any.
    #[must_use]
    pub fn guard(&self) -> Option<&str> {
        self.guard.as_deref()
    }

    /// Whether the pot holds nothing at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item.is_none() && self.guard.is_none()
    }
}

impl Entity for PotEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn archetype(&self) -> &str {
        "pot"
    }

    fn position(&self) -> (f64, f64) {
        self.position
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    fn tick(&mut self, _dt: Duration) {}

    fn on_event(&mut self, _event: &Event) {}

    // A pot holds one thing; later writes replace earlier ones.
    fn add_item(&mut self, code: &str) {
        self.item = Some(code.to_owned());
    }

    fn add_entity(&mut self, archetype: &str) {
        self.guard = Some(archetype.to_owned());
    }

    fn descriptor(&self) -> String {
        format!("pot:{}:{}", self.id, self.variant)
    }
}
