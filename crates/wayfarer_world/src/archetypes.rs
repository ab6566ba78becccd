//! # Archetype Registry
//!
//! Maps archetype names to entity constructors. Population and runtime
//! spawns only ever go through [`EntityFactory::create`], so swapping in a
//! different entity layer means providing a different factory.

use std::collections::HashMap;

use crate::entity::{Entity, VirtualEntity};
use crate::error::{WorldError, WorldResult};

/// Builds entities by archetype name.
pub trait EntityFactory: Send + Sync {
    /// Creates a fresh entity at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownArchetype`] for names it cannot build.
    fn create(&self, archetype: &str) -> WorldResult<Box<dyn Entity>>;
}

/// Static description of an archetype.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchetypeSpec {
    /// Archetype name.
    pub name: String,
    /// Placement footprint in tiles.
    pub footprint: (f64, f64),
    /// Attacks players.
    pub hostile: bool,
}

impl ArchetypeSpec {
    /// Creates a spec.
    #[must_use]
    pub fn new(name: impl Into<String>, footprint: (f64, f64), hostile: bool) -> Self {
        Self {
            name: name.into(),
            footprint,
            hostile,
        }
    }
}

/// Archetypes every world ships with: name, footprint, hostile.
const STANDARD: [(&str, (f64, f64), bool); 9] = [
    ("sheep", (1.0, 1.0), false),
    ("wolf", (1.0, 1.0), true),
    ("soldier", (1.0, 1.0), false),
    ("bully", (1.0, 1.0), false),
    ("child", (1.0, 1.0), false),
    ("trader", (1.0, 1.0), false),
    ("homely", (1.0, 1.0), false),
    ("zombie", (1.0, 1.0), true),
    ("death_waker", (2.0, 2.0), true),
];

/// Registry-driven [`EntityFactory`] producing [`VirtualEntity`] values.
#[derive(Clone, Debug, Default)]
pub struct ArchetypeRegistry {
    specs: HashMap<String, ArchetypeSpec>,
}

impl ArchetypeRegistry {
    /// Registry with no archetypes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the standard archetypes.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for (name, footprint, hostile) in STANDARD {
            registry.register(ArchetypeSpec::new(name, footprint, hostile));
        }
        registry
    }

    /// Adds or replaces an archetype.
    pub fn register(&mut self, spec: ArchetypeSpec) {
        self.specs.insert(spec.name.clone(), spec);
    }

    /// Looks up an archetype.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArchetypeSpec> {
        self.specs.get(name)
    }

    /// Number of registered archetypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl EntityFactory for ArchetypeRegistry {
    fn create(&self, archetype: &str) -> WorldResult<Box<dyn Entity>> {
        let spec = self
            .get(archetype)
            .ok_or_else(|| WorldError::UnknownArchetype(archetype.to_owned()))?;
        Ok(Box::new(VirtualEntity::new(
            spec.name.clone(),
            spec.footprint,
            spec.hostile,
        )))
    }
}
