//! # World Error Types
//!
//! All errors that can occur while addressing, building or serving regions.

use thiserror::Error;
use wayfarer_procedural::{RegionType, WorldRoot};

/// Errors that can occur in the world engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The address is well-formed but the nesting grammar forbids it.
    #[error("invalid region address: {0}")]
    InvalidAddress(String),

    /// The serialized address could not be parsed.
    #[error("malformed region address: {0}")]
    AddressParse(String),

    /// No tileset exists for this root/type combination.
    #[error("no tileset for {region_type} regions under {root}")]
    UnsupportedTileset {
        /// World root of the region chain.
        root: WorldRoot,
        /// Region type.
        region_type: RegionType,
    },

    /// Rejection sampling found no free spot for an entity.
    #[error("no room for {archetype} after {attempts} placement attempts")]
    PlacementExhausted {
        /// Archetype that could not be placed.
        archetype: String,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// The entity registry does not know this archetype.
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Encoding a snapshot failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for WorldError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for WorldError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for WorldError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
