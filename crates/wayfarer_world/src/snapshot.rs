//! # Region Snapshot
//!
//! The view of a region shipped to renderers and clients: tile rows, the
//! 0/1 occupancy rows, rounding metadata, the resolved tileset and the
//! region's geometry.

use serde::{Deserialize, Serialize};
use wayfarer_procedural::{tileset_name, RegionType, Terrain, Tile};

use crate::address::RegionAddress;
use crate::error::{WorldError, WorldResult};

/// Serializable region view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    /// Row-major tile rows.
    pub level: Vec<Vec<Tile>>,
    /// Row-major occupancy rows, 1 = occupied.
    pub hitmap: Vec<Vec<u8>>,
    /// Tile indices rewritten by rounding (fields only).
    pub rd: Option<Vec<usize>>,
    /// Tileset the client renders with.
    pub tileset: String,
    /// Entities may slide along walls.
    pub can_slide: bool,
    /// Walking off an edge leads into the neighbouring region.
    pub navigable: bool,
    /// Width in tiles.
    pub w: usize,
    /// Height in tiles.
    pub h: usize,
    /// Region x coordinate.
    pub x: i32,
    /// Region y coordinate.
    pub y: i32,
}

impl RegionSnapshot {
    /// Captures a region's terrain.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnsupportedTileset`] when the region's root has
    /// no tileset for its type.
    pub fn capture(address: &RegionAddress, terrain: &Terrain) -> WorldResult<Self> {
        let root = address.root();
        let tileset = tileset_name(root, address.kind()).ok_or(WorldError::UnsupportedTileset {
            root,
            region_type: address.kind(),
        })?;

        Ok(Self {
            level: terrain.rows(),
            hitmap: terrain.hitmap().to_rows(),
            rd: terrain.rounding().map(|set| set.iter().copied().collect()),
            tileset: tileset.to_owned(),
            can_slide: true,
            navigable: address.kind() == RegionType::Field,
            w: terrain.width(),
            h: terrain.height(),
            x: terrain.x(),
            y: terrain.y(),
        })
    }

    /// Encodes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> WorldResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_procedural::{NoiseSeed, WorldRoot};

    fn capture(address: &RegionAddress) -> WorldResult<RegionSnapshot> {
        let terrain = Terrain::generate(&address.terrain_request(NoiseSeed::default()));
        RegionSnapshot::capture(address, &terrain)
    }

    #[test]
    fn test_field_snapshot() {
        let address = RegionAddress::root_child(WorldRoot::Overworld, RegionType::Field, 3, 3);
        let snapshot = capture(&address).unwrap();
        assert_eq!((snapshot.w, snapshot.h), (100, 100));
        assert_eq!(snapshot.level.len(), 100);
        assert_eq!(snapshot.hitmap[0].len(), 100);
        assert_eq!(snapshot.tileset, "tileset_default");
        assert!(snapshot.rd.is_some());
        assert!(snapshot.navigable);
    }

    #[test]
    fn test_interior_tileset() {
        let shop = RegionAddress::root_child(WorldRoot::Overworld, RegionType::Field, 0, 0)
            .child(RegionType::Shop, 0, 0);
        let snapshot = capture(&shop).unwrap();
        assert_eq!(snapshot.tileset, "tileset_interiors");
        assert!(snapshot.rd.is_none());
        assert!(!snapshot.navigable);
    }

    #[test]
    fn test_ether_has_no_tileset() {
        let address = RegionAddress::root_child(WorldRoot::Ether, RegionType::Field, 0, 0);
        assert_eq!(
            capture(&address),
            Err(WorldError::UnsupportedTileset {
                root: WorldRoot::Ether,
                region_type: RegionType::Field,
            })
        );
    }

    #[test]
    fn test_json_field_names() {
        let address = RegionAddress::root_child(WorldRoot::Overworld, RegionType::Field, 1, 1);
        let json = capture(&address).unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in ["level", "hitmap", "rd", "tileset", "can_slide", "navigable", "w", "h", "x", "y"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
