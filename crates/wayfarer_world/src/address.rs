//! # Region Addresses
//!
//! A region is named by its parent chain plus its own type and coordinate.
//! The serialized form is
//!
//! ```text
//! overworld,field:0:0,house:3:0
//! ^root     ^link      ^link
//! ```
//!
//! ## Validity Grammar
//!
//! - Directly under a world root only `field` is legal.
//! - `dungeon` is legal under another `dungeon` (any depth) or under a
//!   `field` sitting at a dungeon-entrance position.
//! - `field` is never legal below a non-root parent.
//! - Any other type is legal once its parent validates.
//!
//! Town and dungeon-entrance positions are pure functions of the coordinate
//! and never change.

use std::fmt;
use std::str::FromStr;

use wayfarer_procedural::{coord_option, NoiseSeed, RegionType, TerrainRequest, WorldRoot};

use crate::error::{WorldError, WorldResult};

/// One-in-N odds that a coordinate hosts a dungeon entrance.
pub const ODDS_DUNGEON: u64 = 14;
/// One-in-N odds that a coordinate hosts a town.
pub const ODDS_TOWN: u64 = 9;

/// Dungeon entrances always exist at `(1, 0)`, plus hashed positions.
#[must_use]
pub const fn is_dungeon_pos(x: i32, y: i32) -> bool {
    (x == 1 && y == 0) || coord_option(x, y, ODDS_DUNGEON)
}

/// Towns always exist at `(0, 0)`, plus hashed positions.
#[must_use]
pub const fn is_town_pos(x: i32, y: i32) -> bool {
    (x == 0 && y == 0) || coord_option(x, y, ODDS_TOWN)
}

/// What a region hangs off.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressParent {
    /// A world sentinel.
    Root(WorldRoot),
    /// Another region.
    Region(Box<RegionAddress>),
}

impl fmt::Display for AddressParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root(root) => write!(f, "{root}"),
            Self::Region(address) => write!(f, "{address}"),
        }
    }
}

/// Hierarchical, immutable region identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionAddress {
    parent: AddressParent,
    kind: RegionType,
    x: i32,
    y: i32,
}

impl RegionAddress {
    /// Address of a region directly under a world root.
    #[must_use]
    pub const fn root_child(root: WorldRoot, kind: RegionType, x: i32, y: i32) -> Self {
        Self {
            parent: AddressParent::Root(root),
            kind,
            x,
            y,
        }
    }

    /// Address with an explicit parent.
    #[must_use]
    pub const fn new(parent: AddressParent, kind: RegionType, x: i32, y: i32) -> Self {
        Self { parent, kind, x, y }
    }

    /// Builds the address of a child region nested under this one.
    #[must_use]
    pub fn child(&self, kind: RegionType, x: i32, y: i32) -> Self {
        Self::new(AddressParent::Region(Box::new(self.clone())), kind, x, y)
    }

    /// Parses a serialized address.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AddressParse`] for an unknown root, a missing
    /// link, an unknown type token or a non-integer coordinate.
    pub fn parse(input: &str) -> WorldResult<Self> {
        let mut parts = input.split(',');
        let root_token = parts.next().unwrap_or_default();
        let root = WorldRoot::from_token(root_token)
            .ok_or_else(|| WorldError::AddressParse(format!("unknown world root in {input:?}")))?;

        let mut parent = AddressParent::Root(root);
        let mut last = None;
        for link in parts {
            if let Some(address) = last.take() {
                parent = AddressParent::Region(Box::new(address));
            }
            let (kind, x, y) = parse_link(link)
                .ok_or_else(|| WorldError::AddressParse(format!("bad link {link:?} in {input:?}")))?;
            last = Some(Self::new(parent.clone(), kind, x, y));
        }

        last.ok_or_else(|| WorldError::AddressParse(format!("{input:?} names no region")))
    }

    /// The parent link.
    #[must_use]
    pub const fn parent(&self) -> &AddressParent {
        &self.parent
    }

    /// The parent region, or `None` when the parent is a world root.
    #[must_use]
    pub fn parent_region(&self) -> Option<&RegionAddress> {
        match &self.parent {
            AddressParent::Root(_) => None,
            AddressParent::Region(address) => Some(&**address),
        }
    }

    /// Region type.
    #[must_use]
    pub const fn kind(&self) -> RegionType {
        self.kind
    }

    /// Region x coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Region y coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// The world sentinel at the top of the parent chain.
    #[must_use]
    pub fn root(&self) -> WorldRoot {
        let mut current = self;
        loop {
            match &current.parent {
                AddressParent::Root(root) => return *root,
                AddressParent::Region(parent) => current = &**parent,
            }
        }
    }

    /// Number of links in the chain; 1 for a root-parented region.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.parent_region().map_or(1, |parent| parent.depth() + 1)
    }

    fn is_root_parented(&self) -> bool {
        matches!(self.parent, AddressParent::Root(_))
    }

    /// Root-parented field at a town position.
    #[must_use]
    pub fn is_town(&self) -> bool {
        self.is_root_parented() && self.kind == RegionType::Field && is_town_pos(self.x, self.y)
    }

    /// Root-parented region at a dungeon-entrance position.
    #[must_use]
    pub fn is_dungeon_entrance(&self) -> bool {
        self.is_root_parented() && is_dungeon_pos(self.x, self.y)
    }

    /// Whether the nesting grammar allows this address to be instantiated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let parent = match &self.parent {
            AddressParent::Root(_) => return self.kind == RegionType::Field,
            AddressParent::Region(parent) => parent,
        };

        if !parent.is_valid() {
            return false;
        }

        match self.kind {
            RegionType::Dungeon => {
                parent.kind == RegionType::Dungeon
                    || (parent.kind == RegionType::Field && is_dungeon_pos(parent.x, parent.y))
            }
            RegionType::Field => false,
            RegionType::House | RegionType::Shop => true,
        }
    }

    /// Everything terrain generation needs to know about this region.
    #[must_use]
    pub fn terrain_request(&self, noise_seed: NoiseSeed) -> TerrainRequest {
        TerrainRequest {
            root: self.root(),
            kind: self.kind,
            x: self.x,
            y: self.y,
            is_town: self.is_town(),
            is_dungeon_entrance: self.is_dungeon_entrance(),
            noise_seed,
        }
    }
}

fn parse_link(link: &str) -> Option<(RegionType, i32, i32)> {
    let mut fields = link.split(':');
    let kind = RegionType::from_token(fields.next()?)?;
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((kind, x, y))
}

impl fmt::Display for RegionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}:{}:{}", self.parent, self.kind, self.x, self.y)
    }
}

impl FromStr for RegionAddress {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
