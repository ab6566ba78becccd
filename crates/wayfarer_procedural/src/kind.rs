//! World roots and region types.
//!
//! Both serialize to short lowercase tokens that appear verbatim in
//! serialized region addresses.

use std::fmt;

/// The two world sentinels every region chain is rooted at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorldRoot {
    /// The standard overworld.
    Overworld,
    /// The ether plane.
    Ether,
}

impl WorldRoot {
    /// Every root, in token order.
    pub const ALL: [Self; 2] = [Self::Overworld, Self::Ether];

    /// Serialized token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Ether => "ether",
        }
    }

    /// Parses a serialized token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|root| root.token() == token)
    }
}

impl fmt::Display for WorldRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Region type. Decides dimensions, terrain generation and population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionType {
    /// Open overworld field (noise terrain, possibly a town).
    Field,
    /// Dungeon level; may nest arbitrarily deep.
    Dungeon,
    /// House interior.
    House,
    /// Shop interior.
    Shop,
}

impl RegionType {
    /// Every region type, in token order.
    pub const ALL: [Self; 4] = [Self::Field, Self::Dungeon, Self::House, Self::Shop];

    /// Serialized token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Dungeon => "dungeon",
            Self::House => "house",
            Self::Shop => "shop",
        }
    }

    /// Parses a serialized token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.token() == token)
    }

    /// Fixed `(width, height)` in tiles.
    #[must_use]
    pub const fn dimensions(self) -> (usize, usize) {
        match self {
            Self::Field => (100, 100),
            Self::Dungeon => (28, 28),
            Self::House | Self::Shop => (52, 52),
        }
    }

    /// Whether the region is a building interior.
    #[must_use]
    pub const fn is_interior(self) -> bool {
        matches!(self, Self::House | Self::Shop)
    }
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip() {
        for root in WorldRoot::ALL {
            assert_eq!(WorldRoot::from_token(root.token()), Some(root));
        }
        for kind in RegionType::ALL {
            assert_eq!(RegionType::from_token(kind.token()), Some(kind));
        }
        assert_eq!(RegionType::from_token("castle"), None);
        assert_eq!(WorldRoot::from_token("Overworld"), None);
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(RegionType::Field.dimensions(), (100, 100));
        assert_eq!(RegionType::Dungeon.dimensions(), (28, 28));
        assert_eq!(RegionType::House.dimensions(), (52, 52));
        assert_eq!(RegionType::Shop.dimensions(), (52, 52));
    }
}
