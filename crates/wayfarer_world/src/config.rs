//! # World Configuration
//!
//! Every tunable of the region engine, loadable from TOML. Missing keys fall
//! back to the defaults below, so an empty file is a valid configuration.
//!
//! ```toml
//! tick_interval_ms = 100
//! idle_grace_secs = 60
//!
//! [population]
//! max_field_creatures = 5
//!
//! [shops]
//! max_chest_items = 10
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wayfarer_procedural::NoiseSeed;

use crate::error::{WorldError, WorldResult};

/// Creature and NPC counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Upper bound on wildlife per field.
    pub max_field_creatures: u32,
    /// Upper bound on hostiles per dungeon level.
    pub max_dungeon_creatures: u32,
    /// Fewest guards a town gets.
    pub min_town_guards: u32,
    /// Most guards a town gets.
    pub max_town_guards: u32,
    /// A house gets a guard when `range(0, odds)` draws zero.
    pub guard_in_house_odds: u32,
    /// A house gets a trader when `range(0, odds)` draws zero.
    pub trader_in_house_odds: u32,
    /// Every Nth field creature is a wolf instead of a sheep.
    pub field_rare_cadence: u32,
    /// Every Nth dungeon creature is a death waker instead of a zombie.
    pub dungeon_rare_cadence: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_field_creatures: 5,
            max_dungeon_creatures: 4,
            min_town_guards: 1,
            max_town_guards: 3,
            guard_in_house_odds: 2,
            trader_in_house_odds: 4,
            field_rare_cadence: 4,
            dungeon_rare_cadence: 4,
        }
    }
}

/// Shop container contents. All odds are out of 10.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Fewest items in a shop chest.
    pub min_chest_items: u32,
    /// Most items in a shop chest.
    pub max_chest_items: u32,
    /// Odds a pot is empty.
    pub empty_odds: u32,
    /// Odds a non-weapon item is a potion.
    pub potion_odds: u32,
    /// Odds an item is a weapon.
    pub weapon_odds: u32,
    /// Odds a pot hides a guard.
    pub guard_odds: u32,
    /// Highest weapon level a shop stocks.
    pub max_weapon_level: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            min_chest_items: 1,
            max_chest_items: 10,
            empty_odds: 2,
            potion_odds: 2,
            weapon_odds: 2,
            guard_odds: 1,
            max_weapon_level: 10,
        }
    }
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Region tick period.
    pub tick_interval_ms: u64,
    /// How long a region with no players survives.
    pub idle_grace_secs: u64,
    /// World-wide field noise seed.
    pub noise_seed: u64,
    /// Rejection-sampling budget per placed entity.
    pub placement_attempts: u32,
    /// Population tuning.
    pub population: PopulationConfig,
    /// Shop tuning.
    pub shops: ShopConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            idle_grace_secs: 60,
            noise_seed: NoiseSeed::default().value(),
            placement_attempts: 512,
            population: PopulationConfig::default(),
            shops: ShopConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] for malformed TOML or values that fail
    /// [`WorldConfig::validate`].
    pub fn from_toml_str(input: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] when the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> WorldResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Rejects configurations the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] naming the first offending key.
    pub fn validate(&self) -> WorldResult<()> {
        let fail = |msg: &str| Err(WorldError::Config(msg.to_owned()));

        if self.tick_interval_ms == 0 {
            return fail("tick_interval_ms must be positive");
        }
        if self.placement_attempts == 0 {
            return fail("placement_attempts must be positive");
        }

        let population = &self.population;
        if population.min_town_guards > population.max_town_guards {
            return fail("population.min_town_guards exceeds max_town_guards");
        }
        if population.field_rare_cadence == 0 || population.dungeon_rare_cadence == 0 {
            return fail("population rare cadences must be positive");
        }

        let shops = &self.shops;
        if shops.min_chest_items > shops.max_chest_items {
            return fail("shops.min_chest_items exceeds max_chest_items");
        }
        if shops.max_weapon_level == 0 {
            return fail("shops.max_weapon_level must be positive");
        }

        Ok(())
    }

    /// Region tick period.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Idle grace period before eviction.
    #[must_use]
    pub const fn idle_grace(&self) -> Duration {
        Duration::from_secs(self.idle_grace_secs)
    }

    /// Field noise seed.
    #[must_use]
    pub const fn noise_seed(&self) -> NoiseSeed {
        NoiseSeed::new(self.noise_seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.idle_grace(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_override() {
        let config = WorldConfig::from_toml_str(
            "idle_grace_secs = 5\n[population]\nmax_field_creatures = 0\n",
        )
        .unwrap();
        assert_eq!(config.idle_grace_secs, 5);
        assert_eq!(config.population.max_field_creatures, 0);
        assert_eq!(config.population.max_town_guards, 3);
        assert_eq!(config.shops, ShopConfig::default());
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            WorldConfig::from_toml_str("tick_interval_ms = 0"),
            Err(WorldError::Config(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("[shops]\nmin_chest_items = 11"),
            Err(WorldError::Config(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("tick_interval_ms = \"fast\""),
            Err(WorldError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            WorldConfig::load("/nonexistent/wayfarer.toml"),
            Err(WorldError::Io(_))
        ));
    }
}
