//! # Region Population
//!
//! Places the initial residents of a freshly generated region. Runs once,
//! synchronously, before the region is published.
//!
//! All draws come from one generator seeded by the region's own
//! coordinate, in a fixed order, so a region always repopulates the same
//! way.
//!
//! | Type    | Residents                                                  |
//! |---------|------------------------------------------------------------|
//! | field   | 0..=max wildlife, every Nth a wolf; towns add guards + NPCs |
//! | shop    | two homely, then everything a house gets                   |
//! | house   | two homely, maybe a guard, maybe a trader, marker containers |
//! | dungeon | 0..=max hostiles, every Nth a death waker                   |
//!
//! ## Placement
//!
//! Rejection sampling inside the one-tile margin using [`Hitmap::fits`].
//! Attempts are capped by `placement_attempts`; an entity that finds no
//! room is logged and skipped, and population carries on.
//!
//! [`Hitmap::fits`]: wayfarer_procedural::Hitmap::fits

use wayfarer_procedural::{tiles, CoordRng, RegionType};

use crate::config::{PopulationConfig, WorldConfig};
use crate::entity::EntityId;
use crate::error::{WorldError, WorldResult};
use crate::region::Region;
use crate::shops;

/// Populates `region` according to its type.
pub fn populate(region: &mut Region, config: &WorldConfig) {
    let address = region.address();
    let mut rng = CoordRng::for_coord(address.x(), address.y());
    let is_town = address.is_town();
    let attempts = config.placement_attempts;
    let population = &config.population;

    match address.kind() {
        RegionType::Field => populate_field(region, &mut rng, population, attempts, is_town),
        RegionType::Shop => {
            place(region, &mut rng, "homely", attempts);
            place(region, &mut rng, "homely", attempts);
            populate_house(region, &mut rng, config);
        }
        RegionType::House => populate_house(region, &mut rng, config),
        RegionType::Dungeon => populate_dungeon(region, &mut rng, population, attempts),
    }

    tracing::debug!(
        region = %region.id(),
        entities = region.entity_count(),
        "region populated"
    );
}

/// Draws a count in `[0, max]` from one uniform sample.
fn draw_count(rng: &mut CoordRng, max: u32) -> u32 {
    ((rng.uniform() * (f64::from(max) + 1.0)).floor() as u32).min(max)
}

fn populate_field(
    region: &mut Region,
    rng: &mut CoordRng,
    population: &PopulationConfig,
    attempts: u32,
    is_town: bool,
) {
    let count = draw_count(rng, population.max_field_creatures);
    for i in 0..count {
        let archetype = if i % population.field_rare_cadence == 0 { "wolf" } else { "sheep" };
        place(region, rng, archetype, attempts);
    }

    if !is_town {
        return;
    }

    let guards = rng.range(
        i64::from(population.min_town_guards),
        i64::from(population.max_town_guards),
    );
    for _ in 0..guards {
        place(region, rng, "soldier", attempts);
    }
    for archetype in ["bully", "child", "child", "child", "trader"] {
        place(region, rng, archetype, attempts);
    }
}

fn populate_house(region: &mut Region, rng: &mut CoordRng, config: &WorldConfig) {
    let attempts = config.placement_attempts;
    let population = &config.population;

    place(region, rng, "homely", attempts);
    place(region, rng, "homely", attempts);

    if rng.range(0, i64::from(population.guard_in_house_odds)) == 0 {
        place(region, rng, "soldier", attempts);
    }
    if rng.range(0, i64::from(population.trader_in_house_odds)) == 0 {
        place(region, rng, "trader", attempts);
    }

    let width = region.terrain().width();
    let markers: Vec<(usize, usize, tiles::Tile)> = region
        .terrain()
        .tiles()
        .iter()
        .enumerate()
        .filter(|(_, &tile)| tile == tiles::CHEST_MARKER || tile == tiles::POT_MARKER)
        .map(|(i, &tile)| (i % width, i / width, tile))
        .collect();

    for (x, y, tile) in markers {
        if tile == tiles::CHEST_MARKER {
            shops::place_chest(region, x, y, rng, &config.shops);
        } else {
            shops::place_pot(region, x, y, rng, &config.shops);
        }
    }
}

fn populate_dungeon(
    region: &mut Region,
    rng: &mut CoordRng,
    population: &PopulationConfig,
    attempts: u32,
) {
    let count = rng.range(0, i64::from(population.max_dungeon_creatures));
    for i in 0..count {
        let archetype = if i % i64::from(population.dungeon_rare_cadence) == 0 {
            "death_waker"
        } else {
            "zombie"
        };
        place(region, rng, archetype, attempts);
    }
}

/// Places one entity, logging and skipping it on failure.
pub(crate) fn place(
    region: &mut Region,
    rng: &mut CoordRng,
    archetype: &str,
    attempts: u32,
) -> Option<EntityId> {
    match try_place(region, rng, archetype, attempts) {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::warn!(region = %region.id(), archetype, error = %err, "placement skipped");
            None
        }
    }
}

/// Rejection-samples a free spot for `archetype` and brings it in.
///
/// # Errors
///
/// Returns [`WorldError::UnknownArchetype`] if the factory cannot build it,
/// or [`WorldError::PlacementExhausted`] after `attempts` misses.
pub fn try_place(
    region: &mut Region,
    rng: &mut CoordRng,
    archetype: &str,
    attempts: u32,
) -> WorldResult<EntityId> {
    let mut entity = region.build_entity(archetype)?;
    let (w, h) = entity.footprint();
    let hitmap = region.terrain().hitmap();
    let span_x = hitmap.width() as f64 - 2.0 - w;
    let span_y = hitmap.height() as f64 - 2.0 - h;

    for _ in 0..attempts {
        let x = rng.uniform() * span_x + 1.0;
        let y = rng.uniform() * span_y + 1.0;
        if hitmap.fits(x, y, w, h) {
            entity.set_position(x, y);
            return Ok(region.add_entity(entity));
        }
    }

    Err(WorldError::PlacementExhausted {
        archetype: archetype.to_owned(),
        attempts,
    })
}
