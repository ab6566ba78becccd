//! Shop container seeding.
//!
//! Item codes:
//!
//! - `wsw.<prefix>.<level>` weapon (sword) with a name prefix
//! - `p<tier>` potion, tier `0..=10`
//! - `f<tier>` food, tier `0..=9`
//!
//! All odds are out of 10: each test is an independent draw from the ten
//! values `0..=9`.

use wayfarer_procedural::CoordRng;

use crate::config::ShopConfig;
use crate::containers::{ChestEntity, PotEntity};
use crate::entity::{Entity, EntityId};
use crate::region::Region;

/// Weapon name prefixes, in draw order.
pub const WEAPON_PREFIXES: [&str; 12] = [
    "plain", "forged", "sharp", "old", "great", "broad", "royal", "cursed", "ancient", "bright",
    "grim", "legendary",
];

fn passes(rng: &mut CoordRng, odds: u32) -> bool {
    rng.range(0, 9) < i64::from(odds)
}

fn weapon_code(rng: &mut CoordRng, min_level: i64, max_level: u32) -> String {
    let prefix = WEAPON_PREFIXES[rng.range(0, WEAPON_PREFIXES.len() as i64 - 1) as usize];
    let level = rng.range(min_level, i64::from(max_level));
    format!("wsw.{prefix}.{level}")
}

fn consumable_code(rng: &mut CoordRng, shops: &ShopConfig) -> String {
    if passes(rng, shops.potion_odds) {
        format!("p{}", rng.range(0, 10))
    } else {
        format!("f{}", rng.range(0, 9))
    }
}

/// Fills a chest with `[min_chest_items, max_chest_items]` items.
pub fn stock_chest(chest: &mut dyn Entity, rng: &mut CoordRng, shops: &ShopConfig) {
    let count = rng.range(
        i64::from(shops.min_chest_items),
        i64::from(shops.max_chest_items),
    );
    for _ in 0..count {
        let code = if passes(rng, shops.weapon_odds) {
            weapon_code(rng, 1, shops.max_weapon_level)
        } else {
            consumable_code(rng, shops)
        };
        chest.add_item(&code);
    }
}

/// Gives a pot at most one thing. Checked in order: empty, hidden guard,
/// weapon, potion-or-food.
pub fn stock_pot(pot: &mut dyn Entity, rng: &mut CoordRng, shops: &ShopConfig) {
    if passes(rng, shops.empty_odds) {
        return;
    }
    if passes(rng, shops.guard_odds) {
        pot.add_entity("soldier");
        return;
    }
    let code = if passes(rng, shops.weapon_odds) {
        weapon_code(rng, 0, shops.max_weapon_level)
    } else {
        consumable_code(rng, shops)
    };
    pot.add_item(&code);
}

/// Places a stocked chest on the marker tile at `(x, y)`.
pub fn place_chest(
    region: &mut Region,
    x: usize,
    y: usize,
    rng: &mut CoordRng,
    shops: &ShopConfig,
) -> EntityId {
    let mut chest = ChestEntity::new(x as f64, y as f64);
    stock_chest(&mut chest, rng, shops);
    region.terrain_mut().hitmap_mut().set(x, y);
    region.add_entity(Box::new(chest))
}

/// Places a stocked pot on the marker tile at `(x, y)`.
pub fn place_pot(
    region: &mut Region,
    x: usize,
    y: usize,
    rng: &mut CoordRng,
    shops: &ShopConfig,
) -> EntityId {
    let variant = rng.range(0, 2) as u8;
    let mut pot = PotEntity::new(x as f64, y as f64, variant);
    stock_pot(&mut pot, rng, shops);
    region.terrain_mut().hitmap_mut().set(x, y);
    region.add_entity(Box::new(pot))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_item_code(code: &str) -> bool {
        if let Some(rest) = code.strip_prefix("wsw.") {
            let mut parts = rest.split('.');
            let prefix_ok = parts.next().is_some_and(|p| WEAPON_PREFIXES.contains(&p));
            let level_ok = parts.next().and_then(|l| l.parse::<u32>().ok()).is_some_and(|l| l <= 10);
            return prefix_ok && level_ok && parts.next().is_none();
        }
        match code.split_at(1) {
            ("p", tier) => tier.parse::<u32>().is_ok_and(|t| t <= 10),
            ("f", tier) => tier.parse::<u32>().is_ok_and(|t| t <= 9),
            _ => false,
        }
    }

    #[test]
    fn test_chest_item_count_and_codes() {
        let shops = ShopConfig::default();
        let mut rng = CoordRng::for_coord(4, 4);
        for _ in 0..50 {
            let mut chest = ChestEntity::new(1.0, 1.0);
            stock_chest(&mut chest, &mut rng, &shops);
            assert!((1..=10).contains(&chest.items().len()));
            assert!(chest.items().iter().all(|code| is_item_code(code)), "{:?}", chest.items());
        }
    }

    #[test]
    fn test_chest_weapons_start_at_level_one() {
        let shops = ShopConfig {
            weapon_odds: 10,
            ..ShopConfig::default()
        };
        let mut rng = CoordRng::for_coord(9, 9);
        let mut chest = ChestEntity::new(1.0, 1.0);
        stock_chest(&mut chest, &mut rng, &shops);
        assert!(chest.items().iter().all(|code| code.starts_with("wsw.") && !code.ends_with(".0")));
    }

    #[test]
    fn test_pot_outcomes_are_exclusive() {
        let shops = ShopConfig::default();
        let mut rng = CoordRng::for_coord(-2, 8);
        let (mut empty, mut guarded, mut stocked) = (0, 0, 0);
        for _ in 0..500 {
            let mut pot = PotEntity::new(1.0, 1.0, 0);
            stock_pot(&mut pot, &mut rng, &shops);
            match (pot.item(), pot.guard()) {
                (None, None) => empty += 1,
                (None, Some("soldier")) => guarded += 1,
                (Some(code), None) => {
                    assert!(is_item_code(code), "{code}");
                    stocked += 1;
                }
                other => panic!("pot holds {other:?}"),
            }
        }
        assert!(empty > 0 && guarded > 0 && stocked > empty);
    }

    #[test]
    fn test_always_empty_pots() {
        let shops = ShopConfig {
            empty_odds: 10,
            ..ShopConfig::default()
        };
        let mut rng = CoordRng::for_coord(0, 1);
        let mut pot = PotEntity::new(1.0, 1.0, 0);
        stock_pot(&mut pot, &mut rng, &shops);
        assert!(pot.is_empty());
    }
}
