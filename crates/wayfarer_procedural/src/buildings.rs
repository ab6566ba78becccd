//! Building interiors (houses and shops).
//!
//! Interiors are a walled room with an exit mat leading back to the parent
//! region. The floor palette depends on the world root. Furniture placement
//! is seeded by root, type and coordinate, so the same building always has
//! the same layout.
//!
//! Shops carry a counter lined with [`tiles::CHEST_MARKER`] tiles and a pot
//! ([`tiles::POT_MARKER`]) in each corner; houses get a pot or two. Population
//! turns every marker into a container entity.

use crate::kind::{RegionType, WorldRoot};
use crate::rng::{chance, CoordRng};
use crate::terrain::{Portal, PortalTarget, Terrain, TerrainRequest};
use crate::tiles::{self, Tile};

fn floor_for(root: WorldRoot, kind: RegionType) -> Tile {
    match (root, kind) {
        (WorldRoot::Ether, _) => tiles::FLOOR_ETHER,
        (WorldRoot::Overworld, RegionType::Shop) => tiles::FLOOR_STONE,
        (WorldRoot::Overworld, _) => tiles::FLOOR_WOOD,
    }
}

/// Generates a house or shop interior into `terrain`.
pub fn apply(terrain: &mut Terrain, request: &TerrainRequest) {
    let (w, h) = (terrain.width(), terrain.height());
    let mut rng = CoordRng::for_name(&format!(
        "{}/{}/{}/{}",
        request.root, request.kind, request.x, request.y
    ));

    terrain.fill_area(0, 0, w, h, tiles::WALL);
    terrain.fill_area(1, 1, w - 2, h - 2, floor_for(request.root, request.kind));

    let mat_x = w / 2 - 1;
    terrain.fill_area(mat_x, h - 1, 2, 1, tiles::EXIT_MAT);
    terrain.add_portal(Portal {
        x: mat_x,
        y: h - 1,
        width: 2,
        height: 1,
        target: PortalTarget::Parent,
    });

    match request.kind {
        RegionType::Shop => furnish_shop(terrain, &mut rng),
        _ => furnish_house(terrain, &mut rng),
    }
}

fn furnish_house(terrain: &mut Terrain, rng: &mut CoordRng) {
    let bed_x = 3 + rng.range(0, 6) as usize;
    terrain.fill_area(bed_x, 3, 2, 3, tiles::BED);

    let table_x = 20 + rng.range(0, 8) as usize;
    let table_y = 20 + rng.range(0, 8) as usize;
    terrain.fill_area(table_x, table_y, 3, 2, tiles::TABLE);

    let pots = if chance(rng) { 2 } else { 1 };
    for _ in 0..pots {
        let x = rng.range(12, 40) as usize;
        terrain.fill_area(x, 2, 1, 1, tiles::POT_MARKER);
    }
}

fn furnish_shop(terrain: &mut Terrain, rng: &mut CoordRng) {
    let (w, h) = (terrain.width(), terrain.height());
    terrain.fill_area(8, 14, w - 16, 1, tiles::COUNTER);

    let chests = rng.range(3, 6) as usize;
    for i in 0..chests {
        terrain.fill_area(10 + i * 6, 12, 1, 1, tiles::CHEST_MARKER);
    }

    for (x, y) in [(2, 2), (w - 3, 2), (2, h - 5), (w - 3, h - 5)] {
        terrain.fill_area(x, y, 1, 1, tiles::POT_MARKER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseSeed;

    fn interior(root: WorldRoot, kind: RegionType, x: i32) -> Terrain {
        Terrain::generate(&TerrainRequest {
            root,
            kind,
            x,
            y: 0,
            is_town: false,
            is_dungeon_entrance: false,
            noise_seed: NoiseSeed::default(),
        })
    }

    fn count(terrain: &Terrain, tile: Tile) -> usize {
        terrain.tiles().iter().filter(|&&t| t == tile).count()
    }

    #[test]
    fn test_shop_has_markers() {
        let shop = interior(WorldRoot::Overworld, RegionType::Shop, 0);
        assert!((3..=6).contains(&count(&shop, tiles::CHEST_MARKER)));
        assert_eq!(count(&shop, tiles::POT_MARKER), 4);
        assert_eq!(shop.tile(25, 25), Some(tiles::FLOOR_STONE));
    }

    #[test]
    fn test_house_has_pots_but_no_chests() {
        let house = interior(WorldRoot::Overworld, RegionType::House, 3);
        assert_eq!(count(&house, tiles::CHEST_MARKER), 0);
        assert!((1..=2).contains(&count(&house, tiles::POT_MARKER)));
        assert_eq!(count(&house, tiles::BED), 6);
    }

    #[test]
    fn test_root_selects_floor() {
        let house = interior(WorldRoot::Ether, RegionType::House, 0);
        assert_eq!(house.tile(25, 45), Some(tiles::FLOOR_ETHER));
    }

    #[test]
    fn test_exit_leads_to_parent() {
        let house = interior(WorldRoot::Overworld, RegionType::House, 1);
        let exit = house.portals().find(|p| p.target == PortalTarget::Parent);
        assert!(exit.is_some_and(|p| p.y == 51 && !house.hitmap().get(p.x, p.y)));
    }

    #[test]
    fn test_walls_enclose_the_room() {
        let house = interior(WorldRoot::Overworld, RegionType::House, 2);
        assert!(house.hitmap().get(0, 10));
        assert!(house.hitmap().get(51, 10));
        assert!(house.hitmap().get(10, 0));
        assert!(!house.hitmap().get(10, 40));
    }
}
