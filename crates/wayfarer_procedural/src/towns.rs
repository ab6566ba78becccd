//! Town layout for field regions at town positions.
//!
//! Overlays the noise terrain with a central plaza, two crossing paths and a
//! ring of buildings. Each building gets a door portal into its interior:
//! one shop (`shop:0:0`) and numbered houses (`house:i:0`).

use crate::kind::RegionType;
use crate::rng::CoordRng;
use crate::terrain::{Portal, PortalTarget, Terrain, TerrainRequest};
use crate::tiles;

/// Exterior building footprint.
const BUILDING_WIDTH: usize = 10;
const BUILDING_HEIGHT: usize = 8;

/// Plaza side length.
const PLAZA_SIZE: usize = 24;
/// Path width.
const PATH_WIDTH: usize = 4;

/// Top-left corners of the building slots on a 100x100 field.
const SLOTS: [(usize, usize); 8] = [
    (8, 14),
    (26, 14),
    (64, 14),
    (82, 14),
    (8, 72),
    (26, 72),
    (64, 72),
    (82, 72),
];

/// Applies the town overlay.
pub fn apply(terrain: &mut Terrain, request: &TerrainRequest) {
    let (w, h) = (terrain.width(), terrain.height());
    let mut rng = CoordRng::for_name(&format!("town/{}/{}", request.x, request.y));

    terrain.fill_area(0, h / 2 - PATH_WIDTH / 2, w, PATH_WIDTH, tiles::PATH);
    terrain.fill_area(w / 2 - PATH_WIDTH / 2, 0, PATH_WIDTH, h, tiles::PATH);
    terrain.fill_area(
        w / 2 - PLAZA_SIZE / 2,
        h / 2 - PLAZA_SIZE / 2,
        PLAZA_SIZE,
        PLAZA_SIZE,
        tiles::PLAZA,
    );

    let shop_slot = rng.index(SLOTS.len());
    let mut house_number = 0;

    for (slot, &(sx, sy)) in SLOTS.iter().enumerate() {
        let bx = (sx as i64 + rng.range(-2, 2)) as usize;
        let by = (sy as i64 + rng.range(-2, 2)) as usize;

        // Clear a one-tile yard so trees and water never touch the walls.
        terrain.fill_area(bx - 1, by - 1, BUILDING_WIDTH + 2, BUILDING_HEIGHT + 3, tiles::GRASS);
        terrain.fill_area(bx, by, BUILDING_WIDTH, BUILDING_HEIGHT, tiles::BUILDING);

        let door_x = bx + BUILDING_WIDTH / 2 - 1;
        let door_y = by + BUILDING_HEIGHT - 1;
        terrain.fill_area(door_x, door_y, 2, 1, tiles::DOOR);
        terrain.fill_area(door_x, door_y + 1, 2, 2, tiles::PATH);

        let target = if slot == shop_slot {
            PortalTarget::Child {
                kind: RegionType::Shop,
                x: 0,
                y: 0,
            }
        } else {
            let target = PortalTarget::Child {
                kind: RegionType::House,
                x: house_number,
                y: 0,
            };
            house_number += 1;
            target
        };

        terrain.add_portal(Portal {
            x: door_x,
            y: door_y,
            width: 2,
            height: 1,
            target,
        });
    }
}
