//! # Region Walk Integration Test
//!
//! Walks a strip of fields and checks every region regenerates identically,
//! lines up with its neighbour and leaves room to stand.

use wayfarer_procedural::{
    tiles, NoiseSeed, PortalTarget, RegionType, Terrain, TerrainRequest, WorldRoot,
};

fn field(x: i32, y: i32) -> TerrainRequest {
    TerrainRequest {
        root: WorldRoot::Overworld,
        kind: RegionType::Field,
        x,
        y,
        is_town: false,
        is_dungeon_entrance: false,
        noise_seed: NoiseSeed::default(),
    }
}

/// Test: Every field along a 20-region walk has somewhere to stand.
#[test]
fn test_walk_never_hits_a_solid_region() {
    for x in -10..10 {
        let terrain = Terrain::generate(&field(x, 7));
        let free = (1..99)
            .flat_map(|y| (1..99).map(move |x| (x, y)))
            .filter(|&(x, y)| terrain.hitmap().fits(x as f64, y as f64, 1.0, 1.0))
            .count();
        assert!(free > 1000, "field ({x}, 7) has only {free} free tiles");
    }
}

/// Test: Regenerating a region yields the same tiles, hitmap and rounding.
#[test]
fn test_regeneration_is_identical() {
    for (x, y) in [(0, 0), (-3, 8), (i32::MAX, i32::MIN)] {
        let a = Terrain::generate(&field(x, y));
        let b = Terrain::generate(&field(x, y));
        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.hitmap().as_bytes(), b.hitmap().as_bytes());
        assert_eq!(a.rounding(), b.rounding());
    }
}

/// Test: Fields at the same-sign corners of the coordinate grid generate.
#[test]
fn test_far_corner_fields_generate() {
    for (x, y) in [
        (30_000_000, 30_000_000),
        (i32::MAX, i32::MAX),
        (i32::MIN, i32::MIN),
        (-30_000_000, -30_000_000),
    ] {
        let terrain = Terrain::generate(&field(x, y));
        assert_eq!((terrain.width(), terrain.height()), (100, 100));
        assert!(terrain.rounding().is_some());
        assert_eq!(terrain.tiles(), Terrain::generate(&field(x, y)).tiles());
    }
}

/// Test: Unrounded noise is continuous across a region border.
#[test]
fn test_neighbouring_fields_share_water_bodies() {
    let left = Terrain::generate(&field(4, 4));
    let right = Terrain::generate(&field(5, 4));

    // A shoreline only rarely runs exactly along the seam.
    let mut water_pairs = 0;
    let mut mismatched = 0;
    for row in 0..100 {
        let a = left.tile(99, row).unwrap_or_default();
        let b = right.tile(0, row).unwrap_or_default();
        if tiles::is_water(a) && tiles::is_water(b) {
            water_pairs += 1;
        } else if tiles::is_water(a) != tiles::is_water(b) {
            mismatched += 1;
        }
    }
    assert!(mismatched <= water_pairs + 10, "{mismatched} mismatches vs {water_pairs} water pairs");
}

/// Test: A town's door portals each lead to a distinct child.
#[test]
fn test_town_doors_are_distinct() {
    let mut request = field(0, 0);
    request.is_town = true;
    let town = Terrain::generate(&request);

    let targets: Vec<String> = town.portals().map(|p| p.target.to_string()).collect();
    let mut unique = targets.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(targets.len(), unique.len());
    assert!(targets.contains(&"shop:0:0".to_owned()));
    assert!(town
        .portals()
        .all(|p| matches!(p.target, PortalTarget::Child { .. })));
}
