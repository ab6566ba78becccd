//! # Tile Rounding
//!
//! Reconciles raw noise classes into tiles the field tileset can render:
//!
//! 1. **Despeckle** - a tile none of whose four neighbours shares its class is
//!    replaced by the most common neighbouring class. The tileset has no
//!    sprite for a lone water or sand tile.
//! 2. **Edges** - water bordering land becomes `WATER_EDGE + mask`, where the
//!    mask flags which sides touch land.
//!
//! Returns the set of row-major indices the pass rewrote. That set is the
//! optional rounding metadata shipped with a region snapshot.

use std::collections::BTreeSet;

use crate::tiles::{self, Tile, EDGE_E, EDGE_N, EDGE_S, EDGE_W};

/// Neighbour offsets in N, E, S, W order, paired with their edge bit.
const NEIGHBOURS: [(i64, i64, Tile); 4] = [(0, -1, EDGE_N), (1, 0, EDGE_E), (0, 1, EDGE_S), (-1, 0, EDGE_W)];

/// Runs both rounding stages over a row-major buffer.
pub fn round(buffer: &mut [Tile], width: usize, height: usize) -> BTreeSet<usize> {
    let mut rewritten = despeckle(buffer, width, height);
    rewritten.extend(edges(buffer, width, height));
    rewritten
}

fn neighbour(buffer: &[Tile], width: usize, height: usize, x: usize, y: usize, dx: i64, dy: i64) -> Option<Tile> {
    let nx = x as i64 + dx;
    let ny = y as i64 + dy;
    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
        return None;
    }
    Some(buffer[ny as usize * width + nx as usize])
}

fn despeckle(buffer: &mut [Tile], width: usize, height: usize) -> BTreeSet<usize> {
    let source = buffer.to_vec();
    let mut rewritten = BTreeSet::new();

    for y in 0..height {
        for x in 0..width {
            let index = y * width + x;
            let own = source[index];
            let around: Vec<Tile> = NEIGHBOURS
                .iter()
                .filter_map(|&(dx, dy, _)| neighbour(&source, width, height, x, y, dx, dy))
                .collect();

            // Border tiles continue into the next region; leave them alone.
            if around.len() < NEIGHBOURS.len() || around.contains(&own) {
                continue;
            }

            let mut best = around[0];
            let mut best_count = 0;
            for &candidate in &around {
                let count = around.iter().filter(|&&t| t == candidate).count();
                if count > best_count {
                    best = candidate;
                    best_count = count;
                }
            }
            buffer[index] = best;
            rewritten.insert(index);
        }
    }

    rewritten
}

fn edges(buffer: &mut [Tile], width: usize, height: usize) -> BTreeSet<usize> {
    let source = buffer.to_vec();
    let mut rewritten = BTreeSet::new();

    for y in 0..height {
        for x in 0..width {
            let index = y * width + x;
            if source[index] != tiles::WATER {
                continue;
            }

            let mask = NEIGHBOURS.iter().fold(0, |mask, &(dx, dy, bit)| {
                match neighbour(&source, width, height, x, y, dx, dy) {
                    Some(t) if !tiles::is_water(t) => mask | bit,
                    _ => mask,
                }
            });

            if mask != 0 {
                buffer[index] = tiles::WATER_EDGE + mask;
                rewritten.insert(index);
            }
        }
    }

    rewritten
}
