//! # Field Noise
//!
//! Globally seeded 2-D simplex noise for open-field terrain.
//!
//! ## Determinism Guarantee
//!
//! The generator is seeded once per world, never per region, and sampled at
//! world-absolute tile coordinates (`region_x * width + column`). Adjacent
//! regions therefore line up seamlessly along their shared edge, and the same
//! region always regenerates identically.

use crate::tiles::{self, Tile};

/// Seed of the world-wide noise field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoiseSeed(u64);

impl NoiseSeed {
    /// Creates a new noise seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for a specific layer.
    #[inline]
    #[must_use]
    pub const fn derive(self, layer: u64) -> Self {
        let mut hash = self.0;
        hash ^= layer;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for NoiseSeed {
    fn default() -> Self {
        Self(125)
    }
}

/// Pre-computed permutation table, built once from the seed.
struct PermutationTable {
    /// 256 entries, doubled to avoid index wrapping.
    perm: [u8; 512],
}

/// The 12 gradient directions used by 2-D simplex noise.
const GRADIENTS: [[i8; 2]; 12] = [
    [1, 0], [1, 1], [0, 1], [-1, 1],
    [-1, 0], [-1, -1], [0, -1], [1, -1],
    [1, 0], [0, 1], [-1, 0], [0, -1],
];

impl PermutationTable {
    fn new(seed: NoiseSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates with xorshift64; a zero state would never advance.
        let mut state = seed.value() | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state as usize) % (i + 1);
            perm.swap(i, j);
        }

        perm.copy_within(0..256, 256);
        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(hash: u8) -> [i8; 2] {
        GRADIENTS[(hash % 12) as usize]
    }
}

/// 2-D simplex noise generator producing values in `[-1, 1]`.
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for the 2-D simplex grid: (sqrt(3) - 1) / 2.
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskewing factor: (3 - sqrt(3)) / 6.
    const G2: f64 = 0.211_324_865_405_187;

    /// Creates a generator from a seed.
    #[must_use]
    pub fn new(seed: NoiseSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples noise at `(x, y)`. Returns a value in `[-1, 1]`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = (i + j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let table = &self.perm_table;
        let gi0 = table.get(ii + table.get(jj) as usize);
        let gi1 = table.get(ii + i1 + table.get(jj + j1) as usize);
        let gi2 = table.get(ii + 1 + table.get(jj + 1) as usize);

        70.0 * (contribution(x0, y0, gi0) + contribution(x1, y1, gi1) + contribution(x2, y2, gi2))
    }

    /// Fractal noise: `octaves` layers with decaying amplitude.
    #[must_use]
    pub fn octaved(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_amplitude == 0.0 {
            0.0
        } else {
            total / max_amplitude
        }
    }
}

#[inline]
fn contribution(x: f64, y: f64, gradient_index: u8) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let grad = PermutationTable::gradient(gradient_index);
        let t2 = t * t;
        t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
    }
}

/// Lattice coordinate of `x`. Kept in `i64` so world-absolute samples at
/// the far edges of the `i32` region grid never overflow.
#[inline]
fn fast_floor(x: f64) -> i64 {
    let xi = x as i64;
    if x < xi as f64 {
        xi - 1
    } else {
        xi
    }
}

/// Frequency of the elevation layer, in cycles per tile.
const ELEVATION_SCALE: f64 = 0.035;
/// Frequency of the vegetation layer.
const VEGETATION_SCALE: f64 = 0.31;
/// Elevation below which a tile is water.
const WATER_LEVEL: f64 = -0.45;
/// Elevation below which a tile is shoreline sand.
const SHORE_LEVEL: f64 = -0.35;
/// Vegetation above which a tile is a tree.
const TREE_LEVEL: f64 = 0.62;
/// Vegetation below which grass flowers.
const FLOWER_LEVEL: f64 = -0.7;

/// Two-layer field noise: elevation picks water/sand/land, vegetation picks
/// trees and flowers on land.
pub struct FieldNoise {
    elevation: SimplexNoise,
    vegetation: SimplexNoise,
}

impl FieldNoise {
    /// Creates the field generator for a world seed.
    #[must_use]
    pub fn new(seed: NoiseSeed) -> Self {
        Self {
            elevation: SimplexNoise::new(seed.derive(1)),
            vegetation: SimplexNoise::new(seed.derive(2)),
        }
    }

    /// Raw tile class at a world-absolute tile coordinate.
    #[must_use]
    pub fn classify(&self, world_x: i64, world_y: i64) -> Tile {
        let (fx, fy) = (world_x as f64, world_y as f64);
        let elevation = self
            .elevation
            .octaved(fx * ELEVATION_SCALE, fy * ELEVATION_SCALE, 4, 0.5, 2.0);
        if elevation < WATER_LEVEL {
            return tiles::WATER;
        }
        if elevation < SHORE_LEVEL {
            return tiles::SAND;
        }

        let vegetation = self
            .vegetation
            .sample(fx * VEGETATION_SCALE, fy * VEGETATION_SCALE);
        if vegetation > TREE_LEVEL {
            tiles::TREE
        } else if vegetation < FLOWER_LEVEL {
            tiles::FLOWERS
        } else {
            tiles::GRASS
        }
    }

    /// Fills a row-major `width x height` buffer whose top-left tile sits at
    /// world coordinate `(origin_x, origin_y)`.
    pub fn fill_grid(&self, origin_x: i64, origin_y: i64, tiles: &mut [Tile], width: usize, height: usize) {
        for row in 0..height {
            for col in 0..width {
                tiles[row * width + col] =
                    self.classify(origin_x + col as i64, origin_y + row as i64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let noise1 = SimplexNoise::new(NoiseSeed::new(12345));
        let noise2 = SimplexNoise::new(NoiseSeed::new(12345));

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(noise1.sample(x, y).to_bits(), noise2.sample(x, y).to_bits());
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let noise1 = SimplexNoise::new(NoiseSeed::new(1));
        let noise2 = SimplexNoise::new(NoiseSeed::new(2));
        let differs = (0..32).any(|i| {
            let x = f64::from(i) * 3.7 + 0.3;
            noise1.sample(x, x * 0.5) != noise2.sample(x, x * 0.5)
        });
        assert!(differs, "Different seeds should produce different results");
    }

    #[test]
    fn test_range() {
        let noise = SimplexNoise::new(NoiseSeed::new(42));
        for i in 0..10_000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let y = f64::from(i) * 0.13 - 650.0;
            let value = noise.sample(x, y);
            assert!((-1.0..=1.0).contains(&value), "Value {value} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn test_continuity() {
        let noise = SimplexNoise::new(NoiseSeed::new(42));
        let v1 = noise.sample(100.0, 100.0);
        let v2 = noise.sample(100.001, 100.0);
        assert!((v1 - v2).abs() < 0.01, "Noise should be continuous");
    }

    #[test]
    fn test_far_lattice_stays_in_range() {
        let noise = SimplexNoise::new(NoiseSeed::new(42));
        // Same-sign corners of the region grid, scaled to world tiles.
        let far = f64::from(i32::MAX) * 100.0;
        for (x, y) in [(far, far), (-far, -far), (3.0e9, 3.0e9), (far * 8.0, far * 8.0)] {
            let value = noise.sample(x, y);
            assert!((-1.0..=1.0).contains(&value), "Value {value} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn test_seed_derivation() {
        let base = NoiseSeed::new(42);
        assert_ne!(base.derive(1), base.derive(2));
        assert_eq!(base.derive(1), base.derive(1));
        assert_ne!(base.derive(1), base);
    }

    #[test]
    fn test_fill_grid_is_seamless_across_regions() {
        let field = FieldNoise::new(NoiseSeed::default());
        let (w, h) = (100, 100);
        let mut left = vec![0; w * h];
        let mut right = vec![0; w * h];
        field.fill_grid(0, 0, &mut left, w, h);
        field.fill_grid(100, 0, &mut right, w, h);

        // The column just past the left region is the right region's first.
        for row in 0..h {
            assert_eq!(field.classify(100, row as i64), right[row * w]);
            assert_eq!(field.classify(99, row as i64), left[row * w + 99]);
        }
    }

    #[test]
    fn test_field_mix_is_mostly_open() {
        let field = FieldNoise::new(NoiseSeed::default());
        let mut tiles = vec![0; 200 * 200];
        field.fill_grid(-100, -100, &mut tiles, 200, 200);
        let solid = tiles.iter().filter(|&&t| crate::tiles::is_solid(t)).count();
        assert!(solid < tiles.len() / 2, "{solid} solid tiles");
    }
}
