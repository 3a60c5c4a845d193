//! Deterministic forest layout.
//!
//! Every allocated chunk that is neither the farm nor the town gets a forest
//! carpet: grass tiles with tree trunks and small resource pockets scattered
//! through them. Tiles the base map reserves for roads or structures are left
//! out of the carpet. The layout is seeded per chunk so regenerating the
//! world yields the same forest.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashSet;

use super::chunks::{ChunkMap, CHUNK_H, CHUNK_W};
use super::TileMap;

/// Fraction of forest tiles holding a tree trunk.
const TRUNK_DENSITY: f64 = 0.08;
/// Fraction of forest tiles holding a resource pocket (stones, stumps).
const POCKET_DENSITY: f64 = 0.04;

#[derive(Resource, Debug, Clone, Default)]
pub struct ForestLayout {
    /// Flat list of forest grass tiles, used for uniform spawn sampling and
    /// for the grass capacity count.
    pub grass_tiles: Vec<(i32, i32)>,
    grass_lookup: HashSet<(i32, i32)>,
    pub trunk_tiles: HashSet<(i32, i32)>,
    pub pocket_tiles: HashSet<(i32, i32)>,
}

impl ForestLayout {
    pub fn generate(map: &TileMap, chunks: &ChunkMap, town_chunk: (i32, i32), seed: u64) -> Self {
        let mut layout = ForestLayout::default();
        for &(col, row) in &chunks.allocated {
            if (col, row) == chunks.farm_chunk || (col, row) == town_chunk {
                continue;
            }
            let mix = (col as i64 * 7919 + row as i64 * 104_729) as u64;
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(mix));
            let (left, bottom, right, top) = ChunkMap::chunk_bounds(col, row);
            for y in bottom..=top {
                for x in left..=right {
                    // Roads, floors and the stand plot punch holes in the carpet.
                    if !map.is_grass(x, y) {
                        continue;
                    }
                    layout.grass_tiles.push((x, y));
                    layout.grass_lookup.insert((x, y));
                    if rng.gen_bool(TRUNK_DENSITY) {
                        layout.trunk_tiles.insert((x, y));
                    } else if rng.gen_bool(POCKET_DENSITY) {
                        layout.pocket_tiles.insert((x, y));
                    }
                }
            }
        }
        layout
    }

    /// A forest tile can host a flower or weed when it is part of the carpet
    /// and not taken by a trunk or a resource pocket.
    pub fn is_valid_spawn_tile(&self, tile_x: i32, tile_y: i32) -> bool {
        self.grass_lookup.contains(&(tile_x, tile_y))
            && !self.trunk_tiles.contains(&(tile_x, tile_y))
            && !self.pocket_tiles.contains(&(tile_x, tile_y))
    }

    pub fn is_forest_tile(&self, tile_x: i32, tile_y: i32) -> bool {
        self.grass_lookup.contains(&(tile_x, tile_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TILE_ROAD;

    fn two_forest_chunks() -> ForestLayout {
        let map = TileMap::new(64, 48);
        let chunks = ChunkMap::default();
        // Town at (1, 0) leaves (0, 0) and (1, 1) as forest.
        ForestLayout::generate(&map, &chunks, (1, 0), 7)
    }

    #[test]
    fn generation_is_deterministic() {
        let a = two_forest_chunks();
        let b = two_forest_chunks();
        assert_eq!(a.grass_tiles, b.grass_tiles);
        assert_eq!(a.trunk_tiles, b.trunk_tiles);
        assert_eq!(a.pocket_tiles, b.pocket_tiles);
    }

    #[test]
    fn farm_and_town_chunks_stay_clear() {
        let layout = two_forest_chunks();
        let expected = (CHUNK_W * CHUNK_H * 2) as usize;
        assert_eq!(layout.grass_tiles.len(), expected);
        // Farm chunk (0, 1) and town chunk (1, 0) contribute nothing.
        assert!(!layout.is_forest_tile(CHUNK_W + 1, 1));
        assert!(!layout.is_forest_tile(1, CHUNK_H + 1));
    }

    #[test]
    fn non_grass_map_tiles_stay_out_of_the_carpet() {
        let mut map = TileMap::new(64, 48);
        for x in 0..64 {
            map.set_tile(x, 5, TILE_ROAD);
        }
        let chunks = ChunkMap::default();
        let layout = ForestLayout::generate(&map, &chunks, (1, 0), 7);
        // Row 5 crosses the forest chunk (0, 0); its tiles are skipped there.
        assert!(!layout.is_forest_tile(3, 5));
        assert!(!layout.is_valid_spawn_tile(3, 5));
        let expected = (CHUNK_W * CHUNK_H * 2 - CHUNK_W) as usize;
        assert_eq!(layout.grass_tiles.len(), expected);
    }

    #[test]
    fn trunks_and_pockets_block_spawning() {
        let layout = two_forest_chunks();
        assert!(!layout.trunk_tiles.is_empty());
        assert!(!layout.pocket_tiles.is_empty());
        for &(x, y) in layout.trunk_tiles.iter().take(5) {
            assert!(!layout.is_valid_spawn_tile(x, y));
        }
        for &(x, y) in layout.pocket_tiles.iter().take(5) {
            assert!(!layout.is_valid_spawn_tile(x, y));
        }
        let open = layout
            .grass_tiles
            .iter()
            .find(|t| !layout.trunk_tiles.contains(t) && !layout.pocket_tiles.contains(t))
            .copied()
            .unwrap();
        assert!(layout.is_valid_spawn_tile(open.0, open.1));
    }
}
