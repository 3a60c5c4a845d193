//! Chunk grid bookkeeping.
//!
//! The map is carved into fixed-size chunks. The farm occupies one chunk,
//! the town another, and every remaining allocated chunk is forest. Spawn
//! region computation snaps positions to this grid.

use bevy::prelude::*;

/// Chunk dimensions in tiles.
pub const CHUNK_W: i32 = 32;
pub const CHUNK_H: i32 = 24;

#[derive(Resource, Debug, Clone)]
pub struct ChunkMap {
    /// Allocated chunks as (col, row).
    pub allocated: Vec<(i32, i32)>,
    pub farm_chunk: (i32, i32),
}

impl Default for ChunkMap {
    fn default() -> Self {
        // 2x2 chunk world: farm top-left, town bottom-right, forest elsewhere.
        Self {
            allocated: vec![(0, 0), (1, 0), (0, 1), (1, 1)],
            farm_chunk: (0, 1),
        }
    }
}

impl ChunkMap {
    /// Snaps a tile position down to the chunk containing it.
    pub fn snap_to_chunk(tile_x: i32, tile_y: i32) -> (i32, i32) {
        (tile_x.div_euclid(CHUNK_W), tile_y.div_euclid(CHUNK_H))
    }

    /// Inclusive tile bounds of a chunk: (left, bottom, right, top).
    pub fn chunk_bounds(col: i32, row: i32) -> (i32, i32, i32, i32) {
        (
            col * CHUNK_W,
            row * CHUNK_H,
            col * CHUNK_W + CHUNK_W - 1,
            row * CHUNK_H + CHUNK_H - 1,
        )
    }

    pub fn is_allocated(&self, col: i32, row: i32) -> bool {
        self.allocated.contains(&(col, row))
    }
}
