//! Grass capacity counting and the density-adaptive spawn multiplier.
//!
//! Counting grass tiles means scanning every spawn rectangle, so the count
//! is cached. The cache expires on a short TTL and is invalidated outright
//! whenever a tile edit lands, keeping the spawner honest after hoeing.

use bevy::prelude::*;

use crate::shared::*;
use crate::world::forest::ForestLayout;
use crate::world::regions::{AreaOrigin, SpawnArea};
use crate::world::TileMap;

/// How long a cached grass count stays valid without an edit.
pub const GRASS_CACHE_TTL_MS: f32 = 5000.0;

#[derive(Resource, Debug, Default)]
pub struct GrassTileCache {
    cached: Option<usize>,
    age_ms: f32,
}

impl GrassTileCache {
    pub fn invalidate(&mut self) {
        self.cached = None;
        self.age_ms = 0.0;
    }

    /// Ages a warm cache; a cache past its TTL recounts on next use.
    pub fn tick(&mut self, dt_ms: f32) {
        if self.cached.is_none() {
            return;
        }
        self.age_ms += dt_ms;
        if self.age_ms >= GRASS_CACHE_TTL_MS {
            self.invalidate();
        }
    }

    /// Returns the cached count, recounting if the cache is cold.
    pub fn count(
        &mut self,
        map: &TileMap,
        areas: &[SpawnArea],
        forest: Option<&ForestLayout>,
    ) -> usize {
        if let Some(count) = self.cached {
            return count;
        }
        let count = grass_tile_count(map, areas, forest);
        self.cached = Some(count);
        self.age_ms = 0.0;
        count
    }
}

/// Counts grass tiles across the farm and town rectangles plus the forest
/// carpet. Forest rectangles are skipped here; the carpet list already
/// excludes their non-grass tiles.
pub fn grass_tile_count(
    map: &TileMap,
    areas: &[SpawnArea],
    forest: Option<&ForestLayout>,
) -> usize {
    let mut count = 0;
    for area in areas {
        if area.origin == AreaOrigin::Forest {
            continue;
        }
        for y in area.bottom..=area.top {
            for x in area.left..=area.right {
                if map.is_grass(x, y) {
                    count += 1;
                }
            }
        }
    }
    count + forest.map(|f| f.grass_tiles.len()).unwrap_or(0)
}

/// Density headroom squared. Full headroom at zero flora, zero at or past
/// one flora per grass tile. Clamping happens before squaring so crowded
/// maps cannot bounce back positive.
pub fn spawn_probability_multiplier(active_flora: usize, grass_tiles: usize) -> f32 {
    if grass_tiles == 0 {
        return 0.0;
    }
    let density = active_flora as f32 / grass_tiles as f32;
    let headroom = (1.0 - density).clamp(0.0, 1.0);
    headroom * headroom
}

/// Any tile edit drops the cached grass count.
pub fn invalidate_grass_cache_on_edit(
    mut changes: EventReader<TileChangedEvent>,
    mut cache: ResMut<GrassTileCache>,
) {
    if changes.is_empty() {
        return;
    }
    changes.clear();
    cache.invalidate();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole_map_area(map: &TileMap) -> Vec<SpawnArea> {
        vec![SpawnArea {
            left: 0,
            right: map.width - 1,
            bottom: 0,
            top: map.height - 1,
            origin: AreaOrigin::Farm,
        }]
    }

    #[test]
    fn multiplier_full_at_empty_and_zero_at_saturation() {
        assert_eq!(spawn_probability_multiplier(0, 100), 1.0);
        assert_eq!(spawn_probability_multiplier(100, 100), 0.0);
        assert_eq!(spawn_probability_multiplier(150, 100), 0.0);
        assert_eq!(spawn_probability_multiplier(0, 0), 0.0);
    }

    #[test]
    fn multiplier_squares_the_headroom() {
        let half = spawn_probability_multiplier(50, 100);
        assert!((half - 0.25).abs() < 1e-6);
        let quarter = spawn_probability_multiplier(75, 100);
        assert!((quarter - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn multiplier_decreases_with_density() {
        let mut last = f32::INFINITY;
        for active in [0, 10, 25, 50, 90, 100] {
            let m = spawn_probability_multiplier(active, 100);
            assert!(m <= last);
            last = m;
        }
    }

    #[test]
    fn count_is_memoized_until_invalidated() {
        let mut map = TileMap::new(8, 8);
        let areas = whole_map_area(&map);
        let mut cache = GrassTileCache::default();

        assert_eq!(cache.count(&map, &areas, None), 64);
        assert!(map.hoe_tile(1, 1));
        // Still warm: the stale count is served.
        assert_eq!(cache.count(&map, &areas, None), 64);

        cache.invalidate();
        assert_eq!(cache.count(&map, &areas, None), 63);
    }

    #[test]
    fn cache_expires_after_ttl() {
        let mut map = TileMap::new(8, 8);
        let areas = whole_map_area(&map);
        let mut cache = GrassTileCache::default();

        assert_eq!(cache.count(&map, &areas, None), 64);
        assert!(map.hoe_tile(2, 2));

        cache.tick(GRASS_CACHE_TTL_MS - 1.0);
        assert_eq!(cache.count(&map, &areas, None), 64);
        cache.tick(1.0);
        assert_eq!(cache.count(&map, &areas, None), 63);
    }

    #[test]
    fn cold_cache_does_not_age() {
        let mut cache = GrassTileCache::default();
        cache.tick(10_000.0);
        let map = TileMap::new(4, 4);
        let areas = whole_map_area(&map);
        assert_eq!(cache.count(&map, &areas, None), 16);
    }
}
