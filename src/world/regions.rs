//! Spawn region computation and tile validity.
//!
//! Three families of region feed the flora spawner: the farm rectangle
//! below the farmhouse, the town chunk around the general store, and one
//! rectangle per forest chunk. Validity checks consult the occupancy
//! collaborators through optional references; a missing collaborator simply
//! skips its rule.

use crate::shared::*;

use super::chunks::ChunkMap;
use super::forest::ForestLayout;
use super::{TileMap, FARMHOUSE_BOTTOM, GENERAL_STORE_TILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaOrigin {
    Farm,
    Town,
    Forest,
}

/// A rectangular spawn region in inclusive tile bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnArea {
    pub left: i32,
    pub right: i32,
    pub bottom: i32,
    pub top: i32,
    pub origin: AreaOrigin,
}

impl SpawnArea {
    pub fn width(&self) -> i32 {
        (self.right - self.left + 1).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.top - self.bottom + 1).max(0)
    }

    /// Tile capacity of the rectangle. Degenerate rectangles still count one
    /// row so area-weighted picks never divide by zero.
    pub fn tile_count(&self) -> usize {
        (self.width() * self.height().max(1)) as usize
    }

    pub fn contains(&self, tile_x: i32, tile_y: i32) -> bool {
        tile_x >= self.left && tile_x <= self.right && tile_y >= self.bottom && tile_y <= self.top
    }
}

/// Computes the current spawn rectangles. With no chunk map the farm
/// rectangle spans the whole map below the farmhouse and there are no
/// forest rectangles.
pub fn spawn_areas(map: &TileMap, chunks: Option<&ChunkMap>) -> Vec<SpawnArea> {
    let mut areas = Vec::new();

    // Farm: everything below the farmhouse, clipped to the farm chunk.
    let farm = match chunks {
        Some(chunk_map) => {
            let (left, bottom, right, top) =
                ChunkMap::chunk_bounds(chunk_map.farm_chunk.0, chunk_map.farm_chunk.1);
            SpawnArea {
                left,
                right,
                bottom,
                top: (FARMHOUSE_BOTTOM - 1).min(top),
                origin: AreaOrigin::Farm,
            }
        }
        None => SpawnArea {
            left: 0,
            right: map.width - 1,
            bottom: 0,
            top: FARMHOUSE_BOTTOM - 1,
            origin: AreaOrigin::Farm,
        },
    };
    areas.push(farm);

    // Town: the chunk the general store snaps into.
    let town_chunk = ChunkMap::snap_to_chunk(GENERAL_STORE_TILE.0, GENERAL_STORE_TILE.1);
    let (left, bottom, right, top) = ChunkMap::chunk_bounds(town_chunk.0, town_chunk.1);
    areas.push(SpawnArea {
        left,
        right,
        bottom,
        top,
        origin: AreaOrigin::Town,
    });

    // Forest: every remaining allocated chunk.
    if let Some(chunk_map) = chunks {
        for &(col, row) in &chunk_map.allocated {
            if (col, row) == chunk_map.farm_chunk || (col, row) == town_chunk {
                continue;
            }
            let (left, bottom, right, top) = ChunkMap::chunk_bounds(col, row);
            areas.push(SpawnArea {
                left,
                right,
                bottom,
                top,
                origin: AreaOrigin::Forest,
            });
        }
    }

    areas
}

/// Everything `is_valid_spawn_tile` consults. The occupancy collaborators
/// are optional; `None` disables that exclusion rule.
pub struct SpawnContext<'a> {
    pub map: &'a TileMap,
    pub areas: &'a [SpawnArea],
    pub flora: &'a FloraIndex,
    pub forest: Option<&'a ForestLayout>,
    pub crops: Option<&'a CropState>,
    pub trees: Option<&'a TreeState>,
    pub ore: Option<&'a OreIndex>,
    pub enemies: Option<&'a EnemyIndex>,
}

/// Whether a flower or weed may spawn at the tile. Forest tiles delegate to
/// the forest layout's own check; main-map tiles run the full rule chain.
pub fn is_valid_spawn_tile(tile_x: i32, tile_y: i32, forest_tile: bool, ctx: &SpawnContext) -> bool {
    if forest_tile {
        let forest_ok = ctx
            .forest
            .map(|forest| forest.is_valid_spawn_tile(tile_x, tile_y))
            .unwrap_or(false);
        if !forest_ok || ctx.flora.occupied(tile_x, tile_y) {
            return false;
        }
        // Veins sit on forest pockets; their footprints block here too.
        if let Some(ore) = ctx.ore {
            if ore.vein_at(tile_x, tile_y).is_some() {
                return false;
            }
        }
        return true;
    }

    if !ctx.map.in_bounds(tile_x, tile_y) {
        return false;
    }
    if !ctx.areas.iter().any(|area| area.contains(tile_x, tile_y)) {
        return false;
    }
    if ctx.map.is_custom_overlay_tile(tile_x, tile_y) {
        return false;
    }
    if !ctx.map.is_grass(tile_x, tile_y) {
        return false;
    }
    if ctx.flora.occupied(tile_x, tile_y) {
        return false;
    }
    if ctx.map.has_hole(tile_x, tile_y) {
        return false;
    }
    if let Some(crops) = ctx.crops {
        if crops.crop_at(tile_x, tile_y).is_some() {
            return false;
        }
    }
    if let Some(trees) = ctx.trees {
        if trees.tree_at(tile_x, tile_y) {
            return false;
        }
    }
    if let Some(ore) = ctx.ore {
        if ore.vein_at(tile_x, tile_y).is_some() {
            return false;
        }
    }
    if let Some(enemies) = ctx.enemies {
        if enemies.enemy_at(tile_x, tile_y) {
            return false;
        }
    }
    if let Some(forest) = ctx.forest {
        if forest.trunk_tiles.contains(&(tile_x, tile_y))
            || forest.pocket_tiles.contains(&(tile_x, tile_y))
        {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Entity;

    fn farm_only_setup() -> (TileMap, Vec<SpawnArea>) {
        let map = TileMap::new(16, 16);
        let areas = vec![SpawnArea {
            left: 0,
            right: 15,
            bottom: 0,
            top: 11,
            origin: AreaOrigin::Farm,
        }];
        (map, areas)
    }

    fn ctx<'a>(map: &'a TileMap, areas: &'a [SpawnArea], flora: &'a FloraIndex) -> SpawnContext<'a> {
        SpawnContext {
            map,
            areas,
            flora,
            forest: None,
            crops: None,
            trees: None,
            ore: None,
            enemies: None,
        }
    }

    #[test]
    fn unoccupied_grass_inside_farm_is_valid() {
        let (map, areas) = farm_only_setup();
        let flora = FloraIndex::default();
        assert!(is_valid_spawn_tile(5, 5, false, &ctx(&map, &areas, &flora)));
    }

    #[test]
    fn tiles_outside_all_areas_are_invalid() {
        let (map, areas) = farm_only_setup();
        let flora = FloraIndex::default();
        // In bounds but above the farm rectangle.
        assert!(!is_valid_spawn_tile(5, 14, false, &ctx(&map, &areas, &flora)));
        // Out of bounds entirely.
        assert!(!is_valid_spawn_tile(-1, 5, false, &ctx(&map, &areas, &flora)));
        assert!(!is_valid_spawn_tile(40, 5, false, &ctx(&map, &areas, &flora)));
    }

    #[test]
    fn hoed_holes_and_flora_block_spawning() {
        let (mut map, areas) = farm_only_setup();
        let mut flora = FloraIndex::default();

        assert!(map.hoe_tile(3, 3));
        assert!(!is_valid_spawn_tile(3, 3, false, &ctx(&map, &areas, &flora)));

        map.dig_hole(4, 4);
        assert!(!is_valid_spawn_tile(4, 4, false, &ctx(&map, &areas, &flora)));

        flora.weeds.insert((5, 5), Entity::from_raw(1));
        assert!(!is_valid_spawn_tile(5, 5, false, &ctx(&map, &areas, &flora)));
    }

    #[test]
    fn absent_collaborators_fail_open() {
        let (map, areas) = farm_only_setup();
        let flora = FloraIndex::default();

        let mut crops = CropState::default();
        crops.crops.insert((6, 6), "turnip".to_string());

        let mut with_crops = ctx(&map, &areas, &flora);
        with_crops.crops = Some(&crops);
        assert!(!is_valid_spawn_tile(6, 6, false, &with_crops));

        // Same tile, crop collaborator unplugged: the rule is skipped.
        assert!(is_valid_spawn_tile(6, 6, false, &ctx(&map, &areas, &flora)));
    }

    #[test]
    fn occupied_vein_footprint_blocks_all_four_tiles() {
        let (map, areas) = farm_only_setup();
        let flora = FloraIndex::default();
        let mut ore = OreIndex::default();
        ore.insert_footprint(8, 8, Entity::from_raw(9));

        let mut with_ore = ctx(&map, &areas, &flora);
        with_ore.ore = Some(&ore);
        for (x, y) in vein_footprint(8, 8) {
            assert!(!is_valid_spawn_tile(x, y, false, &with_ore));
        }
        assert!(is_valid_spawn_tile(7, 8, false, &with_ore));
    }

    #[test]
    fn vein_footprints_block_forest_tiles_too() {
        let map = TileMap::new(64, 48);
        let chunks = ChunkMap::default();
        let forest = ForestLayout::generate(&map, &chunks, (1, 0), 7);
        let areas = spawn_areas(&map, Some(&chunks));
        let flora = FloraIndex::default();

        let (x, y) = forest
            .grass_tiles
            .iter()
            .find(|&&(x, y)| forest.is_valid_spawn_tile(x, y))
            .copied()
            .unwrap();

        let mut with_forest = ctx(&map, &areas, &flora);
        with_forest.forest = Some(&forest);
        assert!(is_valid_spawn_tile(x, y, true, &with_forest));

        let mut ore = OreIndex::default();
        ore.insert_footprint(x, y, Entity::from_raw(4));
        with_forest.ore = Some(&ore);
        assert!(!is_valid_spawn_tile(x, y, true, &with_forest));
    }

    #[test]
    fn degenerate_area_counts_one_row() {
        let strip = SpawnArea {
            left: 0,
            right: 9,
            bottom: 5,
            top: 4, // inverted: zero-height rectangle
            origin: AreaOrigin::Town,
        };
        assert_eq!(strip.tile_count(), 10);
    }

    #[test]
    fn chunked_areas_cover_farm_town_and_forest() {
        let map = TileMap::new(64, 48);
        let chunks = ChunkMap::default();
        let areas = spawn_areas(&map, Some(&chunks));
        assert_eq!(
            areas.iter().filter(|a| a.origin == AreaOrigin::Farm).count(),
            1
        );
        assert_eq!(
            areas.iter().filter(|a| a.origin == AreaOrigin::Town).count(),
            1
        );
        assert_eq!(
            areas
                .iter()
                .filter(|a| a.origin == AreaOrigin::Forest)
                .count(),
            2
        );
        let farm = areas.iter().find(|a| a.origin == AreaOrigin::Farm).unwrap();
        assert_eq!(farm.top, FARMHOUSE_BOTTOM - 1);
    }
}
