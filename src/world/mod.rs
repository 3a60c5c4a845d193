//! World domain plugin for Fernvale.
//!
//! Responsible for:
//! - Generating and rendering the tile map (grass, road, farmhouse, stand plot)
//! - Chunk bookkeeping and the deterministic forest layout
//! - Spawn region computation and spawn tile validity
//! - Tile edits from tool use (hoeing, restoring, filling holes)
//! - Syncing logical positions to render transforms with y-sorting

use bevy::prelude::*;
use bevy::transform::TransformSystem;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashSet;

use crate::shared::*;

pub mod chunks;
pub mod forest;
pub mod regions;

use chunks::ChunkMap;
use forest::ForestLayout;

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const MAP_WIDTH: i32 = 64;
pub const MAP_HEIGHT: i32 = 48;

/// Seed for the static world and forest layout.
pub const WORLD_SEED: u64 = 6151;

// Tile ids. The three grass variants all count as grass for spawning.
pub const TILE_GRASS: u16 = 0;
pub const TILE_GRASS_MEADOW: u16 = 1;
pub const TILE_GRASS_LUSH: u16 = 2;
pub const TILE_DIRT: u16 = 3;
pub const TILE_ROAD: u16 = 4;
pub const TILE_FLOOR: u16 = 5;

// Farmhouse footprint, inclusive tile bounds.
pub const FARMHOUSE_LEFT: i32 = 6;
pub const FARMHOUSE_RIGHT: i32 = 11;
pub const FARMHOUSE_BOTTOM: i32 = 40;
pub const FARMHOUSE_TOP: i32 = 45;

/// Anchor tile of the general store; its chunk becomes the town region.
pub const GENERAL_STORE_TILE: (i32, i32) = (44, 8);

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TileMap>()
            .init_resource::<ChunkMap>()
            .init_resource::<ForestLayout>()
            .add_systems(OnEnter(GameState::Playing), setup_world)
            .add_systems(
                Update,
                (apply_tile_actions, redraw_changed_tiles, sync_hole_overlays)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // Logical positions become render transforms before Bevy
            // propagates them, so sprites never lag a frame behind.
            .add_systems(
                PostUpdate,
                sync_logical_transforms.before(TransformSystem::TransformPropagate),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The tile grid plus the overlays that affect spawning: which ids count as
/// grass, the custom structure rectangle, and dug holes.
#[derive(Resource, Debug, Clone)]
pub struct TileMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<u16>,
    grass_ids: HashSet<u16>,
    /// Structure rectangle (left, bottom, right, top) excluded from spawning
    /// regardless of the tile ids under it.
    pub custom_rect: Option<(i32, i32, i32, i32)>,
    holes: HashSet<(i32, i32)>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl TileMap {
    /// A map of the given size, filled with plain grass.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tiles: vec![TILE_GRASS; (width.max(0) * height.max(0)) as usize],
            grass_ids: [TILE_GRASS, TILE_GRASS_MEADOW, TILE_GRASS_LUSH]
                .into_iter()
                .collect(),
            custom_rect: None,
            holes: HashSet::new(),
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<u16> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.tiles[(y * self.width + x) as usize])
    }

    /// Sets a tile id. Out of bounds writes are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, id: u16) {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize] = id;
        }
    }

    pub fn is_grass(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y)
            .map(|id| self.grass_ids.contains(&id))
            .unwrap_or(false)
    }

    pub fn is_custom_overlay_tile(&self, x: i32, y: i32) -> bool {
        match self.custom_rect {
            Some((left, bottom, right, top)) => {
                x >= left && x <= right && y >= bottom && y <= top
            }
            None => false,
        }
    }

    pub fn has_hole(&self, x: i32, y: i32) -> bool {
        self.holes.contains(&(x, y))
    }

    pub fn dig_hole(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            self.holes.insert((x, y));
        }
    }

    pub fn fill_hole(&mut self, x: i32, y: i32) -> bool {
        self.holes.remove(&(x, y))
    }

    /// Tills a grass tile into dirt. Returns false on anything else.
    pub fn hoe_tile(&mut self, x: i32, y: i32) -> bool {
        if self.is_grass(x, y) {
            self.set_tile(x, y, TILE_DIRT);
            true
        } else {
            false
        }
    }

    /// Turns a tilled tile back into plain grass.
    pub fn restore_tile(&mut self, x: i32, y: i32) -> bool {
        if self.tile_at(x, y) == Some(TILE_DIRT) {
            self.set_tile(x, y, TILE_GRASS);
            self.fill_hole(x, y);
            true
        } else {
            false
        }
    }

    pub fn hole_tiles(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.holes.iter().copied()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// Marker on ground tile sprites, carrying the grid position for redraws.
#[derive(Component, Debug)]
pub struct GroundTile {
    pub tile_x: i32,
    pub tile_y: i32,
}

/// Overlay sprite for a dug hole.
#[derive(Component, Debug)]
pub struct GroundHole {
    pub tile_x: i32,
    pub tile_y: i32,
}

// ═══════════════════════════════════════════════════════════════════════
// TILE COLORS
// ═══════════════════════════════════════════════════════════════════════

fn tile_color(id: u16) -> Color {
    match id {
        TILE_GRASS => Color::srgb(0.3, 0.72, 0.32),
        TILE_GRASS_MEADOW => Color::srgb(0.34, 0.76, 0.36),
        TILE_GRASS_LUSH => Color::srgb(0.26, 0.66, 0.3),
        TILE_DIRT => Color::srgb(0.6, 0.45, 0.3),
        TILE_ROAD => Color::srgb(0.7, 0.65, 0.5),
        TILE_FLOOR => Color::srgb(0.65, 0.5, 0.3),
        _ => Color::srgb(0.08, 0.08, 0.1),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD GENERATION
// ═══════════════════════════════════════════════════════════════════════

/// Builds the static world: grass with seeded variety, the east-west road,
/// the farmhouse, and the roadside stand plot with its path stub.
pub fn generate_world(seed: u64) -> TileMap {
    let mut map = TileMap::new(MAP_WIDTH, MAP_HEIGHT);
    let mut rng = StdRng::seed_from_u64(seed);

    for y in 0..MAP_HEIGHT {
        for x in 0..MAP_WIDTH {
            let id = match rng.gen_range(0..10) {
                0..=6 => TILE_GRASS,
                7..=8 => TILE_GRASS_MEADOW,
                _ => TILE_GRASS_LUSH,
            };
            map.set_tile(x, y, id);
        }
    }

    for x in 0..MAP_WIDTH {
        map.set_tile(x, ROAD_TILE_Y, TILE_ROAD);
    }

    for y in FARMHOUSE_BOTTOM..=FARMHOUSE_TOP {
        for x in FARMHOUSE_LEFT..=FARMHOUSE_RIGHT {
            map.set_tile(x, y, TILE_FLOOR);
        }
    }
    map.custom_rect = Some((FARMHOUSE_LEFT, FARMHOUSE_BOTTOM, FARMHOUSE_RIGHT, FARMHOUSE_TOP));

    // Counter row is floor, the strip in front is packed path so travelers
    // queue on clear ground.
    for i in 0..STAND_SLOTS as i32 {
        map.set_tile(STAND_TILE_X + i, STAND_TILE_Y, TILE_FLOOR);
        map.set_tile(STAND_TILE_X + i, STAND_TILE_Y + 1, TILE_ROAD);
    }

    map
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Generates the world and forest, then spawns the ground and decor sprites.
/// Runs once when the game enters Playing.
pub fn setup_world(
    mut commands: Commands,
    mut map: ResMut<TileMap>,
    chunks: Res<ChunkMap>,
    mut forest: ResMut<ForestLayout>,
) {
    *map = generate_world(WORLD_SEED);
    let town_chunk = ChunkMap::snap_to_chunk(GENERAL_STORE_TILE.0, GENERAL_STORE_TILE.1);
    *forest = ForestLayout::generate(&map, &chunks, town_chunk, WORLD_SEED);

    for y in 0..map.height {
        for x in 0..map.width {
            let Some(id) = map.tile_at(x, y) else {
                continue;
            };
            let center = grid_to_world_center(x, y);
            commands.spawn((
                Sprite::from_color(tile_color(id), Vec2::new(TILE_SIZE, TILE_SIZE)),
                Transform::from_translation(center.extend(Z_GROUND)),
                GroundTile { tile_x: x, tile_y: y },
            ));
        }
    }

    // Farmhouse roof over the floor rectangle.
    let house_w = (FARMHOUSE_RIGHT - FARMHOUSE_LEFT + 1) as f32 * TILE_SIZE;
    let house_h = (FARMHOUSE_TOP - FARMHOUSE_BOTTOM + 1) as f32 * TILE_SIZE;
    let house_center = Vec2::new(
        (FARMHOUSE_LEFT + FARMHOUSE_RIGHT + 1) as f32 * 0.5 * TILE_SIZE,
        (FARMHOUSE_BOTTOM + FARMHOUSE_TOP + 1) as f32 * 0.5 * TILE_SIZE,
    );
    commands.spawn((
        Sprite::from_color(Color::srgb(0.52, 0.3, 0.22), Vec2::new(house_w, house_h)),
        Transform::from_translation(house_center.extend(Z_GROUND_OVERLAY)),
    ));

    for &(x, y) in &forest.trunk_tiles {
        let pos = grid_to_world_center(x, y);
        commands.spawn((
            Sprite::from_color(Color::srgb(0.35, 0.24, 0.14), Vec2::new(10.0, 14.0)),
            Transform::from_xyz(pos.x, pos.y, Z_ENTITY_BASE),
            LogicalPosition(pos),
            YSorted,
        ));
    }
    for &(x, y) in &forest.pocket_tiles {
        let center = grid_to_world_center(x, y);
        commands.spawn((
            Sprite::from_color(Color::srgb(0.22, 0.5, 0.26), Vec2::new(14.0, 14.0)),
            Transform::from_translation(center.extend(Z_GROUND_OVERLAY)),
        ));
    }

    info!(
        "[World] Map {}x{} ready ({} forest tiles, {} trunks, {} pockets)",
        map.width,
        map.height,
        forest.grass_tiles.len(),
        forest.trunk_tiles.len(),
        forest.pocket_tiles.len()
    );
}

/// Applies hoe actions to the map. Hoeing fills a hole first, then toggles
/// grass and dirt. Every successful edit raises a TileChangedEvent.
pub fn apply_tile_actions(
    mut actions: EventReader<TileActionEvent>,
    mut map: ResMut<TileMap>,
    mut changed: EventWriter<TileChangedEvent>,
) {
    for action in actions.read() {
        if action.tool != ToolKind::Hoe {
            continue;
        }
        let (x, y) = (action.tile_x, action.tile_y);
        let edited = if map.fill_hole(x, y) {
            info!("[World] Filled hole at ({}, {})", x, y);
            true
        } else if map.hoe_tile(x, y) {
            info!("[World] Tilled ({}, {})", x, y);
            true
        } else if map.restore_tile(x, y) {
            info!("[World] Restored ({}, {})", x, y);
            true
        } else {
            false
        };
        if edited {
            changed.send(TileChangedEvent { tile_x: x, tile_y: y });
        }
    }
}

/// Recolors ground sprites for tiles that changed this frame.
fn redraw_changed_tiles(
    mut changes: EventReader<TileChangedEvent>,
    map: Res<TileMap>,
    mut tiles: Query<(&GroundTile, &mut Sprite)>,
) {
    if changes.is_empty() {
        return;
    }
    let edited: HashSet<(i32, i32)> = changes.read().map(|e| (e.tile_x, e.tile_y)).collect();
    for (tile, mut sprite) in tiles.iter_mut() {
        if edited.contains(&(tile.tile_x, tile.tile_y)) {
            if let Some(id) = map.tile_at(tile.tile_x, tile.tile_y) {
                sprite.color = tile_color(id);
            }
        }
    }
}

/// Reconciles hole overlay sprites with the map's hole set whenever tiles
/// change. Mining digs holes; hoeing fills them.
fn sync_hole_overlays(
    mut commands: Commands,
    mut changes: EventReader<TileChangedEvent>,
    map: Res<TileMap>,
    overlays: Query<(Entity, &GroundHole)>,
) {
    if changes.is_empty() {
        return;
    }
    changes.clear();

    let mut present: HashSet<(i32, i32)> = HashSet::new();
    for (entity, hole) in &overlays {
        if map.has_hole(hole.tile_x, hole.tile_y) {
            present.insert((hole.tile_x, hole.tile_y));
        } else {
            commands.entity(entity).despawn();
        }
    }
    for (x, y) in map.hole_tiles() {
        if present.contains(&(x, y)) {
            continue;
        }
        let center = grid_to_world_center(x, y);
        commands.spawn((
            Sprite::from_color(Color::srgb(0.28, 0.2, 0.12), Vec2::new(10.0, 8.0)),
            Transform::from_translation(center.extend(Z_GROUND_OVERLAY)),
            GroundHole { tile_x: x, tile_y: y },
        ));
    }
}

/// Copies logical positions into transforms. Y-sorted entities get a depth
/// derived from their y so southern sprites draw over northern ones.
fn sync_logical_transforms(
    mut movers: Query<(&LogicalPosition, &mut Transform, Option<&YSorted>)>,
) {
    for (pos, mut transform, sorted) in movers.iter_mut() {
        transform.translation.x = pos.0.x;
        transform.translation.y = pos.0.y;
        if sorted.is_some() {
            transform.translation.z = Z_ENTITY_BASE - pos.0.y * Z_Y_SORT_SCALE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hoe_toggles_grass_and_dirt() {
        let mut map = TileMap::new(8, 8);
        assert!(map.is_grass(2, 2));
        assert!(map.hoe_tile(2, 2));
        assert_eq!(map.tile_at(2, 2), Some(TILE_DIRT));
        assert!(!map.hoe_tile(2, 2));
        assert!(map.restore_tile(2, 2));
        assert!(map.is_grass(2, 2));
        assert!(!map.restore_tile(2, 2));
    }

    #[test]
    fn holes_fill_once() {
        let mut map = TileMap::new(8, 8);
        map.dig_hole(3, 3);
        assert!(map.has_hole(3, 3));
        assert!(map.fill_hole(3, 3));
        assert!(!map.fill_hole(3, 3));
    }

    #[test]
    fn out_of_bounds_reads_and_writes_are_inert() {
        let mut map = TileMap::new(4, 4);
        assert_eq!(map.tile_at(-1, 0), None);
        assert_eq!(map.tile_at(4, 0), None);
        map.set_tile(9, 9, TILE_ROAD);
        assert!(!map.is_grass(9, 9));
        assert!(!map.hoe_tile(9, 9));
    }

    #[test]
    fn generated_world_has_road_house_and_stand_plot() {
        let map = generate_world(WORLD_SEED);
        for x in 0..MAP_WIDTH {
            assert_eq!(map.tile_at(x, ROAD_TILE_Y), Some(TILE_ROAD));
        }
        assert_eq!(map.tile_at(FARMHOUSE_LEFT, FARMHOUSE_BOTTOM), Some(TILE_FLOOR));
        assert!(map.is_custom_overlay_tile(FARMHOUSE_LEFT, FARMHOUSE_BOTTOM));
        assert!(!map.is_custom_overlay_tile(FARMHOUSE_LEFT - 1, FARMHOUSE_BOTTOM));
        for i in 0..STAND_SLOTS as i32 {
            assert_eq!(map.tile_at(STAND_TILE_X + i, STAND_TILE_Y), Some(TILE_FLOOR));
            assert!(!map.is_grass(STAND_TILE_X + i, STAND_TILE_Y + 1));
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_world(41);
        let b = generate_world(41);
        for y in 0..MAP_HEIGHT {
            for x in 0..MAP_WIDTH {
                assert_eq!(a.tile_at(x, y), b.tile_at(x, y));
            }
        }
    }
}
