//! Shared components, resources, events, and states for Fernvale.
//!
//! This is the type contract. Every domain plugin imports from here.
//! Domains do not reach into each other's internals except through the
//! types and events defined in this module.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS
// ═══════════════════════════════════════════════════════════════════════

pub type ItemId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Flower,
    Forage,
    Ore,
    Material,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub sell_price: u32, // 0 = not sellable
    pub stack_limit: u8,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    pub items: HashMap<ItemId, ItemDef>,
}

impl ItemRegistry {
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    /// Sell price for an item, or None when the item is unknown or unsellable.
    pub fn sell_price(&self, id: &str) -> Option<u32> {
        self.items
            .get(id)
            .map(|def| def.sell_price)
            .filter(|price| *price > 0)
    }

    /// All item ids with a sell price, sorted for deterministic iteration.
    pub fn sellable_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .items
            .values()
            .filter(|def| def.sell_price > 0)
            .map(|def| def.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySlot {
    pub item_id: ItemId,
    pub quantity: u8,
}

#[derive(Resource, Debug, Clone)]
pub struct Inventory {
    pub slots: Vec<Option<InventorySlot>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: vec![None; TOTAL_INVENTORY_SLOTS],
        }
    }
}

impl Inventory {
    /// Adds items, topping up existing stacks before opening new ones.
    /// Returns false if not everything fit (the overflow is lost; callers
    /// that care check capacity first).
    pub fn try_add(&mut self, item_id: &str, quantity: u8, registry: &ItemRegistry) -> bool {
        let stack_limit = registry
            .get(item_id)
            .map(|def| def.stack_limit)
            .unwrap_or(99);
        let mut remaining = quantity;

        for slot in self.slots.iter_mut().flatten() {
            if slot.item_id == item_id && slot.quantity < stack_limit {
                let moved = (stack_limit - slot.quantity).min(remaining);
                slot.quantity += moved;
                remaining -= moved;
                if remaining == 0 {
                    return true;
                }
            }
        }

        for slot in self.slots.iter_mut() {
            if slot.is_none() {
                let moved = stack_limit.min(remaining);
                *slot = Some(InventorySlot {
                    item_id: item_id.to_string(),
                    quantity: moved,
                });
                remaining -= moved;
                if remaining == 0 {
                    return true;
                }
            }
        }

        remaining == 0
    }

    /// Removes items across stacks. Returns false (and removes nothing) if
    /// the inventory holds fewer than `quantity`.
    pub fn try_remove(&mut self, item_id: &str, quantity: u8) -> bool {
        if self.count(item_id) < quantity as u32 {
            return false;
        }
        let mut remaining = quantity;
        for slot in self.slots.iter_mut() {
            if let Some(stack) = slot {
                if stack.item_id == item_id {
                    let taken = stack.quantity.min(remaining);
                    stack.quantity -= taken;
                    remaining -= taken;
                    if stack.quantity == 0 {
                        *slot = None;
                    }
                    if remaining == 0 {
                        return true;
                    }
                }
            }
        }
        remaining == 0
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.item_id == item_id)
            .map(|slot| slot.quantity as u32)
            .sum()
    }

    pub fn has(&self, item_id: &str, quantity: u8) -> bool {
        self.count(item_id) >= quantity as u32
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Default for Facing {
    fn default() -> Self {
        Facing::Down
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    #[default]
    Hand,
    Hoe,
    Pickaxe,
}

#[derive(Resource, Debug, Clone)]
pub struct PlayerState {
    pub gold: u32,
    pub facing: Facing,
    pub tool: ToolKind,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            gold: 500,
            facing: Facing::Down,
            tool: ToolKind::Hand,
        }
    }
}

/// Marker for the player entity.
#[derive(Component, Debug)]
pub struct Player;

// ═══════════════════════════════════════════════════════════════════════
// GRID & RENDERING
// ═══════════════════════════════════════════════════════════════════════

/// Authoritative world-space position in pixels. A sync system copies this
/// into `Transform` once per frame, applying y-sorting for entities that
/// carry `YSorted`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LogicalPosition(pub Vec2);

/// Entities whose draw order depends on their y position (lower on screen
/// draws on top).
#[derive(Component, Debug)]
pub struct YSorted;

pub fn grid_to_world_center(tile_x: i32, tile_y: i32) -> Vec2 {
    Vec2::new(
        tile_x as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        tile_y as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    )
}

pub fn world_to_grid(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / TILE_SIZE).floor() as i32,
        (pos.y / TILE_SIZE).floor() as i32,
    )
}

// ═══════════════════════════════════════════════════════════════════════
// OCCUPANCY — cross-domain tile indices
// ═══════════════════════════════════════════════════════════════════════

/// Tile index of flowers and weeds. An entry stays in place while its
/// entity fades out and is only removed once despawn happens, so a tile
/// keeps reading occupied until its previous occupant is fully gone.
#[derive(Resource, Debug, Default)]
pub struct FloraIndex {
    pub flowers: HashMap<(i32, i32), Entity>,
    pub weeds: HashMap<(i32, i32), Entity>,
}

impl FloraIndex {
    pub fn flower_at(&self, tile_x: i32, tile_y: i32) -> Option<Entity> {
        self.flowers.get(&(tile_x, tile_y)).copied()
    }

    pub fn weed_at(&self, tile_x: i32, tile_y: i32) -> Option<Entity> {
        self.weeds.get(&(tile_x, tile_y)).copied()
    }

    pub fn occupied(&self, tile_x: i32, tile_y: i32) -> bool {
        self.flowers.contains_key(&(tile_x, tile_y)) || self.weeds.contains_key(&(tile_x, tile_y))
    }
}

/// Tile index of ore veins. Every vein occupies a 2x2 footprint; all four
/// tiles map to the same entity.
#[derive(Resource, Debug, Default)]
pub struct OreIndex {
    pub veins: HashMap<(i32, i32), Entity>,
}

impl OreIndex {
    pub fn vein_at(&self, tile_x: i32, tile_y: i32) -> Option<Entity> {
        self.veins.get(&(tile_x, tile_y)).copied()
    }

    pub fn insert_footprint(&mut self, anchor_x: i32, anchor_y: i32, entity: Entity) {
        for tile in vein_footprint(anchor_x, anchor_y) {
            self.veins.insert(tile, entity);
        }
    }

    pub fn remove_footprint(&mut self, anchor_x: i32, anchor_y: i32) {
        for tile in vein_footprint(anchor_x, anchor_y) {
            self.veins.remove(&tile);
        }
    }
}

/// The four tiles covered by a vein anchored at its lower-left corner.
pub fn vein_footprint(anchor_x: i32, anchor_y: i32) -> [(i32, i32); 4] {
    [
        (anchor_x, anchor_y),
        (anchor_x + 1, anchor_y),
        (anchor_x, anchor_y + 1),
        (anchor_x + 1, anchor_y + 1),
    ]
}

/// Planted crops by tile. Flowers and weeds never spawn on a planted tile.
#[derive(Resource, Debug, Clone, Default)]
pub struct CropState {
    pub crops: HashMap<(i32, i32), ItemId>,
}

impl CropState {
    pub fn crop_at(&self, tile_x: i32, tile_y: i32) -> Option<&ItemId> {
        self.crops.get(&(tile_x, tile_y))
    }
}

/// Tree trunk tiles on the main map.
#[derive(Resource, Debug, Clone, Default)]
pub struct TreeState {
    pub trunks: HashSet<(i32, i32)>,
}

impl TreeState {
    pub fn tree_at(&self, tile_x: i32, tile_y: i32) -> bool {
        self.trunks.contains(&(tile_x, tile_y))
    }
}

/// Tiles currently occupied by enemies.
#[derive(Resource, Debug, Clone, Default)]
pub struct EnemyIndex {
    pub occupied: HashSet<(i32, i32)>,
}

impl EnemyIndex {
    pub fn enemy_at(&self, tile_x: i32, tile_y: i32) -> bool {
        self.occupied.contains(&(tile_x, tile_y))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ROADSIDE STAND
// ═══════════════════════════════════════════════════════════════════════

/// The player's roadside stand: six slots along the road, each holding at
/// most one resource type, plus the gold travelers have paid and the player
/// has not yet collected.
#[derive(Resource, Debug, Clone)]
pub struct RoadsideStand {
    pub slots: [Option<ItemId>; STAND_SLOTS],
    pub tile_x: i32, // leftmost slot tile
    pub tile_y: i32, // stand row, just south of the road
    pub gold_earned: u32,
}

impl Default for RoadsideStand {
    fn default() -> Self {
        Self {
            slots: Default::default(),
            tile_x: STAND_TILE_X,
            tile_y: STAND_TILE_Y,
            gold_earned: 0,
        }
    }
}

impl RoadsideStand {
    /// Ids of everything currently listed, in slot order. May repeat when
    /// two slots hold the same resource.
    pub fn listed_resource_ids(&self) -> Vec<ItemId> {
        self.slots.iter().flatten().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    pub fn first_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// World X of a slot's center, where a buying traveler lines up.
    pub fn slot_world_x(&self, slot: usize) -> f32 {
        (self.tile_x + slot as i32) as f32 * TILE_SIZE + TILE_SIZE / 2.0
    }

    /// World Y travelers stand at while being served: the row between the
    /// stand counter and the road.
    pub fn front_world_y(&self) -> f32 {
        (self.tile_y + 1) as f32 * TILE_SIZE + TILE_SIZE / 2.0
    }

    pub fn contains_slot_tile(&self, tile_x: i32, tile_y: i32) -> bool {
        tile_y == self.tile_y
            && tile_x >= self.tile_x
            && tile_x < self.tile_x + STAND_SLOTS as i32
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN TUNING
// ═══════════════════════════════════════════════════════════════════════

/// Tuning knobs for the spawn and traveler systems. Defaults are the shipped
/// balance; `fernvale.tuning.json` next to the binary overrides them, and
/// tests insert their own values directly.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Spawn events per millisecond per grass tile at zero coverage.
    pub spawn_rate_per_tile: f32,
    /// Hard cap on concurrent flowers + weeds.
    pub max_flora: usize,
    pub traveler_spawn_min_ms: f32,
    pub traveler_spawn_max_ms: f32,
    pub max_travelers: usize,
    pub traveler_gold_min: u32,
    pub traveler_gold_max: u32,
    /// Visit chance when the stand lists neither liked nor all-hated items.
    pub neutral_visit_chance: f32,
    /// Starting buy chance for neutral items, reduced per neutral purchase.
    pub neutral_buy_base: f32,
    pub neutral_buy_decay: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            // One spawn event per 5000 ms per 50 grass tiles at full rate.
            spawn_rate_per_tile: 1.0 / (5000.0 * 50.0),
            max_flora: 100,
            traveler_spawn_min_ms: 18_000.0,
            traveler_spawn_max_ms: 42_000.0,
            max_travelers: 6,
            traveler_gold_min: 30,
            traveler_gold_max: 150,
            neutral_visit_chance: 0.4,
            neutral_buy_base: 0.5,
            neutral_buy_decay: 0.15,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// The player applied a tool to a tile. Emitted by the player domain,
/// consumed by world (hoe), flora (hand), and mining (pickaxe).
#[derive(Event, Debug, Clone)]
pub struct TileActionEvent {
    pub tool: ToolKind,
    pub tile_x: i32,
    pub tile_y: i32,
}

/// A tile's ground state changed (hoed or restored). Invalidates the grass
/// tile cache and triggers a ground redraw.
#[derive(Event, Debug, Clone)]
pub struct TileChangedEvent {
    pub tile_x: i32,
    pub tile_y: i32,
}

#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    pub item_id: ItemId,
    pub quantity: u8,
}

#[derive(Event, Debug, Clone)]
pub struct GoldChangeEvent {
    pub amount: i32, // positive = gain, negative = spend
    pub reason: String,
}

/// A traveler finished approaching the stand (or repositioning to the next
/// slot) and is now waiting to be served.
#[derive(Event, Debug, Clone)]
pub struct TravelerArrivedEvent {
    pub traveler: Entity,
}

/// A traveler completed a purchase at the stand.
#[derive(Event, Debug, Clone)]
pub struct StandSaleEvent {
    pub item_id: ItemId,
    pub price: u32,
    pub slot: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 16.0;
pub const PIXEL_SCALE: f32 = 3.0; // render scale (16px × 3 = 48px on screen)
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

pub const TOTAL_INVENTORY_SLOTS: usize = 24;

pub const STAND_SLOTS: usize = 6;
pub const STAND_TILE_X: i32 = 28;
pub const STAND_TILE_Y: i32 = 10;

/// The road row travelers walk along, west to east across the whole map.
pub const ROAD_TILE_Y: i32 = 12;

pub const WEED_MAX_STAGE: u8 = 3;
pub const VEIN_INITIAL_RESOURCES: u32 = 8;

// Z layers. Entities between Z_ENTITY_BASE and Z_EFFECTS are y-sorted.
pub const Z_GROUND: f32 = 0.0;
pub const Z_GROUND_OVERLAY: f32 = 1.0;
pub const Z_ENTITY_BASE: f32 = 10.0;
pub const Z_EFFECTS: f32 = 40.0;
pub const Z_Y_SORT_SCALE: f32 = 0.001;
