//! Probabilistic spawn scheduling for flowers and weeds.
//!
//! The spawner converts the per-tile rate into an average interval between
//! attempts, accumulates frame time against it, and drains whole intervals
//! as attempts. Each attempt passes a two-stage random gate, picks a kind,
//! then hunts for a free tile with a bounded number of placement tries.

use bevy::prelude::*;
use rand::prelude::*;

use crate::shared::*;
use crate::world::chunks::ChunkMap;
use crate::world::forest::ForestLayout;
use crate::world::regions::{self, AreaOrigin, SpawnContext};
use crate::world::TileMap;

use super::density::{self, GrassTileCache};
use super::flowers::{self, Flower};
use super::weeds::{self, Weed};

/// Placement tries per attempt before giving up silently.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;

/// Intervals drained from a single frame, so a long hitch cannot dump an
/// unbounded burst of flora at once.
pub const MAX_INTERVALS_PER_TICK: u32 = 64;

#[derive(Resource, Debug, Default)]
pub struct FloraSpawner {
    pub timer_ms: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloraKind {
    Flower,
    Weed,
}

/// Accumulates frame time and drains whole attempt intervals from it.
pub fn drain_intervals(spawner: &mut FloraSpawner, dt_ms: f32, avg_interval_ms: f32) -> u32 {
    if avg_interval_ms <= 0.0 {
        spawner.timer_ms = 0.0;
        return 0;
    }
    spawner.timer_ms += dt_ms;
    let mut intervals = 0;
    while spawner.timer_ms >= avg_interval_ms {
        spawner.timer_ms -= avg_interval_ms;
        intervals += 1;
        if intervals >= MAX_INTERVALS_PER_TICK {
            spawner.timer_ms = 0.0;
            break;
        }
    }
    intervals
}

/// The two-stage spawn gate. The threshold is itself random in [0.5, 1.0)
/// and a second roll must land under it; survivors split 75/25 into weeds
/// and flowers.
pub fn roll_attempt(rng: &mut impl Rng) -> Option<FloraKind> {
    let gate = 0.5 + rng.gen::<f32>() * 0.5;
    if rng.gen::<f32>() >= gate {
        return None;
    }
    if rng.gen::<f32>() < 0.75 {
        Some(FloraKind::Weed)
    } else {
        Some(FloraKind::Flower)
    }
}

/// Picks a spawn tile, weighting the forest carpet against the farm and
/// town rectangles by tile count. Returns None when every try lands on an
/// occupied or invalid tile.
pub fn pick_spawn_tile(ctx: &SpawnContext, rng: &mut impl Rng) -> Option<(i32, i32)> {
    let forest_pool = ctx.forest.map(|f| f.grass_tiles.len()).unwrap_or(0);
    let main_pool: usize = ctx
        .areas
        .iter()
        .filter(|a| a.origin != AreaOrigin::Forest)
        .map(|a| a.tile_count())
        .sum();
    let total = forest_pool + main_pool;
    if total == 0 {
        return None;
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let roll = rng.gen_range(0..total);
        if roll < forest_pool {
            let forest = ctx.forest?;
            let (x, y) = forest.grass_tiles[rng.gen_range(0..forest.grass_tiles.len())];
            if regions::is_valid_spawn_tile(x, y, true, ctx) {
                return Some((x, y));
            }
        } else {
            let mut pick = roll - forest_pool;
            for area in ctx.areas.iter().filter(|a| a.origin != AreaOrigin::Forest) {
                let count = area.tile_count();
                if pick < count {
                    let x = area.left + rng.gen_range(0..area.width().max(1));
                    let y = area.bottom + rng.gen_range(0..area.height().max(1));
                    if regions::is_valid_spawn_tile(x, y, false, ctx) {
                        return Some((x, y));
                    }
                    break;
                }
                pick -= count;
            }
        }
    }
    None
}

/// Per-frame spawn tick. Occupancy collaborators are optional resources;
/// a missing one simply skips its exclusion rule.
#[allow(clippy::too_many_arguments)]
pub fn flora_spawn_tick(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<SpawnTuning>,
    map: Res<TileMap>,
    chunks: Option<Res<ChunkMap>>,
    forest: Option<Res<ForestLayout>>,
    crops: Option<Res<CropState>>,
    trees: Option<Res<TreeState>>,
    ore: Option<Res<OreIndex>>,
    enemies: Option<Res<EnemyIndex>>,
    mut flora: ResMut<FloraIndex>,
    mut cache: ResMut<GrassTileCache>,
    mut spawner: ResMut<FloraSpawner>,
    flower_query: Query<&Flower>,
    weed_query: Query<&Weed>,
) {
    let dt_ms = time.delta_secs() * 1000.0;
    cache.tick(dt_ms);

    let areas = regions::spawn_areas(&map, chunks.as_deref());
    let grass = cache.count(&map, &areas, forest.as_deref());
    if grass == 0 {
        spawner.timer_ms = 0.0;
        return;
    }

    // Only upright flora counts toward density; fading husks still hold
    // their tile but no longer suppress new growth.
    let active = flower_query.iter().filter(|f| f.is_active()).count()
        + weed_query.iter().filter(|w| w.is_active()).count();
    let multiplier = density::spawn_probability_multiplier(active, grass);
    let attempts_per_ms = tuning.spawn_rate_per_tile * multiplier * grass as f32;
    if attempts_per_ms <= 0.0 {
        spawner.timer_ms = 0.0;
        return;
    }
    let avg_interval_ms = 1.0 / attempts_per_ms;

    let intervals = drain_intervals(&mut spawner, dt_ms, avg_interval_ms);
    if intervals == 0 {
        return;
    }

    let mut live = flower_query.iter().count() + weed_query.iter().count();
    let mut rng = thread_rng();
    for _ in 0..intervals {
        if live >= tuning.max_flora {
            continue;
        }
        let Some(kind) = roll_attempt(&mut rng) else {
            continue;
        };
        let picked = {
            let ctx = SpawnContext {
                map: &map,
                areas: &areas,
                flora: &flora,
                forest: forest.as_deref(),
                crops: crops.as_deref(),
                trees: trees.as_deref(),
                ore: ore.as_deref(),
                enemies: enemies.as_deref(),
            };
            pick_spawn_tile(&ctx, &mut rng)
        };
        let Some((x, y)) = picked else {
            continue;
        };
        match kind {
            FloraKind::Flower => {
                let entity = flowers::spawn_flower(&mut commands, x, y, &mut rng);
                flora.flowers.insert((x, y), entity);
                debug!("[Flora] Flower sprouted at ({}, {})", x, y);
            }
            FloraKind::Weed => {
                let entity = weeds::spawn_weed(&mut commands, x, y);
                flora.weeds.insert((x, y), entity);
                debug!("[Flora] Weed sprouted at ({}, {})", x, y);
            }
        }
        live += 1;
    }
}
