//! Mining domain plugin for Fernvale.
//!
//! Provides:
//! - Deterministic ore vein seeding over forest resource pockets
//! - Pickaxe mining: one ore per swing, staged visuals, depletion
//! - Dug-out ground left behind by exhausted veins
//! - Vein fade-out and removal

pub mod veins;

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::shared::*;
use crate::world::forest::ForestLayout;
use crate::world::{TileMap, WORLD_SEED};

use veins::{OreVein, VeinStage, VEIN_FADE_MS};

/// Upper bound on seeded veins.
pub const MAX_VEINS: usize = 24;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct MiningPlugin;

impl Plugin for MiningPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(GameState::Playing),
            seed_ore_veins.after(crate::world::setup_world),
        )
        .add_systems(
            Update,
            (apply_pickaxe_actions, update_vein_sprites, fade_depleted_veins)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SEEDING
// ═══════════════════════════════════════════════════════════════════════

fn roll_ore_kind(rng: &mut impl Rng) -> ItemId {
    match rng.gen_range(0..10) {
        0..=4 => "copper_ore".to_string(),
        5..=7 => "iron_ore".to_string(),
        _ => "silver_ore".to_string(),
    }
}

fn vein_color(vein: &OreVein) -> Color {
    let (r, g, b) = match vein.resource_id.as_str() {
        "iron_ore" => (0.7, 0.72, 0.75),
        "silver_ore" => (0.85, 0.88, 0.92),
        _ => (0.78, 0.5, 0.3),
    };
    let dim = match vein.stage() {
        VeinStage::Full => 1.0,
        VeinStage::Partial => 0.78,
        VeinStage::Depleted => 0.55,
        VeinStage::Gone => 0.4,
    };
    Color::srgb(r * dim, g * dim, b * dim)
}

/// Places veins on forest resource pockets. Pocket order is sorted before
/// shuffling so the layout is stable run to run.
fn seed_ore_veins(mut commands: Commands, forest: Res<ForestLayout>, mut ore: ResMut<OreIndex>) {
    let mut rng = StdRng::seed_from_u64(WORLD_SEED.wrapping_mul(31).wrapping_add(17));
    let mut anchors: Vec<(i32, i32)> = forest.pocket_tiles.iter().copied().collect();
    anchors.sort_unstable();
    anchors.shuffle(&mut rng);

    let mut seeded = 0;
    for (x, y) in anchors {
        if seeded >= MAX_VEINS {
            break;
        }
        let footprint = vein_footprint(x, y);
        let clear = footprint.iter().all(|&(fx, fy)| {
            forest.is_forest_tile(fx, fy)
                && !forest.trunk_tiles.contains(&(fx, fy))
                && ore.vein_at(fx, fy).is_none()
        });
        if !clear {
            continue;
        }

        let vein = OreVein::new(x, y, roll_ore_kind(&mut rng));
        let center = grid_to_world_center(x, y) + Vec2::splat(TILE_SIZE * 0.5);
        let entity = commands
            .spawn((
                Sprite::from_color(vein_color(&vein), Vec2::splat(TILE_SIZE * 2.0 - 4.0)),
                Transform::from_translation(center.extend(
                    Z_ENTITY_BASE - center.y * Z_Y_SORT_SCALE,
                )),
                vein,
            ))
            .id();
        ore.insert_footprint(x, y, entity);
        seeded += 1;
    }
    info!("[Mining] Seeded {} ore veins", seeded);
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Pickaxe swings against veins. Depletion frees the footprint from the
/// index and leaves dug holes behind on those tiles.
fn apply_pickaxe_actions(
    mut actions: EventReader<TileActionEvent>,
    mut ore: ResMut<OreIndex>,
    mut map: ResMut<TileMap>,
    mut vein_query: Query<&mut OreVein>,
    mut pickups: EventWriter<ItemPickupEvent>,
    mut changed: EventWriter<TileChangedEvent>,
) {
    for action in actions.read() {
        if action.tool != ToolKind::Pickaxe {
            continue;
        }
        let Some(entity) = ore.vein_at(action.tile_x, action.tile_y) else {
            continue;
        };
        let Ok(mut vein) = vein_query.get_mut(entity) else {
            continue;
        };
        let outcome = vein.mine();
        let Some(item_id) = outcome.ore else {
            continue;
        };
        pickups.send(ItemPickupEvent {
            item_id,
            quantity: 1,
        });
        if outcome.stage_changed {
            info!(
                "[Mining] Vein at ({}, {}) is now {:?}",
                vein.tile_x,
                vein.tile_y,
                vein.stage()
            );
        }
        if outcome.depleted {
            ore.remove_footprint(vein.tile_x, vein.tile_y);
            for (x, y) in vein_footprint(vein.tile_x, vein.tile_y) {
                map.dig_hole(x, y);
                changed.send(TileChangedEvent { tile_x: x, tile_y: y });
            }
            info!("[Mining] Vein at ({}, {}) ran dry", vein.tile_x, vein.tile_y);
        }
    }
}

/// Recolors vein sprites when their stage moves. Fading husks are left to
/// the fade system.
fn update_vein_sprites(mut vein_query: Query<(&OreVein, &mut Sprite), Changed<OreVein>>) {
    for (vein, mut sprite) in vein_query.iter_mut() {
        if vein.remaining == 0 {
            continue;
        }
        sprite.color = vein_color(vein);
    }
}

/// Fades exhausted veins to nothing, then despawns them.
fn fade_depleted_veins(
    mut commands: Commands,
    time: Res<Time>,
    mut vein_query: Query<(Entity, &mut OreVein, &mut Sprite)>,
) {
    let dt_ms = time.delta_secs() * 1000.0;
    for (entity, mut vein, mut sprite) in vein_query.iter_mut() {
        if vein.remaining > 0 {
            continue;
        }
        vein.fade_ms -= dt_ms;
        if vein.fade_ms <= 0.0 {
            commands.entity(entity).despawn();
        } else {
            let alpha = (vein.fade_ms / VEIN_FADE_MS).clamp(0.0, 1.0);
            sprite.color = sprite.color.with_alpha(alpha);
        }
    }
}
