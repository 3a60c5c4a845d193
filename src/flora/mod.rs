//! Flora domain plugin for Fernvale.
//!
//! Responsible for:
//! - Scheduling probabilistic flower and weed spawns, density-adapted
//! - Harvesting flowers and clicking down weeds with the hand tool
//! - Weed growth stages and click splash particles
//! - Fade-out and removal of spent flora
//!
//! A tile stays occupied in the index until its flora finishes fading, so
//! nothing ever spawns on top of a husk.

use bevy::prelude::*;
use rand::prelude::*;

use crate::shared::*;

pub mod density;
pub mod flowers;
pub mod scheduler;
pub mod weeds;

use flowers::Flower;
use weeds::Weed;

/// Fade duration for harvested flowers and removed weeds.
pub const FLORA_FADE_MS: f32 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloraStatus {
    Active,
    FadingOut,
    Gone,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct FloraPlugin;

impl Plugin for FloraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<scheduler::FloraSpawner>()
            .init_resource::<density::GrassTileCache>()
            .add_systems(
                Update,
                (
                    // Edits invalidate the grass count before the spawner
                    // reads it.
                    (
                        density::invalidate_grass_cache_on_edit,
                        scheduler::flora_spawn_tick,
                    )
                        .chain(),
                    handle_hand_actions,
                    weeds::weed_growth,
                    update_weed_sprites,
                    fade_out_flora,
                    weeds::update_splash_particles,
                    cleanup_gone_flora,
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Hand tool interactions: pick a flower, or click a weed down a stage.
/// Flowers yield their species item; a cleared weed yields fiber.
fn handle_hand_actions(
    mut commands: Commands,
    mut actions: EventReader<TileActionEvent>,
    flora: Res<FloraIndex>,
    mut flower_query: Query<&mut Flower>,
    mut weed_query: Query<(&mut Weed, &LogicalPosition)>,
    mut pickups: EventWriter<ItemPickupEvent>,
) {
    let mut rng = thread_rng();
    for action in actions.read() {
        if action.tool != ToolKind::Hand {
            continue;
        }
        let (x, y) = (action.tile_x, action.tile_y);

        if let Some(entity) = flora.flower_at(x, y) {
            if let Ok(mut flower) = flower_query.get_mut(entity) {
                if let Some(item_id) = flower.harvest() {
                    pickups.send(ItemPickupEvent {
                        item_id: item_id.clone(),
                        quantity: 1,
                    });
                    info!("[Flora] Picked {} at ({}, {})", item_id, x, y);
                }
            }
            continue;
        }

        if let Some(entity) = flora.weed_at(x, y) {
            if let Ok((mut weed, pos)) = weed_query.get_mut(entity) {
                if !weed.is_active() {
                    continue;
                }
                weeds::spawn_click_splash(&mut commands, pos.0, &mut rng);
                if weed.click() {
                    pickups.send(ItemPickupEvent {
                        item_id: "fiber".to_string(),
                        quantity: 1,
                    });
                    info!("[Flora] Cleared weed at ({}, {})", x, y);
                }
            }
        }
    }
}

/// Resizes and recolors weed sprites when their stage changes.
fn update_weed_sprites(mut weed_query: Query<(&Weed, &mut Sprite), Changed<Weed>>) {
    for (weed, mut sprite) in weed_query.iter_mut() {
        if weed.status != FloraStatus::Active {
            continue;
        }
        sprite.color = weeds::weed_color(weed.stage);
        sprite.custom_size = Some(weeds::weed_size(weed.stage));
    }
}

/// Runs the fade timers on spent flora and marks them Gone at zero alpha.
fn fade_out_flora(
    time: Res<Time>,
    mut flower_query: Query<(&mut Flower, &mut Sprite), Without<Weed>>,
    mut weed_query: Query<(&mut Weed, &mut Sprite), Without<Flower>>,
) {
    let dt_ms = time.delta_secs() * 1000.0;

    for (mut flower, mut sprite) in flower_query.iter_mut() {
        if flower.status != FloraStatus::FadingOut {
            continue;
        }
        flower.fade_ms -= dt_ms;
        if flower.fade_ms <= 0.0 {
            flower.status = FloraStatus::Gone;
            sprite.color = sprite.color.with_alpha(0.0);
        } else {
            let alpha = (flower.fade_ms / FLORA_FADE_MS).clamp(0.0, 1.0);
            sprite.color = sprite.color.with_alpha(alpha);
        }
    }

    for (mut weed, mut sprite) in weed_query.iter_mut() {
        if weed.status != FloraStatus::FadingOut {
            continue;
        }
        weed.fade_ms -= dt_ms;
        if weed.fade_ms <= 0.0 {
            weed.status = FloraStatus::Gone;
            sprite.color = sprite.color.with_alpha(0.0);
        } else {
            let alpha = (weed.fade_ms / FLORA_FADE_MS).clamp(0.0, 1.0);
            sprite.color = sprite.color.with_alpha(alpha);
        }
    }
}

/// Despawns Gone flora and releases their tiles from the index.
fn cleanup_gone_flora(
    mut commands: Commands,
    mut flora: ResMut<FloraIndex>,
    flower_query: Query<(Entity, &Flower)>,
    weed_query: Query<(Entity, &Weed)>,
) {
    for (entity, flower) in &flower_query {
        if flower.status != FloraStatus::Gone {
            continue;
        }
        let key = (flower.tile_x, flower.tile_y);
        if flora.flowers.get(&key) == Some(&entity) {
            flora.flowers.remove(&key);
        }
        commands.entity(entity).despawn();
    }
    for (entity, weed) in &weed_query {
        if weed.status != FloraStatus::Gone {
            continue;
        }
        let key = (weed.tile_x, weed.tile_y);
        if flora.weeds.get(&key) == Some(&entity) {
            flora.weeds.remove(&key);
        }
        commands.entity(entity).despawn();
    }
}
