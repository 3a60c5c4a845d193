//! The roadside stand: listing items, withdrawing them, collecting earnings.

use bevy::prelude::*;

use crate::shared::*;

/// Marker for the per-slot display markers above the counter.
#[derive(Component, Debug)]
pub struct StandSlotSprite {
    pub slot: usize,
}

/// Spawns the counter board plus one display marker per slot. Markers stay
/// fully transparent until something is listed.
pub fn spawn_stand_sprites(mut commands: Commands, stand: Res<RoadsideStand>) {
    let board_center = Vec2::new(
        (stand.tile_x as f32 + STAND_SLOTS as f32 * 0.5) * TILE_SIZE,
        (stand.tile_y as f32 + 0.5) * TILE_SIZE,
    );
    let board_z = Z_ENTITY_BASE - board_center.y * Z_Y_SORT_SCALE;
    commands.spawn((
        Sprite::from_color(
            Color::srgb(0.5, 0.36, 0.2),
            Vec2::new(STAND_SLOTS as f32 * TILE_SIZE, TILE_SIZE),
        ),
        Transform::from_translation(board_center.extend(board_z)),
    ));

    for slot in 0..STAND_SLOTS {
        let pos = Vec2::new(stand.slot_world_x(slot), board_center.y + 3.0);
        commands.spawn((
            Sprite::from_color(Color::srgba(1.0, 1.0, 1.0, 0.0), Vec2::new(8.0, 8.0)),
            Transform::from_translation(pos.extend(board_z + 0.001)),
            StandSlotSprite { slot },
        ));
    }

    info!(
        "[Economy] Roadside stand ready at ({}, {})",
        stand.tile_x, stand.tile_y
    );
}

fn listing_color(registry: &ItemRegistry, id: &str) -> Color {
    match registry.get(id).map(|def| def.category) {
        Some(ItemCategory::Flower) => Color::srgb(0.92, 0.7, 0.85),
        Some(ItemCategory::Forage) => Color::srgb(0.55, 0.75, 0.4),
        Some(ItemCategory::Ore) => Color::srgb(0.75, 0.68, 0.52),
        Some(ItemCategory::Material) => Color::srgb(0.6, 0.6, 0.62),
        None => Color::srgb(0.9, 0.9, 0.9),
    }
}

/// Refreshes the slot markers whenever the stand changes.
pub fn update_stand_display(
    stand: Res<RoadsideStand>,
    registry: Res<ItemRegistry>,
    mut markers: Query<(&StandSlotSprite, &mut Sprite)>,
) {
    if !stand.is_changed() {
        return;
    }
    for (marker, mut sprite) in markers.iter_mut() {
        match stand.slots[marker.slot].as_deref() {
            Some(id) => sprite.color = listing_color(&registry, id).with_alpha(1.0),
            None => {
                let faded = sprite.color.with_alpha(0.0);
                sprite.color = faded;
            }
        }
    }
}

/// First sellable stack in inventory order; unsellable items are skipped.
pub fn next_sellable(inventory: &Inventory, registry: &ItemRegistry) -> Option<ItemId> {
    inventory
        .slots
        .iter()
        .flatten()
        .find(|slot| registry.sell_price(&slot.item_id).is_some())
        .map(|slot| slot.item_id.clone())
}

/// Hand interactions with the counter. Earnings are collected first; after
/// that each tap toggles its slot between listed and withdrawn.
pub fn handle_stand_interactions(
    mut actions: EventReader<TileActionEvent>,
    mut stand: ResMut<RoadsideStand>,
    mut inventory: ResMut<Inventory>,
    registry: Res<ItemRegistry>,
    mut gold_events: EventWriter<GoldChangeEvent>,
) {
    for action in actions.read() {
        if action.tool != ToolKind::Hand {
            continue;
        }
        if !stand.contains_slot_tile(action.tile_x, action.tile_y) {
            continue;
        }

        if stand.gold_earned > 0 {
            let amount = stand.gold_earned;
            stand.gold_earned = 0;
            gold_events.send(GoldChangeEvent {
                amount: amount as i32,
                reason: "stand earnings".to_string(),
            });
            info!("[Economy] Collected {}g from the stand", amount);
            continue;
        }

        let slot = (action.tile_x - stand.tile_x) as usize;
        match stand.slots[slot].take() {
            Some(id) => {
                if inventory.try_add(&id, 1, &registry) {
                    info!("[Economy] Withdrew {} from slot {}", id, slot);
                } else {
                    warn!("[Economy] Inventory full; {} stays listed", id);
                    stand.slots[slot] = Some(id);
                }
            }
            None => {
                let Some(id) = next_sellable(&inventory, &registry) else {
                    info!("[Economy] Nothing sellable to list");
                    continue;
                };
                if inventory.try_remove(&id, 1) {
                    stand.slots[slot] = Some(id.clone());
                    info!("[Economy] Listed {} in slot {}", id, slot);
                }
            }
        }
    }
}
