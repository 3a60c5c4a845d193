use bevy::prelude::*;
use crate::shared::*;

/// Drain `ItemPickupEvent`s into the inventory. Overflow that does not fit
/// is dropped with a warning.
pub fn add_items_to_inventory(
    mut pickups: EventReader<ItemPickupEvent>,
    mut inventory: ResMut<Inventory>,
    registry: Res<ItemRegistry>,
) {
    for pickup in pickups.read() {
        if inventory.try_add(&pickup.item_id, pickup.quantity, &registry) {
            debug!(
                "[Player] Picked up {}x {}",
                pickup.quantity, pickup.item_id
            );
        } else {
            warn!(
                "[Player] Inventory full; {}x {} lost",
                pickup.quantity, pickup.item_id
            );
        }
    }
}
