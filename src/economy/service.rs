//! Stand service: the negotiation loop between waiting travelers and the
//! listed slots.
//!
//! A traveler arriving at the counter opens a short service window. When it
//! closes the slot sells, the traveler is steered to its next wanted slot,
//! and the walk resumes once the itinerary is spent. Slots emptied while
//! the traveler was en route are skipped without payment.

use bevy::prelude::*;

use crate::shared::*;
use crate::travelers::{StandVisit, Traveler, TravelerPhase, TravelerTastes};

/// How long one sale takes at the counter.
pub const STAND_SERVICE_MS: f32 = 1200.0;

#[derive(Debug)]
pub struct PendingSale {
    pub traveler: Entity,
    pub slot: usize,
    pub remaining_ms: f32,
}

#[derive(Resource, Debug, Default)]
pub struct StandServiceQueue {
    pub pending: Vec<PendingSale>,
}

/// Steers a served traveler onward: to its next wanted slot, or back to the
/// road with the itinerary finished.
fn steer_onward(
    commands: &mut Commands,
    entity: Entity,
    traveler: &Traveler,
    phase: &mut TravelerPhase,
    visit: &mut StandVisit,
    stand: &RoadsideStand,
) {
    visit.advance();
    match visit.current_slot() {
        Some(next) => {
            phase.move_to_next_slot(stand.slot_world_x(next));
        }
        None => {
            phase.resume_walking(traveler.path_y);
            commands.entity(entity).remove::<StandVisit>();
        }
    }
}

/// Handles arrival callbacks from the movement machine. A stocked slot
/// opens a service window; an emptied one sends the traveler onward.
pub fn queue_arrivals(
    mut commands: Commands,
    mut arrivals: EventReader<TravelerArrivedEvent>,
    stand: Res<RoadsideStand>,
    mut queue: ResMut<StandServiceQueue>,
    mut travelers: Query<(&Traveler, &mut TravelerPhase, &mut StandVisit)>,
) {
    for arrival in arrivals.read() {
        let Ok((traveler, mut phase, mut visit)) = travelers.get_mut(arrival.traveler) else {
            continue;
        };
        let Some(slot) = visit.current_slot() else {
            phase.resume_walking(traveler.path_y);
            commands.entity(arrival.traveler).remove::<StandVisit>();
            continue;
        };
        if stand.slots[slot].is_some() {
            queue.pending.push(PendingSale {
                traveler: arrival.traveler,
                slot,
                remaining_ms: STAND_SERVICE_MS,
            });
        } else {
            info!("[Economy] Slot {} empty; traveler moves on", slot);
            steer_onward(
                &mut commands,
                arrival.traveler,
                traveler,
                &mut phase,
                &mut visit,
                &stand,
            );
        }
    }
}

/// Runs the service windows down and completes sales as they close.
pub fn tick_service(
    mut commands: Commands,
    time: Res<Time>,
    registry: Res<ItemRegistry>,
    mut stand: ResMut<RoadsideStand>,
    mut queue: ResMut<StandServiceQueue>,
    mut sales: EventWriter<StandSaleEvent>,
    mut travelers: Query<(
        &Traveler,
        &mut TravelerPhase,
        &mut StandVisit,
        &mut TravelerTastes,
    )>,
) {
    let dt_ms = time.delta_secs() * 1000.0;
    let mut completed = Vec::new();
    for (index, sale) in queue.pending.iter_mut().enumerate() {
        sale.remaining_ms -= dt_ms;
        if sale.remaining_ms <= 0.0 {
            completed.push(index);
        }
    }

    for index in completed.into_iter().rev() {
        let sale = queue.pending.swap_remove(index);
        let Ok((traveler, mut phase, mut visit, mut tastes)) = travelers.get_mut(sale.traveler)
        else {
            continue;
        };

        if let Some(item_id) = stand.slots[sale.slot].take() {
            let price = registry.sell_price(&item_id).unwrap_or(0);
            stand.gold_earned += price;
            tastes.gold = tastes.gold.saturating_sub(price);
            info!(
                "[Economy] Sold {} for {}g (slot {})",
                item_id, price, sale.slot
            );
            sales.send(StandSaleEvent {
                item_id,
                price,
                slot: sale.slot,
            });
        } else {
            info!("[Economy] Slot {} emptied mid-service; no sale", sale.slot);
        }

        steer_onward(
            &mut commands,
            sale.traveler,
            traveler,
            &mut phase,
            &mut visit,
            &stand,
        );
    }
}
