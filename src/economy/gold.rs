use bevy::prelude::*;

use crate::shared::*;

/// Running totals for the stand economy.
#[derive(Resource, Debug, Clone, Default)]
pub struct EconomyStats {
    pub total_gold_earned: u64,
    pub total_gold_spent: u64,
    pub items_sold: u64,
    pub total_transactions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GoldApplied {
    Gained(u32),
    Spent(u32),
    /// Spend exceeded the balance; carries what was actually available.
    Overdrawn(u32),
}

/// Applies one signed delta to a balance. Spending past zero clamps
/// instead of wrapping.
fn settle(balance: u32, amount: i32) -> (u32, GoldApplied) {
    if amount >= 0 {
        let gain = amount as u32;
        (balance.saturating_add(gain), GoldApplied::Gained(gain))
    } else {
        let cost = amount.unsigned_abs();
        if cost <= balance {
            (balance - cost, GoldApplied::Spent(cost))
        } else {
            (0, GoldApplied::Overdrawn(balance))
        }
    }
}

/// Applies GoldChangeEvents to PlayerState.gold and keeps the totals current.
pub fn apply_gold_changes(
    mut gold_events: EventReader<GoldChangeEvent>,
    mut player_state: ResMut<PlayerState>,
    mut stats: ResMut<EconomyStats>,
) {
    for ev in gold_events.read() {
        let (balance, applied) = settle(player_state.gold, ev.amount);
        player_state.gold = balance;
        match applied {
            GoldApplied::Gained(gain) => {
                stats.total_gold_earned = stats.total_gold_earned.saturating_add(gain as u64);
                info!(
                    "[Economy] Gold +{}: {}. New balance: {}g",
                    gain, ev.reason, balance
                );
            }
            GoldApplied::Spent(cost) => {
                stats.total_gold_spent = stats.total_gold_spent.saturating_add(cost as u64);
                info!(
                    "[Economy] Gold -{}: {}. New balance: {}g",
                    cost, ev.reason, balance
                );
            }
            GoldApplied::Overdrawn(available) => {
                stats.total_gold_spent = stats.total_gold_spent.saturating_add(available as u64);
                warn!(
                    "[Economy] Tried to spend {}g with only {}g on hand ({}); clamping to 0",
                    ev.amount.unsigned_abs(),
                    available,
                    ev.reason
                );
            }
        }
        stats.total_transactions += 1;
    }
}

/// Counts completed stand sales.
pub fn track_stand_sales(
    mut sale_events: EventReader<StandSaleEvent>,
    mut stats: ResMut<EconomyStats>,
) {
    for sale in sale_events.read() {
        stats.items_sold += 1;
        debug!(
            "[Economy] Sale recorded: {} for {}g (slot {})",
            sale.item_id, sale.price, sale.slot
        );
    }
}
