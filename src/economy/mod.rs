//! Economy domain — the roadside stand, traveler service, gold tracking.
//!
//! All cross-domain communication goes through `crate::shared::*` events and resources.
//! No other domain module is imported here.

use bevy::prelude::*;
use crate::shared::*;

pub mod gold;
pub mod service;
pub mod stand;

use gold::{apply_gold_changes, track_stand_sales, EconomyStats};
use service::{queue_arrivals, tick_service, StandServiceQueue};
use stand::{handle_stand_interactions, spawn_stand_sprites, update_stand_display};

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EconomyStats>()
            .init_resource::<StandServiceQueue>();

        // The stand board goes up after the map exists.
        app.add_systems(
            OnEnter(GameState::Playing),
            spawn_stand_sprites.after(crate::world::setup_world),
        );

        app.add_systems(
            Update,
            (
                // Player interactions with the stand: stock, withdraw, collect.
                handle_stand_interactions,
                // Keep slot markers in sync with listings.
                update_stand_display,
                // Travelers that reached their slot enter the service queue.
                queue_arrivals,
                // Service timers tick down; completions become sales.
                tick_service,
                // Gold change events can arrive from any domain at any time.
                apply_gold_changes,
                track_stand_sales,
            )
                .run_if(in_state(GameState::Playing)),
        );

        info!("[Economy] EconomyPlugin registered.");
    }
}
