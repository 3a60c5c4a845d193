//! Data layer — populates the item registry at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the ItemRegistry
//! from the embedded RON catalog, applies the optional tuning override
//! file, then transitions the game into GameState::Playing.
//!
//! No other domain needs to seed these resources. All domain plugins can
//! safely read them once GameState has advanced past Loading.

use bevy::prelude::*;
use serde::Deserialize;

use crate::shared::*;

const ITEM_CATALOG_RON: &str = include_str!("items.ron");

/// Optional tuning override, read from next to the binary. Absent file is
/// the normal case; a present file replaces the defaults wholesale (missing
/// fields fall back to the shipped values via serde defaults).
const TUNING_OVERRIDE_PATH: &str = "fernvale.tuning.json";

#[derive(Debug, Deserialize)]
struct ItemCatalog {
    items: Vec<ItemDef>,
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates the registry and then transitions to Playing.
fn load_all_data(
    mut item_registry: ResMut<ItemRegistry>,
    mut tuning: ResMut<SpawnTuning>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: loading item catalog…");

    populate_items(&mut item_registry);
    info!("  Items loaded: {}", item_registry.items.len());

    apply_tuning_override(&mut tuning);

    info!("DataPlugin: done. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}

fn populate_items(registry: &mut ItemRegistry) {
    match ron::from_str::<ItemCatalog>(ITEM_CATALOG_RON) {
        Ok(catalog) => {
            for def in catalog.items {
                registry.items.insert(def.id.clone(), def);
            }
        }
        Err(err) => {
            warn!("[Data] Item catalog failed to parse: {err}");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_tuning_override(tuning: &mut SpawnTuning) {
    let Ok(raw) = std::fs::read_to_string(TUNING_OVERRIDE_PATH) else {
        return;
    };
    match serde_json::from_str::<SpawnTuning>(&raw) {
        Ok(overridden) => {
            *tuning = overridden;
            info!("[Data] Applied tuning override from {TUNING_OVERRIDE_PATH}");
        }
        Err(err) => {
            warn!("[Data] Ignoring malformed {TUNING_OVERRIDE_PATH}: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn apply_tuning_override(_tuning: &mut SpawnTuning) {}
